//! Cached SD card listing

use heapless::{String, Vec};

/// Maximum number of files shown on the file page
pub const MAX_FILES: usize = 32;

/// Maximum file name length in bytes
pub const MAX_FILENAME_LEN: usize = 64;

/// A file name as shown on and sent to the display
pub type FileName = String<MAX_FILENAME_LEN>;

/// Errors that can occur while filling a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ListingError {
    /// Listing already holds [`MAX_FILES`] entries
    Full,
    /// Name exceeds [`MAX_FILENAME_LEN`]
    NameTooLong,
}

/// One printable file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: FileName,
    /// Size in bytes
    pub size: u32,
}

/// Ordered list of printable files, index = position on the file page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileListing {
    entries: Vec<FileEntry, MAX_FILES>,
}

impl FileListing {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Append a file
    pub fn push(&mut self, name: &str, size: u32) -> Result<(), ListingError> {
        let mut entry_name = FileName::new();
        entry_name
            .push_str(name)
            .map_err(|_| ListingError::NameTooLong)?;

        self.entries
            .push(FileEntry {
                name: entry_name,
                size,
            })
            .map_err(|_| ListingError::Full)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, index: usize) -> Option<&FileEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter()
    }
}
