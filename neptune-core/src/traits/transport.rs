//! Serial transport trait

/// Errors that can occur while sending to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Transmit queue is full
    Busy,
    /// Link to the display is down
    Disconnected,
}

/// Transmit side of the serial bridge to the display
///
/// Implementations forward each chunk unchanged and in call order. Delivery
/// guarantees (retries, acknowledgements) are the implementation's concern.
pub trait Transport {
    /// Send one chunk of bytes
    fn send(&mut self, chunk: &[u8]) -> Result<(), TransportError>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}
