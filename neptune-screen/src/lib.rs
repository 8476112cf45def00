//! Neptune touchscreen service
//!
//! Connects the Neptune 3 series touchscreen to a printer host:
//!
//! ```text
//! serial bytes ─► FrameParser ─► Message ─► Registry ─► handler
//!                                                        │  │
//!                               InteractionState ◄───────┘  ├─► Renderer ─► serial
//!                                                           └─► DeferredQueue ─► executor
//! ```
//!
//! [`Screen`] owns all of it and runs the init, status and drain timers from
//! [`Screen::poll`].

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod context;
pub mod handlers;
pub mod registry;
pub mod screen;
pub mod status;

#[cfg(test)]
mod testing;

pub use context::{Context, HandlerError};
pub use registry::{Entry, Handler, HandlerFn, Registry, DEFAULT_ENTRIES};
pub use screen::Screen;
