//! Board-agnostic core of the Neptune screen bridge
//!
//! This crate contains everything the screen service needs that does not
//! depend on a particular printer host or serial port:
//!
//! - Collaborator traits (printer status, command execution, transport)
//! - Interaction state (step sizes, active targets, file selection)
//! - Outbound renderer
//! - Deferred command queue with continuations
//! - Configuration types and loader

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod queue;
pub mod render;
pub mod state;
pub mod traits;

pub use queue::{CommandSink, Continuation, DeferredQueue, Followup, QueueError};
pub use render::{RenderError, Renderer};
