//! Flood overlay viewer service library.
//!
//! This module exposes the session internals for testing purposes.

pub mod commands;
pub mod controller;
pub mod renderer;
pub mod session;

pub use commands::{Command, CommandParseError, PickTarget};
pub use controller::{Input, LoadEvent, OverlayId, SelectionController, Transition, UserAction};
pub use renderer::{HttpOverlayRenderer, OverlayRenderer};
pub use session::{ViewerEvent, ViewerSession};
