//! Terminal User Interface module.
//!
//! Renders the account list view model and maps keys onto its operations.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `helpers` - Background task spawning
//! - `render` - View rendering dispatch and overlays
//! - `accounts` - Active/inactive account sections
//! - `extensions` - Extension points panel
//! - `status` - Status bar widget
//! - `help` - Help overlay

mod accounts;
mod events;
mod extensions;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
