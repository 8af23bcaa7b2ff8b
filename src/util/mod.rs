//! Text helpers for rendering user-entered strings in the terminal.
//!
//! - **Sanitizing**: strip control characters and ANSI escapes from names
//! - **Width**: Unicode-aware display width and truncation
//!
//! # Examples
//!
//! ```
//! use feedkeeper::util::{sanitize_line, truncate_to_width};
//!
//! assert_eq!(sanitize_line("Work\x1b[31m\n"), "Work");
//! assert_eq!(truncate_to_width("The Old Reader", 10), "The Old...");
//! ```

mod text;

pub use text::{display_width, sanitize_line, truncate_to_width};
