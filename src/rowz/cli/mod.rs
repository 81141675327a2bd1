//! # CLI Layer
//!
//! This module is **one possible UI client** for rowz; it is not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdin, stdout, stderr)
//! - Decides the process exit status
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - [`commands`]: `run()` dispatch, context setup and one `handle_*` per command
//! - [`setup`]: clap definitions and grouped help
//! - [`shell`]: the interactive shell, driven by a `Session`
//! - [`render`]: `CmdResult` to text, through the templates in [`templates`]
//! - [`theme`], [`styles`]: named styles and the template `style` filter
//! - [`prompt`]: line and yes/no prompts
//!
//! CLI tests check parsing and output; the behaviour of the operations themselves is
//! tested in the command layer.

pub mod commands;
pub mod prompt;
pub mod render;
pub mod setup;
pub mod shell;
pub mod styles;
pub mod templates;
pub mod theme;

pub use commands::run;
