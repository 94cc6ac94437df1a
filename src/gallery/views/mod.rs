//! # Views Module
//!
//! Contains the components that turn gallery snapshots into terminal output.

pub mod terminal_renderer;

pub use terminal_renderer::{TerminalRenderer, ViewRenderer};
