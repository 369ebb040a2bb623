//! Library crate for usradmin-tui.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state and update loop (`app`)
//! - Remote user store client and record model (`api`)
//! - Error and result types (`error`)
//! - Derivation of the displayed list from the canonical list (`view`)
//! - Pass-through proxy for the user service (`proxy`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `usradmin-tui` binary and by tests.
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod error;
pub mod proxy;
pub mod ui;
pub mod view;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
