//! Foundation types for backskin.
//!
//! This crate contains the pieces shared by every backskin crate: the error
//! enum with its `Result` alias, and the static configuration read from
//! `backskin.toml`.

pub mod config;
pub mod error;

/// Code of the built-in backend skin. It always exists and maps to the
/// framework's own backend directory.
pub const DEFAULT_SKIN: &str = "octobercms";
