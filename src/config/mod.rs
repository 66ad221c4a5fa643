// src/config/mod.rs

//! Process options and their file-backed loading.
//!
//! Responsibilities:
//! - Define the option set understood by the normalizer, the controller and
//!   the platform launcher (`model.rs`).
//! - Load options from a TOML file on disk (`loader.rs`).

pub mod loader;
pub mod model;

pub use loader::{load_from_path, load_options};
pub use model::{ProcessOptions, ReadyHook};
