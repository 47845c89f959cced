// src/lib.rs

//! ruy-recipe
//!
//! Builds the ruy matrix multiplication library from a pinned upstream
//! snapshot and packages it for consumers.
//!
//! # Architecture
//!
//! - Caller-owned inputs: build profile, source registry and dependency
//!   descriptions are plain TOML documents
//! - Validation first: rejected configurations never touch the filesystem
//! - Checksummed sources: archives are cached by SHA-256 and re-verified
//! - Exact patching: every vendored-script edit must find its target text
//! - Declared link surface: the package carries a JSON manifest of its
//!   libraries and system libraries

mod error;
pub mod hash;
pub mod recipe;
pub mod version;

pub use error::{Error, Result};
pub use recipe::{CookResult, Kitchen, KitchenConfig, Profile, Recipe};
pub use version::{CompilerVersion, SnapshotVersion};
