//! Core utilities for the rugby predictor
//!
//! - `files`: database location and reading catalog uploads

pub mod files;


pub use files::{database_path, default_database_path, read_upload};
