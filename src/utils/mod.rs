//! Utility functions and helpers
//!
//! Well-known application paths and the logging collaborator.

pub mod app_paths;
pub mod logging;
