//! Configuration module
//!
//! Persisted settings: the catalog endpoint, the auth token and
//! where the last response is stored.

pub mod config;

pub use config::Config;
