//! Configuration module
//!
//! Settings loaded from the user's config file, with serde defaults so a
//! partial file works.

pub mod config;

pub use config::Config;
