//! Utility functions and helpers
//!
//! Shared plumbing with no domain logic: platform paths and log setup.

pub mod app_paths;
pub mod logging;
