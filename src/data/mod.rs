//! Data layer: paths into nested trees and the operations over them.
//!
//! Everything here works on `serde_json::Value` regardless of which file
//! format a tree came from; mappings keep their insertion order.

pub mod access;
pub mod cast;
pub mod path;
pub mod template;
pub mod walk;

pub use path::DataPath;
