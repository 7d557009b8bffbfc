//! CLI command implementations.

pub mod common;
pub mod map;
pub mod topology;
pub mod version;
