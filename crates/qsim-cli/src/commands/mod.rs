//! CLI command implementations.

pub mod anneal;
pub mod capabilities;
pub mod common;
pub mod library;
pub mod run;
pub mod version;
