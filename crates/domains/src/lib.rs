//! forum/crates/domains/src/lib.rs
//!
//! The central domain logic and interface definitions for the forum.

pub mod authorization;
pub mod censor;
pub mod comment_tree;
pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use authorization::*;
pub use comment_tree::*;
pub use error::*;
pub use models::*;
pub use ports::*;
