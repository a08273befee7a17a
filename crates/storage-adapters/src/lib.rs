//! # storage-adapters
//!
//! Implementations of the `KeyValueStore` port.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
