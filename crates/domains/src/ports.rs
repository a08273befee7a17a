//! # Core Traits (Ports)
//!
//! Any storage adapter must implement these traits to back the stores.

use async_trait::async_trait;

/// Keys of the persisted collections.
pub mod keys {
    pub const THREADS: &str = "@forum/threads";
    pub const COMMENTS: &str = "@forum/comments";
    pub const USERS: &str = "@forum/users";
    pub const CURRENT_USER: &str = "@forum/currentUser";

    pub const ALL: [&str; 4] = [THREADS, COMMENTS, USERS, CURRENT_USER];
}

/// String key/value persistence, one JSON document per key.
///
/// Writers always replace the whole value of a key; there are no partial
/// writes and no transactions spanning keys.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw stored value, or `None` when the key was never written.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Removes the key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
