//! # services
//!
//! Stateful forum stores over the `domains` ports: persistence adapter,
//! user store, thread/comment store, and the gated actions tying them to the
//! authorization rules.

pub mod forum;
pub mod persistence;
pub mod seed;
pub mod thread_store;
pub mod user_store;

pub use forum::Forum;
pub use persistence::Persistence;
pub use seed::{SeedData, SeedReport};
pub use thread_store::{NewComment, NewThread, ThreadStore};
pub use user_store::UserStore;
