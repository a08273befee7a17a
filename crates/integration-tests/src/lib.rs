//! Shared fixtures for the integration suites.

use std::sync::Arc;

use domains::{Comment, CommentId, KeyValueStore, Thread, ThreadId, ThreadKind, User, UserId};
use services::{Forum, SeedData};
use storage_adapters::MemoryStore;

pub fn user(id: u64, name: &str, moderator: bool) -> User {
    User {
        id: UserId(id),
        user_name: name.to_string(),
        password: format!("{name}-pw"),
        is_moderator: moderator,
    }
}

pub fn thread(id: u64, creator: &User, kind: ThreadKind) -> Thread {
    Thread {
        id: ThreadId(id),
        title: format!("thread {id}"),
        kind,
        creation_date: "2025-01-01T12:00:00Z".to_string(),
        description: "description".to_string(),
        creator: creator.clone(),
        comments_locked: None,
    }
}

pub fn comment(id: u64, thread: u64, creator: &User, parent: Option<u64>) -> Comment {
    Comment {
        id: CommentId(id),
        thread: ThreadId(thread),
        content: format!("comment {id}"),
        creator: creator.clone(),
        comment: parent.map(CommentId),
    }
}

pub fn unanswered() -> ThreadKind {
    ThreadKind::Qna {
        is_answered: false,
        comment_answer_id: None,
    }
}

/// A forum on fresh in-memory storage with the given users registered.
pub async fn forum_with_users(users: &[User]) -> (Forum, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let mut forum = Forum::open(store.clone() as Arc<dyn KeyValueStore>, &SeedData::empty()).await;
    for u in users {
        forum
            .users
            .create_user(u.clone())
            .await
            .expect("in-memory store accepts writes");
    }
    (forum, store)
}
