//! Bundled starter content, used when storage holds no threads or comments yet.

use domains::{keys, Comment, CommentId, Result, Thread, ThreadId, ThreadKind, User, UserId};
use tracing::info;

use crate::persistence::Persistence;

#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub users: Vec<User>,
    pub threads: Vec<Thread>,
    pub comments: Vec<Comment>,
}

/// Keys written by [`SeedData::write_missing`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub written: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

fn user(id: u64, name: &str, moderator: bool) -> User {
    User {
        id: UserId(id),
        user_name: name.to_string(),
        password: format!("{name}123"),
        is_moderator: moderator,
    }
}

fn day(d: u32) -> String {
    format!("2025-03-{d:02}T09:00:00Z")
}

fn comment(id: u64, thread: u64, creator: &User, content: &str, parent: Option<u64>) -> Comment {
    Comment {
        id: CommentId(id),
        thread: ThreadId(thread),
        content: content.to_string(),
        creator: creator.clone(),
        comment: parent.map(CommentId),
    }
}

impl SeedData {
    /// Nothing at all; stores start empty.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bundled() -> Self {
        let lisa = user(1, "Lisa", false);
        let erik = user(2, "Erik", false);
        let danne = user(3, "Danne", true);

        let threads = vec![
            Thread {
                id: ThreadId(1),
                title: "Välkommen till forumet".into(),
                kind: ThreadKind::Meddelande,
                creation_date: day(1),
                description: "Håll god ton och håll er till ämnet.".into(),
                creator: danne.clone(),
                comments_locked: Some(true),
            },
            Thread {
                id: ThreadId(2),
                title: "Hur fungerar lånekontrollen i Rust?".into(),
                kind: ThreadKind::Qna {
                    is_answered: true,
                    comment_answer_id: Some(CommentId(2)),
                },
                creation_date: day(3),
                description: "Jag får 'cannot borrow as mutable' och förstår inte varför.".into(),
                creator: lisa.clone(),
                comments_locked: None,
            },
            Thread {
                id: ThreadId(3),
                title: "Tabbar eller mellanslag?".into(),
                kind: ThreadKind::Diskussion,
                creation_date: day(5),
                description: "Vad använder ni och varför?".into(),
                creator: erik.clone(),
                comments_locked: None,
            },
            Thread {
                id: ThreadId(4),
                title: "Söker en till i slutprojektet".into(),
                kind: ThreadKind::HittaGruppmedlem,
                creation_date: day(8),
                description: "Vi är två och behöver en tredje med frontendvana.".into(),
                creator: erik.clone(),
                comments_locked: None,
            },
            Thread {
                id: ThreadId(5),
                title: "Vilken editor rekommenderas?".into(),
                kind: ThreadKind::Qna {
                    is_answered: false,
                    comment_answer_id: None,
                },
                creation_date: day(9),
                description: "Ny på kursen, vad ska jag installera?".into(),
                creator: erik.clone(),
                comments_locked: None,
            },
        ];

        let comments = vec![
            comment(1, 2, &erik, "Visa koden så blir det lättare att svara.", None),
            comment(2, 2, &danne, "Du har en delad referens kvar när du försöker mutera. Flytta lånet till ett eget block.", None),
            comment(3, 2, &lisa, "Tack, det löste det!", Some(2)),
            comment(4, 3, &lisa, "Mellanslag, rustfmt bestämmer ändå.", None),
            comment(5, 3, &erik, "Bloody tabs forever.", Some(4)),
            comment(6, 3, &danne, "Håll en trevlig ton.", Some(5)),
            comment(7, 5, &lisa, "VS Code med rust-analyzer.", None),
        ];

        Self {
            users: vec![lisa, erik, danne],
            threads,
            comments,
        }
    }

    /// Stores each seed collection whose key holds nothing yet. Existing
    /// values, even malformed ones, are left alone.
    pub async fn write_missing(&self, persistence: &Persistence) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        for key in [keys::USERS, keys::THREADS, keys::COMMENTS] {
            if persistence.has_item(key).await? {
                report.skipped.push(key);
                continue;
            }
            match key {
                keys::USERS => persistence.set_item(key, &self.users).await?,
                keys::THREADS => persistence.set_item(key, &self.threads).await?,
                _ => persistence.set_item(key, &self.comments).await?,
            }
            info!(key, "seeded");
            report.written.push(key);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use storage_adapters::MemoryStore;

    #[tokio::test]
    async fn test_write_missing_keeps_existing_values() {
        let persistence = Persistence::new(Arc::new(MemoryStore::new()));
        persistence.set_item(keys::USERS, &Vec::<User>::new()).await.unwrap();

        let report = SeedData::bundled().write_missing(&persistence).await.unwrap();
        assert_eq!(report.skipped, vec![keys::USERS]);
        assert_eq!(report.written, vec![keys::THREADS, keys::COMMENTS]);

        let users: Vec<User> = persistence.get_item(keys::USERS, vec![]).await;
        assert!(users.is_empty());

        let again = SeedData::bundled().write_missing(&persistence).await.unwrap();
        assert!(again.written.is_empty());
    }

    #[test]
    fn test_bundled_answers_point_into_own_thread() {
        let seed = SeedData::bundled();
        for thread in seed.threads.iter().filter(|t| t.is_answered()) {
            let answer = thread.answer_id().unwrap();
            let comment = seed.comments.iter().find(|c| c.id == answer).unwrap();
            assert_eq!(comment.thread, thread.id);
        }
    }

    #[test]
    fn test_bundled_ids_unique() {
        let seed = SeedData::bundled();
        let comment_ids: HashSet<_> = seed.comments.iter().map(|c| c.id).collect();
        assert_eq!(comment_ids.len(), seed.comments.len());
        let thread_ids: HashSet<_> = seed.threads.iter().map(|t| t.id).collect();
        assert_eq!(thread_ids.len(), seed.threads.len());
    }
}
