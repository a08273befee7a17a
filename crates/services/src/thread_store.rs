//! # Thread/Comment Store
//!
//! All threads and comments, held in memory and written through to
//! `@forum/threads` and `@forum/comments` as whole collections.
//!
//! Every mutation builds the next collection, persists it, and only then
//! swaps it in, so a failed write leaves the store as it was.

use chrono::{SecondsFormat, Utc};
use domains::{
    keys, AppError, Comment, CommentId, CommentTree, Result, Thread, ThreadCategory, ThreadId,
    ThreadKind, ThreadPatch, User,
};
use tracing::{debug, warn};

use crate::persistence::Persistence;
use crate::seed::SeedData;

/// Fields a caller supplies for a new thread.
#[derive(Debug, Clone)]
pub struct NewThread {
    pub title: String,
    pub category: ThreadCategory,
    pub description: String,
    pub creator: User,
}

/// Fields a caller supplies for a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub thread: ThreadId,
    pub content: String,
    pub creator: User,
    pub parent: Option<CommentId>,
}

pub struct ThreadStore {
    persistence: Persistence,
    threads: Vec<Thread>,
    comments: Vec<Comment>,
}

impl ThreadStore {
    /// Loads both collections, falling back to the seed for each missing key.
    pub async fn load(persistence: Persistence, seed: &SeedData) -> Self {
        let threads: Vec<Thread> = persistence
            .get_item_or_else(keys::THREADS, || seed.threads.clone())
            .await;
        let comments: Vec<Comment> = persistence
            .get_item_or_else(keys::COMMENTS, || seed.comments.clone())
            .await;
        debug!(threads = threads.len(), comments = comments.len(), "thread store loaded");

        Self {
            persistence,
            threads,
            comments,
        }
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn get_thread_by_id(&self, thread_id: ThreadId) -> Option<&Thread> {
        self.threads.iter().find(|t| t.id == thread_id)
    }

    pub fn get_comment_by_id(&self, comment_id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    pub fn threads_in_category(&self, category: ThreadCategory) -> Vec<&Thread> {
        self.threads
            .iter()
            .filter(|t| t.category() == category)
            .collect()
    }

    /// `false` for absent threads and for every non-QNA category.
    pub fn is_qna_answered(&self, thread_id: ThreadId) -> bool {
        self.get_thread_by_id(thread_id)
            .is_some_and(|t| t.is_answered())
    }

    pub fn comment_count(&self, thread_id: ThreadId) -> usize {
        self.comments.iter().filter(|c| c.thread == thread_id).count()
    }

    pub fn comment_tree(&self, thread_id: ThreadId) -> CommentTree<'_> {
        CommentTree::build(&self.comments, thread_id)
    }

    pub async fn create_thread(&mut self, thread: Thread) -> Result<()> {
        debug!(thread_id = %thread.id, category = %thread.category(), "creating thread");
        let mut threads = self.threads.clone();
        threads.push(thread);
        self.commit_threads(threads).await
    }

    /// Allocates the next id and stamps the creation time.
    pub async fn create_thread_from(&mut self, draft: NewThread) -> Result<Thread> {
        let thread = Thread {
            id: self.next_thread_id(),
            title: draft.title,
            kind: ThreadKind::from(draft.category),
            creation_date: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            description: draft.description,
            creator: draft.creator,
            comments_locked: None,
        };
        self.create_thread(thread.clone()).await?;
        Ok(thread)
    }

    /// Merges `patch` into the thread. Returns `false`, and writes nothing,
    /// when no thread has this id.
    pub async fn update_thread(&mut self, thread_id: ThreadId, patch: &ThreadPatch) -> Result<bool> {
        let mut threads = self.threads.clone();
        let Some(thread) = threads.iter_mut().find(|t| t.id == thread_id) else {
            warn!(%thread_id, "update of unknown thread ignored");
            return Ok(false);
        };
        patch.apply(thread);
        self.commit_threads(threads).await?;
        debug!(%thread_id, "thread updated");
        Ok(true)
    }

    /// Replaces a QNA thread by id.
    ///
    /// The replacement must be a QNA thread with the same id whose
    /// `isAnswered` agrees with `commentAnswerId`. Returns `false` when no
    /// thread has this id.
    pub async fn update_qna_thread(&mut self, thread_id: ThreadId, updated: Thread) -> Result<bool> {
        if updated.id != thread_id {
            return Err(AppError::Validation(format!(
                "replacement thread {} does not match thread {thread_id}",
                updated.id
            )));
        }
        match updated.kind {
            ThreadKind::Qna { is_answered, comment_answer_id } if is_answered == comment_answer_id.is_some() => {}
            ThreadKind::Qna { .. } => {
                return Err(AppError::Validation(
                    "isAnswered must be set exactly when commentAnswerId is".into(),
                ))
            }
            _ => {
                return Err(AppError::Validation(format!(
                    "thread {thread_id} replacement is not a QNA thread"
                )))
            }
        }

        let mut threads = self.threads.clone();
        let Some(slot) = threads.iter_mut().find(|t| t.id == thread_id) else {
            warn!(%thread_id, "QNA update of unknown thread ignored");
            return Ok(false);
        };
        *slot = updated;
        self.commit_threads(threads).await?;
        Ok(true)
    }

    /// Marks `comment_id` as the answer, or clears the answer when it is
    /// already this comment. Returns the new `isAnswered`, or `None` when the
    /// thread is absent or not a QNA thread.
    pub async fn toggle_answer(&mut self, thread_id: ThreadId, comment_id: CommentId) -> Result<Option<bool>> {
        let Some(thread) = self.get_thread_by_id(thread_id).filter(|t| t.is_qna()) else {
            return Ok(None);
        };

        let is_current_answer = thread.is_answered() && thread.answer_id() == Some(comment_id);
        let mut updated = thread.clone();
        updated.kind = if is_current_answer {
            ThreadKind::Qna {
                is_answered: false,
                comment_answer_id: None,
            }
        } else {
            ThreadKind::Qna {
                is_answered: true,
                comment_answer_id: Some(comment_id),
            }
        };

        self.update_qna_thread(thread_id, updated).await?;
        debug!(%thread_id, %comment_id, answered = !is_current_answer, "answer toggled");
        Ok(Some(!is_current_answer))
    }

    /// Flips `commentsLocked`, treating an absent flag as unlocked. Returns
    /// the new state, or `None` when no thread has this id.
    pub async fn toggle_comments_lock(&mut self, thread_id: ThreadId) -> Result<Option<bool>> {
        let mut threads = self.threads.clone();
        let Some(thread) = threads.iter_mut().find(|t| t.id == thread_id) else {
            warn!(%thread_id, "lock toggle of unknown thread ignored");
            return Ok(None);
        };
        let locked = !thread.comments_locked();
        thread.comments_locked = Some(locked);
        self.commit_threads(threads).await?;
        debug!(%thread_id, locked, "comments lock toggled");
        Ok(Some(locked))
    }

    /// Appends a comment. Neither the thread nor the parent id is checked.
    pub async fn add_comment(&mut self, comment: Comment) -> Result<()> {
        debug!(comment_id = %comment.id, thread_id = %comment.thread, "adding comment");
        let mut comments = self.comments.clone();
        comments.push(comment);
        self.persistence.set_item(keys::COMMENTS, &comments).await?;
        self.comments = comments;
        Ok(())
    }

    pub async fn add_comment_from(&mut self, draft: NewComment) -> Result<Comment> {
        let comment = Comment {
            id: self.next_comment_id(),
            thread: draft.thread,
            content: draft.content,
            creator: draft.creator,
            comment: draft.parent,
        };
        self.add_comment(comment.clone()).await?;
        Ok(comment)
    }

    async fn commit_threads(&mut self, threads: Vec<Thread>) -> Result<()> {
        self.persistence.set_item(keys::THREADS, &threads).await?;
        self.threads = threads;
        Ok(())
    }

    fn next_thread_id(&self) -> ThreadId {
        ThreadId(self.threads.iter().map(|t| t.id.0).max().map_or(1, |max| max + 1))
    }

    fn next_comment_id(&self) -> CommentId {
        CommentId(self.comments.iter().map(|c| c.id.0).max().map_or(1, |max| max + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockKeyValueStore, UserId};
    use std::sync::Arc;
    use storage_adapters::MemoryStore;

    fn anna() -> User {
        User {
            id: UserId(1),
            user_name: "anna".into(),
            password: "pw".into(),
            is_moderator: false,
        }
    }

    async fn empty_store() -> ThreadStore {
        ThreadStore::load(Persistence::new(Arc::new(MemoryStore::new())), &SeedData::empty()).await
    }

    async fn with_thread(store: &mut ThreadStore, category: ThreadCategory) -> Thread {
        store
            .create_thread_from(NewThread {
                title: "fråga".into(),
                category,
                description: "beskrivning".into(),
                creator: anna(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_lock_toggle_twice_restores() {
        let mut store = empty_store().await;
        let thread = with_thread(&mut store, ThreadCategory::Diskussion).await;
        assert_eq!(thread.comments_locked, None);

        assert_eq!(store.toggle_comments_lock(thread.id).await.unwrap(), Some(true));
        assert_eq!(store.toggle_comments_lock(thread.id).await.unwrap(), Some(false));
        assert!(!store.get_thread_by_id(thread.id).unwrap().comments_locked());
        assert_eq!(store.toggle_comments_lock(ThreadId(404)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_answer_toggle_sets_then_clears() {
        let mut store = empty_store().await;
        let thread = with_thread(&mut store, ThreadCategory::Qna).await;

        assert_eq!(store.toggle_answer(thread.id, CommentId(3)).await.unwrap(), Some(true));
        let t = store.get_thread_by_id(thread.id).unwrap();
        assert!(t.is_answered());
        assert_eq!(t.answer_id(), Some(CommentId(3)));
        assert!(store.is_qna_answered(thread.id));

        assert_eq!(store.toggle_answer(thread.id, CommentId(3)).await.unwrap(), Some(false));
        let t = store.get_thread_by_id(thread.id).unwrap();
        assert!(!t.is_answered());
        assert_eq!(t.answer_id(), None);
    }

    #[tokio::test]
    async fn test_answer_moves_to_other_comment() {
        let mut store = empty_store().await;
        let thread = with_thread(&mut store, ThreadCategory::Qna).await;
        store.toggle_answer(thread.id, CommentId(3)).await.unwrap();
        store.toggle_answer(thread.id, CommentId(4)).await.unwrap();
        assert_eq!(store.get_thread_by_id(thread.id).unwrap().answer_id(), Some(CommentId(4)));
    }

    #[tokio::test]
    async fn test_is_qna_answered_false_for_plain_or_absent() {
        let mut store = empty_store().await;
        let plain = with_thread(&mut store, ThreadCategory::Meddelande).await;
        assert!(!store.is_qna_answered(plain.id));
        assert!(!store.is_qna_answered(ThreadId(404)));
        assert_eq!(store.toggle_answer(plain.id, CommentId(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_thread_patch_and_missing_id() {
        let mut store = empty_store().await;
        let thread = with_thread(&mut store, ThreadCategory::NoCategory).await;
        let patch = ThreadPatch {
            title: Some("ny titel".into()),
            description: None,
        };

        assert!(store.update_thread(thread.id, &patch).await.unwrap());
        let t = store.get_thread_by_id(thread.id).unwrap();
        assert_eq!(t.title, "ny titel");
        assert_eq!(t.description, "beskrivning");

        let before = store.threads().to_vec();
        assert!(!store.update_thread(ThreadId(404), &patch).await.unwrap());
        assert_eq!(store.threads(), before.as_slice());
    }

    #[tokio::test]
    async fn test_update_qna_thread_by_id_validates() {
        let mut store = empty_store().await;
        let first = with_thread(&mut store, ThreadCategory::Qna).await;
        let second = with_thread(&mut store, ThreadCategory::Qna).await;

        let mut inconsistent = second.clone();
        inconsistent.kind = ThreadKind::Qna {
            is_answered: true,
            comment_answer_id: None,
        };
        assert!(matches!(
            store.update_qna_thread(second.id, inconsistent).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            store.update_qna_thread(first.id, second.clone()).await,
            Err(AppError::Validation(_))
        ));

        let mut answered = second.clone();
        answered.kind = ThreadKind::Qna {
            is_answered: true,
            comment_answer_id: Some(CommentId(9)),
        };
        assert!(store.update_qna_thread(second.id, answered).await.unwrap());
        assert!(!store.is_qna_answered(first.id));
        assert!(store.is_qna_answered(second.id));
    }

    #[tokio::test]
    async fn test_comments_allocate_ids_and_count_per_thread() {
        let mut store = empty_store().await;
        let thread = with_thread(&mut store, ThreadCategory::Diskussion).await;
        let top = store
            .add_comment_from(NewComment {
                thread: thread.id,
                content: "hej".into(),
                creator: anna(),
                parent: None,
            })
            .await
            .unwrap();
        let reply = store
            .add_comment_from(NewComment {
                thread: thread.id,
                content: "svar".into(),
                creator: anna(),
                parent: Some(top.id),
            })
            .await
            .unwrap();

        assert_eq!((top.id, reply.id), (CommentId(1), CommentId(2)));
        assert_eq!(store.comment_count(thread.id), 2);
        assert_eq!(store.comment_count(ThreadId(404)), 0);
        assert_eq!(store.comment_tree(thread.id).flatten().len(), 2);
    }

    #[tokio::test]
    async fn test_seed_used_when_storage_empty() {
        let store = ThreadStore::load(
            Persistence::new(Arc::new(MemoryStore::new())),
            &SeedData::bundled(),
        )
        .await;
        assert_eq!(store.threads().len(), SeedData::bundled().threads.len());
        assert_eq!(store.threads_in_category(ThreadCategory::Qna).len(), 2);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_unchanged() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get().returning(|_| Ok(None));
        mock.expect_set()
            .returning(|_, _| Err(anyhow::anyhow!("quota exceeded")));
        let mut store = ThreadStore::load(Persistence::new(Arc::new(mock)), &SeedData::empty()).await;

        let result = store
            .create_thread_from(NewThread {
                title: "t".into(),
                category: ThreadCategory::NoCategory,
                description: "d".into(),
                creator: anna(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(store.threads().is_empty());
    }
}
