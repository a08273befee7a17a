//! # Forum
//!
//! Application state: both stores behind one handle, plus the gated actions
//! a logged-in viewer triggers. Each action resolves the current user first;
//! guests get [`AppError::LoginRequired`] and nothing is written.

use std::sync::Arc;

use domains::{
    authorization, AppError, Comment, CommentId, CommentTree, KeyValueStore, Result, Thread,
    ThreadCategory, ThreadId, ThreadPatch, ThreadPermissions, User,
};
use tracing::info;

use crate::persistence::Persistence;
use crate::seed::SeedData;
use crate::thread_store::{NewComment, NewThread, ThreadStore};
use crate::user_store::UserStore;

pub struct Forum {
    pub users: UserStore,
    pub threads: ThreadStore,
}

impl Forum {
    /// Loads both stores from `store`; threads and comments fall back to `seed`.
    pub async fn open(store: Arc<dyn KeyValueStore>, seed: &SeedData) -> Self {
        let persistence = Persistence::new(store);
        Self {
            users: UserStore::load(persistence.clone()).await,
            threads: ThreadStore::load(persistence, seed).await,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.users.current_user()
    }

    /// What the current viewer may do on a thread; `None` for unknown threads.
    pub fn permissions(&self, thread_id: ThreadId) -> Option<ThreadPermissions> {
        self.threads
            .get_thread_by_id(thread_id)
            .map(|t| ThreadPermissions::for_viewer(self.current_user(), t))
    }

    pub fn comment_tree(&self, thread_id: ThreadId) -> CommentTree<'_> {
        self.threads.comment_tree(thread_id)
    }

    fn viewer(&self) -> Result<User> {
        authorization::require_user(self.current_user()).cloned()
    }

    fn thread(&self, thread_id: ThreadId) -> Result<&Thread> {
        self.threads
            .get_thread_by_id(thread_id)
            .ok_or_else(|| AppError::not_found("Thread", thread_id))
    }

    pub async fn post_thread(
        &mut self,
        title: &str,
        category: ThreadCategory,
        description: &str,
    ) -> Result<Thread> {
        let creator = self.viewer()?;
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }

        let thread = self
            .threads
            .create_thread_from(NewThread {
                title: title.to_string(),
                category,
                description: description.trim().to_string(),
                creator,
            })
            .await?;
        info!(thread_id = %thread.id, category = %category, "thread posted");
        Ok(thread)
    }

    pub async fn edit_thread(&mut self, thread_id: ThreadId, patch: ThreadPatch) -> Result<Thread> {
        let user = self.viewer()?;
        let thread = self.thread(thread_id)?;
        if !authorization::can_edit_thread(&user, thread) {
            return Err(AppError::Forbidden(format!(
                "{} may not edit thread {thread_id}",
                user.user_name
            )));
        }
        if matches!(&patch.title, Some(t) if t.trim().is_empty()) {
            return Err(AppError::Validation("title is required".into()));
        }

        self.threads.update_thread(thread_id, &patch).await?;
        self.thread(thread_id).cloned()
    }

    /// Toggles the comment lock; returns the new state.
    pub async fn lock_thread(&mut self, thread_id: ThreadId) -> Result<bool> {
        let user = self.viewer()?;
        let thread = self.thread(thread_id)?;
        if !authorization::can_lock_thread(&user, thread) {
            return Err(AppError::Forbidden(format!(
                "{} may not lock thread {thread_id}",
                user.user_name
            )));
        }

        let locked = self
            .threads
            .toggle_comments_lock(thread_id)
            .await?
            .ok_or_else(|| AppError::not_found("Thread", thread_id))?;
        info!(%thread_id, locked, by = %user.user_name, "comments lock changed");
        Ok(locked)
    }

    /// Toggles `comment_id` as the accepted answer; returns the new
    /// `isAnswered`. The comment must belong to the thread.
    pub async fn mark_answer(&mut self, thread_id: ThreadId, comment_id: CommentId) -> Result<bool> {
        let user = self.viewer()?;
        let thread = self.thread(thread_id)?;
        if !thread.is_qna() {
            return Err(AppError::Validation(format!("thread {thread_id} is not a QNA thread")));
        }
        if !authorization::can_mark_answer(&user, thread) {
            return Err(AppError::Forbidden(format!(
                "{} may not mark answers in thread {thread_id}",
                user.user_name
            )));
        }

        let comment = self
            .threads
            .get_comment_by_id(comment_id)
            .ok_or_else(|| AppError::not_found("Comment", comment_id))?;
        if comment.thread != thread_id {
            return Err(AppError::Validation(format!(
                "comment {comment_id} belongs to thread {}, not {thread_id}",
                comment.thread
            )));
        }

        self.threads
            .toggle_answer(thread_id, comment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Thread", thread_id))
    }

    /// Posts a comment, top-level when `parent` is `None`.
    pub async fn reply(
        &mut self,
        thread_id: ThreadId,
        parent: Option<CommentId>,
        content: &str,
    ) -> Result<Comment> {
        let creator = self.viewer()?;
        let thread = self.thread(thread_id)?;
        if thread.comments_locked() {
            return Err(AppError::CommentsLocked(thread_id));
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::Validation("comment is empty".into()));
        }

        self.threads
            .add_comment_from(NewComment {
                thread: thread_id,
                content: content.to_string(),
                creator,
                parent,
            })
            .await
    }
}
