//! Permission rules over `(current user, thread)`.
//!
//! The rules are pure and cheap; callers recompute them on every read
//! instead of caching a result next to the thread.
//!
//! The model is:
//! - **Creator**: the user whose name matches the thread's creator snapshot
//!   may edit, lock, and mark answers on that thread.
//! - **Moderator**: may do the same on every thread.
//! - **Member**: any logged-in user; may reply while comments are unlocked.
//! - **Guest**: no current user; every gated mutation asks for a login.

use crate::error::{AppError, Result};
use crate::models::{CommentId, Thread, User};

pub fn can_edit_thread(user: &User, thread: &Thread) -> bool {
    thread.is_created_by(user) || user.is_moderator
}

pub fn can_lock_thread(user: &User, thread: &Thread) -> bool {
    can_edit_thread(user, thread)
}

/// Only QNA threads have answers to mark.
pub fn can_mark_answer(user: &User, thread: &Thread) -> bool {
    thread.is_qna() && can_edit_thread(user, thread)
}

pub fn can_reply(user: Option<&User>, thread: &Thread) -> bool {
    user.is_some() && !thread.comments_locked()
}

/// Resolves the current user of a gated mutation.
pub fn require_user(user: Option<&User>) -> Result<&User> {
    user.ok_or(AppError::LoginRequired)
}

/// What the mark-answer control on one comment shows to one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerControl {
    /// Not a QNA thread, or neither the answer nor markable by the viewer.
    Hidden,
    /// The recorded answer, shown read-only to viewers who cannot change it.
    Flagged,
    /// The viewer may toggle the answer flag on this comment.
    Toggle { is_answer: bool },
}

impl AnswerControl {
    pub fn is_visible(&self) -> bool {
        !matches!(self, AnswerControl::Hidden)
    }
}

pub fn answer_control(user: Option<&User>, thread: &Thread, comment: CommentId) -> AnswerControl {
    if !thread.is_qna() {
        return AnswerControl::Hidden;
    }

    let is_answer = thread.answer_id() == Some(comment);
    let allowed = user.is_some_and(|u| can_mark_answer(u, thread));

    match (allowed, is_answer) {
        (true, _) => AnswerControl::Toggle { is_answer },
        (false, true) => AnswerControl::Flagged,
        (false, false) => AnswerControl::Hidden,
    }
}

/// Per-viewer permissions of one thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadPermissions {
    pub can_edit: bool,
    pub can_lock: bool,
    pub can_mark_answer: bool,
    pub can_reply: bool,
}

impl ThreadPermissions {
    pub fn for_viewer(user: Option<&User>, thread: &Thread) -> Self {
        match user {
            Some(u) => Self {
                can_edit: can_edit_thread(u, thread),
                can_lock: can_lock_thread(u, thread),
                can_mark_answer: can_mark_answer(u, thread),
                can_reply: can_reply(user, thread),
            },
            None => Self::default(),
        }
    }
}
