//! # Domain Models
//!
//! These structs represent the core entities of the forum.
//! Field names serialize in camelCase so the stored collections keep the
//! layout the client writes (`userName`, `creationDate`, `commentsLocked`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Identifier of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Identifier of a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub u64);

/// Identifier of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered account.
///
/// The password is kept and compared in plain text; there is no hashing at
/// rest in this model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub user_name: String,
    pub password: String,
    /// Missing in stored records means `false`.
    #[serde(default)]
    pub is_moderator: bool,
}

/// The fixed set of thread categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadCategory {
    NoCategory,
    Qna,
    Diskussion,
    Meddelande,
    HittaGruppmedlem,
}

impl ThreadCategory {
    pub const ALL: [ThreadCategory; 5] = [
        ThreadCategory::NoCategory,
        ThreadCategory::Qna,
        ThreadCategory::Diskussion,
        ThreadCategory::Meddelande,
        ThreadCategory::HittaGruppmedlem,
    ];

    /// The label used in stored records.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadCategory::NoCategory => "NoCategory",
            ThreadCategory::Qna => "QNA",
            ThreadCategory::Diskussion => "Diskussion",
            ThreadCategory::Meddelande => "Meddelande",
            ThreadCategory::HittaGruppmedlem => "Hitta gruppmedlem",
        }
    }
}

impl fmt::Display for ThreadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThreadCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThreadCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("unknown thread category '{s}'")))
    }
}

/// Category of a thread together with the state only a Q&A thread carries.
///
/// Flattened into [`Thread`], so the `category` tag sits next to the other
/// thread fields and `isAnswered` / `commentAnswerId` only appear on QNA
/// records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum ThreadKind {
    NoCategory,
    #[serde(rename = "QNA", rename_all = "camelCase")]
    Qna {
        #[serde(default)]
        is_answered: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comment_answer_id: Option<CommentId>,
    },
    Diskussion,
    Meddelande,
    #[serde(rename = "Hitta gruppmedlem")]
    HittaGruppmedlem,
}

impl ThreadKind {
    pub fn category(&self) -> ThreadCategory {
        match self {
            ThreadKind::NoCategory => ThreadCategory::NoCategory,
            ThreadKind::Qna { .. } => ThreadCategory::Qna,
            ThreadKind::Diskussion => ThreadCategory::Diskussion,
            ThreadKind::Meddelande => ThreadCategory::Meddelande,
            ThreadKind::HittaGruppmedlem => ThreadCategory::HittaGruppmedlem,
        }
    }
}

impl From<ThreadCategory> for ThreadKind {
    /// A fresh QNA thread starts unanswered.
    fn from(category: ThreadCategory) -> Self {
        match category {
            ThreadCategory::NoCategory => ThreadKind::NoCategory,
            ThreadCategory::Qna => ThreadKind::Qna {
                is_answered: false,
                comment_answer_id: None,
            },
            ThreadCategory::Diskussion => ThreadKind::Diskussion,
            ThreadCategory::Meddelande => ThreadKind::Meddelande,
            ThreadCategory::HittaGruppmedlem => ThreadKind::HittaGruppmedlem,
        }
    }
}

/// A top-level forum topic, plain or Q&A.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: ThreadId,
    pub title: String,
    #[serde(flatten)]
    pub kind: ThreadKind,
    /// Display text; kept as stored, no format is imposed.
    pub creation_date: String,
    pub description: String,
    /// Snapshot of the author at creation time, not a reference.
    pub creator: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments_locked: Option<bool>,
}

impl Thread {
    pub fn category(&self) -> ThreadCategory {
        self.kind.category()
    }

    pub fn is_qna(&self) -> bool {
        matches!(self.kind, ThreadKind::Qna { .. })
    }

    /// `isAnswered` of a QNA thread; always `false` for other categories.
    pub fn is_answered(&self) -> bool {
        matches!(self.kind, ThreadKind::Qna { is_answered: true, .. })
    }

    /// The comment recorded as the accepted answer, if any.
    pub fn answer_id(&self) -> Option<CommentId> {
        match self.kind {
            ThreadKind::Qna { comment_answer_id, .. } => comment_answer_id,
            _ => None,
        }
    }

    /// Absent lock state reads as unlocked.
    pub fn comments_locked(&self) -> bool {
        self.comments_locked.unwrap_or(false)
    }

    pub fn is_created_by(&self, user: &User) -> bool {
        self.creator.user_name == user.user_name
    }
}

/// A reply attached to a thread, optionally nested under another comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    /// Owning thread.
    pub thread: ThreadId,
    /// Stored uncensored; see [`crate::censor`].
    pub content: String,
    pub creator: User,
    /// Parent comment; `None` for top-level comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentId>,
}

impl Comment {
    pub fn is_top_level(&self) -> bool {
        self.comment.is_none()
    }
}

/// Partial update of the editable thread fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ThreadPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    pub fn apply(&self, thread: &mut Thread) {
        if let Some(title) = &self.title {
            thread.title = title.clone();
        }
        if let Some(description) = &self.description {
            thread.description = description.clone();
        }
    }
}
