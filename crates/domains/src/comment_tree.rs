//! Projection of the flat comment list into per-thread reply trees.
//!
//! Ordering is insertion order of the underlying list; nothing is sorted.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use crate::censor::censor;
use crate::models::{Comment, CommentId, ThreadId};

/// All comments belonging to `thread`.
pub fn thread_comments(comments: &[Comment], thread: ThreadId) -> Vec<&Comment> {
    comments.iter().filter(|c| c.thread == thread).collect()
}

/// Comments of `thread` that have no parent comment.
pub fn top_level_comments(comments: &[Comment], thread: ThreadId) -> Vec<&Comment> {
    comments
        .iter()
        .filter(|c| c.thread == thread && c.is_top_level())
        .collect()
}

/// Direct children of `parent`, one level only.
pub fn replies<'a, I>(comments: I, parent: CommentId) -> Vec<&'a Comment>
where
    I: IntoIterator<Item = &'a Comment>,
{
    comments
        .into_iter()
        .filter(|c| c.comment == Some(parent))
        .collect()
}

/// One comment placed in a [`CommentTree`]. Replies are positions in the
/// tree's node list, so no node owns another.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentNode<'a> {
    pub comment: &'a Comment,
    /// 0 for top-level comments.
    pub depth: usize,
    replies: Vec<usize>,
}

impl<'a> CommentNode<'a> {
    /// Content as displayed, with banned words masked.
    pub fn display_content(&self) -> Cow<'a, str> {
        censor(&self.comment.content)
    }

    pub fn has_replies(&self) -> bool {
        !self.replies.is_empty()
    }
}

/// The materialised reply tree of one thread.
///
/// Nodes are kept flat in pre-order. Building and walking use an explicit
/// stack, so chain depth is bounded only by memory.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentTree<'a> {
    pub thread: ThreadId,
    nodes: Vec<CommentNode<'a>>,
    roots: Vec<usize>,
    /// Number of comments in the thread, attached to the tree or not.
    pub comment_count: usize,
}

impl<'a> CommentTree<'a> {
    pub fn build(comments: &'a [Comment], thread: ThreadId) -> Self {
        let in_thread = thread_comments(comments, thread);

        let mut children: HashMap<CommentId, Vec<&'a Comment>> = HashMap::new();
        for &c in &in_thread {
            if let Some(parent) = c.comment {
                children.entry(parent).or_default().push(c);
            }
        }

        let mut nodes: Vec<CommentNode<'a>> = Vec::with_capacity(in_thread.len());
        let mut roots = Vec::new();
        // Ids already placed are skipped, so repeated ids cannot loop.
        let mut seen = HashSet::new();
        let mut stack: Vec<(&'a Comment, usize, Option<usize>)> = in_thread
            .iter()
            .rev()
            .filter(|c| c.is_top_level())
            .map(|c| (*c, 0, None))
            .collect();

        while let Some((comment, depth, parent)) = stack.pop() {
            if !seen.insert(comment.id) {
                continue;
            }
            let index = nodes.len();
            nodes.push(CommentNode {
                comment,
                depth,
                replies: Vec::new(),
            });
            match parent {
                Some(p) => nodes[p].replies.push(index),
                None => roots.push(index),
            }
            if let Some(kids) = children.get(&comment.id) {
                stack.extend(kids.iter().rev().map(|k| (*k, depth + 1, Some(index))));
            }
        }

        Self {
            thread,
            nodes,
            roots,
            comment_count: in_thread.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.comment_count == 0
    }

    /// Top-level comments in insertion order.
    pub fn roots(&self) -> Vec<&CommentNode<'a>> {
        self.roots.iter().map(|&i| &self.nodes[i]).collect()
    }

    /// Direct replies of `node`, which must come from this tree.
    pub fn replies(&self, node: &CommentNode<'a>) -> Vec<&CommentNode<'a>> {
        node.replies.iter().map(|&i| &self.nodes[i]).collect()
    }

    /// Pre-order walk yielding `(depth, comment)`, roots at depth 0.
    pub fn flatten(&self) -> Vec<(usize, &'a Comment)> {
        self.nodes.iter().map(|n| (n.depth, n.comment)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, UserId};

    fn comment(id: u64, thread: u64, parent: Option<u64>) -> Comment {
        Comment {
            id: CommentId(id),
            thread: ThreadId(thread),
            content: format!("comment {id}"),
            creator: User {
                id: UserId(1),
                user_name: "anna".into(),
                password: "pw".into(),
                is_moderator: false,
            },
            comment: parent.map(CommentId),
        }
    }

    #[test]
    fn test_chain_under_single_root() {
        let comments = vec![
            comment(1, 5, None),
            comment(2, 5, Some(1)),
            comment(3, 5, Some(2)),
        ];

        let top: Vec<_> = top_level_comments(&comments, ThreadId(5)).iter().map(|c| c.id).collect();
        assert_eq!(top, vec![CommentId(1)]);

        let tree = CommentTree::build(&comments, ThreadId(5));
        let chain: Vec<_> = tree.flatten().iter().map(|(d, c)| (*d, c.id.0)).collect();
        assert_eq!(chain, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_other_threads_filtered_out() {
        let comments = vec![
            comment(1, 5, None),
            comment(2, 6, None),
            comment(3, 6, Some(1)),
        ];

        assert_eq!(thread_comments(&comments, ThreadId(6)).len(), 2);
        let tree = CommentTree::build(&comments, ThreadId(6));
        let roots = tree.roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].comment.id, CommentId(2));
        // reply 3 points at a parent outside thread 6 and stays detached
        assert!(!roots[0].has_replies());
        assert_eq!(tree.comment_count, 2);
    }

    #[test]
    fn test_insertion_order_kept() {
        let comments = vec![
            comment(9, 1, None),
            comment(4, 1, None),
            comment(7, 1, Some(9)),
            comment(5, 1, Some(9)),
        ];
        let tree = CommentTree::build(&comments, ThreadId(1));
        let order: Vec<_> = tree.flatten().iter().map(|(_, c)| c.id.0).collect();
        assert_eq!(order, vec![9, 7, 5, 4]);
    }

    #[test]
    fn test_repeated_id_does_not_loop() {
        let comments = vec![
            comment(1, 1, None),
            comment(2, 1, Some(1)),
            comment(1, 1, Some(2)),
        ];
        let tree = CommentTree::build(&comments, ThreadId(1));
        assert_eq!(tree.flatten().len(), 2);
    }

    #[test]
    fn test_display_content_is_censored() {
        let mut c = comment(1, 1, None);
        c.content = "bloody hell".into();
        let comments = vec![c];
        let tree = CommentTree::build(&comments, ThreadId(1));
        assert_eq!(tree.roots()[0].display_content(), "*** hell");
        assert_eq!(comments[0].content, "bloody hell");
    }

    #[test]
    fn test_deep_chain_builds_and_flattens() {
        let depth = 50_000;
        let comments: Vec<_> = (1..=depth)
            .map(|id| comment(id, 1, (id > 1).then_some(id - 1)))
            .collect();

        let tree = CommentTree::build(&comments, ThreadId(1));
        assert_eq!(tree.roots().len(), 1);
        let flat = tree.flatten();
        assert_eq!(flat.len(), depth as usize);
        assert_eq!(flat.last().map(|(d, c)| (*d, c.id.0)), Some((depth as usize - 1, depth)));

        let second = tree.replies(tree.roots()[0])[0];
        assert_eq!(second.comment.id, CommentId(2));
        assert_eq!(second.depth, 1);
    }
}
