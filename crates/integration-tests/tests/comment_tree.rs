use domains::{answer_control, top_level_comments, AnswerControl, CommentId, ThreadId};
use integration_tests::{comment, forum_with_users, thread, unanswered, user};

#[tokio::test]
async fn test_chain_projection_from_store() {
    let anna = user(1, "anna", false);
    let (mut forum, _) = forum_with_users(&[anna.clone()]).await;
    forum.threads.create_thread(thread(5, &anna, unanswered())).await.unwrap();
    for c in [
        comment(1, 5, &anna, None),
        comment(2, 5, &anna, Some(1)),
        comment(3, 5, &anna, Some(2)),
    ] {
        forum.threads.add_comment(c).await.unwrap();
    }

    let top: Vec<_> = top_level_comments(forum.threads.comments(), ThreadId(5))
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(top, vec![CommentId(1)]);

    let tree = forum.comment_tree(ThreadId(5));
    let root = tree.roots()[0];
    assert_eq!(root.comment.id, CommentId(1));
    let second = tree.replies(root)[0];
    assert_eq!(second.comment.id, CommentId(2));
    let third = tree.replies(second)[0];
    assert_eq!((third.comment.id, third.depth), (CommentId(3), 2));
    assert!(!third.has_replies());
}

#[tokio::test]
async fn test_answer_marker_visible_to_everyone_once_set() {
    let owner = user(1, "owner", false);
    let reader = user(2, "reader", false);
    let (mut forum, _) = forum_with_users(&[owner.clone(), reader.clone()]).await;
    forum.threads.create_thread(thread(1, &owner, unanswered())).await.unwrap();
    forum.threads.add_comment(comment(10, 1, &reader, None)).await.unwrap();
    forum.threads.add_comment(comment(11, 1, &reader, None)).await.unwrap();

    forum.users.login("owner", "owner-pw").await.unwrap();
    forum.mark_answer(ThreadId(1), CommentId(11)).await.unwrap();

    let t = forum.threads.get_thread_by_id(ThreadId(1)).unwrap();
    assert_eq!(answer_control(None, t, CommentId(11)), AnswerControl::Flagged);
    assert_eq!(answer_control(Some(&reader), t, CommentId(10)), AnswerControl::Hidden);
    assert_eq!(
        answer_control(Some(&owner), t, CommentId(11)),
        AnswerControl::Toggle { is_answer: true }
    );
}

#[tokio::test]
async fn test_censoring_is_display_only() {
    let anna = user(1, "anna", false);
    let (mut forum, _) = forum_with_users(&[anna.clone()]).await;
    let mut rude = comment(1, 1, &anna, None);
    rude.content = "What a BLOODY mess, bollocks.".into();
    forum.threads.add_comment(rude).await.unwrap();

    let tree = forum.comment_tree(ThreadId(1));
    assert_eq!(tree.roots()[0].display_content(), "What a *** mess, ***.");
    assert_eq!(forum.threads.comments()[0].content, "What a BLOODY mess, bollocks.");
}
