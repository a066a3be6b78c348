//! End-to-end synchronizer tests: real HTTP client, real push channel,
//! mock backend
//!
//! Run with: cargo test -p integration-tests --test sync_tests

use fest_core::{Credential, DomainError, IdeaApi, ReactionKind, SortOrder};
use fest_sync::{CommentSubmission, NoticeLevel, UiSignal};
use integration_tests::{eventually, unique_draft, SeededBoard, TestBackend, Viewer, ASHA, RAVI};

// ============================================================================
// Votes
// ============================================================================

#[tokio::test]
async fn test_vote_reaches_other_viewer() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let asha = Viewer::connect(&backend, Some(ASHA)).await.unwrap();
    let ravi = Viewer::connect(&backend, Some(RAVI)).await.unwrap();

    // Score updates are scoped to the idea's topic
    ravi.sync.open_comments(board.disco).await.unwrap();
    backend.wait_for_joins(1).await.unwrap();

    let outcome = asha.sync.toggle_vote(board.disco).await.unwrap();
    assert!(outcome.voted);
    assert_eq!(outcome.score, 11);
    assert!(asha.sync.is_voted(board.disco));

    eventually("ravi sees the new score", || async {
        ravi.sync.idea(board.disco).is_some_and(|idea| idea.score == 11)
    })
    .await
    .unwrap();
    assert!(!ravi.sync.is_voted(board.disco));

    let top = ravi.sync.sorted(SortOrder::Popular);
    assert_eq!(top[0].id, board.disco);

    asha.shutdown().await.unwrap();
    assert!(ravi.shutdown().await.unwrap() >= 1);
}

#[tokio::test]
async fn test_vote_not_pushed_to_viewer_outside_topic() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let asha = Viewer::connect(&backend, Some(ASHA)).await.unwrap();
    let ravi = Viewer::connect(&backend, Some(RAVI)).await.unwrap();

    asha.sync.toggle_vote(board.disco).await.unwrap();
    let idea = asha.sync.submit_idea(&unique_draft()).await.unwrap();

    // Pushes are applied in arrival order, so a routed vote update would
    // land before the idea does
    eventually("ravi sees the new idea", || async {
        ravi.sync.idea(idea.id).is_some()
    })
    .await
    .unwrap();
    assert_eq!(ravi.sync.idea(board.disco).unwrap().score, 10);
    assert_eq!(backend.score(board.disco).await, Some(11));

    asha.shutdown().await.unwrap();
    ravi.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_followed_ideas_receive_live_scores() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let asha = Viewer::connect(&backend, Some(ASHA)).await.unwrap();
    let ravi = Viewer::connect(&backend, Some(RAVI)).await.unwrap();

    let followed = ravi.sync.follow_top(SortOrder::Popular, 1).await.unwrap();
    assert_eq!(followed, vec![board.disco]);
    backend.wait_for_joins(1).await.unwrap();

    asha.sync.toggle_vote(board.karaoke).await.unwrap();
    asha.sync.toggle_vote(board.disco).await.unwrap();

    eventually("ravi sees the followed score", || async {
        ravi.sync.idea(board.disco).is_some_and(|idea| idea.score == 11)
    })
    .await
    .unwrap();
    assert_eq!(ravi.sync.idea(board.karaoke).unwrap().score, 3);

    asha.shutdown().await.unwrap();
    ravi.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_vote_rolls_back_when_server_refuses() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let asha = Viewer::connect(&backend, Some(ASHA)).await.unwrap();
    backend.set_fail_writes(true);

    let err = asha.sync.toggle_vote(board.disco).await.unwrap_err();

    assert!(matches!(err, DomainError::RequestFailed { status: Some(503), .. }));
    assert!(!asha.sync.is_voted(board.disco));
    assert_eq!(asha.sync.idea(board.disco).unwrap().score, 10);
    let notice = asha.notices.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Failed to vote");

    asha.shutdown().await.unwrap();
}

// ============================================================================
// Reactions
// ============================================================================

#[tokio::test]
async fn test_reaction_confirmed_by_server_counts() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let asha = Viewer::connect(&backend, Some(ASHA)).await.unwrap();

    let outcome = asha
        .sync
        .set_reaction(board.disco, ReactionKind::Like)
        .await
        .unwrap();
    assert!(!outcome.removed);
    assert_eq!(outcome.counts.get(ReactionKind::Like), 3);
    assert_eq!(asha.sync.my_reaction(board.disco), Some(ReactionKind::Like));

    let outcome = asha
        .sync
        .set_reaction(board.disco, ReactionKind::Like)
        .await
        .unwrap();
    assert!(outcome.removed);
    assert_eq!(outcome.counts.get(ReactionKind::Like), 2);
    assert_eq!(asha.sync.my_reaction(board.disco), None);

    assert_eq!(
        asha.notices.drain_signals(),
        vec![UiSignal::MenuClosed(board.disco); 2]
    );

    asha.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_reaction_restored_when_server_refuses() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let asha = Viewer::connect(&backend, Some(ASHA)).await.unwrap();
    let before = asha.sync.idea(board.disco).unwrap();
    backend.set_fail_writes(true);

    asha.sync
        .set_reaction(board.disco, ReactionKind::Wow)
        .await
        .unwrap_err();

    let after = asha.sync.idea(board.disco).unwrap();
    assert_eq!(after.reaction_counts, before.reaction_counts);
    assert_eq!(after.my_reaction, None);
    assert_eq!(asha.notices.last().unwrap().message, "Failed to react");
    assert_eq!(
        asha.notices.drain_signals(),
        vec![UiSignal::MenuClosed(board.disco)]
    );

    asha.shutdown().await.unwrap();
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn test_comment_arrives_only_through_push() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let asha = Viewer::connect(&backend, Some(ASHA)).await.unwrap();
    let ravi = Viewer::connect(&backend, Some(RAVI)).await.unwrap();

    assert_eq!(asha.sync.open_comments(board.disco).await.unwrap(), 0);
    assert_eq!(ravi.sync.open_comments(board.disco).await.unwrap(), 0);
    backend.wait_for_joins(2).await.unwrap();

    let submitted = asha
        .sync
        .submit_comment(board.disco, "  Bring glow sticks  ")
        .await
        .unwrap();
    assert_eq!(submitted, CommentSubmission::Cleared);

    for viewer in [&asha, &ravi] {
        eventually("comment pushed", || async {
            viewer
                .sync
                .comments(board.disco)
                .is_some_and(|list| list.len() == 1)
        })
        .await
        .unwrap();
    }

    let list = ravi.sync.comments(board.disco).unwrap();
    assert_eq!(list[0].content, "Bring glow sticks");
    assert!(list[0].is_by(ASHA));
    assert_eq!(asha.sync.comments(board.disco).unwrap(), list);

    asha.shutdown().await.unwrap();
    ravi.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_closed_panel_ignores_comments() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let asha = Viewer::connect(&backend, Some(ASHA)).await.unwrap();
    let ravi = Viewer::connect(&backend, Some(RAVI)).await.unwrap();

    ravi.sync.open_comments(board.karaoke).await.unwrap();
    ravi.sync.close_comments(board.karaoke).await;
    assert!(ravi.sync.comments(board.karaoke).is_none());

    // A closed panel stays closed even if the push still reaches Ravi
    asha.sync.open_comments(board.karaoke).await.unwrap();
    backend.wait_for_joins(2).await.unwrap();
    asha.sync
        .submit_comment(board.karaoke, "Who brings the mic?")
        .await
        .unwrap();

    eventually("asha sees her comment", || async {
        asha.sync
            .comments(board.karaoke)
            .is_some_and(|list| !list.is_empty())
    })
    .await
    .unwrap();
    assert!(ravi.sync.comments(board.karaoke).is_none());

    asha.shutdown().await.unwrap();
    ravi.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_open_comments_loads_existing() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let client = backend.api_client().unwrap();
    let asha = Credential::new(ASHA).unwrap();
    for text in ["first", "second"] {
        client.create_comment(board.disco, text, &asha).await.unwrap();
    }

    let ravi = Viewer::connect(&backend, Some(RAVI)).await.unwrap();
    assert_eq!(ravi.sync.open_comments(board.disco).await.unwrap(), 2);
    let contents: Vec<String> = ravi
        .sync
        .comments(board.disco)
        .unwrap()
        .into_iter()
        .map(|c| c.content)
        .collect();
    assert_eq!(contents, ["first", "second"]);

    ravi.shutdown().await.unwrap();
}

// ============================================================================
// Ideas
// ============================================================================

#[tokio::test]
async fn test_submitted_idea_not_duplicated_by_push() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let asha = Viewer::connect(&backend, Some(ASHA)).await.unwrap();
    let ravi = Viewer::connect(&backend, Some(RAVI)).await.unwrap();

    let idea = asha.sync.submit_idea(&unique_draft()).await.unwrap();
    assert_eq!(asha.sync.ideas()[0].id, idea.id);

    eventually("ravi sees the new idea", || async {
        ravi.sync.idea(idea.id).is_some()
    })
    .await
    .unwrap();
    assert_eq!(ravi.sync.ideas()[0].id, idea.id);

    // Ravi's vote is pushed after idea_created, so once Asha sees the
    // new score her session has also handled her own idea's push
    asha.sync.open_comments(board.karaoke).await.unwrap();
    backend.wait_for_joins(1).await.unwrap();
    ravi.sync.toggle_vote(board.karaoke).await.unwrap();
    eventually("asha sees ravi's vote", || async {
        asha.sync.idea(board.karaoke).is_some_and(|i| i.score == 4)
    })
    .await
    .unwrap();

    let copies = asha
        .sync
        .ideas()
        .iter()
        .filter(|cached| cached.id == idea.id)
        .count();
    assert_eq!(copies, 1);
    assert_eq!(asha.sync.ideas().len(), 3);

    asha.shutdown().await.unwrap();
    ravi.shutdown().await.unwrap();
}

// ============================================================================
// Anonymous viewers and disposal
// ============================================================================

#[tokio::test]
async fn test_anonymous_viewer_makes_no_write_requests() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let guest = Viewer::connect(&backend, None).await.unwrap();
    let before = backend.requests();

    assert!(matches!(
        guest.sync.toggle_vote(board.disco).await,
        Err(DomainError::Unauthenticated)
    ));
    assert!(matches!(
        guest.sync.set_reaction(board.disco, ReactionKind::Love).await,
        Err(DomainError::Unauthenticated)
    ));
    assert!(matches!(
        guest.sync.submit_comment(board.disco, "hi").await,
        Err(DomainError::Unauthenticated)
    ));

    assert_eq!(backend.requests(), before);
    assert_eq!(guest.sync.idea(board.disco).unwrap().score, 10);
    let messages: Vec<String> = guest.notices.drain().into_iter().map(|n| n.message).collect();
    assert_eq!(
        messages,
        ["Please sign in to vote", "Please sign in to react", "Please sign in to comment"]
    );

    guest.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_disposed_viewer_ignores_pushes() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let asha = Viewer::connect(&backend, Some(ASHA)).await.unwrap();
    let ravi = Viewer::connect(&backend, Some(RAVI)).await.unwrap();
    ravi.sync.open_comments(board.disco).await.unwrap();
    backend.wait_for_joins(1).await.unwrap();

    ravi.sync.dispose();
    asha.sync.toggle_vote(board.disco).await.unwrap();

    assert_eq!(backend.score(board.disco).await, Some(11));
    assert_eq!(ravi.sync.idea(board.disco).unwrap().score, 10);
    assert!(matches!(
        ravi.sync.toggle_vote(board.disco).await,
        Err(DomainError::Disposed)
    ));

    asha.shutdown().await.unwrap();
    ravi.shutdown().await.unwrap();
}
