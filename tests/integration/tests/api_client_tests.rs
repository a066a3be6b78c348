//! HTTP client tests against the mock backend
//!
//! Run with: cargo test -p integration-tests --test api_client_tests

use fest_core::traits::IdeaApi;
use fest_core::{Credential, DomainError, IdeaId, ReactionKind};
use integration_tests::{unique_draft, SeededBoard, TestBackend, ASHA};

fn asha() -> Credential {
    Credential::new(ASHA).unwrap()
}

// ============================================================================
// Ideas
// ============================================================================

#[tokio::test]
async fn test_list_ideas_anonymous() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let client = backend.api_client().unwrap();

    let ideas = client.list_ideas(None).await.unwrap();

    assert_eq!(ideas.len(), 2);
    let disco = ideas.iter().find(|i| i.id == board.disco).unwrap();
    assert_eq!(disco.score, 10);
    assert_eq!(disco.reaction_counts.get(ReactionKind::Like), 2);
    assert!(!disco.voted);
    assert!(disco.created_at.is_some());
}

#[tokio::test]
async fn test_list_ideas_reflects_viewer_state() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let client = backend.api_client().unwrap();

    client.toggle_vote(board.karaoke, &asha()).await.unwrap();
    client
        .set_reaction(board.karaoke, ReactionKind::Wow, &asha())
        .await
        .unwrap();

    let ideas = client.list_ideas(Some(&asha())).await.unwrap();
    let karaoke = ideas.iter().find(|i| i.id == board.karaoke).unwrap();
    assert!(karaoke.voted);
    assert_eq!(karaoke.my_reaction, Some(ReactionKind::Wow));
    assert!(karaoke.reaction_is_counted());
}

#[tokio::test]
async fn test_create_idea() {
    let backend = TestBackend::start().await.unwrap();
    let client = backend.api_client().unwrap();
    let draft = unique_draft();

    let idea = client.create_idea(&draft, &asha()).await.unwrap();

    assert_eq!(idea.title, draft.title);
    assert_eq!(idea.author_name.as_deref(), Some(ASHA));
    assert_eq!(client.list_ideas(None).await.unwrap().len(), 1);
}

// ============================================================================
// Votes and reactions
// ============================================================================

#[tokio::test]
async fn test_vote_returns_server_score() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let client = backend.api_client().unwrap();

    let first = client.toggle_vote(board.disco, &asha()).await.unwrap();
    assert_eq!(first.score, Some(11));

    let second = client.toggle_vote(board.disco, &asha()).await.unwrap();
    assert_eq!(second.score, Some(10));
}

#[tokio::test]
async fn test_vote_on_missing_idea_is_not_found() {
    let backend = TestBackend::start().await.unwrap();
    let client = backend.api_client().unwrap();

    let err = client.toggle_vote(IdeaId::new(404), &asha()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_server_error_message_is_kept() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let client = backend.api_client().unwrap();
    backend.set_fail_writes(true);

    let err = client.toggle_vote(board.disco, &asha()).await.unwrap_err();

    match err {
        DomainError::RequestFailed { status, message } => {
            assert_eq!(status, Some(503));
            assert_eq!(message, "Voting is closed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_reaction_add_switch_remove() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let client = backend.api_client().unwrap();

    let added = client
        .set_reaction(board.disco, ReactionKind::Love, &asha())
        .await
        .unwrap();
    assert!(!added.removed);
    assert_eq!(added.counts.as_ref().unwrap().get(ReactionKind::Love), 1);

    let switched = client
        .set_reaction(board.disco, ReactionKind::Like, &asha())
        .await
        .unwrap();
    let counts = switched.counts.unwrap();
    assert_eq!(counts.get(ReactionKind::Love), 0);
    assert_eq!(counts.get(ReactionKind::Like), 3);

    let removed = client
        .set_reaction(board.disco, ReactionKind::Like, &asha())
        .await
        .unwrap();
    assert!(removed.removed);
    assert_eq!(removed.counts.unwrap().get(ReactionKind::Like), 2);
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn test_comments_roundtrip_through_server() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let client = backend.api_client().unwrap();

    let created = client
        .create_comment(board.disco, "Bring glow sticks", &asha())
        .await
        .unwrap();
    assert_eq!(created.idea_id, board.disco);
    assert!(created.is_by(ASHA));

    let listed = client.list_comments(board.disco).await.unwrap();
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn test_comments_for_missing_idea_is_not_found() {
    let backend = TestBackend::start().await.unwrap();
    let client = backend.api_client().unwrap();

    let err = client.list_comments(IdeaId::new(404)).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_wire_format_of_vote_request() {
    let backend = TestBackend::start().await.unwrap();
    let board = SeededBoard::seed(&backend).await;
    let client = backend.api_client().unwrap();

    // The backend rejects bodies whose ideaId does not match the path
    client.toggle_vote(board.disco, &asha()).await.unwrap();

    let body = backend
        .get_json("/api/ideas", Some(ASHA))
        .await
        .unwrap();
    let disco = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|idea| idea["id"] == board.disco.into_inner())
        .unwrap()
        .clone();
    assert_eq!(disco["voted_by_you"], true);
    assert_eq!(disco["upvoteCount"], 11);
}
