//! In-process mock of the idea board backend
//!
//! Serves the REST routes the client uses and a WebSocket push channel.
//! `vote_update` and `new_comment` reach only sockets joined to the idea's
//! topic; `idea_created` and raw pushes reach every socket.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, Query, State, WebSocketUpgrade};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::{broadcast, Mutex};

use fest_core::IdeaId;
use fest_realtime::ChannelMessage;

/// Frame fan-out to every open socket
#[derive(Debug, Clone)]
pub enum Outbound {
    /// `None` goes to every socket, `Some(id)` only to sockets that joined it
    Frame { topic: Option<IdeaId>, text: String },
    /// Close every socket
    Kick,
}

#[derive(Debug, Clone)]
struct StoredIdea {
    id: i64,
    title: String,
    description: String,
    author_name: String,
    created_at: DateTime<Utc>,
    base_score: i64,
    base_reactions: BTreeMap<String, i64>,
    voters: HashSet<String>,
    /// token -> reaction kind
    reactions: HashMap<String, String>,
}

impl StoredIdea {
    fn score(&self) -> i64 {
        self.base_score + self.voters.len() as i64
    }

    fn reaction_counts(&self) -> BTreeMap<String, i64> {
        let mut counts = self.base_reactions.clone();
        for kind in self.reactions.values() {
            *counts.entry(kind.clone()).or_insert(0) += 1;
        }
        counts
    }

    fn to_json(&self, viewer: Option<&str>) -> Value {
        let mut body = json!({
            "id": self.id,
            "title": self.title,
            "description": self.description,
            "score": self.score(),
            "upvoteCount": self.score(),
            "createdAt": self.created_at.to_rfc3339(),
            "author_name": self.author_name,
            "reaction_counts": self.reaction_counts(),
        });
        if let Some(viewer) = viewer {
            body["voted_by_you"] = json!(self.voters.contains(viewer));
            body["user_reaction"] = json!(self.reactions.get(viewer));
        }
        body
    }
}

#[derive(Debug, Clone)]
struct StoredComment {
    id: i64,
    idea_id: i64,
    author_name: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl StoredComment {
    /// REST shape
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "idea_id": self.idea_id,
            "author_name": self.author_name,
            "content": self.content,
            "createdAt": self.created_at.to_rfc3339(),
        })
    }

    /// Push shape
    fn to_event_json(&self) -> Value {
        json!({
            "id": self.id,
            "idea_id": self.idea_id,
            "author_name": self.author_name,
            "content": self.content,
            "created_at": self.created_at.to_rfc3339(),
        })
    }
}

/// Shared backend state
pub struct BackendState {
    ideas: Mutex<BTreeMap<i64, StoredIdea>>,
    comments: Mutex<HashMap<i64, Vec<StoredComment>>>,
    next_id: AtomicI64,
    fail_writes: AtomicBool,
    requests: AtomicUsize,
    ws_tokens: Mutex<Vec<Option<String>>>,
    joins: Mutex<Vec<IdeaId>>,
    events: broadcast::Sender<Outbound>,
}

pub type SharedBackend = Arc<BackendState>;

impl BackendState {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            ideas: Mutex::new(BTreeMap::new()),
            comments: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            fail_writes: AtomicBool::new(false),
            requests: AtomicUsize::new(0),
            ws_tokens: Mutex::new(Vec::new()),
            joins: Mutex::new(Vec::new()),
            events,
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn hit(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn publish(&self, topic: Option<IdeaId>, message: &ChannelMessage) {
        let _ = self.events.send(Outbound::Frame {
            topic,
            text: message.to_text(),
        });
    }

    /// Add an idea with a starting score and LIKE count
    pub async fn seed_idea(&self, title: &str, base_score: i64, likes: i64) -> IdeaId {
        let id = self.next_id();
        let mut base_reactions = BTreeMap::new();
        if likes > 0 {
            base_reactions.insert("LIKE".to_string(), likes);
        }
        self.ideas.lock().await.insert(
            id,
            StoredIdea {
                id,
                title: title.to_string(),
                description: format!("{title}, described in enough detail"),
                author_name: "organizer".to_string(),
                created_at: Utc::now(),
                base_score,
                base_reactions,
                voters: HashSet::new(),
                reactions: HashMap::new(),
            },
        );
        self.comments.lock().await.insert(id, Vec::new());
        IdeaId::new(id)
    }

    /// Make every write route answer 503
    pub fn set_fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn kick_sockets(&self) {
        let _ = self.events.send(Outbound::Kick);
    }

    /// Push an arbitrary frame to every socket
    pub fn push_raw(&self, text: impl Into<String>) {
        let _ = self.events.send(Outbound::Frame {
            topic: None,
            text: text.into(),
        });
    }

    pub async fn ws_tokens(&self) -> Vec<Option<String>> {
        self.ws_tokens.lock().await.clone()
    }

    pub async fn joins(&self) -> Vec<IdeaId> {
        self.joins.lock().await.clone()
    }

    pub async fn score(&self, idea_id: IdeaId) -> Option<i64> {
        self.ideas
            .lock()
            .await
            .get(&idea_id.into_inner())
            .map(StoredIdea::score)
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the mock backend router
pub fn create_backend(state: SharedBackend) -> Router {
    Router::new()
        .route("/api/ideas", get(list_ideas).post(create_idea))
        .route("/api/ideas/:id/vote", post(vote))
        .route("/api/ideas/:id/react", post(react))
        .route("/api/ideas/:id/comments", get(list_comments).post(create_comment))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Common checks for write routes; returns the caller's token
fn authorize_write(state: &BackendState, headers: &HeaderMap) -> Result<String, Response> {
    let token = bearer(headers).ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Unauthorized"))?;
    if state.fail_writes.load(Ordering::SeqCst) {
        return Err(error(StatusCode::SERVICE_UNAVAILABLE, "Voting is closed"));
    }
    Ok(token)
}

// ============================================================================
// REST handlers
// ============================================================================

async fn list_ideas(State(state): State<SharedBackend>, headers: HeaderMap) -> Json<Value> {
    state.hit();
    let viewer = bearer(&headers);
    let ideas = state.ideas.lock().await;
    let data: Vec<Value> = ideas
        .values()
        .rev()
        .map(|idea| idea.to_json(viewer.as_deref()))
        .collect();
    Json(json!({ "data": data }))
}

async fn create_idea(
    State(state): State<SharedBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    let token = match authorize_write(&state, &headers) {
        Ok(token) => token,
        Err(response) => return response,
    };

    let id = state.next_id();
    let idea = StoredIdea {
        id,
        title: body["title"].as_str().unwrap_or_default().to_string(),
        description: body["description"].as_str().unwrap_or_default().to_string(),
        author_name: token,
        created_at: Utc::now(),
        base_score: 0,
        base_reactions: BTreeMap::new(),
        voters: HashSet::new(),
        reactions: HashMap::new(),
    };
    let payload = idea.to_json(None);
    state.ideas.lock().await.insert(id, idea);
    state.comments.lock().await.insert(id, Vec::new());

    state.publish(None, &ChannelMessage::new("idea_created", payload.clone()));
    (StatusCode::CREATED, Json(json!({ "data": payload }))).into_response()
}

async fn vote(
    State(state): State<SharedBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    let token = match authorize_write(&state, &headers) {
        Ok(token) => token,
        Err(response) => return response,
    };
    if body["ideaId"].as_i64() != Some(id) {
        return error(StatusCode::BAD_REQUEST, "ideaId does not match path");
    }

    let score = {
        let mut ideas = state.ideas.lock().await;
        let Some(idea) = ideas.get_mut(&id) else {
            return error(StatusCode::NOT_FOUND, "Idea not found");
        };
        if !idea.voters.remove(&token) {
            idea.voters.insert(token);
        }
        idea.score()
    };

    state.publish(
        Some(IdeaId::new(id)),
        &ChannelMessage::new(
            "vote_update",
            json!({ "idea_id": id, "score": score, "upvote_count": score }),
        ),
    );
    Json(json!({ "stats": { "score": score } })).into_response()
}

async fn react(
    State(state): State<SharedBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    let token = match authorize_write(&state, &headers) {
        Ok(token) => token,
        Err(response) => return response,
    };
    let Some(kind) = body["reaction"].as_str().map(str::to_string) else {
        return error(StatusCode::BAD_REQUEST, "reaction is required");
    };

    let mut ideas = state.ideas.lock().await;
    let Some(idea) = ideas.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, "Idea not found");
    };

    let current = idea.reactions.get(&token).cloned();
    let outcome = match current {
        Some(current) if current == kind => {
            idea.reactions.remove(&token);
            "removed"
        }
        Some(_) => {
            idea.reactions.insert(token, kind);
            "updated"
        }
        None => {
            idea.reactions.insert(token, kind);
            "added"
        }
    };

    let mut response = json!({ "reaction_counts": idea.reaction_counts() });
    response[outcome] = json!(true);
    Json(response).into_response()
}

async fn list_comments(State(state): State<SharedBackend>, Path(id): Path<i64>) -> Response {
    state.hit();
    let comments = state.comments.lock().await;
    match comments.get(&id) {
        Some(list) => {
            let data: Vec<Value> = list.iter().map(StoredComment::to_json).collect();
            Json(json!({ "data": data })).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Idea not found"),
    }
}

async fn create_comment(
    State(state): State<SharedBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    let token = match authorize_write(&state, &headers) {
        Ok(token) => token,
        Err(response) => return response,
    };
    let content = body["content"].as_str().unwrap_or_default().trim().to_string();
    if content.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Comment content is required");
    }

    let comment = StoredComment {
        id: state.next_id(),
        idea_id: id,
        author_name: token,
        content,
        created_at: Utc::now(),
    };
    {
        let mut comments = state.comments.lock().await;
        let Some(list) = comments.get_mut(&id) else {
            return error(StatusCode::NOT_FOUND, "Idea not found");
        };
        list.push(comment.clone());
    }

    state.publish(
        Some(IdeaId::new(id)),
        &ChannelMessage::new("new_comment", comment.to_event_json()),
    );
    (StatusCode::CREATED, Json(json!({ "data": comment.to_json() }))).into_response()
}

// ============================================================================
// WebSocket push channel
// ============================================================================

async fn ws_handler(
    State(state): State<SharedBackend>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    state.ws_tokens.lock().await.push(params.get("token").cloned());
    // Subscribe before the handshake completes so no frame pushed after
    // `connect` returns can be missed
    let outbound = state.events.subscribe();
    ws.on_upgrade(move |socket| handle_socket(state, socket, outbound))
}

async fn handle_socket(
    state: SharedBackend,
    socket: WebSocket,
    mut outbound: broadcast::Receiver<Outbound>,
) {
    let (mut sink, mut stream) = socket.split();
    let mut joined: HashSet<IdeaId> = HashSet::new();

    loop {
        tokio::select! {
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    let Ok(frame) = ChannelMessage::parse(&text) else { continue };
                    match frame.topic_request() {
                        Some((true, idea_id)) => {
                            joined.insert(idea_id);
                            state.joins.lock().await.push(idea_id);
                        }
                        Some((false, idea_id)) => {
                            joined.remove(&idea_id);
                        }
                        None => {}
                    }
                }
                Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                Some(Ok(_)) => {}
            },

            out = outbound.recv() => match out {
                Ok(Outbound::Frame { topic, text }) => {
                    if topic.is_none_or(|id| joined.contains(&id))
                        && sink.send(Message::Text(text)).await.is_err()
                    {
                        break;
                    }
                }
                Ok(Outbound::Kick) => {
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
}
