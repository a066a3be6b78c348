//! Counter synchronizer
//!
//! Keeps the local idea cache consistent with the server while giving the
//! viewer immediate feedback. Votes and reactions are applied optimistically
//! and reconciled with the server's answer; comments are never appended
//! locally and arrive through the real-time channel instead.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::sync::Notify;
use tracing::{debug, info, instrument, warn};

use fest_core::traits::{ReactionResult, VoteResult};
use fest_core::{
    normalize_comment, Comment, Credential, DomainError, DomainResult, Idea, IdeaDraft, IdeaId,
    MutationKind, ReactionCounts, ReactionKind, RemoteEvent, SortOrder,
};

use crate::context::SyncContext;
use crate::notice::{Notice, UiSignal};
use crate::pending::PendingGuards;
use crate::state::{predict_reaction, CacheState, ReactionSnapshot};

/// Confirmed result of a vote toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub voted: bool,
    pub score: i64,
}

/// Confirmed result of a reaction call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionOutcome {
    pub removed: bool,
    pub counts: ReactionCounts,
}

/// What the caller should do with its comment input after a submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSubmission {
    /// Accepted by the server; clear the input
    Cleared,
}

/// Optimistic cache of ideas, votes, reactions, and open comment lists
pub struct CounterSynchronizer {
    ctx: SyncContext,
    state: Mutex<CacheState>,
    credential: RwLock<Option<Credential>>,
    pending: PendingGuards,
    disposed: AtomicBool,
    dispose_signal: Notify,
}

impl CounterSynchronizer {
    /// Create a synchronizer with an empty cache
    pub fn new(ctx: SyncContext) -> Self {
        let credential = ctx.credential().cloned();
        Self {
            ctx,
            state: Mutex::new(CacheState::default()),
            credential: RwLock::new(credential),
            pending: PendingGuards::new(),
            disposed: AtomicBool::new(false),
            dispose_signal: Notify::new(),
        }
    }

    // === Credential ===

    /// Replace the viewer's credential (sign in / sign out)
    pub fn set_credential(&self, credential: Option<Credential>) {
        *self.credential.write() = credential;
    }

    pub fn has_credential(&self) -> bool {
        self.credential.read().is_some()
    }

    fn require_credential(&self, action: &str) -> DomainResult<Credential> {
        let credential = self.credential.read().clone();
        credential.ok_or_else(|| {
            self.notify(Notice::error(format!("Please sign in to {action}")));
            DomainError::Unauthenticated
        })
    }

    // === Lifecycle ===

    /// Stop applying results; in-flight requests finish but change nothing
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            info!("Synchronizer disposed");
            self.dispose_signal.notify_waiters();
        }
    }

    /// Resolve once `dispose` has been called
    pub async fn disposed(&self) {
        let notified = self.dispose_signal.notified();
        if self.is_disposed() {
            return;
        }
        notified.await;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn ensure_live(&self) -> DomainResult<()> {
        if self.is_disposed() {
            Err(DomainError::Disposed)
        } else {
            Ok(())
        }
    }

    fn notify(&self, notice: Notice) {
        if !self.is_disposed() {
            self.ctx.notices().notify(notice);
        }
    }

    // === Loading ===

    /// Replace the whole cache with a server snapshot list
    pub fn load_initial(&self, ideas: Vec<Idea>) {
        if self.is_disposed() {
            return;
        }
        let count = ideas.len();
        self.state.lock().replace_ideas(ideas);
        info!(count, "Idea cache loaded");
    }

    /// Fetch the idea list and load it; read failures load an empty cache
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> DomainResult<usize> {
        self.ensure_live()?;
        let credential = self.credential.read().clone();

        let result = self.ctx.api().list_ideas(credential.as_ref()).await;
        self.ensure_live()?;

        let ideas = result.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load ideas, showing empty list");
            Vec::new()
        });
        let count = ideas.len();
        self.load_initial(ideas);
        Ok(count)
    }

    // === Votes ===

    /// Toggle the viewer's vote, reconciling the score with the server
    #[instrument(skip(self))]
    pub async fn toggle_vote(&self, idea_id: IdeaId) -> DomainResult<VoteOutcome> {
        self.ensure_live()?;
        let credential = self.require_credential("vote")?;
        let _guard = self.pending.acquire(idea_id, MutationKind::Vote)?;

        let was_voted = {
            let mut state = self.state.lock();
            let idea = state
                .idea_mut(idea_id)
                .ok_or_else(|| DomainError::not_found(format!("idea {idea_id}")))?;
            let was_voted = idea.voted;
            idea.voted = !was_voted;
            was_voted
        };

        let result = self.ctx.api().toggle_vote(idea_id, &credential).await;
        self.ensure_live()?;

        match result {
            Ok(VoteResult { score }) => {
                let outcome = {
                    let mut state = self.state.lock();
                    match state.idea_mut(idea_id) {
                        Some(idea) => {
                            idea.voted = !was_voted;
                            if let Some(score) = score {
                                idea.score = score;
                            }
                            VoteOutcome {
                                voted: idea.voted,
                                score: idea.score,
                            }
                        }
                        None => VoteOutcome {
                            voted: !was_voted,
                            score: score.unwrap_or_default(),
                        },
                    }
                };

                info!(idea_id = %idea_id, voted = outcome.voted, score = outcome.score, "Vote confirmed");
                self.notify(Notice::success(if outcome.voted {
                    "Vote recorded"
                } else {
                    "Vote removed"
                }));
                Ok(outcome)
            }
            Err(e) => {
                if let Some(idea) = self.state.lock().idea_mut(idea_id) {
                    idea.voted = was_voted;
                }
                warn!(idea_id = %idea_id, error = %e, "Vote failed, reverted");
                self.notify(Notice::error("Failed to vote"));
                Err(e)
            }
        }
    }

    // === Reactions ===

    /// Set, switch, or clear the viewer's reaction
    ///
    /// Picking the active kind again clears it. Always closes the idea's
    /// reaction menu, whatever the outcome.
    #[instrument(skip(self))]
    pub async fn set_reaction(
        &self,
        idea_id: IdeaId,
        kind: ReactionKind,
    ) -> DomainResult<ReactionOutcome> {
        let result = self.react(idea_id, kind).await;
        if !self.is_disposed() {
            self.ctx.notices().signal(UiSignal::MenuClosed(idea_id));
        }
        result
    }

    async fn react(&self, idea_id: IdeaId, kind: ReactionKind) -> DomainResult<ReactionOutcome> {
        self.ensure_live()?;
        let credential = self.require_credential("react")?;
        let _guard = self.pending.acquire(idea_id, MutationKind::Reaction)?;

        let snapshot = {
            let mut state = self.state.lock();
            let idea = state
                .idea_mut(idea_id)
                .ok_or_else(|| DomainError::not_found(format!("idea {idea_id}")))?;
            let snapshot = ReactionSnapshot::capture(idea);
            let removing = predict_reaction(idea, kind);
            debug!(idea_id = %idea_id, %kind, removing, "Reaction applied optimistically");
            snapshot
        };

        let result = self.ctx.api().set_reaction(idea_id, kind, &credential).await;
        self.ensure_live()?;

        match result {
            Ok(ReactionResult { removed, counts }) => {
                let outcome = {
                    let mut state = self.state.lock();
                    match state.idea_mut(idea_id) {
                        Some(idea) => {
                            if let Some(counts) = counts {
                                idea.reaction_counts = counts;
                            }
                            idea.my_reaction = if removed { None } else { Some(kind) };
                            ReactionOutcome {
                                removed,
                                counts: idea.reaction_counts.clone(),
                            }
                        }
                        None => ReactionOutcome {
                            removed,
                            counts: counts.unwrap_or_default(),
                        },
                    }
                };

                info!(idea_id = %idea_id, %kind, removed, "Reaction confirmed");
                self.notify(Notice::success(if removed {
                    "Reaction removed".to_string()
                } else {
                    format!("Reacted with {kind}")
                }));
                Ok(outcome)
            }
            Err(e) => {
                if let Some(idea) = self.state.lock().idea_mut(idea_id) {
                    snapshot.restore(idea);
                }
                warn!(idea_id = %idea_id, %kind, error = %e, "Reaction failed, restored");
                self.notify(Notice::error("Failed to react"));
                Err(e)
            }
        }
    }

    // === Comments ===

    /// Post a comment; it shows up once the server broadcasts it
    #[instrument(skip(self, text))]
    pub async fn submit_comment(&self, idea_id: IdeaId, text: &str) -> DomainResult<CommentSubmission> {
        self.ensure_live()?;
        let credential = self.require_credential("comment")?;
        let content = normalize_comment(text, self.ctx.comment_max_length())?;
        let _guard = self.pending.acquire(idea_id, MutationKind::Comment)?;

        let result = self
            .ctx
            .api()
            .create_comment(idea_id, &content, &credential)
            .await;
        self.ensure_live()?;

        match result {
            Ok(comment) => {
                info!(idea_id = %idea_id, comment_id = comment.id, "Comment posted");
                self.notify(Notice::success("Comment posted"));
                Ok(CommentSubmission::Cleared)
            }
            Err(e) => {
                warn!(idea_id = %idea_id, error = %e, "Comment failed");
                self.notify(Notice::error("Failed to post comment"));
                Err(e)
            }
        }
    }

    /// Materialize an idea's comment list and subscribe to its topic
    ///
    /// Load failures leave an empty list. Comments pushed while the list
    /// loads are kept.
    #[instrument(skip(self))]
    pub async fn open_comments(&self, idea_id: IdeaId) -> DomainResult<usize> {
        self.ensure_live()?;
        self.state.lock().open_comments(idea_id, Vec::new());

        if let Err(e) = self.ctx.topics().join(idea_id).await {
            warn!(idea_id = %idea_id, error = %e, "Join failed, comments will not update live");
        }

        let result = self.ctx.api().list_comments(idea_id).await;
        self.ensure_live()?;

        let loaded = result.unwrap_or_else(|e| {
            if e.is_not_found() {
                debug!(idea_id = %idea_id, "No comments yet");
            } else {
                warn!(idea_id = %idea_id, error = %e, "Failed to load comments");
            }
            Vec::new()
        });

        let count = self
            .state
            .lock()
            .merge_loaded_comments(idea_id, loaded)
            .unwrap_or(0);
        debug!(idea_id = %idea_id, count, "Comments opened");
        Ok(count)
    }

    /// Drop an idea's comment list and leave its topic
    #[instrument(skip(self))]
    pub async fn close_comments(&self, idea_id: IdeaId) {
        if !self.state.lock().close_comments(idea_id) {
            return;
        }
        if let Err(e) = self.ctx.topics().leave(idea_id).await {
            debug!(idea_id = %idea_id, error = %e, "Leave failed");
        }
    }

    /// Open the comment panels of the first `limit` ideas in `order`
    ///
    /// Score updates are only pushed for joined topics, so this is how a
    /// passive viewer keeps the leading ideas live. Returns the followed ids.
    #[instrument(skip(self))]
    pub async fn follow_top(&self, order: SortOrder, limit: usize) -> DomainResult<Vec<IdeaId>> {
        let ids: Vec<IdeaId> = self
            .sorted(order)
            .iter()
            .take(limit)
            .map(|idea| idea.id)
            .collect();
        for &idea_id in &ids {
            self.open_comments(idea_id).await?;
        }
        info!(count = ids.len(), "Following top ideas");
        Ok(ids)
    }

    // === Ideas ===

    /// Submit a new idea and show it at the top of the list
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn submit_idea(&self, draft: &IdeaDraft) -> DomainResult<Idea> {
        self.ensure_live()?;
        let credential = self.require_credential("submit an idea")?;

        let result = self.ctx.api().create_idea(draft, &credential).await;
        self.ensure_live()?;

        match result {
            Ok(idea) => {
                self.state.lock().prepend_if_absent(idea.clone());
                info!(idea_id = %idea.id, "Idea submitted");
                self.notify(Notice::success("Idea submitted"));
                Ok(idea)
            }
            Err(e) => {
                warn!(error = %e, "Idea submission failed");
                self.notify(Notice::error("Failed to submit idea"));
                Err(e)
            }
        }
    }

    // === Remote events ===

    /// Merge a push event into the cache; returns whether anything changed
    ///
    /// `vote_update` is applied unconditionally in arrival order, so a late
    /// broadcast can overwrite a newer confirmed score.
    pub fn apply_remote_event(&self, event: RemoteEvent) -> bool {
        if self.is_disposed() {
            return false;
        }

        let mut state = self.state.lock();
        match event {
            RemoteEvent::VoteUpdate {
                idea_id,
                score,
                upvote_count,
            } => {
                let applied = state.apply_vote_update(idea_id, score, upvote_count);
                if applied {
                    debug!(idea_id = %idea_id, score, "Remote vote update applied");
                } else {
                    debug!(idea_id = %idea_id, "Vote update for unknown idea ignored");
                }
                applied
            }
            RemoteEvent::IdeaCreated { idea } => {
                let idea_id = idea.id;
                let added = state.prepend_if_absent(*idea);
                debug!(idea_id = %idea_id, added, "Remote idea received");
                added
            }
            RemoteEvent::NewComment { idea_id, comment } => {
                let appended = state.append_comment(idea_id, comment);
                if !appended {
                    debug!(idea_id = %idea_id, "Comment for closed panel dropped");
                }
                appended
            }
        }
    }

    // === Accessors ===

    /// Cached ideas in cache order
    pub fn ideas(&self) -> Vec<Idea> {
        self.state.lock().ideas().to_vec()
    }

    /// Cached ideas in display order
    pub fn sorted(&self, order: SortOrder) -> Vec<Idea> {
        let mut ideas = self.ideas();
        ideas.sort_by(|a, b| order.compare(a, b));
        ideas
    }

    pub fn idea(&self, idea_id: IdeaId) -> Option<Idea> {
        self.state.lock().idea(idea_id).cloned()
    }

    pub fn is_voted(&self, idea_id: IdeaId) -> bool {
        self.state.lock().idea(idea_id).is_some_and(|idea| idea.voted)
    }

    /// Ideas the viewer has voted on
    pub fn voted_ideas(&self) -> BTreeSet<IdeaId> {
        self.state
            .lock()
            .ideas()
            .iter()
            .filter(|idea| idea.voted)
            .map(|idea| idea.id)
            .collect()
    }

    pub fn my_reaction(&self, idea_id: IdeaId) -> Option<ReactionKind> {
        self.state.lock().idea(idea_id).and_then(|idea| idea.my_reaction)
    }

    /// Open comment list for an idea, `None` when its panel is closed
    pub fn comments(&self, idea_id: IdeaId) -> Option<Vec<Comment>> {
        self.state.lock().comments(idea_id).map(<[Comment]>::to_vec)
    }

    pub fn is_pending(&self, idea_id: IdeaId, kind: MutationKind) -> bool {
        self.pending.is_pending(idea_id, kind)
    }
}
