//! Local cache of idea snapshots and open comment lists

use std::collections::{HashMap, HashSet};

use fest_core::{Comment, Idea, IdeaId, ReactionCounts, ReactionKind};

/// Cache owned by one synchronizer
#[derive(Debug, Default)]
pub(crate) struct CacheState {
    /// Server order, remote creations prepended
    ideas: Vec<Idea>,
    /// Present only while an idea's comment panel is open
    comments: HashMap<IdeaId, Vec<Comment>>,
}

impl CacheState {
    /// Replace every snapshot, keeping the first entry per id
    pub fn replace_ideas(&mut self, ideas: Vec<Idea>) {
        let mut seen = HashSet::with_capacity(ideas.len());
        self.ideas = ideas.into_iter().filter(|idea| seen.insert(idea.id)).collect();
        self.comments.retain(|id, _| seen.contains(id));
    }

    pub fn ideas(&self) -> &[Idea] {
        &self.ideas
    }

    pub fn idea(&self, id: IdeaId) -> Option<&Idea> {
        self.ideas.iter().find(|idea| idea.id == id)
    }

    pub fn idea_mut(&mut self, id: IdeaId) -> Option<&mut Idea> {
        self.ideas.iter_mut().find(|idea| idea.id == id)
    }

    /// Insert at the front unless the id is already cached
    pub fn prepend_if_absent(&mut self, idea: Idea) -> bool {
        if self.idea(idea.id).is_some() {
            return false;
        }
        self.ideas.insert(0, idea);
        true
    }

    /// Overwrite score figures; `false` when the idea is not cached
    pub fn apply_vote_update(&mut self, id: IdeaId, score: i64, upvote_count: Option<i64>) -> bool {
        match self.idea_mut(id) {
            Some(idea) => {
                idea.apply_vote_stats(score, upvote_count);
                true
            }
            None => false,
        }
    }

    pub fn open_comments(&mut self, id: IdeaId, comments: Vec<Comment>) {
        self.comments.insert(id, comments);
    }

    pub fn close_comments(&mut self, id: IdeaId) -> bool {
        self.comments.remove(&id).is_some()
    }

    pub fn comments(&self, id: IdeaId) -> Option<&[Comment]> {
        self.comments.get(&id).map(Vec::as_slice)
    }

    /// Install a freshly loaded list, keeping comments pushed while it loaded
    ///
    /// Does nothing if the panel was closed in the meantime.
    pub fn merge_loaded_comments(&mut self, id: IdeaId, loaded: Vec<Comment>) -> Option<usize> {
        let list = self.comments.get_mut(&id)?;
        let live = std::mem::replace(list, loaded);
        for comment in live {
            if list.iter().all(|c| c.id != comment.id) {
                list.push(comment);
            }
        }
        Some(list.len())
    }

    /// Append to an open list; dropped when the panel is closed or the id is already listed
    pub fn append_comment(&mut self, id: IdeaId, comment: Comment) -> bool {
        match self.comments.get_mut(&id) {
            Some(list) if list.iter().all(|c| c.id != comment.id) => {
                list.push(comment);
                true
            }
            _ => false,
        }
    }
}

/// Reaction state captured before an optimistic change
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReactionSnapshot {
    pub counts: ReactionCounts,
    pub active: Option<ReactionKind>,
}

impl ReactionSnapshot {
    pub fn capture(idea: &Idea) -> Self {
        Self {
            counts: idea.reaction_counts.clone(),
            active: idea.my_reaction,
        }
    }

    pub fn restore(self, idea: &mut Idea) {
        idea.reaction_counts = self.counts;
        idea.my_reaction = self.active;
    }
}

/// Apply the predicted effect of picking `kind`; returns whether it removes the reaction
pub(crate) fn predict_reaction(idea: &mut Idea, kind: ReactionKind) -> bool {
    match idea.my_reaction {
        Some(current) if current == kind => {
            idea.reaction_counts.decrement(kind);
            idea.my_reaction = None;
            true
        }
        Some(previous) => {
            idea.reaction_counts.decrement(previous);
            idea.reaction_counts.increment(kind);
            idea.my_reaction = Some(kind);
            false
        }
        None => {
            idea.reaction_counts.increment(kind);
            idea.my_reaction = Some(kind);
            false
        }
    }
}
