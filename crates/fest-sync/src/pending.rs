//! Per-idea in-flight guards

use dashmap::DashSet;
use std::sync::Arc;

use fest_core::{DomainError, DomainResult, IdeaId, MutationKind};

/// Set of `(idea, mutation kind)` pairs with a request in flight
#[derive(Debug, Clone, Default)]
pub struct PendingGuards {
    inner: Arc<DashSet<(IdeaId, MutationKind)>>,
}

impl PendingGuards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the pair pending, failing if it already is
    ///
    /// The mark is cleared when the returned guard drops.
    pub fn acquire(&self, idea_id: IdeaId, kind: MutationKind) -> DomainResult<PendingGuard> {
        if !self.inner.insert((idea_id, kind)) {
            return Err(DomainError::Pending { idea_id, kind });
        }
        Ok(PendingGuard {
            set: Arc::clone(&self.inner),
            key: (idea_id, kind),
        })
    }

    pub fn is_pending(&self, idea_id: IdeaId, kind: MutationKind) -> bool {
        self.inner.contains(&(idea_id, kind))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Clears its pending mark on drop
#[derive(Debug)]
pub struct PendingGuard {
    set: Arc<DashSet<(IdeaId, MutationKind)>>,
    key: (IdeaId, MutationKind),
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.set.remove(&self.key);
    }
}
