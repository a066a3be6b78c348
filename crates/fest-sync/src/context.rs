//! Sync context - dependency container for the synchronizer
//!
//! Holds the remote API, the real-time topic subscriber, and the notice sink.

use std::sync::Arc;

use fest_common::SyncConfig;
use fest_core::traits::{IdeaApi, NoopSubscriber, TopicSubscriber};
use fest_core::{Credential, DomainError, DomainResult, DEFAULT_COMMENT_MAX_LENGTH};

use crate::notice::{NoticeLog, NoticeSink};

/// Dependencies shared by every synchronizer operation
#[derive(Clone)]
pub struct SyncContext {
    api: Arc<dyn IdeaApi>,
    topics: Arc<dyn TopicSubscriber>,
    notices: Arc<dyn NoticeSink>,
    credential: Option<Credential>,
    comment_max_length: usize,
}

impl SyncContext {
    pub fn new(
        api: Arc<dyn IdeaApi>,
        topics: Arc<dyn TopicSubscriber>,
        notices: Arc<dyn NoticeSink>,
        credential: Option<Credential>,
        comment_max_length: usize,
    ) -> Self {
        Self {
            api,
            topics,
            notices,
            credential,
            comment_max_length,
        }
    }

    /// Get the remote API
    pub fn api(&self) -> &Arc<dyn IdeaApi> {
        &self.api
    }

    /// Get the real-time topic subscriber
    pub fn topics(&self) -> &Arc<dyn TopicSubscriber> {
        &self.topics
    }

    /// Get the notice sink
    pub fn notices(&self) -> &Arc<dyn NoticeSink> {
        &self.notices
    }

    /// Credential the synchronizer starts with
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn comment_max_length(&self) -> usize {
        self.comment_max_length
    }
}

/// Builder for creating SyncContext
///
/// Only the API is required; topics default to `NoopSubscriber` and notices
/// to a fresh `NoticeLog`.
pub struct SyncContextBuilder {
    api: Option<Arc<dyn IdeaApi>>,
    topics: Option<Arc<dyn TopicSubscriber>>,
    notices: Option<Arc<dyn NoticeSink>>,
    credential: Option<Credential>,
    comment_max_length: usize,
}

impl SyncContextBuilder {
    pub fn new() -> Self {
        Self {
            api: None,
            topics: None,
            notices: None,
            credential: None,
            comment_max_length: DEFAULT_COMMENT_MAX_LENGTH,
        }
    }

    pub fn api(mut self, api: Arc<dyn IdeaApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn topics(mut self, topics: Arc<dyn TopicSubscriber>) -> Self {
        self.topics = Some(topics);
        self
    }

    pub fn notices(mut self, notices: Arc<dyn NoticeSink>) -> Self {
        self.notices = Some(notices);
        self
    }

    pub fn credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    pub fn comment_max_length(mut self, max: usize) -> Self {
        self.comment_max_length = max;
        self
    }

    /// Apply the synchronizer section of the app config
    pub fn config(self, config: &SyncConfig) -> Self {
        self.comment_max_length(config.comment_max_length)
            .credential(config.token.clone())
    }

    /// Build the SyncContext
    ///
    /// # Errors
    /// Returns `DomainError::Validation` if the API is missing
    pub fn build(self) -> DomainResult<SyncContext> {
        Ok(SyncContext::new(
            self.api
                .ok_or_else(|| DomainError::Validation("api is required".to_string()))?,
            self.topics.unwrap_or_else(|| Arc::new(NoopSubscriber)),
            self.notices.unwrap_or_else(|| Arc::new(NoticeLog::new())),
            self.credential,
            self.comment_max_length,
        ))
    }
}

impl Default for SyncContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
