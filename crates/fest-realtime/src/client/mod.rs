//! Real-time channel client
//!
//! `RealtimeClient` opens the socket; a background listener task forwards
//! decoded events into the caller's queue and services join/leave commands
//! sent through the returned `RealtimeHandle`.

mod handle;
mod listener;

pub use handle::RealtimeHandle;

use std::sync::Arc;

use fest_common::RealtimeConfig;
use fest_core::{Credential, DomainError, DomainResult, RemoteEvent};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};
use url::Url;

use listener::{open_socket, ListenerContext};

/// Connects to the real-time channel
#[derive(Debug, Clone)]
pub struct RealtimeClient {
    config: RealtimeConfig,
}

impl RealtimeClient {
    /// Create a new client
    #[must_use]
    pub fn new(config: RealtimeConfig) -> Self {
        Self { config }
    }

    /// Endpoint URL, carrying the token as a percent-encoded query parameter
    pub fn endpoint(&self, credential: Option<&Credential>) -> DomainResult<String> {
        let mut url = Url::parse(&self.config.url)
            .map_err(|e| unavailable(format!("invalid endpoint {}: {e}", self.config.url)))?;
        if let Some(credential) = credential {
            url.query_pairs_mut().append_pair("token", credential.token());
        }
        Ok(url.into())
    }

    /// Connect within the configured timeout and start forwarding events
    ///
    /// Events are pushed into `events` in arrival order. The queue closes
    /// when the listener stops for good.
    #[instrument(skip(self, credential, events), fields(url = %self.config.url))]
    pub async fn connect(
        &self,
        credential: Option<&Credential>,
        events: mpsc::Sender<RemoteEvent>,
    ) -> DomainResult<RealtimeHandle> {
        let url = self.endpoint(credential)?;
        let socket = open_socket(&url, self.config.connect_timeout()).await?;

        let (control_tx, control_rx) = mpsc::channel(32);
        let handle = RealtimeHandle::new(control_tx);

        let ctx = ListenerContext {
            url,
            config: self.config.clone(),
            events,
            joined: Arc::clone(handle.joined()),
            connected: Arc::clone(handle.connected_flag()),
        };
        tokio::spawn(listener::listener_loop(ctx, socket, control_rx));

        info!(anonymous = credential.is_none(), "Real-time channel connected");
        Ok(handle)
    }

    /// Connect, or log and return `None` so the caller runs without live updates
    pub async fn connect_or_degrade(
        &self,
        credential: Option<&Credential>,
        events: mpsc::Sender<RemoteEvent>,
    ) -> Option<RealtimeHandle> {
        match self.connect(credential, events).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "Live updates disabled");
                None
            }
        }
    }
}

impl From<RealtimeConfig> for RealtimeClient {
    fn from(config: RealtimeConfig) -> Self {
        Self::new(config)
    }
}

/// Wrap a connect failure
pub(crate) fn unavailable(reason: impl Into<String>) -> DomainError {
    DomainError::ConnectionUnavailable(reason.into())
}
