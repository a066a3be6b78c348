//! HTTP implementation of IdeaApi

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use validator::Validate;

use fest_common::ApiConfig;
use fest_core::traits::{IdeaApi, ReactionResult, VoteResult};
use fest_core::wire::{counts_from_wire, CommentPayload, IdeaPayload};
use fest_core::{Comment, Credential, DomainError, DomainResult, Idea, IdeaDraft, IdeaId, ReactionKind};

use crate::dto::{
    CreateCommentRequest, CreateIdeaRequest, DataResponse, ListResponse, ReactRequest,
    ReactionResponse, VoteRequest, VoteResponse,
};
use crate::error::{error_from_response, malformed_body, map_transport_error};

/// REST client for the idea board backend
#[derive(Clone)]
pub struct HttpApiClient {
    http: Client,
    config: ApiConfig,
}

impl HttpApiClient {
    /// Create a new client with the configured request timeout
    pub fn new(config: ApiConfig) -> DomainResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(map_transport_error)?;
        Ok(Self { http, config })
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(http: Client, config: ApiConfig) -> Self {
        Self { http, config }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.config.url(path))
    }

    fn post(&self, path: &str, credential: &Credential) -> RequestBuilder {
        self.http
            .post(self.config.url(path))
            .header(reqwest::header::AUTHORIZATION, credential.bearer())
    }

    /// Send a request and fail on any non-2xx status
    async fn send(&self, request: RequestBuilder, what: &str) -> DomainResult<Response> {
        let response = request.send().await.map_err(map_transport_error)?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response, what).await)
        }
    }

    /// Decode a 2xx body that must be present
    async fn decode<T: DeserializeOwned>(response: Response) -> DomainResult<T> {
        let status = response.status();
        response
            .json::<T>()
            .await
            .map_err(|e| malformed_body(status, &e))
    }

    /// Decode a 2xx body, treating an empty or unreadable body as the default
    async fn decode_or_default<T: DeserializeOwned + Default>(response: Response) -> T {
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(error = %e, "Response body unreadable, using default");
                return T::default();
            }
        };
        serde_json::from_slice(&bytes).unwrap_or_default()
    }
}

#[async_trait]
impl IdeaApi for HttpApiClient {
    #[instrument(skip(self, credential))]
    async fn list_ideas(&self, credential: Option<&Credential>) -> DomainResult<Vec<Idea>> {
        let mut request = self.get("/api/ideas");
        if let Some(credential) = credential {
            request = request.header(reqwest::header::AUTHORIZATION, credential.bearer());
        }

        let response = self.send(request, "ideas").await?;
        let list: ListResponse<IdeaPayload> = Self::decode(response).await?;

        debug!(count = list.data.len(), "Ideas listed");
        Ok(list.data.into_iter().map(Idea::from).collect())
    }

    #[instrument(skip(self, credential))]
    async fn toggle_vote(&self, idea_id: IdeaId, credential: &Credential) -> DomainResult<VoteResult> {
        let request = self
            .post(&format!("/api/ideas/{idea_id}/vote"), credential)
            .json(&VoteRequest::upvote(idea_id));

        let response = self.send(request, &format!("idea {idea_id}")).await?;
        let body: VoteResponse = Self::decode_or_default(response).await;

        Ok(VoteResult {
            score: body.stats.map(|s| s.score),
        })
    }

    #[instrument(skip(self, credential))]
    async fn set_reaction(
        &self,
        idea_id: IdeaId,
        kind: ReactionKind,
        credential: &Credential,
    ) -> DomainResult<ReactionResult> {
        let request = self
            .post(&format!("/api/ideas/{idea_id}/react"), credential)
            .json(&ReactRequest { reaction: kind });

        let response = self.send(request, &format!("idea {idea_id}")).await?;
        let body: ReactionResponse = Self::decode_or_default(response).await;

        Ok(ReactionResult {
            removed: body.removed,
            counts: body.reaction_counts.as_ref().map(counts_from_wire),
        })
    }

    #[instrument(skip(self))]
    async fn list_comments(&self, idea_id: IdeaId) -> DomainResult<Vec<Comment>> {
        let request = self.get(&format!("/api/ideas/{idea_id}/comments"));

        let response = self
            .send(request, &format!("comments for idea {idea_id}"))
            .await?;
        let list: ListResponse<CommentPayload> = Self::decode(response).await?;

        Ok(list.data.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self, content, credential))]
    async fn create_comment(
        &self,
        idea_id: IdeaId,
        content: &str,
        credential: &Credential,
    ) -> DomainResult<Comment> {
        let body = CreateCommentRequest {
            content: content.to_string(),
        };
        body.validate()
            .map_err(|e| DomainError::Validation(e.to_string()))?;

        let request = self
            .post(&format!("/api/ideas/{idea_id}/comments"), credential)
            .json(&body);

        let response = self.send(request, &format!("idea {idea_id}")).await?;
        let created: DataResponse<CommentPayload> = Self::decode(response).await?;

        Ok(Comment::from(created.data))
    }

    #[instrument(skip(self, draft, credential))]
    async fn create_idea(&self, draft: &IdeaDraft, credential: &Credential) -> DomainResult<Idea> {
        let request = self
            .post("/api/ideas", credential)
            .json(&CreateIdeaRequest::from(draft));

        let response = self.send(request, "ideas").await?;
        let created: DataResponse<IdeaPayload> = Self::decode(response).await?;

        Ok(Idea::from(created.data))
    }
}
