//! Live idea board watcher
//!
//! Loads the idea list, joins the topics of the most popular ideas, and logs
//! every remote event with the resulting score until Ctrl-C. Score updates
//! for ideas outside the followed set are not pushed to this viewer.
//!
//! Run with:
//! ```bash
//! API_BASE_URL=http://localhost:8080 cargo run -p fest-sync --bin fest-watch
//! ```

use std::sync::Arc;

use fest_api_client::HttpApiClient;
use fest_common::{
    try_init_tracing, try_init_tracing_with_config, AppConfig, AppError, AppResult, TracingConfig,
};
use fest_core::traits::{NoopSubscriber, TopicSubscriber};
use fest_core::SortOrder;
use fest_realtime::RealtimeClient;
use fest_sync::{CounterSynchronizer, NoticeLog, SyncContextBuilder, SyncSession};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Ideas whose topics the watcher joins
const WATCHED_IDEAS: usize = 10;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(code = e.error_code(), error = %e, "fest-watch failed");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = try_init_tracing();
            return Err(e.into());
        }
    };

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        api = %config.api.base_url,
        realtime = %config.realtime.url,
        signed_in = config.sync.token.is_some(),
        "Configuration loaded"
    );

    let api = Arc::new(HttpApiClient::new(config.api.clone())?);

    // Live updates are optional; without them every operation still works
    let (tx, rx) = mpsc::channel(config.realtime.event_buffer.max(1));
    let handle = RealtimeClient::new(config.realtime.clone())
        .connect_or_degrade(config.sync.token.as_ref(), tx)
        .await;
    let topics: Arc<dyn TopicSubscriber> = match &handle {
        Some(handle) => Arc::new(handle.clone()),
        None => Arc::new(NoopSubscriber),
    };

    let ctx = SyncContextBuilder::new()
        .api(api)
        .topics(topics)
        .notices(Arc::new(NoticeLog::new()))
        .config(&config.sync)
        .build()?;
    let sync = Arc::new(CounterSynchronizer::new(ctx));

    let count = sync.refresh().await?;
    info!(count, "Ideas loaded");
    for idea in sync.sorted(SortOrder::Popular).iter().take(WATCHED_IDEAS) {
        info!(idea_id = %idea.id, score = idea.score, title = %idea.title, "Top idea");
    }

    let watcher = Arc::clone(&sync);
    let session = tokio::spawn(SyncSession::new(Arc::clone(&sync), rx).run_with(move |applied| {
        let score = watcher.idea(applied.idea_id).map(|idea| idea.score);
        info!(
            event = %applied.event_type,
            idea_id = %applied.idea_id,
            changed = applied.changed,
            ?score,
            "Remote event"
        );
    }));

    // Pushes start flowing as topics are joined; the session is already draining
    sync.follow_top(SortOrder::Popular, WATCHED_IDEAS).await?;

    tokio::signal::ctrl_c().await.map_err(AppError::internal)?;
    info!("Shutting down");

    sync.dispose();
    if let Some(handle) = handle {
        handle.close().await;
    }
    let changed = session.await.map_err(AppError::internal)?;

    info!(changed, "Watcher stopped");
    Ok(())
}
