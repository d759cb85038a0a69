use std::sync::Arc;

use anyhow::Context as _;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::cache::TableCache;
use crate::cli::ServeArgs;
use crate::config::NotionConfig;
use crate::loader::Loader;
use crate::notion::LoadError;
use crate::page;

/// Shared server state: the loader plus the compute-once table cache that
/// keeps re-renders from refetching.
#[derive(Clone)]
pub struct AppState {
    loader: Arc<Loader>,
    cache: Arc<TableCache>,
}

impl AppState {
    pub fn new(loader: Loader) -> Self {
        Self {
            loader: Arc::new(loader),
            cache: Arc::new(TableCache::new()),
        }
    }

    /// Manual invalidation hook: the next page request loads fresh data.
    pub async fn invalidate_cache(&self) {
        self.cache.invalidate().await;
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/healthz", get(|| async { "ok\n" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, (StatusCode, String)> {
    let loader = Arc::clone(&state.loader);
    let table = state
        .cache
        .get_or_load(|| async move { loader.load().await })
        .await
        .map_err(load_error_response)?;

    let html = page::render_dashboard(&table).map_err(|err| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("render dashboard: {err:#}"),
        )
    })?;
    Ok(Html(html))
}

/// Every load failure aborts the render and surfaces as the response body;
/// nothing is retried. Local misconfiguration reads as our fault, the rest
/// as a bad upstream.
fn load_error_response(err: LoadError) -> (StatusCode, String) {
    let status = match &err {
        LoadError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        LoadError::Shape(_) | LoadError::Network(_) => StatusCode::BAD_GATEWAY,
    };
    (status, format!("load practice records: {err}"))
}

/// `serve` subcommand: bind and serve the dashboard until the process ends.
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let config = NotionConfig::from_env().context("load notion config")?;
    let state = AppState::new(Loader::new(config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;
    tracing::info!(addr = %args.addr, "dashboard listening");
    axum::serve(listener, app).await.context("serve dashboard")?;
    Ok(())
}
