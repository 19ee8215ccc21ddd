use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    activity::{get_repo_activity, RepoActivity},
    github::Upstream,
    RelayError,
};

#[derive(Clone)]
pub struct RelayState {
    upstream: Arc<dyn Upstream>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepoDataRequest {
    pub repo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub const METHOD_NOT_ALLOWED: &'static str = "Method not allowed";
    pub const FETCH_FAILED: &'static str = "Failed to fetch repository data";

    fn respond(status: StatusCode, msg: &str) -> Response {
        let body = Self {
            error: msg.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidInput(msg) => ErrorBody::respond(StatusCode::BAD_REQUEST, msg),
            Self::UpstreamFailure(err) => {
                log::error!("cannot fetch repository data: {err:#}");
                ErrorBody::respond(StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::FETCH_FAILED)
            }
        }
    }
}

pub fn router(upstream: Arc<dyn Upstream>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/repo-data", post(repo_data).fallback(method_not_allowed))
        .layer(cors)
        .with_state(RelayState { upstream })
}

async fn health() -> &'static str {
    "relay running"
}

async fn method_not_allowed() -> Response {
    ErrorBody::respond(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorBody::METHOD_NOT_ALLOWED,
    )
}

async fn repo_data(
    State(state): State<RelayState>,
    body: Result<Json<RepoDataRequest>, JsonRejection>,
) -> Result<Json<RepoActivity>, RelayError> {
    // an unreadable body is treated the same as a missing url
    let repo_url = match body {
        Ok(Json(req)) => req.repo_url.unwrap_or_default(),
        Err(rejection) => {
            log::debug!("rejected body: {rejection}");
            String::new()
        }
    };

    if repo_url.trim().is_empty() {
        return Err(RelayError::InvalidInput(RelayError::MISSING_URL));
    }

    let upstream = Arc::clone(&state.upstream);
    let activity =
        tokio::task::spawn_blocking(move || get_repo_activity(&*upstream, &repo_url))
            .await
            .map_err(|err| RelayError::UpstreamFailure(err.into()))??;

    log::info!(
        "{}: {} commits, {} contributors",
        activity.repository,
        activity.total_commits_fetched,
        activity.contributor_count
    );

    Ok(Json(activity))
}

/// Binds `addr` and serves the relay until the process is stopped.
pub async fn serve(addr: std::net::SocketAddr, upstream: Arc<dyn Upstream>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("relay listening on {}", listener.local_addr()?);
    axum::serve(listener, router(upstream)).await?;
    Ok(())
}
