use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use crate::{
    application::{
        comments::CommentService,
        dashboard::HomeDashboardService,
        error::{HttpError, StatsError},
    },
    domain::{comments::CommentFormInitial, entities::CommentRecord},
};

use super::{
    DatabaseHealth, db_health_response,
    middleware::{log_responses, set_request_context},
    repo_error_to_http,
};

const SOURCE: &str = "infra::http::public";

#[derive(Clone)]
pub struct HttpState {
    pub dashboard: Arc<HomeDashboardService>,
    pub comments: Arc<CommentService>,
    pub db: Arc<dyn DatabaseHealth>,
    /// Category whose dashboard the landing page shows.
    pub home_model: String,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/comments/{content_type}/{object_id}", get(comments))
        .route("/_health/db", get(public_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Serialize)]
struct CommentsView {
    count: u64,
    form: CommentFormInitial,
    comments: Vec<CommentRecord>,
}

async fn index(State(state): State<HttpState>) -> Response {
    match state.dashboard.assemble(&state.home_model).await {
        Ok(dashboard) => Json(dashboard).into_response(),
        Err(err) => stats_error_to_http(err).into_response(),
    }
}

async fn comments(
    State(state): State<HttpState>,
    Path((content_type, object_id)): Path<(String, i64)>,
) -> Response {
    let service = &state.comments;
    let result = tokio::try_join!(
        service.comment_count(&content_type, object_id),
        service.comment_form(&content_type, object_id),
        service.comment_list(&content_type, object_id),
    );

    match result {
        Ok((count, form, comments)) => Json(CommentsView {
            count,
            form,
            comments,
        })
        .into_response(),
        Err(err) => stats_error_to_http(err).into_response(),
    }
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.check().await)
}

fn stats_error_to_http(err: StatsError) -> HttpError {
    match err {
        StatsError::Repo(repo) => repo_error_to_http(SOURCE, repo),
        other => other.into(),
    }
}
