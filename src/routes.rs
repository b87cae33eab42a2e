use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::aggregator::FeedAggregator;
use crate::config::Config;
use crate::grid::{footer_row, Row};
use crate::nav::Navigator;
use crate::pages::build_page;

/// Advertise the cache lifetime to HTTP caches; stale responses may be
/// served briefly while revalidating.
const FEEDS_CACHE_CONTROL: &str = "public, s-maxage=900, stale-while-revalidate=1800";

pub struct AppState {
    pub config: Arc<Config>,
    pub navigator: Navigator,
    pub aggregator: FeedAggregator,
}

// Custom error type
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error: {}", self.0),
        )
            .into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

/// One composed teletext page plus its navigation context. The footer
/// row is supplied separately from the 24 content rows.
#[derive(Serialize)]
pub struct PageResponse {
    pub page: u16,
    pub rows: Vec<Row>,
    pub footer: Row,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u16>,
}

// Route handlers

/// Full dataset as JSON: one entry per configured category, failed
/// categories included with their error message.
pub async fn feeds(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let data = state.aggregator.fetch_all().await?;
    Ok((
        [(header::CACHE_CONTROL, FEEDS_CACHE_CONTROL)],
        Json(data),
    ))
}

/// Composed grid for any page number. Unknown pages still return 200
/// with the not-found grid; only a pipeline fault yields 500.
pub async fn page(
    State(state): State<Arc<AppState>>,
    Path(page_num): Path<u16>,
) -> Result<Json<PageResponse>, AppError> {
    let data = state.aggregator.fetch_all().await?;
    let rows = build_page(page_num, &state.config, &data, Utc::now());
    let (prev, next) = state.navigator.adjacent(page_num);

    Ok(Json(PageResponse {
        page: page_num,
        rows,
        footer: footer_row(prev, next),
        prev,
        next,
    }))
}

pub async fn health() -> impl IntoResponse {
    "OK"
}
