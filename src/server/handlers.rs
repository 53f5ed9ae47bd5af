use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::batch::{BatchRunner, BatchStats};
use crate::geocode::ResolveEngine;
use crate::ingest::read_records_from_reader;
use crate::map::{marker_for, render_map};

use super::state::AppState;
use super::static_files;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── Static file handlers ────────────────────────────────────────

pub async fn index() -> Html<&'static str> {
    Html(static_files::INDEX_HTML)
}

pub async fn style() -> Response {
    ([(header::CONTENT_TYPE, "text/css")], static_files::STYLE_CSS).into_response()
}

pub async fn script() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        static_files::APP_JS,
    )
        .into_response()
}

// ─── POST /api/batch ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct BatchResponse {
    pub success: usize,
    pub partial: usize,
    pub failed: usize,
    pub failed_list: Vec<String>,
    pub map: &'static str,
}

/// Accepts the uploaded CSV as the request body, runs the whole batch on a
/// blocking task (the engine sleeps between records), stores the rendered
/// map, and returns the statistics.
pub async fn run_batch(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<BatchResponse>, Response> {
    let start = Instant::now();

    if body.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Empty upload").into_response());
    }

    let records = read_records_from_reader(body.as_bytes())
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("{}", e)).into_response())?;
    let record_count = records.len();

    let delay = state.delay;
    let timeout = state.timeout;
    let (html, stats): (String, BatchStats) = tokio::task::spawn_blocking(move || {
        let engine = ResolveEngine::new().with_timeout(timeout);
        let runner = BatchRunner::new(engine).with_delay(delay);
        let report = runner.run(&records);

        let mut markers = Vec::new();
        let mut points = Vec::new();
        for (record, outcome) in records.iter().zip(&report.outcomes) {
            if let Some(point) = outcome.point() {
                markers.push(marker_for(record, point));
                points.push((point.lat, point.lon));
            }
        }
        (render_map(&markers, &points), report.stats)
    })
    .await
    .map_err(|e| {
        api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("batch task failed: {}", e))
            .into_response()
    })?;

    *state.last_map.lock().unwrap() = Some(html);

    let elapsed = start.elapsed();
    eprintln!(
        "  POST /api/batch {} rows -> {} exact, {} approx, {} failed ({:.1}s)",
        record_count,
        stats.success,
        stats.partial,
        stats.failed(),
        elapsed.as_secs_f64(),
    );

    Ok(Json(BatchResponse {
        success: stats.success,
        partial: stats.partial,
        failed: stats.failed(),
        failed_list: stats.failed_list,
        map: "/map",
    }))
}

// ─── GET /map ────────────────────────────────────────────────────

pub async fn map_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, Response> {
    let map = state.last_map.lock().unwrap().clone();
    match map {
        Some(html) => Ok(Html(html)),
        None => Err(api_error(StatusCode::NOT_FOUND, "No map yet — upload a batch first")
            .into_response()),
    }
}
