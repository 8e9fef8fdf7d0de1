use crate::commands::today_in;
use crate::infra::{deserialize_optional_date, AppState, XpState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use questlog_xp::error::AppError;
use questlog_xp::xp::report::views::{DailyView, LedgerEntryView};
use questlog_xp::xp::report::SeriesPoint;
use questlog_xp::xp::{level_from_total, LevelProgress, RawEvent, XpConfig, XpEngine, XpTotals};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
pub(crate) struct XpReportRequest {
    pub(crate) events: Vec<RawEvent>,
    #[serde(default)]
    pub(crate) config: Option<XpConfig>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) window: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct XpReportResponse {
    pub(crate) today: NaiveDate,
    pub(crate) totals: XpTotals,
    pub(crate) xp_to_next: u64,
    pub(crate) progress_pct: u8,
    pub(crate) current_streak: u32,
    pub(crate) daily: DailyView,
    pub(crate) series: Vec<SeriesPoint>,
    pub(crate) ledger: Vec<LedgerEntryView>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LevelRequest {
    pub(crate) total: u64,
    #[serde(default)]
    pub(crate) config: Option<XpConfig>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LevelResponse {
    #[serde(rename = "totalXp")]
    pub(crate) total_xp: u64,
    #[serde(flatten)]
    pub(crate) progress: LevelProgress,
    pub(crate) xp_to_next: u64,
    pub(crate) progress_pct: u8,
}

const DEFAULT_WINDOW: u32 = 7;

pub(crate) fn xp_router(state: XpState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/xp/report", post(xp_report_endpoint))
        .route("/api/v1/xp/level", post(level_endpoint))
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn xp_report_endpoint(
    Extension(state): Extension<XpState>,
    Json(payload): Json<XpReportRequest>,
) -> Result<Json<XpReportResponse>, AppError> {
    let response = run_blocking(move || score_report(payload, &state)).await?;
    Ok(Json(response))
}

pub(crate) async fn level_endpoint(
    Extension(state): Extension<XpState>,
    Json(payload): Json<LevelRequest>,
) -> Result<Json<LevelResponse>, AppError> {
    let response = run_blocking(move || resolve_level(payload, &state)).await?;
    Ok(Json(response))
}

async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| AppError::Worker(err.to_string()))?
}

fn score_report(payload: XpReportRequest, state: &XpState) -> Result<XpReportResponse, AppError> {
    let XpReportRequest {
        events,
        config,
        today,
        window,
    } = payload;

    let rules = config.unwrap_or_else(|| state.rules.as_ref().clone());
    let engine = XpEngine::new(rules)?;
    let report = engine.run(&events)?;

    let today = match today {
        Some(day) => day,
        None => today_in(engine.config())?,
    };
    let series = report.recent_series(today, window.unwrap_or(DEFAULT_WINDOW));
    let level = report.totals.level;

    Ok(XpReportResponse {
        today,
        totals: report.totals,
        xp_to_next: level.xp_to_next(),
        progress_pct: level.progress_pct(),
        current_streak: report.current_streak(),
        daily: report.daily_view(),
        series,
        ledger: report.ledger_view(),
    })
}

fn resolve_level(payload: LevelRequest, state: &XpState) -> Result<LevelResponse, AppError> {
    let rules = payload
        .config
        .unwrap_or_else(|| state.rules.as_ref().clone());
    rules.validate()?;

    let progress = level_from_total(payload.total, &rules)?;
    Ok(LevelResponse {
        total_xp: payload.total,
        progress,
        xp_to_next: progress.xp_to_next(),
        progress_pct: progress.progress_pct(),
    })
}
