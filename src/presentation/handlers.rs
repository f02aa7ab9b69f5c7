// HTTP request handlers
use crate::domain::metric::Metric;
use crate::domain::sample::Sample;
use crate::error::{AppError, AppResult};
use crate::infrastructure::chunked_stream::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ChartRequest {
    pub samples: Vec<Sample>,
    pub metric: Option<String>,
    pub day: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct StreamRequest {
    pub samples: Vec<Sample>,
    pub day: Option<NaiveDate>,
}

impl ChartRequest {
    fn metric_or(&self, default: Metric) -> AppResult<Metric> {
        match &self.metric {
            Some(raw) => Ok(raw.parse::<Metric>()?),
            None => Ok(default),
        }
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Resample a batch into chart data for one metric
pub async fn chart(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ChartRequest>, JsonRejection>,
) -> AppResult<Response> {
    let request = body(payload)?;
    let metric = request.metric_or(state.default_metric)?;

    let chart = state
        .dashboard_service
        .get_chart(&request.samples, metric, request.day);

    if chart.is_empty() {
        tracing::debug!(samples = request.samples.len(), %metric, "No chartable samples");
    }

    Ok(json_response(&chart, accepts_brotli(&headers)).await?)
}

/// Latest reading tiles plus the chart for the selected metric
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ChartRequest>, JsonRejection>,
) -> AppResult<Response> {
    let request = body(payload)?;
    let metric = request.metric_or(state.default_metric)?;

    let dashboard = state
        .dashboard_service
        .get_dashboard(&request.samples, metric, request.day);

    tracing::info!(
        samples = request.samples.len(),
        %metric,
        tiles = dashboard.tiles.len(),
        grid_len = dashboard.chart.keys.len(),
        "Built dashboard"
    );

    Ok(json_response(&dashboard, accepts_brotli(&headers)).await?)
}

/// Stream the dashboard progressively (skeleton, tiles, one chart per metric)
pub async fn stream_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<StreamRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let request = body(payload)?;
    let compress = accepts_brotli(&headers);

    let rx = state
        .streaming_service
        .stream_dashboard(request.samples, request.day);
    Ok(stream_from_receiver(rx, compress))
}
