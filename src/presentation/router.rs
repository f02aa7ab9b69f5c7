// Router assembly
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{chart, dashboard, health_check, stream_dashboard};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/charts", post(chart))
        .route("/dashboard", post(dashboard))
        .route("/dashboard/stream", post(stream_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::streaming_service::StreamingDashboardService;
    use crate::domain::metric::Metric;
    use crate::domain::resampler::TimeSeriesResampler;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let dashboard_service =
            DashboardService::new(TimeSeriesResampler::default(), "Weather".to_string());
        let state = Arc::new(AppState {
            streaming_service: StreamingDashboardService::new(dashboard_service.clone()),
            dashboard_service,
            default_metric: Metric::Temperature,
        });
        build_router(state)
    }

    fn samples() -> Value {
        json!([
            {"id": 1, "timestamp": "2024-05-01T09:05:00Z", "temp": 20.0, "humidity": 50.0, "pressure": 1012.0},
            {"id": 2, "timestamp": "2024-05-01T09:05:30Z", "temp": 22.0, "humidity": 51.0, "pressure": 1012.2},
            {"id": 3, "timestamp": "2024-05-01T09:50:00Z", "temp": 25.0, "humidity": 47.0, "pressure": 1011.5},
            {"id": 4, "timestamp": null, "temp": 99.0, "humidity": 1.0, "pressure": 1.0}
        ])
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chart_endpoint() {
        let response = app()
            .oneshot(post("/charts", json!({"samples": samples(), "metric": "humidity"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["metric"], "humidity");
        assert_eq!(body["keys"].as_array().unwrap().len(), 31);
        assert_eq!(body["labels"][0], "09:30");
        assert_eq!(body["labels"][1], "");
        assert_eq!(body["series"][0], Value::Null);
        assert_eq!(body["series"][20], 47.0);
        assert_eq!(body["yMin"], 35.0);
        assert_eq!(body["yMax"], 60.0);
        assert_eq!(body["step"], 5.0);
    }

    #[tokio::test]
    async fn test_chart_uses_default_metric() {
        let response = app()
            .oneshot(post("/charts", json!({"samples": samples()})))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["metric"], "temperature");
        assert_eq!(body["yMin"], 14.0);
        assert_eq!(body["yMax"], 36.0);
    }

    #[tokio::test]
    async fn test_unknown_metric_rejected() {
        let response = app()
            .oneshot(post("/charts", json!({"samples": [], "metric": "wind"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("wind"));
    }

    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let response = app()
            .oneshot(post("/dashboard", json!({"metric": "temperature"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_dashboard_endpoint() {
        let response = app()
            .oneshot(post("/dashboard", json!({"samples": samples(), "metric": "pressure"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["title"], "Weather (2024-05-01)");
        assert_eq!(body["day"], "2024-05-01");
        assert_eq!(body["tiles"].as_array().unwrap().len(), 3);
        assert_eq!(body["tiles"][0]["value"], 25.0);
        assert_eq!(body["chart"]["step"], 20.0);
    }

    #[tokio::test]
    async fn test_stream_endpoint_frames() {
        let response = app()
            .oneshot(post("/dashboard/stream", json!({"samples": samples()})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let mut types = Vec::new();
        let mut rest = &bytes[..];
        while rest.len() >= 4 {
            let length = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
            let frame: Value = serde_json::from_slice(&rest[4..4 + length]).unwrap();
            types.push(frame["type"].as_str().unwrap().to_string());
            rest = &rest[4 + length..];
        }

        assert!(rest.is_empty());
        assert_eq!(
            types,
            vec![
                "skeleton",
                "tile_update",
                "tile_update",
                "tile_update",
                "chart_update",
                "chart_update",
                "chart_update",
                "complete"
            ]
        );
    }
}
