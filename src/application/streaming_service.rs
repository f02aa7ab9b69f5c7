// Streaming dashboard service - Progressive loading over length-prefixed JSON chunks
use crate::application::dashboard_service::DashboardService;
use crate::domain::chart::ChartData;
use crate::domain::dashboard::TileData;
use crate::domain::metric::Metric;
use crate::domain::sample::Sample;
use chrono::NaiveDate;
use serde::Serialize;
use std::time::Instant;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSkeleton {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub precision: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSkeleton {
    pub id: Metric,
    pub title: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSkeleton {
    pub title: String,
    pub day: Option<NaiveDate>,
    pub tiles: Vec<TileSkeleton>,
    pub charts: Vec<ChartSkeleton>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileUpdate {
    pub id: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    pub total_widgets: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    Skeleton(DashboardSkeleton),
    TileUpdate(TileUpdate),
    ChartUpdate(ChartData),
    Complete(CompletionEvent),
}

#[derive(Debug, Clone)]
pub struct StreamingDashboardService {
    dashboard_service: DashboardService,
}

impl StreamingDashboardService {
    pub fn new(dashboard_service: DashboardService) -> Self {
        Self { dashboard_service }
    }

    /// Skeleton first, then one update per tile and one chart per metric,
    /// then a completion event. Stops early once the receiver is dropped.
    pub fn stream_dashboard(
        &self,
        samples: Vec<Sample>,
        day: Option<NaiveDate>,
    ) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let service = self.dashboard_service.clone();

        tokio::spawn(async move {
            let start_time = Instant::now();

            let (day, selected) = service.select_day(&samples, day);
            let latest = service.resampler().latest(&selected).map(|(_, s)| s);
            let tiles = service.build_tiles(latest);

            let skeleton = build_skeleton(service.title_for(day), day, &tiles);
            let total_widgets = skeleton.tiles.len() + skeleton.charts.len();

            if !send(&tx, StreamMessage::Skeleton(skeleton)).await {
                return;
            }

            for tile in tiles {
                let update = TileUpdate {
                    id: tile.id,
                    value: tile.value,
                };
                if !send(&tx, StreamMessage::TileUpdate(update)).await {
                    return;
                }
            }

            for metric in Metric::ALL {
                let chart = service.resampler().resample(&selected, metric);
                if !send(&tx, StreamMessage::ChartUpdate(chart)).await {
                    return;
                }
            }

            let complete = CompletionEvent {
                total_widgets,
                duration_ms: start_time.elapsed().as_millis() as u64,
            };
            send(&tx, StreamMessage::Complete(complete)).await;
        });

        rx
    }
}

fn build_skeleton(title: String, day: Option<NaiveDate>, tiles: &[TileData]) -> DashboardSkeleton {
    let tiles = tiles
        .iter()
        .map(|t| TileSkeleton {
            id: t.id.clone(),
            title: t.title.clone(),
            unit: t.unit.clone(),
            precision: t.precision,
        })
        .collect();

    let charts = Metric::ALL
        .iter()
        .map(|metric| ChartSkeleton {
            id: *metric,
            title: metric.title().to_string(),
            unit: metric.unit().to_string(),
        })
        .collect();

    DashboardSkeleton {
        title,
        day,
        tiles,
        charts,
    }
}

async fn send(tx: &mpsc::Sender<StreamMessage>, msg: StreamMessage) -> bool {
    match tx.send(msg).await {
        Ok(()) => true,
        Err(_) => {
            tracing::debug!("Dashboard stream receiver dropped, stopping");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resampler::TimeSeriesResampler;

    fn service() -> StreamingDashboardService {
        StreamingDashboardService::new(DashboardService::new(
            TimeSeriesResampler::default(),
            "Weather".to_string(),
        ))
    }

    async fn collect(mut rx: mpsc::Receiver<StreamMessage>) -> Vec<StreamMessage> {
        let mut messages = Vec::new();
        while let Some(msg) = rx.recv().await {
            messages.push(msg);
        }
        messages
    }

    #[tokio::test]
    async fn test_stream_message_order() {
        let samples = vec![
            Sample::new(1, Some("2024-05-01T10:00:00Z".into()), Some(20.0), Some(50.0), None),
            Sample::new(2, Some("2024-05-01T10:20:00Z".into()), Some(21.0), Some(48.0), None),
        ];

        let messages = collect(service().stream_dashboard(samples, None)).await;

        assert_eq!(messages.len(), 1 + 2 + 3 + 1);
        let StreamMessage::Skeleton(skeleton) = &messages[0] else {
            panic!("expected skeleton first, got {:?}", messages[0]);
        };
        assert_eq!(skeleton.tiles.len(), 2);
        assert_eq!(skeleton.charts.len(), 3);

        assert_eq!(
            messages[1],
            StreamMessage::TileUpdate(TileUpdate {
                id: "temperature".to_string(),
                value: 21.0
            })
        );

        let charted: Vec<Metric> = messages[3..6]
            .iter()
            .map(|m| match m {
                StreamMessage::ChartUpdate(chart) => chart.metric,
                other => panic!("expected chart update, got {other:?}"),
            })
            .collect();
        assert_eq!(charted, Metric::ALL.to_vec());

        match &messages[6] {
            StreamMessage::Complete(done) => assert_eq!(done.total_widgets, 5),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stream_empty_batch() {
        let messages = collect(service().stream_dashboard(Vec::new(), None)).await;

        // skeleton, three empty charts, completion
        assert_eq!(messages.len(), 5);
        match &messages[4] {
            StreamMessage::Complete(done) => assert_eq!(done.total_widgets, 3),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_stream_message_json_shape() {
        let msg = StreamMessage::TileUpdate(TileUpdate {
            id: "humidity".to_string(),
            value: 48.0,
        });

        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"type": "tile_update", "id": "humidity", "value": 48.0})
        );
    }
}
