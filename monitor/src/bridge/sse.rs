use crate::session::config::MonitorConfig;
use crate::session::tracker::SessionTracker;
use chrono::Utc;
use futures::stream;
use serde_json::json;
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
    time::Duration,
};
use tococore::feed::{Reading, ReadingBus};
use tococore::telemetry::MetricsRecorder;
use tokio::runtime::Builder;
use tokio::sync::broadcast::error::RecvError;
use warp::{http::StatusCode, Filter};

fn bind_address(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

/// Builds the full route set. Separate from the serving thread so tests can
/// drive it with `warp::test`.
///
/// - `POST /ingest`: raw reading payload from the external sensor bridge;
///   malformed JSON is counted and dropped, never an error to the publisher.
/// - `GET /stream`: SSE feed of readings; every client holds its own bus
///   subscription, released when the connection closes. A comment heartbeat
///   keeps idle connections alive.
/// - `GET /intervals`, `/stats`, `/labor`, `/metrics`: current session state.
pub fn routes(
    bus: ReadingBus,
    tracker: Arc<RwLock<SessionTracker>>,
    metrics: Arc<MetricsRecorder>,
    heartbeat: Duration,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let ingest_bus = bus.clone();
    let ingest_bus_filter = warp::any().map(move || ingest_bus.clone());
    let ingest_metrics = metrics.clone();
    let ingest_metrics_filter = warp::any().map(move || ingest_metrics.clone());

    let ingest_route = warp::path("ingest")
        .and(warp::post())
        .and(warp::body::bytes())
        .and(ingest_bus_filter)
        .and(ingest_metrics_filter)
        .map(
            |body: warp::hyper::body::Bytes, bus: ReadingBus, metrics: Arc<MetricsRecorder>| {
                match Reading::parse(&body) {
                    Some(reading) => {
                        metrics.record_ingested();
                        bus.publish(reading);
                        warp::reply::with_status(
                            warp::reply::json(&json!({"status": "ok"})),
                            StatusCode::ACCEPTED,
                        )
                    }
                    None => {
                        metrics.record_dropped();
                        warp::reply::with_status(
                            warp::reply::json(&json!({"status": "dropped"})),
                            StatusCode::ACCEPTED,
                        )
                    }
                }
            },
        );

    let stream_bus_filter = warp::any().map(move || bus.clone());
    let stream_route = warp::path("stream")
        .and(warp::get())
        .and(stream_bus_filter)
        .map(move |bus: ReadingBus| {
            let events = stream::unfold(bus.subscribe(), |mut rx| async move {
                loop {
                    match rx.recv().await {
                        Ok(reading) => {
                            let event = warp::sse::Event::default()
                                .json_data(&reading)
                                .unwrap_or_else(|_| {
                                    warp::sse::Event::default().comment("encode failure")
                                });
                            return Some((Ok::<_, Infallible>(event), rx));
                        }
                        // A lagged subscriber skips ahead rather than ending
                        // the stream.
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => return None,
                    }
                }
            });
            warp::sse::reply(warp::sse::keep_alive().interval(heartbeat).stream(events))
        });

    let intervals_tracker = tracker.clone();
    let intervals_route = warp::path("intervals")
        .and(warp::get())
        .and(warp::any().map(move || intervals_tracker.clone()))
        .map(|tracker: Arc<RwLock<SessionTracker>>| {
            warp::reply::json(&tracker.read().unwrap().intervals().to_vec())
        });

    let stats_tracker = tracker.clone();
    let stats_route = warp::path("stats")
        .and(warp::get())
        .and(warp::any().map(move || stats_tracker.clone()))
        .map(|tracker: Arc<RwLock<SessionTracker>>| {
            let now_ms = Utc::now().timestamp_millis();
            warp::reply::json(&tracker.read().unwrap().snapshot(now_ms))
        });

    let labor_route = warp::path("labor")
        .and(warp::get())
        .and(warp::any().map(move || tracker.clone()))
        .map(|tracker: Arc<RwLock<SessionTracker>>| {
            let now_ms = Utc::now().timestamp_millis();
            warp::reply::json(&tracker.read().unwrap().evaluate(now_ms))
        });

    let metrics_route = warp::path("metrics")
        .and(warp::get())
        .and(warp::any().map(move || metrics.clone()))
        .map(|metrics: Arc<MetricsRecorder>| warp::reply::json(&metrics.snapshot()));

    ingest_route
        .or(stream_route)
        .or(intervals_route)
        .or(stats_route)
        .or(labor_route)
        .or(metrics_route)
}

/// Bridge hosting the ingest endpoint and the SSE reading stream on a
/// dedicated server thread.
pub struct SseBridge {
    addr: SocketAddr,
}

impl SseBridge {
    pub fn new(
        bus: ReadingBus,
        tracker: Arc<RwLock<SessionTracker>>,
        metrics: Arc<MetricsRecorder>,
        config: &MonitorConfig,
    ) -> Self {
        let addr = bind_address(config.port);
        let routes = routes(
            bus,
            tracker,
            metrics,
            Duration::from_secs(config.heartbeat_secs.max(1)),
        );

        thread::spawn(move || {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(addr).await;
            });
        });

        Self { addr }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn publish_status(&self, message: &str) {
        println!("[bridge] {}", message);
    }
}
