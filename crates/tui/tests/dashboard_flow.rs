//! End-to-end: mock `/health` endpoint -> HealthClient -> poller -> view.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{Json, Router, routing::get};
use healthdeck_api::{HealthClient, HealthClientOptions};
use healthdeck_engine::{DashboardViewState, PollerSettings, PollingController};
use healthdeck_tui::view_model::{DISCONNECTED_LABEL, LIVE_LABEL};
use healthdeck_tui::DashboardView;
use healthdeck_types::{Indicator, OverlapPolicy};
use healthdeck_util::format_clock_time;
use serde_json::json;

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind mock server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

async fn first_state(base_url: &str) -> DashboardViewState {
    let options = HealthClientOptions {
        timeout: Duration::from_millis(500),
        ..HealthClientOptions::default()
    };
    let client = HealthClient::new(base_url, options).expect("client");
    let settings = PollerSettings {
        interval: Duration::from_secs(5),
        overlap_policy: OverlapPolicy::DiscardStale,
    };
    let handle = PollingController::new(client, settings).start();
    let mut updates = handle.subscribe();
    tokio::time::timeout(Duration::from_secs(5), updates.changed())
        .await
        .expect("first cycle within timeout")
        .expect("poller alive");
    let state = updates.borrow().clone();
    handle.stop().await;
    state
}

#[tokio::test]
async fn healthy_service_renders_live_figures() {
    let router = Router::new().route(
        "/health",
        get(|| async {
            Json(json!({
                "status": "ok",
                "database": "ok",
                "redis": "ok",
                "stats": { "total_user_online": 5, "total_user_queue": 2 },
                "system": { "heap_alloc": 2097152, "stack_in_use": 524288, "uptime_seconds": 7325, "goroutines": 12 },
                "timestamp": "2024-05-01T10:00:00Z"
            }))
        }),
    );
    let addr = serve(router).await;

    let state = first_state(&format!("http://{addr}")).await;
    let view = DashboardView::from_state(&state);

    assert_eq!(view.connection.label, LIVE_LABEL);
    assert_eq!(view.connection.indicator, Indicator::On);
    let reported = "2024-05-01T10:00:00Z".parse().expect("rfc3339");
    assert_eq!(view.connection.server_time, Some(format_clock_time(reported)));
    assert!(view.to_string().contains("Server time: "));
    let values: Vec<&str> = view.cards.iter().map(|card| card.value.as_str()).collect();
    assert_eq!(values, ["5", "2", "2 MB", "2h 2m"]);
    assert!(view.infrastructure.iter().all(|item| item.indicator.is_on()));
    assert!(view.banner.is_none());
}

#[tokio::test]
async fn unreachable_service_shows_defaults_and_banner() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let state = first_state(&format!("http://{addr}")).await;
    let view = DashboardView::from_state(&state);

    assert_eq!(view.connection.label, DISCONNECTED_LABEL);
    assert_eq!(view.connection.indicator, Indicator::Off);
    let values: Vec<&str> = view.cards.iter().map(|card| card.value.as_str()).collect();
    assert_eq!(values, ["0", "0", "0 Bytes", "0h 0m"]);
    assert!(view.infrastructure.iter().all(|item| !item.indicator.is_on()));
    assert_eq!(view.banner.as_deref(), Some("Cannot connect to service"));
}
