use axum::{extract::State, Json};
use utoipa::OpenApi;

use super::dto::{ChartPointDto, CurrentStatusDto, DashboardDto, RefreshDto};
use crate::models::{
    DataSource, NoteKind, Phase, ScheduleDay, ScheduleSlot, SlotStatus, StatusNote,
};
use crate::poller::PollService;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Full dashboard state: phase, status note, current conditions, the chart
/// series and the reservation schedule, in one response.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Current dashboard state", body = DashboardDto),
    ),
    tag = "dashboard"
)]
pub async fn get_dashboard(State(poller): State<PollService>) -> Json<DashboardDto> {
    let snapshot = poller.state().snapshot().await;
    Json(DashboardDto::from_snapshot(
        snapshot,
        poller.feed_url().to_owned(),
    ))
}

/// Run an acquisition cycle now instead of waiting for the next scheduled
/// poll. The request is skipped (not queued) when a cycle is already in
/// flight; `refreshed` reports which happened.
#[utoipa::path(
    post,
    path = "/refresh",
    responses(
        (status = 200, description = "Refresh outcome plus the resulting dashboard state", body = RefreshDto),
    ),
    tag = "dashboard"
)]
pub async fn refresh(State(poller): State<PollService>) -> Json<RefreshDto> {
    let refreshed = poller.refresh_once().await;
    let snapshot = poller.state().snapshot().await;
    Json(RefreshDto {
        refreshed,
        dashboard: DashboardDto::from_snapshot(snapshot, poller.feed_url().to_owned()),
    })
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(get_dashboard, refresh, health),
    components(schemas(
        DashboardDto,
        RefreshDto,
        CurrentStatusDto,
        ChartPointDto,
        Phase,
        DataSource,
        StatusNote,
        NoteKind,
        ScheduleDay,
        ScheduleSlot,
        SlotStatus,
    )),
    tags(
        (name = "dashboard", description = "Gym environment dashboard endpoints"),
        (name = "system",    description = "System endpoints"),
    ),
    info(
        title = "Gym Environment Dashboard API",
        version = "0.1.0",
        description = "Environment data acquisition with sample-data fallback"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum_test::TestServer;
    use chrono::Utc;
    use serde_json::Value;

    use crate::api::router;
    use crate::dashboard_state::{CycleOutcome, DashboardState};
    use crate::feed::FeedClient;
    use crate::models::StatusNote;
    use crate::poller::PollService;
    use crate::sample;

    /// A poller whose feed can never answer; refreshes through it degrade.
    fn unreachable_service() -> PollService {
        let client = FeedClient::new(
            "http://127.0.0.1:1/feed".to_owned(),
            Duration::from_millis(200),
        );
        PollService::new(client, DashboardState::new(Utc::now()))
    }

    fn test_server(service: PollService) -> TestServer {
        TestServer::new(router(service)).unwrap()
    }

    /// Seed the state with a full dataset, as if a cycle had succeeded.
    async fn seed_live(service: &PollService, note: Option<StatusNote>) {
        let now = Utc::now();
        let state = service.state();
        assert!(state.begin_cycle().await);
        let outcome = CycleOutcome::live(
            sample::readings(now, &mut rand::thread_rng()),
            Some(sample::current_status(now)),
            sample::schedule(now),
            note,
        );
        state.finish_cycle(outcome, now).await;
    }

    // -----------------------------------------------------------------------
    // GET /dashboard
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn dashboard_starts_in_loading() {
        let server = test_server(unreachable_service());
        let resp = server.get("/dashboard").await;
        resp.assert_status_ok();

        let body: Value = resp.json();
        assert_eq!(body["phase"], "loading");
        assert!(body["source"].is_null());
        assert_eq!(body["busy"], false);
        assert!(body["note"].is_null());
        assert!(body["current"].is_null());
        assert_eq!(body["reading_count"], 0);
        assert_eq!(body["chart"], serde_json::json!([]));
        assert!(body["last_updated"].is_null());
        assert_eq!(body["feed_url"], "http://127.0.0.1:1/feed");
    }

    #[tokio::test]
    async fn dashboard_reflects_a_finished_cycle() {
        let service = unreachable_service();
        seed_live(&service, None).await;

        let server = test_server(service);
        let resp = server.get("/dashboard").await;
        resp.assert_status_ok();

        let body: Value = resp.json();
        assert_eq!(body["phase"], "live");
        assert_eq!(body["source"], "live");
        assert_eq!(body["reading_count"], 72);
        assert_eq!(body["chart"].as_array().unwrap().len(), 24);
        assert_eq!(body["schedule"].as_array().unwrap().len(), 3);
        assert!(body["note"].is_null());
        assert!(!body["last_updated"].is_null());
        assert!(!body["current"]["temperature"].is_null());
    }

    #[tokio::test]
    async fn dashboard_shows_the_advisory_note() {
        let service = unreachable_service();
        seed_live(
            &service,
            Some(StatusNote::advisory(
                "Live data received via compatibility conversion.",
            )),
        )
        .await;

        let server = test_server(service);
        let body: Value = server.get("/dashboard").await.json();

        assert_eq!(body["phase"], "live");
        assert_eq!(body["note"]["kind"], "advisory");
        assert_eq!(
            body["note"]["text"],
            "Live data received via compatibility conversion."
        );
    }

    // -----------------------------------------------------------------------
    // POST /refresh
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn refresh_against_a_dead_feed_degrades() {
        let server = test_server(unreachable_service());
        let resp = server.post("/refresh").await;
        resp.assert_status_ok();

        let body: Value = resp.json();
        assert_eq!(body["refreshed"], true);

        let dashboard = &body["dashboard"];
        assert_eq!(dashboard["phase"], "degraded");
        assert_eq!(dashboard["source"], "sample");
        assert_eq!(dashboard["reading_count"], 72);
        assert_eq!(dashboard["chart"].as_array().unwrap().len(), 24);
        assert_eq!(dashboard["note"]["kind"], "error");
        assert!(dashboard["note"]["text"]
            .as_str()
            .unwrap()
            .contains("Sample data is shown instead"));
    }

    // -----------------------------------------------------------------------
    // GET / and GET /health
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn index_serves_the_dashboard_page() {
        let server = test_server(unreachable_service());
        let resp = server.get("/").await;
        resp.assert_status_ok();
        assert!(resp.text().contains("Gym Environment Dashboard"));
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let server = test_server(unreachable_service());
        let resp = server.get("/health").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["status"], "ok");
    }

    // -----------------------------------------------------------------------
    // GET /api-docs/openapi.json
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn openapi_spec_is_served() {
        let server = test_server(unreachable_service());
        let resp = server.get("/api-docs/openapi.json").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["info"]["title"], "Gym Environment Dashboard API");
    }
}
