use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use std::future::Future;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    #[must_use]
    pub const fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(handlers::root))
            .route("/api/data", get(handlers::list_snapshots))
            .route("/api/stats/dashboard", get(handlers::dashboard))
            .route("/api/stats/account/:account_id", get(handlers::account_detail))
            .route("/api/stats/video/:key", get(handlers::video_history))
            .route(
                "/api/crawlers/trigger",
                get(handlers::trigger_ingestion).post(handlers::trigger_ingestion),
            )
            .route(
                "/api/config",
                get(handlers::get_directory).post(handlers::replace_directory),
            )
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        self.serve_with_shutdown(addr, std::future::pending()).await
    }

    /// Like [`serve`](Self::serve), returning once `shutdown` resolves and
    /// in-flight requests have drained.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve_with_shutdown<F>(self, addr: &str, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Web API listening on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, TimeZone, Utc};
    use playwatch_collector::{CycleReport, CycleRunner};
    use playwatch_data::{Account, AccountDirectory, BatchStore, Snapshot};
    use playwatch_growth::StatsQueries;
    use serde_json::Value;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::sync::Notify;
    use tower::ServiceExt;

    #[derive(Default)]
    struct SignalRunner {
        ran: Notify,
    }

    #[async_trait]
    impl CycleRunner for SignalRunner {
        async fn run_cycle(&self) -> CycleReport {
            self.ran.notify_one();
            CycleReport::new(Utc::now(), 0)
        }
    }

    struct Harness {
        _dir: TempDir,
        runner: Arc<SignalRunner>,
        router: Router,
    }

    fn harness() -> Harness {
        let dir = TempDir::new().unwrap();
        let store = BatchStore::new(dir.path().join("data"));
        let directory = AccountDirectory::new(dir.path().join("accounts.json"));

        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let t1 = t0 + Duration::hours(1);
        store
            .write_batch(
                t0,
                &[
                    Snapshot::new("v1", "a", "100", t0).with_title("First"),
                    Snapshot::new("v2", "b", "10", t0),
                ],
            )
            .unwrap();
        store
            .write_batch(t1, &[Snapshot::new("v1", "a", "180", t1).with_title("First")])
            .unwrap();
        directory.replace(&[Account::new("a", "Alpha")]).unwrap();

        let runner = Arc::new(SignalRunner::default());
        let state = AppState::new(
            Arc::new(StatsQueries::new(store, directory)),
            runner.clone(),
        );
        Harness {
            _dir: dir,
            runner,
            router: ApiServer::new(state).router(),
        }
    }

    async fn call(router: &Router, method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
        call(router, "GET", uri, Body::empty()).await
    }

    #[tokio::test]
    async fn test_root() {
        let h = harness();
        let (status, body) = get_json(&h.router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");
    }

    #[tokio::test]
    async fn test_list_snapshots_with_limit() {
        let h = harness();
        let (_, body) = get_json(&h.router, "/api/data").await;
        assert_eq!(body.as_array().unwrap().len(), 3);

        let (_, body) = get_json(&h.router, "/api/data?limit=1").await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dashboard() {
        let h = harness();
        let (status, body) = get_json(&h.router, "/api/stats/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["global"]["video_count"], 1);
        assert_eq!(body["global"]["hour_growth"], 80);
        assert_eq!(body["accounts"][0]["name"], "Alpha");
    }

    #[tokio::test]
    async fn test_account_detail() {
        let h = harness();
        let (_, body) = get_json(&h.router, "/api/stats/account/a").await;
        assert_eq!(body["info"]["name"], "Alpha");
        assert_eq!(body["videos"][0]["hour_growth"], 80);
        assert!(body["videos"][0]["yesterday_growth"].is_null());
    }

    #[tokio::test]
    async fn test_video_history_by_id_and_title() {
        let h = harness();
        let (_, by_id) = get_json(&h.router, "/api/stats/video/v1").await;
        let (_, by_title) = get_json(&h.router, "/api/stats/video/First").await;
        assert_eq!(by_id, by_title);
        assert_eq!(by_id[0]["play_count"], 100);
        assert_eq!(by_id[1]["play_count"], 180);

        // removed from the dashboard, still queryable
        let (_, removed) = get_json(&h.router, "/api/stats/video/v2").await;
        assert_eq!(removed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_trigger_returns_immediately_and_runs() {
        let h = harness();
        let (status, body) = call(&h.router, "POST", "/api/crawlers/trigger", Body::empty()).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(body["message"].as_str().unwrap().contains("background"));

        tokio::time::timeout(std::time::Duration::from_secs(5), h.runner.ran.notified())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_directory_roundtrip() {
        let h = harness();
        let (_, body) = get_json(&h.router, "/api/config").await;
        assert_eq!(body["accounts"][0]["id"], "a");

        let update = r#"[{"id": "a", "name": "Alpha"}, {"id": "b", "name": "Beta"}]"#;
        let (status, body) = call(&h.router, "POST", "/api/config", Body::from(update)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "updated");

        let (_, body) = get_json(&h.router, "/api/stats/dashboard").await;
        assert_eq!(body["accounts"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_directory_rejects_empty_id() {
        let h = harness();
        let (status, _) = call(&h.router, "POST", "/api/config", Body::from(r#"[{"id": ""}]"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
