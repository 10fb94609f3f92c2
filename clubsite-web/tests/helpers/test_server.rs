//! Content API served on an ephemeral port for client tests

use std::net::SocketAddr;
use std::time::Duration;

use chrono::Utc;
use clubsite_api::{build_router, AppState, AuthSettings};
use clubsite_common::api::{issue_token, AdminCredentials, Claims};
use clubsite_common::db::init_database;
use tempfile::TempDir;
use tokio::task::JoinHandle;

pub const SECRET: &str = "web-test-secret";

pub struct TestServer {
    pub base_url: String,
    _dir: TempDir,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Start the real router over a temporary database
    pub async fn start() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let pool = init_database(&dir.path().join("clubsite.db"))
            .await
            .expect("database");
        let auth = AuthSettings::new(
            SECRET,
            Duration::from_secs(3600),
            AdminCredentials {
                username: "admin".to_string(),
                password: "secret123".to_string(),
            },
        );
        let app = build_router(AppState::new(pool, auth));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr: SocketAddr = listener.local_addr().expect("local addr");
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            base_url: format!("http://{}", addr),
            _dir: dir,
            task,
        }
    }

    pub fn admin_token(&self) -> String {
        let claims = Claims::admin("admin", Utc::now(), Duration::from_secs(3600));
        issue_token(&claims, SECRET.as_bytes()).expect("token")
    }

    /// POST/PUT a JSON body as admin, panicking on failure
    pub async fn admin_send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: serde_json::Value,
    ) -> serde_json::Value {
        let response = reqwest::Client::new()
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(self.admin_token())
            .json(&body)
            .send()
            .await
            .expect("request");
        assert!(
            response.status().is_success(),
            "{} failed with {}",
            path,
            response.status()
        );
        response.json().await.expect("json body")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
