//! Test helpers for clubsite-admin integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use clubsite_admin::{AdminClient, AuthStore};
use clubsite_api::{build_router, AppState, AuthSettings};
use clubsite_common::api::{AdminCredentials, LoginRequest};
use clubsite_common::db::init_database;
use tempfile::TempDir;
use tokio::task::JoinHandle;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "secret123";

/// Content API on an ephemeral port over a temporary database
pub struct TestServer {
    pub base_url: String,
    _dir: TempDir,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let pool = init_database(&dir.path().join("clubsite.db"))
            .await
            .expect("database");
        let auth = AuthSettings::new(
            "admin-test-secret",
            Duration::from_secs(3600),
            AdminCredentials {
                username: ADMIN_USER.to_string(),
                password: ADMIN_PASSWORD.to_string(),
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

    pub fn client(&self) -> AdminClient {
        AdminClient::new(&self.base_url).expect("client")
    }

    /// Client already carrying an admin session
    pub async fn logged_in(&self) -> (AuthStore, AdminClient) {
        let mut auth = AuthStore::in_memory();
        let mut client = self.client();
        auth.login(&mut client, &credentials(ADMIN_PASSWORD))
            .await
            .expect("login");
        (auth, client)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn credentials(password: &str) -> LoginRequest {
    LoginRequest {
        username: ADMIN_USER.to_string(),
        password: password.to_string(),
    }
}
