//! Admin stores against the real Content API

mod helpers;

use chrono::{Duration, Utc};
use clubsite_admin::{AuthStore, ClientError, EventsStore, SiteConfigsStore, TokenFile};
use clubsite_common::models::{ConfigType, EventDraft, EventFilters};
use helpers::{credentials, TestServer, ADMIN_PASSWORD};
use tempfile::TempDir;
use uuid::Uuid;

fn draft(title: &str, days: i64, tags: &[&str]) -> EventDraft {
    EventDraft {
        title: Some(title.to_string()),
        date: Some((Utc::now() + Duration::days(days)).to_rfc3339()),
        lineup: Some(vec!["DJ Alpha".to_string()]),
        tags: Some(tags.iter().map(|t| t.to_string()).collect()),
        ..EventDraft::default()
    }
}

fn marquee_texts() -> Vec<String> {
    ["Fri", "Sat", "Open late", "Free before 11"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

#[tokio::test]
async fn test_login_with_bad_password_reports_server_message() {
    let server = TestServer::start().await;
    let mut client = server.client();
    let mut auth = AuthStore::in_memory();

    let result = auth.login(&mut client, &credentials("wrong-password")).await;

    assert!(matches!(result, Err(ClientError::Status { status: 401, .. })));
    assert_eq!(auth.error(), Some("Invalid credentials"));
    assert!(!auth.is_authenticated());
    assert_eq!(client.token(), None);
}

#[tokio::test]
async fn test_login_stores_token_and_verifies() {
    let server = TestServer::start().await;
    let dir = TempDir::new().unwrap();
    let file = TokenFile::new(dir.path().join("token"));

    let mut client = server.client();
    let mut auth = AuthStore::with_token_file(file.clone());
    let user = auth
        .login(&mut client, &credentials(ADMIN_PASSWORD))
        .await
        .unwrap();

    assert_eq!(user.username, "admin");
    assert!(auth.is_authenticated());
    assert!(auth.is_admin());
    assert_eq!(file.load().unwrap().as_deref(), auth.token());

    // A later run picks the session up from the file
    let mut next_client = server.client();
    let mut next = AuthStore::with_token_file(file.clone());
    assert!(next.verify_token(&mut next_client).await);
    assert!(next.is_admin());

    next.logout(&mut next_client).await;
    assert!(!next.is_authenticated());
    assert_eq!(file.load().unwrap(), None);
}

#[tokio::test]
async fn test_rejected_token_logs_out() {
    let server = TestServer::start().await;
    let dir = TempDir::new().unwrap();
    let file = TokenFile::new(dir.path().join("token"));
    file.save("not-a-jwt").unwrap();

    let mut client = server.client();
    let mut auth = AuthStore::with_token_file(file.clone());

    assert!(!auth.verify_token(&mut client).await);
    assert_eq!(auth.token(), None);
    assert_eq!(file.load().unwrap(), None);
}

#[tokio::test]
async fn test_event_crud_keeps_list_sorted() {
    let server = TestServer::start().await;
    let (_auth, client) = server.logged_in().await;
    let mut store = EventsStore::new();

    let late = store
        .create_event(&client, &draft("Late Night", 14, &["techno"]))
        .await
        .unwrap();
    let early = store
        .create_event(&client, &draft("Early Night", 3, &["house"]))
        .await
        .unwrap();

    let titles: Vec<&str> = store.events().iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Early Night", "Late Night"]);

    // Move the late one to the front
    store.fetch_event(&client, late.id).await.unwrap();
    let moved = EventDraft {
        date: Some((Utc::now() + Duration::days(1)).to_rfc3339()),
        ..EventDraft::default()
    };
    store.update_event(&client, late.id, &moved).await.unwrap();

    let titles: Vec<&str> = store.events().iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Late Night", "Early Night"]);
    assert_eq!(store.current_event().map(|e| e.date), Some(store.events()[0].date));

    store.delete_event(&client, late.id).await.unwrap();
    assert!(store.current_event().is_none());
    assert_eq!(store.events().len(), 1);

    store.fetch_events(&client, &EventFilters::default()).await.unwrap();
    assert_eq!(store.events().len(), 1);
    assert_eq!(store.events()[0].id, early.id);
    assert_eq!(store.events_by_tag("HOU").len(), 1);
}

#[tokio::test]
async fn test_event_errors_recorded() {
    let server = TestServer::start().await;
    let (_auth, client) = server.logged_in().await;
    let mut store = EventsStore::new();

    let missing = store.fetch_event(&client, Uuid::new_v4()).await;
    assert!(matches!(missing, Err(ClientError::Status { status: 404, .. })));
    assert_eq!(store.error(), Some("Event not found"));

    let invalid = store
        .create_event(&client, &draft("Yesterday", -1, &[]))
        .await;
    assert!(invalid.is_err());
    assert_eq!(store.error(), Some("Validation failed"));
    assert!(store.events().is_empty());

    store.clear_error();
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_writes_without_session_fail_fast() {
    let server = TestServer::start().await;
    let client = server.client();
    let mut store = EventsStore::new();

    let result = store.create_event(&client, &draft("Night", 3, &[])).await;

    assert!(matches!(result, Err(ClientError::NotAuthenticated)));
    assert_eq!(store.error(), Some("Not logged in"));
}

#[tokio::test]
async fn test_save_config_creates_then_updates() {
    let server = TestServer::start().await;
    let (_auth, client) = server.logged_in().await;
    let mut store = SiteConfigsStore::new();

    store.fetch_configs(&client).await.unwrap();
    assert!(!store.has_marquee_config());
    assert!(!store.has_soundcloud_config());

    let created = store
        .save_marquee_config(&client, marquee_texts())
        .await
        .unwrap();
    assert_eq!(created.config_type, ConfigType::Marquee);

    let mut texts = marquee_texts();
    texts[3] = "Closed Sunday".to_string();
    let updated = store.save_marquee_config(&client, texts).await.unwrap();
    assert_eq!(updated.id, created.id);

    store
        .save_soundcloud_config(&client, "https://soundcloud.com/klub/opening-set")
        .await
        .unwrap();

    let mut fresh = SiteConfigsStore::new();
    fresh.fetch_configs(&client).await.unwrap();
    assert_eq!(
        fresh.marquee_config().map(|m| m.texts[3].as_str()),
        Some("Closed Sunday")
    );
    assert_eq!(
        fresh.soundcloud_config().map(|s| s.url.as_str()),
        Some("https://soundcloud.com/klub/opening-set")
    );
}

#[tokio::test]
async fn test_missing_config_reports_not_found() {
    let server = TestServer::start().await;
    let client = server.client();
    let mut store = SiteConfigsStore::new();

    let result = store
        .fetch_config_by_type(&client, ConfigType::Soundcloud)
        .await;

    assert!(matches!(result, Err(ClientError::Status { status: 404, .. })));
    assert_eq!(store.error(), Some("Configuration not found"));
    assert!(!store.has_soundcloud_config());
}

#[tokio::test]
async fn test_invalid_soundcloud_url_rejected() {
    let server = TestServer::start().await;
    let (_auth, client) = server.logged_in().await;
    let mut store = SiteConfigsStore::new();

    let result = store
        .save_soundcloud_config(&client, "https://example.com/track")
        .await;

    assert!(matches!(result, Err(ClientError::Status { status: 400, .. })));
    assert_eq!(store.error(), Some("Validation failed"));
    assert!(!store.has_soundcloud_config());
}
