//! Tests for database initialization

use clubsite_common::api::auth::{initialize_jwt_secret, load_jwt_secret};
use clubsite_common::db::init::init_database;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("clubsite.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("clubsite.db");

    let pool1 = init_database(&db_path).await.unwrap();
    sqlx::query(
        "INSERT INTO events (id, title, date, created_at, updated_at) VALUES ('e1', 'Night', '2030-01-01T00:00:00.000Z', 'x', 'x')",
    )
    .execute(&pool1)
    .await
    .unwrap();
    pool1.close().await;

    // Second open keeps existing rows
    let pool2 = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(&pool2)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_site_config_type_is_unique() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("clubsite.db")).await.unwrap();

    let insert = "INSERT INTO site_configs (id, config_type, created_at, updated_at) VALUES (?, 'marquee', 'x', 'x')";
    sqlx::query(insert).bind("a").execute(&pool).await.unwrap();
    assert!(sqlx::query(insert).bind("b").execute(&pool).await.is_err());
}

#[tokio::test]
async fn test_jwt_secret_generated_once() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("clubsite.db")).await.unwrap();

    let first = load_jwt_secret(&pool).await.unwrap();
    let second = load_jwt_secret(&pool).await.unwrap();
    assert_eq!(first, second);

    let rotated = initialize_jwt_secret(&pool).await.unwrap();
    assert_ne!(first, rotated);
    assert_eq!(load_jwt_secret(&pool).await.unwrap(), rotated);
}
