//! Site configuration queries (one row per config type)

use chrono::{DateTime, Utc};
use clubsite_common::time::format_timestamp;
use clubsite_common::validation::{NewSiteConfig, SiteConfigUpdate};
use clubsite_common::{ConfigType, Error, Result, SiteConfig};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{decode_id, decode_list, decode_timestamp, encode_list};

const CONFIG_COLUMNS: &str =
    "id, config_type, marquee_texts, soundcloud_url, is_active, created_at, updated_at";

fn config_from_row(row: &SqliteRow) -> Result<SiteConfig> {
    let config_type = row
        .get::<String, _>("config_type")
        .parse::<ConfigType>()
        .map_err(Error::Database)?;
    let marquee_texts = row
        .get::<Option<String>, _>("marquee_texts")
        .map(|raw| decode_list(&raw))
        .transpose()?;

    Ok(SiteConfig {
        id: decode_id(&row.get::<String, _>("id"))?,
        config_type,
        marquee_texts,
        soundcloud_url: row.get("soundcloud_url"),
        is_active: row.get::<i64, _>("is_active") != 0,
        created_at: decode_timestamp("created_at", &row.get::<String, _>("created_at"))?,
        updated_at: decode_timestamp("updated_at", &row.get::<String, _>("updated_at"))?,
    })
}

/// All active configurations
pub async fn list_active(db: &SqlitePool) -> Result<Vec<SiteConfig>> {
    let sql = format!(
        "SELECT {} FROM site_configs WHERE is_active = 1 ORDER BY config_type",
        CONFIG_COLUMNS
    );
    let rows = sqlx::query(&sql).fetch_all(db).await?;
    rows.iter().map(config_from_row).collect()
}

/// Active configuration of one type
pub async fn get_by_type(db: &SqlitePool, config_type: ConfigType) -> Result<Option<SiteConfig>> {
    let sql = format!(
        "SELECT {} FROM site_configs WHERE config_type = ? AND is_active = 1",
        CONFIG_COLUMNS
    );
    let row = sqlx::query(&sql)
        .bind(config_type.as_str())
        .fetch_optional(db)
        .await?;
    row.as_ref().map(config_from_row).transpose()
}

/// Insert a configuration
///
/// A second configuration of the same type fails with [`Error::Conflict`].
pub async fn insert(db: &SqlitePool, new: &NewSiteConfig, now: DateTime<Utc>) -> Result<SiteConfig> {
    let (marquee_texts, soundcloud_url) = match new {
        NewSiteConfig::Marquee(texts) => (Some(texts.clone()), None),
        NewSiteConfig::Soundcloud(url) => (None, Some(url.clone())),
    };
    let config = SiteConfig {
        id: Uuid::new_v4(),
        config_type: new.config_type(),
        marquee_texts,
        soundcloud_url,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO site_configs (id, config_type, marquee_texts, soundcloud_url, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, 1, ?, ?)
        "#,
    )
    .bind(config.id.to_string())
    .bind(config.config_type.as_str())
    .bind(config.marquee_texts.as_deref().map(encode_list).transpose()?)
    .bind(&config.soundcloud_url)
    .bind(format_timestamp(&config.created_at))
    .bind(format_timestamp(&config.updated_at))
    .execute(db)
    .await?;

    Ok(config)
}

/// Apply an update to the configuration of `config_type`
///
/// Returns `None` when no active configuration of that type exists. An empty
/// update still refreshes `updated_at`.
pub async fn update(
    db: &SqlitePool,
    config_type: ConfigType,
    update: &SiteConfigUpdate,
    now: DateTime<Utc>,
) -> Result<Option<SiteConfig>> {
    let Some(mut config) = get_by_type(db, config_type).await? else {
        return Ok(None);
    };

    if let Some(texts) = &update.marquee_texts {
        config.marquee_texts = Some(texts.clone());
    }
    if let Some(url) = &update.soundcloud_url {
        config.soundcloud_url = Some(url.clone());
    }
    config.updated_at = now;

    sqlx::query(
        "UPDATE site_configs SET marquee_texts = ?, soundcloud_url = ?, updated_at = ? WHERE id = ?",
    )
    .bind(config.marquee_texts.as_deref().map(encode_list).transpose()?)
    .bind(&config.soundcloud_url)
    .bind(format_timestamp(&config.updated_at))
    .bind(config.id.to_string())
    .execute(db)
    .await?;

    Ok(Some(config))
}
