//! Event queries

use chrono::{DateTime, Utc};
use clubsite_common::time::format_timestamp;
use clubsite_common::validation::{EventPatch, EventQuery, NewEvent};
use clubsite_common::{Event, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::{decode_id, decode_list, decode_timestamp, encode_list};

const EVENT_COLUMNS: &str =
    "id, title, date, lineup, tags, description, is_active, created_at, updated_at";

fn event_from_row(row: &SqliteRow) -> Result<Event> {
    Ok(Event {
        id: decode_id(&row.get::<String, _>("id"))?,
        title: row.get("title"),
        date: decode_timestamp("date", &row.get::<String, _>("date"))?,
        lineup: decode_list(&row.get::<String, _>("lineup"))?,
        tags: decode_list(&row.get::<String, _>("tags"))?,
        description: row.get("description"),
        is_active: row.get::<i64, _>("is_active") != 0,
        created_at: decode_timestamp("created_at", &row.get::<String, _>("created_at"))?,
        updated_at: decode_timestamp("updated_at", &row.get::<String, _>("updated_at"))?,
    })
}

/// Active events matching `query`, soonest first
///
/// `upcoming` keeps events dated at or after `now`; `tag` must equal one of
/// the stored (lowercased) tags.
pub async fn list_events(
    db: &SqlitePool,
    query: &EventQuery,
    now: DateTime<Utc>,
) -> Result<Vec<Event>> {
    let mut sql = format!("SELECT {} FROM events WHERE is_active = 1", EVENT_COLUMNS);
    if query.upcoming {
        sql.push_str(" AND date >= ?");
    }
    if query.tag.is_some() {
        sql.push_str(
            " AND EXISTS (SELECT 1 FROM json_each(events.tags) WHERE json_each.value = ?)",
        );
    }
    sql.push_str(" ORDER BY date ASC");
    if query.limit.is_some() {
        sql.push_str(" LIMIT ?");
    }

    let mut q = sqlx::query(&sql);
    if query.upcoming {
        q = q.bind(format_timestamp(&now));
    }
    if let Some(tag) = &query.tag {
        q = q.bind(tag);
    }
    if let Some(limit) = query.limit {
        q = q.bind(i64::from(limit));
    }

    let rows = q.fetch_all(db).await?;
    debug!(count = rows.len(), upcoming = query.upcoming, "Listed events");
    rows.iter().map(event_from_row).collect()
}

/// Event by id, active or not
pub async fn get_event(db: &SqlitePool, id: Uuid) -> Result<Option<Event>> {
    let sql = format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(db)
        .await?;
    row.as_ref().map(event_from_row).transpose()
}

/// Insert a validated event; new events are active
pub async fn insert_event(db: &SqlitePool, new: &NewEvent, now: DateTime<Utc>) -> Result<Event> {
    let event = Event {
        id: Uuid::new_v4(),
        title: new.title.clone(),
        date: new.date,
        lineup: new.lineup.clone(),
        tags: new.tags.clone(),
        description: new.description.clone(),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    write_event(db, &event).await?;
    Ok(event)
}

/// Apply a partial update; `None` when the id is unknown
///
/// Only the columns present in `patch` are written, so concurrent updates of
/// different fields do not overwrite each other.
pub async fn update_event(
    db: &SqlitePool,
    id: Uuid,
    patch: &EventPatch,
    now: DateTime<Utc>,
) -> Result<Option<Event>> {
    let lineup = patch.lineup.as_deref().map(encode_list).transpose()?;
    let tags = patch.tags.as_deref().map(encode_list).transpose()?;

    let mut columns = Vec::new();
    if patch.title.is_some() {
        columns.push("title = ?");
    }
    if patch.date.is_some() {
        columns.push("date = ?");
    }
    if lineup.is_some() {
        columns.push("lineup = ?");
    }
    if tags.is_some() {
        columns.push("tags = ?");
    }
    if patch.description.is_some() {
        columns.push("description = ?");
    }
    if patch.is_active.is_some() {
        columns.push("is_active = ?");
    }
    columns.push("updated_at = ?");
    let sql = format!("UPDATE events SET {} WHERE id = ?", columns.join(", "));

    let mut q = sqlx::query(&sql);
    if let Some(title) = &patch.title {
        q = q.bind(title);
    }
    if let Some(date) = &patch.date {
        q = q.bind(format_timestamp(date));
    }
    if let Some(lineup) = lineup {
        q = q.bind(lineup);
    }
    if let Some(tags) = tags {
        q = q.bind(tags);
    }
    if let Some(description) = &patch.description {
        q = q.bind(description);
    }
    if let Some(is_active) = patch.is_active {
        q = q.bind(is_active);
    }
    let result = q
        .bind(format_timestamp(&now))
        .bind(id.to_string())
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    debug!(%id, fields = columns.len() - 1, "Updated event");
    get_event(db, id).await
}

/// Delete by id; `false` when nothing was deleted
pub async fn delete_event(db: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id.to_string())
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn write_event(db: &SqlitePool, event: &Event) -> Result<()> {
    let sql = r#"
        INSERT INTO events (title, date, lineup, tags, description, is_active, created_at, updated_at, id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

    sqlx::query(sql)
        .bind(&event.title)
        .bind(format_timestamp(&event.date))
        .bind(encode_list(&event.lineup)?)
        .bind(encode_list(&event.tags)?)
        .bind(&event.description)
        .bind(event.is_active)
        .bind(format_timestamp(&event.created_at))
        .bind(format_timestamp(&event.updated_at))
        .bind(event.id.to_string())
        .execute(db)
        .await?;
    Ok(())
}
