//! Database access layer for clubsite-api
//!
//! Rows store ids as UUID text, timestamps in the fixed-width format of
//! [`clubsite_common::time`] and string lists as JSON arrays.

use chrono::{DateTime, Utc};
use clubsite_common::time::parse_iso8601;
use clubsite_common::uuid_utils::parse_id;
use clubsite_common::{Error, Result};
use uuid::Uuid;

pub mod events;
pub mod site_configs;

fn decode_id(raw: &str) -> Result<Uuid> {
    parse_id(raw).ok_or_else(|| Error::Database(format!("stored id is not a UUID: {}", raw)))
}

fn decode_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>> {
    parse_iso8601(raw)
        .ok_or_else(|| Error::Database(format!("stored {} is not a timestamp: {}", column, raw)))
}

fn decode_list(raw: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(raw)?)
}

fn encode_list(items: &[String]) -> Result<String> {
    Ok(serde_json::to_string(items)?)
}
