//! Request validation rules
//!
//! Pure functions turning wire-level drafts into validated values. Every
//! failing field is reported, not just the first, so the admin UI can mark
//! all of them at once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ConfigType, EventDraft, EventFilters, SiteConfigDraft};
use crate::time::parse_iso8601;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const ARTIST_MAX_CHARS: usize = 50;
pub const TAG_MAX_CHARS: usize = 20;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const MARQUEE_TEXT_COUNT: usize = 4;
pub const MARQUEE_TEXT_MAX_CHARS: usize = 50;
pub const EVENTS_LIMIT_MAX: u32 = 100;
pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 20;
pub const PASSWORD_MIN_CHARS: usize = 6;

/// One failing request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validated event ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub date: DateTime<Utc>,
    pub lineup: Vec<String>,
    pub tags: Vec<String>,
    pub description: String,
}

/// Validated partial event update; `None` leaves the stored value alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub lineup: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        *self == EventPatch::default()
    }
}

/// Validated `GET /api/events` filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    pub upcoming: bool,
    pub tag: Option<String>,
    pub limit: Option<u32>,
}

/// Validated site configuration ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub enum NewSiteConfig {
    Marquee(Vec<String>),
    Soundcloud(String),
}

impl NewSiteConfig {
    pub fn config_type(&self) -> ConfigType {
        match self {
            NewSiteConfig::Marquee(_) => ConfigType::Marquee,
            NewSiteConfig::Soundcloud(_) => ConfigType::Soundcloud,
        }
    }
}

/// Validated site configuration update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteConfigUpdate {
    pub marquee_texts: Option<Vec<String>>,
    pub soundcloud_url: Option<String>,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn check_title(title: Option<&str>, errors: &mut Vec<FieldError>) -> Option<String> {
    let title = title.map(str::trim).unwrap_or_default();
    let len = char_len(title);
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
        errors.push(FieldError::new(
            "title",
            format!(
                "Title must be between {} and {} characters",
                TITLE_MIN_CHARS, TITLE_MAX_CHARS
            ),
        ));
        return None;
    }
    Some(title.to_string())
}

fn check_date(
    date: Option<&str>,
    now: DateTime<Utc>,
    errors: &mut Vec<FieldError>,
) -> Option<DateTime<Utc>> {
    let Some(parsed) = date.and_then(parse_iso8601) else {
        errors.push(FieldError::new("date", "Date must be a valid ISO 8601 date"));
        return None;
    };
    if parsed <= now {
        errors.push(FieldError::new("date", "Event date must be in the future"));
        return None;
    }
    Some(parsed)
}

fn check_list(
    field: &str,
    items: &[String],
    max_chars: usize,
    message: &str,
    lowercase: bool,
    errors: &mut Vec<FieldError>,
) -> Vec<String> {
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item = item.trim();
        let len = char_len(item);
        if len == 0 || len > max_chars {
            errors.push(FieldError::new(format!("{}[{}]", field, index), message));
            continue;
        }
        out.push(if lowercase {
            item.to_lowercase()
        } else {
            item.to_string()
        });
    }
    out
}

fn check_lineup(lineup: &[String], errors: &mut Vec<FieldError>) -> Vec<String> {
    check_list(
        "lineup",
        lineup,
        ARTIST_MAX_CHARS,
        "Each artist name must be between 1 and 50 characters",
        false,
        errors,
    )
}

fn check_tags(tags: &[String], errors: &mut Vec<FieldError>) -> Vec<String> {
    check_list(
        "tags",
        tags,
        TAG_MAX_CHARS,
        "Each tag must be between 1 and 20 characters",
        true,
        errors,
    )
}

fn check_description(description: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    let description = description.trim();
    if char_len(description) > DESCRIPTION_MAX_CHARS {
        errors.push(FieldError::new(
            "description",
            "Description cannot exceed 500 characters",
        ));
        return None;
    }
    Some(description.to_string())
}

/// Validate an event creation payload
pub fn validate_new_event(
    draft: &EventDraft,
    now: DateTime<Utc>,
) -> Result<NewEvent, Vec<FieldError>> {
    let mut errors = Vec::new();

    let title = check_title(draft.title.as_deref(), &mut errors);
    let date = check_date(draft.date.as_deref(), now, &mut errors);
    let lineup = check_lineup(draft.lineup.as_deref().unwrap_or_default(), &mut errors);
    let tags = check_tags(draft.tags.as_deref().unwrap_or_default(), &mut errors);
    let description = check_description(draft.description.as_deref().unwrap_or_default(), &mut errors);

    match (title, date, description) {
        (Some(title), Some(date), Some(description)) if errors.is_empty() => Ok(NewEvent {
            title,
            date,
            lineup,
            tags,
            description,
        }),
        _ => Err(errors),
    }
}

/// Validate a partial event update; absent fields are left untouched
pub fn validate_event_patch(
    draft: &EventDraft,
    now: DateTime<Utc>,
) -> Result<EventPatch, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut patch = EventPatch {
        is_active: draft.is_active,
        ..EventPatch::default()
    };

    if draft.title.is_some() {
        patch.title = check_title(draft.title.as_deref(), &mut errors);
    }
    if draft.date.is_some() {
        patch.date = check_date(draft.date.as_deref(), now, &mut errors);
    }
    if let Some(lineup) = &draft.lineup {
        patch.lineup = Some(check_lineup(lineup, &mut errors));
    }
    if let Some(tags) = &draft.tags {
        patch.tags = Some(check_tags(tags, &mut errors));
    }
    if let Some(description) = &draft.description {
        patch.description = check_description(description, &mut errors);
    }

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

/// Validate the events list query string
pub fn validate_event_filters(filters: &EventFilters) -> Result<EventQuery, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut query = EventQuery::default();

    if let Some(upcoming) = &filters.upcoming {
        match upcoming.as_str() {
            "true" | "1" => query.upcoming = true,
            "false" | "0" => query.upcoming = false,
            _ => errors.push(FieldError::new("upcoming", "upcoming must be a boolean")),
        }
    }

    if let Some(tag) = &filters.tag {
        let len = char_len(tag);
        if (1..=TAG_MAX_CHARS).contains(&len) {
            query.tag = Some(tag.to_lowercase());
        } else {
            errors.push(FieldError::new(
                "tag",
                "tag must be between 1 and 20 characters",
            ));
        }
    }

    if let Some(limit) = &filters.limit {
        match limit.trim().parse::<u32>() {
            Ok(n) if (1..=EVENTS_LIMIT_MAX).contains(&n) => query.limit = Some(n),
            _ => errors.push(FieldError::new("limit", "limit must be between 1 and 100")),
        }
    }

    if errors.is_empty() {
        Ok(query)
    } else {
        Err(errors)
    }
}

/// Validate login form fields, returning the trimmed username
pub fn validate_credentials(username: &str, password: &str) -> Result<String, Vec<FieldError>> {
    let mut errors = Vec::new();
    let username = username.trim();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&char_len(username)) {
        errors.push(FieldError::new(
            "username",
            "Username must be between 3 and 20 characters",
        ));
    }
    if char_len(password) < PASSWORD_MIN_CHARS {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters long",
        ));
    }
    if errors.is_empty() {
        Ok(username.to_string())
    } else {
        Err(errors)
    }
}

/// Check the marquee rule: exactly four non-blank texts of at most 50 chars
pub fn validate_marquee_texts(texts: Option<&[String]>) -> Result<Vec<String>, Vec<FieldError>> {
    let Some(texts) = texts.filter(|t| t.len() == MARQUEE_TEXT_COUNT) else {
        return Err(vec![FieldError::new(
            "marqueeTexts",
            "Marquee configuration requires exactly 4 text strings",
        )]);
    };

    let errors: Vec<FieldError> = texts
        .iter()
        .enumerate()
        .filter_map(|(index, text)| {
            if text.trim().is_empty() {
                Some(FieldError::new(
                    "marqueeTexts",
                    format!("Text {} cannot be empty", index + 1),
                ))
            } else if char_len(text) > MARQUEE_TEXT_MAX_CHARS {
                Some(FieldError::new(
                    "marqueeTexts",
                    format!("Text {} cannot exceed 50 characters", index + 1),
                ))
            } else {
                None
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(texts.to_vec())
    } else {
        Err(errors)
    }
}

/// Check the SoundCloud rule: a URL-shaped string on `soundcloud.com`
pub fn validate_soundcloud_url(url: Option<&str>) -> Result<String, Vec<FieldError>> {
    let url = url.map(str::trim).unwrap_or_default();
    if url.is_empty() || url.contains(char::is_whitespace) || !url.contains("soundcloud.com") {
        return Err(vec![FieldError::new(
            "soundcloudUrl",
            "Must be a valid SoundCloud URL",
        )]);
    }
    Ok(url.to_string())
}

/// Validate a site configuration creation payload
pub fn validate_new_site_config(draft: &SiteConfigDraft) -> Result<NewSiteConfig, Vec<FieldError>> {
    let config_type = draft
        .config_type
        .as_deref()
        .and_then(|t| t.parse::<ConfigType>().ok())
        .ok_or_else(|| {
            vec![FieldError::new(
                "configType",
                "Config type must be marquee or soundcloud",
            )]
        })?;

    match config_type {
        ConfigType::Marquee => {
            validate_marquee_texts(draft.marquee_texts.as_deref()).map(NewSiteConfig::Marquee)
        }
        ConfigType::Soundcloud => {
            validate_soundcloud_url(draft.soundcloud_url.as_deref()).map(NewSiteConfig::Soundcloud)
        }
    }
}

/// Validate a site configuration update for the given type
///
/// Only the payload matching `config_type` is considered; an absent payload
/// yields an empty update.
pub fn validate_site_config_update(
    config_type: ConfigType,
    draft: &SiteConfigDraft,
) -> Result<SiteConfigUpdate, Vec<FieldError>> {
    let mut update = SiteConfigUpdate::default();
    match config_type {
        ConfigType::Marquee => {
            if let Some(texts) = &draft.marquee_texts {
                update.marquee_texts = Some(validate_marquee_texts(Some(texts.as_slice()))?);
            }
        }
        ConfigType::Soundcloud => {
            if let Some(url) = &draft.soundcloud_url {
                update.soundcloud_url = Some(validate_soundcloud_url(Some(url))?);
            }
        }
    }
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn draft() -> EventDraft {
        EventDraft {
            title: Some("  Warehouse Night ".into()),
            date: Some("2025-02-14T22:00:00Z".into()),
            lineup: Some(vec![" DJ Koze ".into(), "Ellen Allien".into()]),
            tags: Some(vec!["Techno".into(), " HOUSE".into()]),
            description: None,
            is_active: None,
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_new_event_trims_and_lowercases() {
        let event = validate_new_event(&draft(), now()).unwrap();
        assert_eq!(event.title, "Warehouse Night");
        assert_eq!(event.lineup, vec!["DJ Koze", "Ellen Allien"]);
        assert_eq!(event.tags, vec!["techno", "house"]);
        assert_eq!(event.description, "");
    }

    #[test]
    fn test_new_event_reports_every_failing_field() {
        let bad = EventDraft {
            title: Some("ab".into()),
            date: Some("yesterday".into()),
            lineup: Some(vec!["".into()]),
            tags: Some(vec!["x".repeat(21)]),
            description: Some("d".repeat(501)),
            is_active: None,
        };
        let errors = validate_new_event(&bad, now()).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec!["title", "date", "lineup[0]", "tags[0]", "description"]
        );
    }

    #[test]
    fn test_new_event_rejects_past_date() {
        let mut past = draft();
        past.date = Some("2024-12-31T23:00:00Z".into());
        let errors = validate_new_event(&past, now()).unwrap_err();
        assert_eq!(errors[0].message, "Event date must be in the future");
    }

    #[test]
    fn test_new_event_requires_title_and_date() {
        let errors = validate_new_event(&EventDraft::default(), now()).unwrap_err();
        assert_eq!(fields(&errors), vec!["title", "date"]);
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let patch = validate_event_patch(
            &EventDraft {
                is_active: Some(false),
                tags: Some(vec!["Disco".into()]),
                ..EventDraft::default()
            },
            now(),
        )
        .unwrap();
        assert_eq!(patch.is_active, Some(false));
        assert_eq!(patch.tags, Some(vec!["disco".to_string()]));
        assert!(patch.title.is_none());
        assert!(patch.date.is_none());
        assert!(validate_event_patch(&EventDraft::default(), now()).unwrap().is_empty());
    }

    #[test]
    fn test_filters_validation() {
        let query = validate_event_filters(&EventFilters {
            upcoming: Some("true".into()),
            tag: Some("Techno".into()),
            limit: Some("10".into()),
        })
        .unwrap();
        assert!(query.upcoming);
        assert_eq!(query.tag.as_deref(), Some("techno"));
        assert_eq!(query.limit, Some(10));

        let errors = validate_event_filters(&EventFilters {
            upcoming: Some("maybe".into()),
            tag: None,
            limit: Some("101".into()),
        })
        .unwrap_err();
        assert_eq!(fields(&errors), vec!["upcoming", "limit"]);
    }

    #[test]
    fn test_credentials_validation() {
        assert_eq!(validate_credentials(" admin ", "secret1").unwrap(), "admin");
        let errors = validate_credentials("ad", "short").unwrap_err();
        assert_eq!(fields(&errors), vec!["username", "password"]);
    }

    #[test]
    fn test_marquee_requires_exactly_four() {
        let three = vec!["a".to_string(), "b".into(), "c".into()];
        assert!(validate_marquee_texts(Some(three.as_slice())).is_err());
        assert!(validate_marquee_texts(None).is_err());

        let four = vec!["a".to_string(), "  ".into(), "c".into(), "d".repeat(51)];
        let errors = validate_marquee_texts(Some(four.as_slice())).unwrap_err();
        assert_eq!(errors[0].message, "Text 2 cannot be empty");
        assert_eq!(errors[1].message, "Text 4 cannot exceed 50 characters");
    }

    #[test]
    fn test_soundcloud_url_rule() {
        assert!(validate_soundcloud_url(Some("https://soundcloud.com/klub/mix")).is_ok());
        assert!(validate_soundcloud_url(Some("https://mixcloud.com/klub/mix")).is_err());
        assert!(validate_soundcloud_url(Some("https://soundcloud.com/a b")).is_err());
        assert!(validate_soundcloud_url(None).is_err());
    }

    #[test]
    fn test_new_site_config_dispatches_on_type() {
        let marquee = validate_new_site_config(&SiteConfigDraft {
            config_type: Some("marquee".into()),
            marquee_texts: Some(vec!["1".into(), "2".into(), "3".into(), "4".into()]),
            soundcloud_url: None,
        })
        .unwrap();
        assert_eq!(marquee.config_type(), ConfigType::Marquee);

        let errors = validate_new_site_config(&SiteConfigDraft {
            config_type: Some("banner".into()),
            ..SiteConfigDraft::default()
        })
        .unwrap_err();
        assert_eq!(errors[0].field, "configType");
    }

    #[test]
    fn test_site_config_update_ignores_other_payload() {
        let update = validate_site_config_update(
            ConfigType::Marquee,
            &SiteConfigDraft {
                config_type: None,
                marquee_texts: None,
                soundcloud_url: Some("not even a url".into()),
            },
        )
        .unwrap();
        assert_eq!(update, SiteConfigUpdate::default());
    }
}
