//! Content models shared by the API server and its clients
//!
//! Field names serialize in camelCase to match the JSON the public site and
//! the admin client already consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A scheduled club night
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub lineup: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Kind of site-wide configuration block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigType {
    Marquee,
    Soundcloud,
}

impl ConfigType {
    pub const ALL: [ConfigType; 2] = [ConfigType::Marquee, ConfigType::Soundcloud];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigType::Marquee => "marquee",
            ConfigType::Soundcloud => "soundcloud",
        }
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "marquee" => Ok(ConfigType::Marquee),
            "soundcloud" => Ok(ConfigType::Soundcloud),
            other => Err(format!("unknown config type: {}", other)),
        }
    }
}

/// Stored site configuration document (one per [`ConfigType`])
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub id: Uuid,
    pub config_type: ConfigType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marquee_texts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soundcloud_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Marquee entry of the public configuration map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarqueeConfig {
    pub id: Uuid,
    #[serde(default)]
    pub texts: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// SoundCloud entry of the public configuration map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundcloudConfig {
    pub id: Uuid,
    #[serde(default)]
    pub url: String,
    pub updated_at: DateTime<Utc>,
}

/// Active configurations keyed by type, as served by `GET /api/siteconfigs`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfigMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marquee: Option<MarqueeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soundcloud: Option<SoundcloudConfig>,
}

impl SiteConfigMap {
    /// Build the public map from stored documents; inactive documents are skipped
    pub fn from_configs<'a>(configs: impl IntoIterator<Item = &'a SiteConfig>) -> Self {
        let mut map = SiteConfigMap::default();
        for config in configs.into_iter().filter(|c| c.is_active) {
            match config.config_type {
                ConfigType::Marquee => {
                    map.marquee = Some(MarqueeConfig {
                        id: config.id,
                        texts: config.marquee_texts.clone().unwrap_or_default(),
                        updated_at: config.updated_at,
                    });
                }
                ConfigType::Soundcloud => {
                    map.soundcloud = Some(SoundcloudConfig {
                        id: config.id,
                        url: config.soundcloud_url.clone().unwrap_or_default(),
                        updated_at: config.updated_at,
                    });
                }
            }
        }
        map
    }
}

/// Single configuration as served by `GET /api/siteconfigs/:type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigDetail {
    pub id: Uuid,
    pub config_type: ConfigType,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&SiteConfig> for SiteConfigDetail {
    fn from(config: &SiteConfig) -> Self {
        let (texts, url) = match config.config_type {
            ConfigType::Marquee => (config.marquee_texts.clone(), None),
            ConfigType::Soundcloud => (None, config.soundcloud_url.clone()),
        };
        SiteConfigDetail {
            id: config.id,
            config_type: config.config_type,
            updated_at: config.updated_at,
            texts,
            url,
        }
    }
}

/// Create/update payload for an event
///
/// Every field is optional at the wire level; [`crate::validation`] decides
/// which are required for creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineup: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Create/update payload for a site configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marquee_texts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soundcloud_url: Option<String>,
}

/// Query string of `GET /api/events`, as received
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upcoming: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

impl EventFilters {
    /// Filters used by the public site's upcoming list
    pub fn upcoming(limit: u32) -> Self {
        EventFilters {
            upcoming: Some("true".to_string()),
            tag: None,
            limit: Some(limit.to_string()),
        }
    }

    /// Query pairs with empty values dropped
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("upcoming", &self.upcoming),
            ("tag", &self.tag),
            ("limit", &self.limit),
        ]
        .into_iter()
        .filter_map(|(key, value)| match value {
            Some(v) if !v.is_empty() => Some((key, v.clone())),
            _ => None,
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config(config_type: ConfigType, active: bool) -> SiteConfig {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        SiteConfig {
            id: Uuid::new_v4(),
            config_type,
            marquee_texts: (config_type == ConfigType::Marquee)
                .then(|| vec!["a".into(), "b".into(), "c".into(), "d".into()]),
            soundcloud_url: (config_type == ConfigType::Soundcloud)
                .then(|| "https://soundcloud.com/klub/set".to_string()),
            is_active: active,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_config_type_parse_and_display() {
        assert_eq!("marquee".parse::<ConfigType>(), Ok(ConfigType::Marquee));
        assert_eq!("soundcloud".parse::<ConfigType>(), Ok(ConfigType::Soundcloud));
        assert!("banner".parse::<ConfigType>().is_err());
        assert_eq!(ConfigType::Soundcloud.to_string(), "soundcloud");
    }

    #[test]
    fn test_site_config_serializes_camel_case() {
        let json = serde_json::to_value(config(ConfigType::Marquee, true)).unwrap();
        assert_eq!(json["configType"], "marquee");
        assert_eq!(json["marqueeTexts"].as_array().unwrap().len(), 4);
        assert!(json.get("soundcloudUrl").is_none());
        assert_eq!(json["isActive"], true);
    }

    #[test]
    fn test_config_map_skips_inactive() {
        let configs = vec![
            config(ConfigType::Marquee, true),
            config(ConfigType::Soundcloud, false),
        ];
        let map = SiteConfigMap::from_configs(&configs);
        assert_eq!(map.marquee.unwrap().texts.len(), 4);
        assert!(map.soundcloud.is_none());
    }

    #[test]
    fn test_detail_carries_only_its_payload() {
        let detail = SiteConfigDetail::from(&config(ConfigType::Soundcloud, true));
        let json = serde_json::to_value(detail).unwrap();
        assert_eq!(json["configType"], "soundcloud");
        assert_eq!(json["url"], "https://soundcloud.com/klub/set");
        assert!(json.get("texts").is_none());
    }

    #[test]
    fn test_filters_drop_empty_values() {
        let filters = EventFilters {
            upcoming: Some("true".into()),
            tag: Some(String::new()),
            limit: None,
        };
        assert_eq!(filters.to_query_pairs(), vec![("upcoming", "true".to_string())]);
        assert_eq!(EventFilters::upcoming(10).to_query_pairs().len(), 2);
    }
}
