//! Site configuration state for the admin tools

use clubsite_common::models::{
    ConfigType, MarqueeConfig, SiteConfig, SiteConfigDetail, SiteConfigDraft, SoundcloudConfig,
};

use crate::client::{AdminClient, ClientError};

#[derive(Debug, Default)]
pub struct SiteConfigsStore {
    marquee: Option<MarqueeConfig>,
    soundcloud: Option<SoundcloudConfig>,
    error: Option<String>,
}

impl SiteConfigsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marquee_config(&self) -> Option<&MarqueeConfig> {
        self.marquee.as_ref()
    }

    pub fn soundcloud_config(&self) -> Option<&SoundcloudConfig> {
        self.soundcloud.as_ref()
    }

    pub fn has_marquee_config(&self) -> bool {
        self.marquee.is_some()
    }

    pub fn has_soundcloud_config(&self) -> bool {
        self.soundcloud.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn record<T>(&mut self, result: Result<T, ClientError>, default: &str) -> Result<T, ClientError> {
        if let Err(e) = &result {
            self.error = Some(e.user_message(default));
        }
        result
    }

    fn remember(&mut self, config: &SiteConfig) {
        match config.config_type {
            ConfigType::Marquee => {
                self.marquee = Some(MarqueeConfig {
                    id: config.id,
                    texts: config.marquee_texts.clone().unwrap_or_default(),
                    updated_at: config.updated_at,
                });
            }
            ConfigType::Soundcloud => {
                self.soundcloud = Some(SoundcloudConfig {
                    id: config.id,
                    url: config.soundcloud_url.clone().unwrap_or_default(),
                    updated_at: config.updated_at,
                });
            }
        }
    }

    fn remember_detail(&mut self, detail: SiteConfigDetail) {
        match detail.config_type {
            ConfigType::Marquee => {
                self.marquee = Some(MarqueeConfig {
                    id: detail.id,
                    texts: detail.texts.unwrap_or_default(),
                    updated_at: detail.updated_at,
                });
            }
            ConfigType::Soundcloud => {
                self.soundcloud = Some(SoundcloudConfig {
                    id: detail.id,
                    url: detail.url.unwrap_or_default(),
                    updated_at: detail.updated_at,
                });
            }
        }
    }

    /// Replace both entries with what the server holds
    pub async fn fetch_configs(&mut self, client: &AdminClient) -> Result<(), ClientError> {
        self.error = None;
        let result = client.site_configs().await;
        let configs = self.record(result, "Failed to fetch configurations")?.data;
        self.marquee = configs.marquee;
        self.soundcloud = configs.soundcloud;
        Ok(())
    }

    pub async fn fetch_config_by_type(
        &mut self,
        client: &AdminClient,
        config_type: ConfigType,
    ) -> Result<(), ClientError> {
        self.error = None;
        let result = client.site_config(config_type).await;
        let default = format!("Failed to fetch {} configuration", config_type);
        let detail = self.record(result, &default)?.data;
        self.remember_detail(detail);
        Ok(())
    }

    pub async fn create_config(
        &mut self,
        client: &AdminClient,
        draft: &SiteConfigDraft,
    ) -> Result<SiteConfig, ClientError> {
        self.error = None;
        let result = client.create_site_config(draft).await;
        let config = self.record(result, "Failed to create configuration")?.data;
        self.remember(&config);
        Ok(config)
    }

    pub async fn update_config(
        &mut self,
        client: &AdminClient,
        config_type: ConfigType,
        draft: &SiteConfigDraft,
    ) -> Result<SiteConfig, ClientError> {
        self.error = None;
        let result = client.update_site_config(config_type, draft).await;
        let default = format!("Failed to update {} configuration", config_type);
        let config = self.record(result, &default)?.data;
        self.remember(&config);
        Ok(config)
    }

    /// Update the marquee if one is known, create it otherwise
    pub async fn save_marquee_config(
        &mut self,
        client: &AdminClient,
        texts: Vec<String>,
    ) -> Result<SiteConfig, ClientError> {
        if self.has_marquee_config() {
            let draft = SiteConfigDraft {
                marquee_texts: Some(texts),
                ..SiteConfigDraft::default()
            };
            self.update_config(client, ConfigType::Marquee, &draft).await
        } else {
            let draft = SiteConfigDraft {
                config_type: Some(ConfigType::Marquee.as_str().to_string()),
                marquee_texts: Some(texts),
                ..SiteConfigDraft::default()
            };
            self.create_config(client, &draft).await
        }
    }

    /// Update the SoundCloud link if one is known, create it otherwise
    pub async fn save_soundcloud_config(
        &mut self,
        client: &AdminClient,
        url: impl Into<String>,
    ) -> Result<SiteConfig, ClientError> {
        let url = url.into();
        if self.has_soundcloud_config() {
            let draft = SiteConfigDraft {
                soundcloud_url: Some(url),
                ..SiteConfigDraft::default()
            };
            self.update_config(client, ConfigType::Soundcloud, &draft).await
        } else {
            let draft = SiteConfigDraft {
                config_type: Some(ConfigType::Soundcloud.as_str().to_string()),
                soundcloud_url: Some(url),
                ..SiteConfigDraft::default()
            };
            self.create_config(client, &draft).await
        }
    }
}
