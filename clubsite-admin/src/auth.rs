//! Admin session: login, token verification and logout
//!
//! The bearer token survives between CLI runs in a token file.

use std::path::{Path, PathBuf};

use clubsite_common::api::{AuthUser, LoginRequest, ADMIN_ROLE};
use tracing::{debug, warn};

use crate::client::{AdminClient, ClientError};

/// File holding the bearer token between runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/clubsite/admin-token`
    pub fn default_location() -> Self {
        let dir = dirs::config_dir()
            .map(|d| d.join("clubsite"))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir.join("admin-token"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<String>, ClientError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, token: &str) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct AuthStore {
    token_file: Option<TokenFile>,
    token: Option<String>,
    user: Option<AuthUser>,
    error: Option<String>,
}

impl AuthStore {
    /// Session kept only in memory
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Session backed by a token file; a stored token is picked up
    pub fn with_token_file(token_file: TokenFile) -> Self {
        let token = token_file.load().unwrap_or_else(|e| {
            warn!("Could not read token file {}: {}", token_file.path().display(), e);
            None
        });
        Self {
            token_file: Some(token_file),
            token,
            ..Self::default()
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == ADMIN_ROLE)
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Hand the stored token to a client
    pub fn attach(&self, client: &mut AdminClient) {
        client.set_token(self.token.clone());
    }

    pub async fn login(
        &mut self,
        client: &mut AdminClient,
        credentials: &LoginRequest,
    ) -> Result<AuthUser, ClientError> {
        self.error = None;

        let response = match client.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                self.error = Some(e.user_message("Login failed"));
                return Err(e);
            }
        };

        if let Some(file) = &self.token_file {
            if let Err(e) = file.save(&response.token) {
                warn!("Could not store token in {}: {}", file.path().display(), e);
            }
        }
        client.set_token(Some(response.token.clone()));
        self.token = Some(response.token);
        self.user = Some(response.user.clone());
        debug!(username = %response.user.username, "Logged in");
        Ok(response.user)
    }

    /// Check the stored token with the server; an invalid token logs out
    pub async fn verify_token(&mut self, client: &mut AdminClient) -> bool {
        if self.token.is_none() {
            return false;
        }
        self.attach(client);

        match client.verify().await {
            Ok(response) => {
                self.user = Some(response.user);
                true
            }
            Err(e) => {
                debug!("Token rejected: {}", e);
                self.logout(client).await;
                false
            }
        }
    }

    /// Tell the server, then drop local state whatever it answered
    pub async fn logout(&mut self, client: &mut AdminClient) {
        if self.token.is_some() {
            self.attach(client);
            if let Err(e) = client.logout().await {
                warn!("Logout error: {}", e);
            }
        }

        self.user = None;
        self.token = None;
        self.error = None;
        client.set_token(None);

        if let Some(file) = &self.token_file {
            if let Err(e) = file.clear() {
                warn!("Could not remove token file {}: {}", file.path().display(), e);
            }
        }
    }
}
