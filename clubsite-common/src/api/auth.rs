//! Admin authentication: credential check and HS256 JSON Web Tokens
//!
//! # Token format
//!
//! `base64url(header).base64url(claims).base64url(HMAC-SHA256(secret, header.claims))`
//! with header `{"alg":"HS256","typ":"JWT"}`. Claims carry the admin's
//! username and role plus `iat`/`exp` in Unix seconds.
//!
//! # Pure Functions
//!
//! Everything here is framework-free. The server wraps these in Axum
//! extractors; secret persistence needs the `sqlx` feature.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;

#[cfg(feature = "sqlx")]
use sqlx::SqlitePool;

type HmacSha256 = Hmac<Sha256>;

const JWT_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Role carried by every token the server issues
pub const ADMIN_ROLE: &str = "admin";

/// Settings key holding the generated signing secret
pub const JWT_SECRET_SETTING: &str = "jwt_secret";

// ========================================
// Error Types
// ========================================

/// Authentication error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiAuthError {
    /// Token is not three dot-separated base64url parts
    Malformed(String),

    /// Signature does not match header and claims
    InvalidSignature,

    /// Token `exp` is in the past
    Expired { expired_at: i64, now: i64 },

    /// Signing secret unusable or missing
    Secret(String),

    /// Database error loading or storing the secret
    DatabaseError(String),
}

impl std::fmt::Display for ApiAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiAuthError::Malformed(reason) => write!(f, "Malformed token: {}", reason),
            ApiAuthError::InvalidSignature => write!(f, "Invalid token signature"),
            ApiAuthError::Expired { expired_at, now } => {
                write!(f, "Token expired at {} (now {})", expired_at, now)
            }
            ApiAuthError::Secret(err) => write!(f, "Signing secret error: {}", err),
            ApiAuthError::DatabaseError(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl std::error::Error for ApiAuthError {}

// ========================================
// Claims and Credentials
// ========================================

/// Token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Admin claims valid for `ttl` from `now`
    pub fn admin(username: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        let iat = now.timestamp();
        Self {
            username: username.into(),
            role: ADMIN_ROLE.to_string(),
            iat,
            exp: iat.saturating_add(ttl.as_secs() as i64),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// The single configured administrator
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    /// Compare submitted credentials against the configured admin
    ///
    /// An unconfigured (empty) admin never matches.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        !self.username.is_empty()
            && !self.password.is_empty()
            && self.username == username
            && self.password == password
    }
}

// ========================================
// Token Issue / Verify
// ========================================

fn sign(secret: &[u8], signing_input: &str) -> Result<HmacSha256, ApiAuthError> {
    if secret.is_empty() {
        return Err(ApiAuthError::Secret("empty secret".to_string()));
    }
    let mut mac =
        HmacSha256::new_from_slice(secret).map_err(|e| ApiAuthError::Secret(e.to_string()))?;
    mac.update(signing_input.as_bytes());
    Ok(mac)
}

/// Issue a signed token for `claims`
///
/// # Examples
///
/// ```
/// use clubsite_common::api::auth::{issue_token, verify_token, Claims};
/// use std::time::Duration;
///
/// let now = chrono::Utc::now();
/// let claims = Claims::admin("kurt", now, Duration::from_secs(3600));
/// let token = issue_token(&claims, b"secret").unwrap();
/// assert_eq!(verify_token(&token, b"secret", now).unwrap(), claims);
/// ```
pub fn issue_token(claims: &Claims, secret: &[u8]) -> Result<String, ApiAuthError> {
    let claims_json =
        serde_json::to_vec(claims).map_err(|e| ApiAuthError::Malformed(e.to_string()))?;
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(JWT_HEADER),
        URL_SAFE_NO_PAD.encode(claims_json)
    );
    let signature = sign(secret, &signing_input)?.finalize().into_bytes();
    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
}

/// Verify signature and expiry, returning the claims
pub fn verify_token(token: &str, secret: &[u8], now: DateTime<Utc>) -> Result<Claims, ApiAuthError> {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ApiAuthError::Malformed("expected three parts".to_string()));
    };

    let expected = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|e| ApiAuthError::Malformed(e.to_string()))?;
    sign(secret, &format!("{}.{}", header, payload))?
        .verify_slice(&expected)
        .map_err(|_| ApiAuthError::InvalidSignature)?;

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| ApiAuthError::Malformed(e.to_string()))?;
    let header: serde_json::Value =
        serde_json::from_slice(&header_bytes).map_err(|e| ApiAuthError::Malformed(e.to_string()))?;
    if header.get("alg").and_then(|v| v.as_str()) != Some("HS256") {
        return Err(ApiAuthError::Malformed("unsupported alg".to_string()));
    }

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| ApiAuthError::Malformed(e.to_string()))?;
    let claims: Claims =
        serde_json::from_slice(&payload_bytes).map_err(|e| ApiAuthError::Malformed(e.to_string()))?;

    let now = now.timestamp();
    if claims.exp <= now {
        return Err(ApiAuthError::Expired {
            expired_at: claims.exp,
            now,
        });
    }

    Ok(claims)
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}

/// Parse a token lifetime such as `3600`, `90s`, `15m`, `24h` or `7d`
pub fn parse_expires_in(value: &str) -> Option<Duration> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let number: u64 = number.parse().ok()?;
    let seconds = match unit.trim() {
        "" | "s" => number,
        "m" => number.checked_mul(60)?,
        "h" => number.checked_mul(3_600)?,
        "d" => number.checked_mul(86_400)?,
        _ => return None,
    };
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

// ========================================
// Secret Management
// ========================================

/// Generate a random 256-bit signing secret, hex encoded
pub fn generate_secret() -> String {
    use rand::RngCore;

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Load the signing secret from the settings table, creating one if absent
///
/// Used when no secret is configured so that issued tokens survive restarts.
#[cfg(feature = "sqlx")]
pub async fn load_jwt_secret(db: &SqlitePool) -> Result<String, ApiAuthError> {
    let result: Option<(Option<String>,)> =
        sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(JWT_SECRET_SETTING)
            .fetch_optional(db)
            .await
            .map_err(|e| ApiAuthError::DatabaseError(e.to_string()))?;

    match result {
        Some((Some(value),)) if !value.is_empty() => Ok(value),
        _ => initialize_jwt_secret(db).await,
    }
}

/// Generate and store a new signing secret
#[cfg(feature = "sqlx")]
pub async fn initialize_jwt_secret(db: &SqlitePool) -> Result<String, ApiAuthError> {
    let secret = generate_secret();

    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
        .bind(JWT_SECRET_SETTING)
        .bind(&secret)
        .execute(db)
        .await
        .map_err(|e| ApiAuthError::DatabaseError(e.to_string()))?;

    Ok(secret)
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_token_roundtrip() {
        let claims = Claims::admin("kurt", at(1_700_000_000), Duration::from_secs(3600));
        let token = issue_token(&claims, b"s3cret").unwrap();

        assert_eq!(token.split('.').count(), 3);
        let verified = verify_token(&token, b"s3cret", at(1_700_000_100)).unwrap();
        assert_eq!(verified, claims);
        assert!(verified.is_admin());
        assert_eq!(verified.exp - verified.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::admin("kurt", at(1_700_000_000), Duration::from_secs(60));
        let token = issue_token(&claims, b"one").unwrap();
        assert_eq!(
            verify_token(&token, b"two", at(1_700_000_001)),
            Err(ApiAuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_tampered_claims_rejected() {
        let claims = Claims::admin("kurt", at(1_700_000_000), Duration::from_secs(60));
        let token = issue_token(&claims, b"s3cret").unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let mut forged = claims.clone();
        forged.username = "mallory".to_string();
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        let forged_token = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(
            verify_token(&forged_token, b"s3cret", at(1_700_000_001)),
            Err(ApiAuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims::admin("kurt", at(1_700_000_000), Duration::from_secs(60));
        let token = issue_token(&claims, b"s3cret").unwrap();
        let err = verify_token(&token, b"s3cret", at(1_700_000_060)).unwrap_err();
        assert!(matches!(err, ApiAuthError::Expired { .. }));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            verify_token("abc", b"s3cret", at(0)),
            Err(ApiAuthError::Malformed(_))
        ));
        assert!(matches!(
            verify_token("a.b.c.d", b"s3cret", at(0)),
            Err(ApiAuthError::Malformed(_))
        ));
    }

    #[test]
    fn test_empty_secret_refused() {
        let claims = Claims::admin("kurt", at(0), Duration::from_secs(60));
        assert!(matches!(issue_token(&claims, b""), Err(ApiAuthError::Secret(_))));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer xyz"), Some("xyz"));
        assert_eq!(bearer_token("Basic dXNlcg=="), None);
        assert_eq!(bearer_token("Bearer"), None);
    }

    #[test]
    fn test_parse_expires_in() {
        assert_eq!(parse_expires_in("3600"), Some(Duration::from_secs(3600)));
        assert_eq!(parse_expires_in("15m"), Some(Duration::from_secs(900)));
        assert_eq!(parse_expires_in("24h"), Some(Duration::from_secs(86_400)));
        assert_eq!(parse_expires_in("7d"), Some(Duration::from_secs(604_800)));
        assert_eq!(parse_expires_in("0"), None);
        assert_eq!(parse_expires_in("soon"), None);
        assert_eq!(parse_expires_in("5w"), None);
    }

    #[test]
    fn test_admin_credentials() {
        let admin = AdminCredentials {
            username: "kurt".into(),
            password: "hunter22".into(),
        };
        assert!(admin.matches("kurt", "hunter22"));
        assert!(!admin.matches("kurt", "hunter23"));

        let unset = AdminCredentials {
            username: String::new(),
            password: String::new(),
        };
        assert!(!unset.matches("", ""));
    }

    #[test]
    fn test_generated_secret_is_hex() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(secret, generate_secret());
    }
}
