//! Identity token issuing and verification
//!
//! Tokens are HS256-signed JWTs carrying the user's id, username and admin
//! flag. The signing secret is handed to [`TokenService::new`] once at startup;
//! there is no global key state and no revocation list, so a token stays valid
//! until its `exp` passes.
//!
//! ## Usage
//!
//! ```rust
//! use crypto_core::jwt::{JwtSettings, TokenService};
//!
//! let tokens = TokenService::new(&JwtSettings::new("change-me")).unwrap();
//! let token = tokens.issue(42, "alice", false).unwrap();
//! let claims = tokens.verify(&token).unwrap();
//! assert_eq!(claims.id, 42);
//! ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Default token lifetime: one hour
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// Claims carried by every identity token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User identifier
    pub id: i64,
    /// Username at the time the token was issued
    pub username: String,
    /// Administrator flag at the time the token was issued
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Access token is required")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Signing secret must not be empty")]
    EmptySecret,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Token service settings, loaded once at startup
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub ttl: Duration,
}

impl JwtSettings {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"[REDACTED]")
            .field("ttl_seconds", &self.ttl.num_seconds())
            .finish()
    }
}

// ============================================================================
// Token Service
// ============================================================================

/// Issues and verifies identity tokens with a single process-wide secret.
///
/// Keys are derived once in [`TokenService::new`] and immutable thereafter, so
/// the service can be shared freely between request workers.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(settings: &JwtSettings) -> Result<Self, TokenError> {
        if settings.secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        // Expiry is enforced in `verify_at`, with no leeway.
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            ttl: settings.ttl,
        })
    }

    /// Token lifetime applied by `issue`
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for the given identity, valid from now for `ttl`
    pub fn issue(&self, user_id: i64, username: &str, is_admin: bool) -> Result<String, TokenError> {
        self.issue_at(user_id, username, is_admin, Utc::now())
    }

    /// Issue a token as if signed at `issued_at`
    pub fn issue_at(
        &self,
        user_id: i64,
        username: &str,
        is_admin: bool,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("token expiry is out of range".to_string()))?;

        let claims = Claims {
            id: user_id,
            username: username.to_string(),
            is_admin,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return its claims
    ///
    /// ## Errors
    ///
    /// - `MissingToken` if the token is empty
    /// - `InvalidToken` if the signature does not verify or the payload is malformed
    /// - `ExpiredToken` if the current time is at or past `exp`
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token against an explicit current instant
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::MissingToken);
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {}", e);
                TokenError::InvalidToken
            })?;

        if now.timestamp() >= token_data.claims.exp {
            return Err(TokenError::ExpiredToken);
        }

        Ok(token_data.claims)
    }
}

// ============================================================================
// Header Parsing
// ============================================================================

/// Extract the token from an `Authorization: Bearer <token>` header value
///
/// An absent header or an empty token is `MissingToken`; any other scheme is
/// `InvalidToken`.
pub fn bearer_token(header: Option<&str>) -> Result<&str, TokenError> {
    let header = header
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or(TokenError::MissingToken)?;

    let (scheme, token) = match header.split_once(' ') {
        Some((scheme, token)) => (scheme, token.trim()),
        None => (header, ""),
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(TokenError::InvalidToken);
    }

    if token.is_empty() {
        return Err(TokenError::MissingToken);
    }

    Ok(token)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&JwtSettings::new("test-secret")).expect("valid settings")
    }

    #[test]
    fn test_issue_produces_three_part_token() {
        let token = service().issue(1, "alice", false).expect("should issue");
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_verify_returns_issued_claims() {
        let tokens = service();
        let token = tokens.issue(7, "alice", true).expect("should issue");

        let claims = tokens.verify(&token).expect("should verify");
        assert_eq!(claims.id, 7);
        assert_eq!(claims.username, "alice");
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_expiry_boundary() {
        let tokens = service();
        let issued_at = Utc::now();
        let token = tokens
            .issue_at(3, "bob", false, issued_at)
            .expect("should issue");

        let just_before = issued_at + Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS - 1);
        assert!(tokens.verify_at(&token, just_before).is_ok());

        let at_expiry = issued_at + Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS);
        assert_eq!(
            tokens.verify_at(&token, at_expiry),
            Err(TokenError::ExpiredToken)
        );
    }

    #[test]
    fn test_token_issued_two_hours_ago_is_expired() {
        let tokens = service();
        let token = tokens
            .issue_at(3, "bob", false, Utc::now() - Duration::hours(2))
            .expect("should issue");

        assert_eq!(tokens.verify(&token), Err(TokenError::ExpiredToken));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = service().issue(1, "alice", false).expect("should issue");
        let other = TokenService::new(&JwtSettings::new("another-secret")).unwrap();

        assert_eq!(other.verify(&token), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_malformed_token_is_invalid() {
        assert_eq!(
            service().verify("invalid.token.here"),
            Err(TokenError::InvalidToken)
        );
    }

    #[test]
    fn test_empty_token_is_missing() {
        assert_eq!(service().verify("  "), Err(TokenError::MissingToken));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            TokenService::new(&JwtSettings::new("")),
            Err(TokenError::EmptySecret)
        ));
    }

    #[test]
    fn test_custom_ttl() {
        let settings = JwtSettings::new("test-secret").with_ttl(Duration::minutes(5));
        let tokens = TokenService::new(&settings).unwrap();
        let claims = tokens
            .verify(&tokens.issue(1, "alice", false).unwrap())
            .unwrap();
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[test]
    fn test_unrepresentable_expiry_is_an_error() {
        let settings =
            JwtSettings::new("test-secret").with_ttl(Duration::seconds(10_000_000_000_000));
        let tokens = TokenService::new(&settings).unwrap();

        assert!(matches!(
            tokens.issue(1, "alice", false),
            Err(TokenError::Signing(_))
        ));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(bearer_token(Some("bearer   abc")), Ok("abc"));
        assert_eq!(bearer_token(None), Err(TokenError::MissingToken));
        assert_eq!(bearer_token(Some("")), Err(TokenError::MissingToken));
        assert_eq!(bearer_token(Some("Bearer")), Err(TokenError::MissingToken));
        assert_eq!(bearer_token(Some("Bearer   ")), Err(TokenError::MissingToken));
        assert_eq!(
            bearer_token(Some("Basic dXNlcjpwdw==")),
            Err(TokenError::InvalidToken)
        );
    }

    #[test]
    fn test_settings_debug_redacts_secret() {
        let rendered = format!("{:?}", JwtSettings::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
