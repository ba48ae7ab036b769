//! Service account authentication for Google APIs.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{DriveError, Result};
use crate::models::{ServiceAccountCredentials, TokenResponse};

/// Google OAuth2 token endpoint, used when the key payload names none.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Read-only Google Drive API scope.
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime accepted by Google (at most one hour).
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// Cached tokens are refreshed this long before they expire.
const EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// JWT claims for service account authentication.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    exp: u64,
    iat: u64,
    /// Delegated user, for domain-wide delegation.
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
}

/// Cached access token with expiration.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: SystemTime,
}

/// Read-only credential for a service account, optionally acting as another user.
///
/// The private key and the delegation target are not checked until the first
/// token exchange, so a bad key or an ineligible user surfaces on the first
/// API call.
#[derive(Clone)]
pub struct Authenticator {
    credentials: Arc<ServiceAccountCredentials>,
    subject: Option<String>,
    client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl Authenticator {
    /// Create an authenticator from a raw service account JSON payload.
    pub fn from_json(payload: &str, client: Client) -> Result<Self> {
        let credentials: ServiceAccountCredentials = serde_json::from_str(payload)?;
        Ok(Self::new(credentials, client))
    }

    /// Create a new authenticator from credentials.
    pub fn new(credentials: ServiceAccountCredentials, client: Client) -> Self {
        Self {
            credentials: Arc::new(credentials),
            subject: None,
            client,
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Act on behalf of `user` through domain-wide delegation.
    pub fn delegated(mut self, user: impl Into<String>) -> Self {
        self.subject = Some(user.into());
        self
    }

    /// Service account email the credential authenticates as.
    pub fn client_email(&self) -> &str {
        &self.credentials.client_email
    }

    /// The impersonated user, if any.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    fn token_uri(&self) -> &str {
        self.credentials
            .token_uri
            .as_deref()
            .unwrap_or(DEFAULT_TOKEN_URI)
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn get_access_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > SystemTime::now() + EXPIRY_BUFFER {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let new_token = self.refresh_token().await?;

        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(new_token.clone());
        }

        Ok(new_token.access_token)
    }

    fn claims(&self, now: u64) -> Claims {
        Claims {
            iss: self.credentials.client_email.clone(),
            scope: DRIVE_READONLY_SCOPE.to_string(),
            aud: self.token_uri().to_string(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
            sub: self.subject.clone(),
        }
    }

    /// Sign a JWT bearer assertion issued at `now` (seconds since the epoch).
    fn signed_assertion(&self, now: u64) -> Result<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.credentials.private_key_id.clone();
        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())?;
        Ok(encode(&header, &self.claims(now), &key)?)
    }

    /// Exchange a signed JWT assertion for an access token.
    async fn refresh_token(&self) -> Result<CachedToken> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| DriveError::TokenRefreshError(format!("system clock: {}", e)))?
            .as_secs();
        let jwt = self.signed_assertion(now)?;

        debug!(
            client_email = %self.credentials.client_email,
            delegated = self.subject.is_some(),
            "requesting access token"
        );

        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", jwt.as_str())];

        let response = self
            .client
            .post(self.token_uri())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::TokenRefreshError(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at: SystemTime::now() + Duration::from_secs(token_response.expires_in),
        })
    }
}
