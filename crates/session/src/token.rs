use crate::{IdentityStore, KeyValueStore, Result};
use assist_protocol::{
    site_name_from_host, TokenClaims, VisitorTokenRequest, VisitorTokenResponse,
    SESSION_TOKEN_KEY,
};
use async_trait::async_trait;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{alphabet, Engine as _};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Standard alphabet, padding optional. URL-safe input is normalized first.
const CLAIMS_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Remote token endpoint (`POST /api/visitor-token`).
#[async_trait]
pub trait TokenClient: Send + Sync {
    async fn request_token(&self, request: &VisitorTokenRequest) -> Result<VisitorTokenResponse>;
}

/// Opaque session credential with the expiry decoded from its claim section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    raw: String,
    expires_at: Option<i64>,
}

impl SessionToken {
    /// Decodes the claim section. `None` when the token is not decodable.
    pub fn parse(raw: &str) -> Option<Self> {
        let claims = decode_claims(raw)?;
        Some(Self {
            raw: raw.to_string(),
            expires_at: claims.exp,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn into_string(self) -> String {
        self.raw
    }

    /// Expiry in epoch seconds; `None` when the claims carry no `exp`.
    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp < now)
    }
}

fn decode_claims(raw: &str) -> Option<TokenClaims> {
    let segment = raw.split('.').nth(1)?;
    let normalized: String = segment
        .trim()
        .chars()
        .map(|ch| match ch {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let bytes = CLAIMS_ENGINE.decode(normalized).ok()?;
    serde_json::from_slice(&bytes).ok()
}

pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

/// True when `raw` is undecodable or its `exp` lies before `now`.
pub fn is_expired_at(raw: &str, now: i64) -> bool {
    SessionToken::parse(raw).map_or(true, |token| token.is_expired_at(now))
}

pub fn is_expired(raw: &str) -> bool {
    is_expired_at(raw, unix_now())
}

/// Obtains, caches and refreshes the visitor's session token.
#[derive(Clone)]
pub struct SessionTokenManager {
    store: Arc<dyn KeyValueStore>,
    identity: IdentityStore,
    client: Arc<dyn TokenClient>,
    host: String,
    user_agent: String,
}

impl SessionTokenManager {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        client: Arc<dyn TokenClient>,
        host: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            identity: IdentityStore::new(store.clone()),
            store,
            client,
            host: host.into(),
            user_agent: user_agent.into(),
        }
    }

    pub fn site_name(&self) -> String {
        site_name_from_host(&self.host)
    }

    /// Returns a valid session token, requesting a new one when the stored
    /// token is absent, expired or undecodable. Failures are logged and
    /// reported as `None`; the widget keeps working without a token.
    pub async fn get_session_token(&self) -> Option<SessionToken> {
        let now = unix_now();
        match self.store.get(SESSION_TOKEN_KEY).await {
            Ok(Some(raw)) => {
                if let Some(token) = SessionToken::parse(&raw).filter(|t| !t.is_expired_at(now)) {
                    log::debug!("Using existing session token from storage");
                    return Some(token);
                }
                log::debug!("Stored session token expired or invalid, refreshing");
            }
            Ok(None) => {}
            Err(err) => log::warn!("Session token storage unavailable: {err}"),
        }

        let request = VisitorTokenRequest {
            visitor_id: self.identity.get_or_create_visitor_id().await.to_string(),
            user_agent: self.user_agent.clone(),
            site_name: self.site_name(),
        };
        log::debug!("Requesting session token for site {}", request.site_name);

        let response = match self.client.request_token(&request).await {
            Ok(response) => response,
            Err(err) => {
                log::error!("Error getting visitor session token: {err}");
                return None;
            }
        };

        if let Err(err) = self.store.set(SESSION_TOKEN_KEY, &response.token).await {
            log::warn!("Failed to persist session token: {err}");
        }
        log::info!("Obtained new session token for site {}", request.site_name);

        let expires_at = decode_claims(&response.token).and_then(|claims| claims.exp);
        Some(SessionToken {
            raw: response.token,
            expires_at,
        })
    }
}
