use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use base64::{
    Engine,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};
use reqwest::{Client, header};
use serde_json::{Value, json};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    error::{ClaimsError, CredentialError},
    info,
    management::{Clock, CookieJar, SystemClock},
    suno, success,
    types::TokenClaims,
    utils, warning,
};

/// Tokens are renewed this many seconds before their `exp` claim.
pub const RENEWAL_MARGIN_SECS: i64 = 300;

/// Settings the credential manager is constructed from.
#[derive(Debug, Clone)]
pub struct CredentialConfig {
    /// Browser session cookie string (`name=value; name2=value2`).
    pub cookie: String,
    /// Clerk session identifier. Renewal fails without it.
    pub session_id: Option<String>,
    /// Device identifier; a random UUID is generated when absent.
    pub device_id: Option<String>,
    /// Base URL of the token issuance service.
    pub issuer_url: String,
    pub clerk_js_version: String,
    /// Upper bound for one renewal request, `None` waits indefinitely.
    pub renewal_timeout: Option<Duration>,
}

/// A bearer token together with the expiry read from its own claims.
///
/// Both fields are always replaced together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub value: String,
    /// Seconds since the Unix epoch, `None` when the claims were unreadable.
    pub expires_at: Option<i64>,
}

impl CachedToken {
    /// A token without a known expiry is considered fresh.
    pub fn is_fresh(&self, now_secs: i64) -> bool {
        match self.expires_at {
            Some(exp) => now_secs < exp - RENEWAL_MARGIN_SECS,
            None => true,
        }
    }
}

#[derive(Debug, Default)]
struct Credential {
    token: Option<CachedToken>,
    cookies: CookieJar,
    renewals: u64,
    last_outcome: Option<Result<String, CredentialError>>,
}

struct Renewal {
    token: CachedToken,
    cookies: CookieJar,
}

/// Everything a renewal request needs, detached from the manager so it can
/// run on its own task.
#[derive(Clone)]
struct Issuer {
    http: Client,
    url: String,
    clerk_js_version: String,
    session_id: Option<String>,
    timeout: Option<Duration>,
}

/// Owns the session token used by every outbound Suno call.
///
/// One instance is created at startup and shared by `Arc`. The whole
/// check-then-renew sequence of [`get_token`](Self::get_token) runs under a
/// single async mutex, so at most one renewal request is in flight and callers
/// that queue up behind a renewal observe its outcome.
pub struct CredentialManager {
    issuer: Issuer,
    device_id: String,
    clock: Arc<dyn Clock>,
    renewals: Arc<AtomicU64>,
    state: Arc<Mutex<Credential>>,
}

impl CredentialManager {
    pub fn new(config: CredentialConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CredentialConfig, clock: Arc<dyn Clock>) -> Self {
        let device_id = config
            .device_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        CredentialManager {
            issuer: Issuer {
                http: Client::new(),
                url: config.issuer_url.trim_end_matches('/').to_string(),
                clerk_js_version: config.clerk_js_version,
                session_id: config.session_id,
                timeout: config.renewal_timeout,
            },
            device_id,
            clock,
            renewals: Arc::new(AtomicU64::new(0)),
            state: Arc::new(Mutex::new(Credential {
                cookies: CookieJar::parse(&config.cookie),
                ..Credential::default()
            })),
        }
    }

    /// Returns a token that is valid for immediate use.
    ///
    /// The cached token is returned while it is more than
    /// [`RENEWAL_MARGIN_SECS`] away from its expiry, or indefinitely when its
    /// expiry is unknown. Otherwise a renewal runs while the lock is held.
    ///
    /// Callers that were already waiting on the lock when a renewal finished
    /// get that renewal's result, success or failure, without issuing another
    /// request. A failed renewal leaves the cached token and cookies untouched.
    ///
    /// The renewal runs on its own task and commits its result even when the
    /// calling future is dropped halfway.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::Configuration`] when no session identifier is set
    /// - [`CredentialError::Upstream`] on a non-success issuance response
    /// - [`CredentialError::MalformedResponse`] when the body has no `jwt`
    /// - [`CredentialError::Transport`] on network failures and timeouts
    pub async fn get_token(&self) -> Result<String, CredentialError> {
        let seen = self.renewals.load(Ordering::Acquire);
        let credential = Arc::clone(&self.state).lock_owned().await;

        let now = self.clock.now_secs();
        if let Some(token) = credential.token.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        // a renewal completed while this caller was queued
        if credential.renewals != seen {
            if let Some(outcome) = &credential.last_outcome {
                return outcome.clone();
            }
        }

        let task = tokio::spawn(renew_and_commit(
            self.issuer.clone(),
            credential,
            Arc::clone(&self.renewals),
        ));
        task.await
            .map_err(|e| CredentialError::Transport(format!("renewal task failed: {}", e)))?
    }

    /// Device identifier sent as the `device-id` header.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.issuer.session_id.as_deref()
    }

    /// Builds the `browser-token` header value.
    ///
    /// `{"token":"<b64>"}` where `<b64>` is the base64 of
    /// `{"timestamp":<epoch millis>}`. Computed fresh on every call.
    pub fn generate_request_signature(&self) -> String {
        let payload = json!({ "timestamp": self.clock.now_millis() }).to_string();
        format!("{{\"token\":\"{}\"}}", STANDARD.encode(payload))
    }

    /// Snapshot of the cached token and its expiry.
    pub async fn cached_token(&self) -> Option<CachedToken> {
        self.state.lock().await.token.clone()
    }

    /// Snapshot of the session cookies.
    pub async fn cookies(&self) -> CookieJar {
        self.state.lock().await.cookies.clone()
    }
}

/// Runs one renewal and commits its outcome before the lock is released.
async fn renew_and_commit(
    issuer: Issuer,
    mut credential: OwnedMutexGuard<Credential>,
    renewals: Arc<AtomicU64>,
) -> Result<String, CredentialError> {
    info!("Renewing Suno session token...");
    let outcome = issuer.renew(&credential.cookies).await;

    credential.renewals += 1;
    renewals.store(credential.renewals, Ordering::Release);

    let result = match outcome {
        Ok(renewal) => {
            match renewal.token.expires_at {
                Some(exp) => {
                    success!("Token renewed, expires at {}", utils::format_timestamp(exp))
                }
                None => success!("Token renewed, expiry unknown"),
            }

            let value = renewal.token.value.clone();
            credential.token = Some(renewal.token);
            credential.cookies = renewal.cookies;
            Ok(value)
        }
        Err(err) => {
            warning!("Token renewal failed: {}", err);
            Err(err)
        }
    };

    credential.last_outcome = Some(result.clone());
    result
}

impl Issuer {
    async fn renew(&self, cookies: &CookieJar) -> Result<Renewal, CredentialError> {
        let session_id = self.session_id.as_deref().ok_or_else(|| {
            CredentialError::Configuration(
                "SESSION_ID is required to renew the session token".to_string(),
            )
        })?;

        let url = format!(
            "{issuer}/v1/client/sessions/{session_id}/tokens?_clerk_js_version={version}",
            issuer = self.url,
            session_id = session_id,
            version = self.clerk_js_version,
        );

        let mut request = self
            .http
            .post(&url)
            .header(header::COOKIE, cookies.header_value())
            .header(header::ACCEPT, "*/*")
            .header(header::ACCEPT_LANGUAGE, suno::ACCEPT_LANGUAGE)
            .header(header::ORIGIN, suno::ORIGIN)
            .header(header::REFERER, suno::REFERER)
            .header(header::USER_AGENT, suno::USER_AGENT);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CredentialError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let mut merged = cookies.clone();
        merged.merge_set_cookies(
            response
                .headers()
                .get_all(header::SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok()),
        );

        let body: Value = response
            .json()
            .await
            .map_err(|e| CredentialError::MalformedResponse(e.to_string()))?;
        let jwt = body
            .get("jwt")
            .and_then(Value::as_str)
            .filter(|jwt| !jwt.is_empty())
            .ok_or_else(|| CredentialError::MalformedResponse("missing token".to_string()))?;

        let expires_at = match decode_claims(jwt) {
            Ok(claims) => claims.exp.map(|exp| exp as i64),
            Err(e) => {
                warning!("Cannot read token claims, expiry unknown: {}", e);
                None
            }
        };

        Ok(Renewal {
            token: CachedToken {
                value: jwt.to_string(),
                expires_at,
            },
            cookies: merged,
        })
    }
}

/// Reads the payload segment of a JWT without verifying its signature.
///
/// The issuer's signing key is not known here, so only the claims are read.
pub fn decode_claims(token: &str) -> Result<TokenClaims, ClaimsError> {
    let mut segments = token.split('.');
    let (Some(_), Some(payload), Some(_)) = (segments.next(), segments.next(), segments.next())
    else {
        return Err(ClaimsError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}
