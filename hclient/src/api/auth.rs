//! Credential acquisition and single-flight refresh
//!
//! The [`CredentialManager`] owns the one access token shared by every
//! outbound call. Reads of a valid token are lock-free; when the token is
//! absent or stale, concurrent callers join a single in-flight fetch against
//! the identity endpoint and all receive its result.

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use log::{debug, info, warn};
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::Config;
use crate::error::{HClientError, Result};

/// An access token and the instant it stops being usable
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(
        token: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token: token.into(),
            issued_at,
            expires_at,
        }
    }

    /// Build a credential that expires `lifetime` from now
    pub fn expiring_in(token: impl Into<String>, lifetime: std::time::Duration) -> Self {
        let now = Utc::now();
        let lifetime = ChronoDuration::from_std(lifetime).unwrap_or(ChronoDuration::MAX);
        Self::new(token, now, now.checked_add_signed(lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC))
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Check the credential is still usable at `now`, `skew` ahead of expiry
    ///
    /// The skew never exceeds half the credential's lifetime, so a short-lived
    /// token is still reused for the first half of its life.
    pub fn is_valid_at(&self, now: DateTime<Utc>, skew: ChronoDuration) -> bool {
        let lifetime = self.expires_at.signed_duration_since(self.issued_at);
        let skew = skew.min(lifetime / 2).max(ChronoDuration::zero());
        now.checked_add_signed(skew)
            .is_some_and(|deadline| deadline < self.expires_at)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Lifecycle state of the cached credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    /// Nothing fetched yet, or invalidated
    Empty,
    /// Cached and usable
    Valid,
    /// Cached but expired (or inside the refresh skew)
    Stale,
}

/// Source of fresh credentials
///
/// Implemented by [`IdentityClient`] for the platform's identity endpoint;
/// tests substitute their own.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch(&self) -> Result<Credential>;
}

/// Token response of the identity endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Client-credentials exchange against the platform identity endpoint
pub struct IdentityClient {
    http: reqwest::Client,
    url: String,
    client_id: String,
    client_secret: String,
    default_ttl: std::time::Duration,
}

impl IdentityClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            url: config.url(&config.auth_path),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            default_ttl: std::time::Duration::from_secs(config.token_ttl_secs),
        }
    }
}

#[async_trait]
impl TokenSource for IdentityClient {
    async fn fetch(&self) -> Result<Credential> {
        debug!("Requesting access token from {}", self.url);

        let response = self
            .http
            .post(&self.url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| HClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = crate::api::dispatcher::extract_error_message(&body, status);
            return Err(match status.as_u16() {
                400 | 401 | 403 => HClientError::Auth(message),
                code => HClientError::Upstream {
                    status: code,
                    message,
                },
            });
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| HClientError::Decode(format!("token response: {}", e)))?;

        if body.access_token.is_empty() {
            return Err(HClientError::Auth(
                "identity endpoint returned an empty access token".into(),
            ));
        }
        if let Some(kind) = body.token_type.as_deref() {
            if !kind.eq_ignore_ascii_case("bearer") {
                warn!("Identity endpoint returned token type '{}', sending as bearer", kind);
            }
        }

        let lifetime = body
            .expires_in
            .map(std::time::Duration::from_secs)
            .unwrap_or(self.default_ttl);
        Ok(Credential::expiring_in(body.access_token, lifetime))
    }
}

type RefreshFuture = Shared<BoxFuture<'static, Result<Arc<Credential>>>>;

struct InFlight {
    id: u64,
    future: RefreshFuture,
}

enum Acquisition {
    Ready(Arc<Credential>),
    Flight(u64, RefreshFuture),
}

/// What a caller needs from the cache
#[derive(Clone, Copy)]
enum Demand<'a> {
    /// Any valid credential
    Usable,
    /// A newly fetched credential
    Fresh,
    /// Any valid credential other than one the platform rejected
    Replacing(&'a Arc<Credential>),
}

/// Owner of the shared access credential
pub struct CredentialManager {
    source: Arc<dyn TokenSource>,
    current: Arc<ArcSwapOption<Credential>>,
    in_flight: Mutex<Option<InFlight>>,
    skew: ChronoDuration,
    fetches: Arc<AtomicU64>,
}

impl CredentialManager {
    /// Create a manager; `skew` marks a credential stale that long before expiry
    pub fn new(source: Arc<dyn TokenSource>, skew: std::time::Duration) -> Self {
        Self {
            source,
            current: Arc::new(ArcSwapOption::empty()),
            in_flight: Mutex::new(None),
            skew: ChronoDuration::from_std(skew).unwrap_or(ChronoDuration::zero()),
            fetches: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Manager backed by the platform identity endpoint
    pub fn from_config(http: reqwest::Client, config: &Config) -> Self {
        Self::new(
            Arc::new(IdentityClient::new(http, config)),
            std::time::Duration::from_secs(config.refresh_skew_secs),
        )
    }

    /// Get a usable credential
    ///
    /// Returns the cached credential without I/O when it is valid and
    /// `force_refresh` is false. Otherwise joins the in-flight refresh, or
    /// starts one, and returns its result.
    pub async fn acquire(&self, force_refresh: bool) -> Result<Arc<Credential>> {
        if force_refresh {
            return self.obtain(Demand::Fresh).await;
        }
        if let Some(credential) = self.valid_credential() {
            return Ok(credential);
        }
        self.obtain(Demand::Usable).await
    }

    /// Get a credential to replace one the platform rejected
    ///
    /// When `rejected` has already been replaced by another caller's refresh,
    /// the replacement is returned without I/O. Only a caller still holding
    /// the current credential fetches, and concurrent callers share that fetch.
    pub async fn acquire_replacing(&self, rejected: &Arc<Credential>) -> Result<Arc<Credential>> {
        if let Some(credential) = self.replacement_for(rejected) {
            return Ok(credential);
        }
        self.obtain(Demand::Replacing(rejected)).await
    }

    /// Cached credential, valid or not
    pub fn current(&self) -> Option<Arc<Credential>> {
        self.current.load_full()
    }

    pub fn state(&self) -> CredentialState {
        match self.current.load().as_ref() {
            None => CredentialState::Empty,
            Some(credential) if credential.is_valid_at(Utc::now(), self.skew) => {
                CredentialState::Valid
            }
            Some(_) => CredentialState::Stale,
        }
    }

    /// Drop the cached credential; the next `acquire` fetches a new one
    pub fn invalidate(&self) {
        if self.current.swap(None).is_some() {
            info!("Credential invalidated");
        }
    }

    /// Number of identity fetches started since creation
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    fn valid_credential(&self) -> Option<Arc<Credential>> {
        self.current
            .load_full()
            .filter(|credential| credential.is_valid_at(Utc::now(), self.skew))
    }

    fn replacement_for(&self, rejected: &Arc<Credential>) -> Option<Arc<Credential>> {
        self.valid_credential()
            .filter(|credential| !Arc::ptr_eq(credential, rejected))
    }

    async fn obtain(&self, demand: Demand<'_>) -> Result<Arc<Credential>> {
        match self.join_or_start(demand) {
            Acquisition::Ready(credential) => Ok(credential),
            Acquisition::Flight(id, future) => {
                let result = future.await;
                self.finish(id);
                result
            }
        }
    }

    fn join_or_start(&self, demand: Demand<'_>) -> Acquisition {
        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(flight) = slot.as_ref() {
            if flight.future.peek().is_none() {
                debug!("Joining in-flight credential refresh #{}", flight.id);
                return Acquisition::Flight(flight.id, flight.future.clone());
            }
            // Settled, but every caller that awaited it was dropped before clearing it
            *slot = None;
        }

        // Another caller may have refreshed between our fast-path check and the lock
        let cached = match demand {
            Demand::Usable => self.valid_credential(),
            Demand::Replacing(rejected) => self.replacement_for(rejected),
            Demand::Fresh => None,
        };
        if let Some(credential) = cached {
            return Acquisition::Ready(credential);
        }

        let id = self.fetches.fetch_add(1, Ordering::Relaxed) + 1;
        let source = Arc::clone(&self.source);
        let current = Arc::clone(&self.current);
        let future = async move {
            match source.fetch().await {
                Ok(credential) => {
                    let credential = Arc::new(credential);
                    let replaced = current.swap(Some(Arc::clone(&credential)));
                    if replaced.is_some() {
                        info!(
                            "Credential refreshed (#{}), expires at {}",
                            id,
                            credential.expires_at()
                        );
                    } else {
                        info!(
                            "Credential created (#{}), expires at {}",
                            id,
                            credential.expires_at()
                        );
                    }
                    Ok(credential)
                }
                Err(e) => {
                    warn!("Credential refresh #{} failed: {}", id, e);
                    Err(e)
                }
            }
        }
        .boxed()
        .shared();

        debug!("Starting credential refresh #{}", id);
        *slot = Some(InFlight {
            id,
            future: future.clone(),
        });
        Acquisition::Flight(id, future)
    }

    fn finish(&self, id: u64) {
        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|flight| flight.id == id) {
            *slot = None;
        }
    }
}
