//! Google sign-in via the OAuth 2.0 authorization code flow.
//!
//! # Design
//! `begin` hands out a random single-use `state` and the Google consent URL.
//! `complete` consumes that state, trades the code for an access token and
//! reads `sub` and `email` from the OpenID userinfo endpoint. Pending states
//! live in memory and lapse after `LOGIN_WINDOW`. At most
//! `MAX_PENDING_LOGINS` are held; the oldest is dropped to make room.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::Url;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::GoogleSettings;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "openid email profile";

/// How long a login may take between `begin` and `complete`.
pub const LOGIN_WINDOW: Duration = Duration::from_secs(600);

/// Upper bound on logins started but not yet completed.
pub const MAX_PENDING_LOGINS: usize = 4096;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("unknown or expired login state")]
    InvalidState,

    #[error("identity provider refused the login: {0}")]
    Denied(String),

    #[error("provider response is missing the user id or email")]
    MissingIdentity,

    #[error("invalid authorization url: {0}")]
    Url(String),

    #[error("identity provider request failed: {0}")]
    Provider(#[from] reqwest::Error),
}

/// A user identity confirmed by Google.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfo {
    sub: Option<String>,
    email: Option<String>,
}

/// States handed out by `begin`, keyed to when they were issued.
#[derive(Debug, Default)]
struct PendingLogins {
    started: HashMap<String, Instant>,
}

impl PendingLogins {
    fn remember(&mut self, state: String, now: Instant) {
        self.started
            .retain(|_, started| now.saturating_duration_since(*started) < LOGIN_WINDOW);
        while self.started.len() >= MAX_PENDING_LOGINS {
            let Some(oldest) = self
                .started
                .iter()
                .min_by_key(|(_, started)| **started)
                .map(|(state, _)| state.clone())
            else {
                break;
            };
            self.started.remove(&oldest);
        }
        self.started.insert(state, now);
    }

    /// Remove `state`, reporting whether it was still live at `now`.
    fn claim(&mut self, state: &str, now: Instant) -> bool {
        matches!(
            self.started.remove(state),
            Some(started) if now.saturating_duration_since(started) < LOGIN_WINDOW
        )
    }
}

pub struct GoogleOAuth {
    settings: GoogleSettings,
    http: reqwest::Client,
    pending: Mutex<PendingLogins>,
}

impl GoogleOAuth {
    pub fn new(settings: GoogleSettings) -> Self {
        Self {
            settings,
            http: reqwest::Client::new(),
            pending: Mutex::new(PendingLogins::default()),
        }
    }

    /// Start a login: remember a fresh state and return the consent URL.
    pub async fn begin(&self) -> Result<Url, OAuthError> {
        let state = Uuid::new_v4().simple().to_string();
        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.settings.client_id.as_str()),
                ("redirect_uri", self.settings.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| OAuthError::Url(e.to_string()))?;

        self.pending.lock().await.remember(state, Instant::now());
        Ok(url)
    }

    /// Consume `state`. Fails unless it was issued by `begin` and is still
    /// inside the login window.
    pub async fn take_state(&self, state: &str) -> Result<(), OAuthError> {
        if self.pending.lock().await.claim(state, Instant::now()) {
            Ok(())
        } else {
            Err(OAuthError::InvalidState)
        }
    }

    /// Finish a login started by `begin`.
    pub async fn complete(&self, state: &str, code: &str) -> Result<Identity, OAuthError> {
        self.take_state(state).await?;

        let token: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.expose_secret()),
                ("redirect_uri", self.settings.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let info: UserInfo = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match (info.sub, info.email) {
            (Some(user_id), Some(email)) if !user_id.is_empty() && !email.is_empty() => {
                Ok(Identity { user_id, email })
            }
            _ => Err(OAuthError::MissingIdentity),
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn google() -> GoogleOAuth {
        GoogleOAuth::new(GoogleSettings {
            client_id: "client-123".to_string(),
            client_secret: SecretString::from("shh".to_string()),
            redirect_url: "http://localhost:3000/api/auth/google-callback".to_string(),
        })
    }

    fn state_of(url: &Url) -> String {
        url.query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    #[tokio::test]
    async fn consent_url_carries_client_and_redirect() {
        let url = google().begin().await.unwrap();
        assert_eq!(url.host_str(), Some("accounts.google.com"));
        let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["client_id"], "client-123");
        assert_eq!(pairs["redirect_uri"], "http://localhost:3000/api/auth/google-callback");
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["scope"], SCOPES);
        assert!(!pairs["state"].is_empty());
        assert!(!url.as_str().contains("shh"));
    }

    #[tokio::test]
    async fn state_is_single_use() {
        let google = google();
        let state = state_of(&google.begin().await.unwrap());
        google.take_state(&state).await.unwrap();
        assert!(matches!(google.take_state(&state).await, Err(OAuthError::InvalidState)));
    }

    #[tokio::test]
    async fn unknown_state_is_rejected_before_any_request() {
        let result = google().complete("forged", "code").await;
        assert!(matches!(result, Err(OAuthError::InvalidState)));
    }

    #[tokio::test]
    async fn each_login_gets_a_distinct_state() {
        let google = google();
        let a = state_of(&google.begin().await.unwrap());
        let b = state_of(&google.begin().await.unwrap());
        assert_ne!(a, b);
        assert_eq!(google.pending.lock().await.started.len(), 2);
    }

    #[tokio::test]
    async fn expired_state_is_rejected() {
        let google = google();
        let issued = Instant::now();
        {
            let mut pending = google.pending.lock().await;
            pending.remember("late".to_string(), issued);
            pending.remember("early".to_string(), issued);
            assert!(!pending.claim("late", issued + LOGIN_WINDOW));
            assert!(pending.claim("early", issued + LOGIN_WINDOW - Duration::from_secs(1)));
        }
        assert!(matches!(google.take_state("late").await, Err(OAuthError::InvalidState)));
    }

    #[test]
    fn pending_logins_are_capped() {
        let base = Instant::now();
        let mut pending = PendingLogins::default();
        for i in 0..MAX_PENDING_LOGINS {
            pending.remember(format!("s{i}"), base + Duration::from_millis(i as u64));
        }
        assert_eq!(pending.started.len(), MAX_PENDING_LOGINS);

        let later = base + Duration::from_millis(MAX_PENDING_LOGINS as u64);
        pending.remember("fresh".to_string(), later);
        assert_eq!(pending.started.len(), MAX_PENDING_LOGINS);
        assert!(!pending.started.contains_key("s0"));
        assert!(pending.started.contains_key("s1"));
        assert!(pending.claim("fresh", later));
    }

    #[test]
    fn expired_states_are_pruned_on_begin() {
        let base = Instant::now();
        let mut pending = PendingLogins::default();
        pending.remember("old".to_string(), base);
        pending.remember("new".to_string(), base + LOGIN_WINDOW);
        assert_eq!(pending.started.len(), 1);
        assert!(pending.started.contains_key("new"));
    }
}
