//! Runtime configuration read from environment variables.
//!
//! # Variables
//! - `HOST` / `PORT`: bind address (default `127.0.0.1:3000`)
//! - `JWT_KEY`: token signing secret, required, at least 16 bytes
//! - `JWT_ISSUER` / `JWT_AUDIENCE`: stamped into tokens (default `tasklist`)
//! - `JWT_TTL_HOURS`: token lifetime (default 24, at most one year)
//! - `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET` / `GOOGLE_REDIRECT_URL`:
//!   enable Google login; all three or none

use chrono::Duration;
use secrecy::SecretString;
use tasklist_core::{JwtSettings, DEFAULT_TOKEN_TTL_HOURS};
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ISSUER: &str = "tasklist";
const DEFAULT_AUDIENCE: &str = "tasklist";
const MIN_KEY_LEN: usize = 16;
const MAX_TTL_HOURS: i64 = 24 * 366;

const GOOGLE_VARS: [&str; 3] = ["GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET", "GOOGLE_REDIRECT_URL"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("JWT_KEY must be at least 16 bytes, got {0}")]
    WeakKey(usize),

    #[error("Google login needs all of GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GOOGLE_REDIRECT_URL; missing {0}")]
    PartialGoogle(&'static str),
}

/// OAuth client registration for Google login.
#[derive(Debug)]
pub struct GoogleSettings {
    pub client_id: String,
    pub client_secret: SecretString,
    pub redirect_url: String,
}

#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt: JwtSettings,
    pub google: Option<GoogleSettings>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source. Empty or
    /// whitespace-only values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let key = get("JWT_KEY").ok_or(ConfigError::Missing("JWT_KEY"))?;
        if key.len() < MIN_KEY_LEN {
            return Err(ConfigError::WeakKey(key.len()));
        }
        let ttl_hours = match get("JWT_TTL_HOURS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(hours) if (1..=MAX_TTL_HOURS).contains(&hours) => hours,
                Ok(hours) => {
                    return Err(ConfigError::Invalid {
                        name: "JWT_TTL_HOURS",
                        reason: format!("{hours} is outside 1..={MAX_TTL_HOURS} hours"),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: "JWT_TTL_HOURS",
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_TOKEN_TTL_HOURS,
        };
        let ttl = Duration::try_hours(ttl_hours).ok_or_else(|| ConfigError::Invalid {
            name: "JWT_TTL_HOURS",
            reason: format!("{ttl_hours} hours does not fit a duration"),
        })?;
        let jwt = JwtSettings::new(
            key,
            get("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            get("JWT_AUDIENCE").unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
        )
        .with_ttl(ttl);

        let google_values = GOOGLE_VARS.map(|name| get(name));
        let google = if google_values.iter().all(Option::is_none) {
            None
        } else {
            let [client_id, client_secret, redirect_url] = google_values;
            let missing = |index: usize| ConfigError::PartialGoogle(GOOGLE_VARS[index]);
            Some(GoogleSettings {
                client_id: client_id.ok_or_else(|| missing(0))?,
                client_secret: SecretString::from(client_secret.ok_or_else(|| missing(1))?),
                redirect_url: redirect_url.ok_or_else(|| missing(2))?,
            })
        };

        Ok(Self { host, port, jwt, google })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
