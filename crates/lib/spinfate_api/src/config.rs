//! API server configuration.

use spinfate_core::limits::{DEFAULT_DAILY_SPIN_LIMIT, DEFAULT_REQUEST_COOLDOWN_DAYS};

/// Public Discord authorization page.
pub const DISCORD_AUTHORIZE_URL: &str = "https://discord.com/oauth2/authorize";

/// Public Discord REST API base.
pub const DISCORD_API_BASE: &str = "https://discord.com/api";

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8788").
    pub bind_addr: String,
    /// SQLite connection URL.
    pub database_url: String,
    /// Session cookie signing secret. Without it no session ever resolves.
    pub session_secret: Option<String>,
    /// Discord OAuth application id.
    pub discord_client_id: Option<String>,
    /// Discord OAuth application secret.
    pub discord_client_secret: Option<String>,
    pub discord_authorize_url: String,
    pub discord_api_base: String,
    /// Webhook receiving spin notifications.
    pub spin_webhook_url: Option<String>,
    /// Webhook receiving segment request notifications.
    pub request_webhook_url: Option<String>,
    /// Site origin used for OAuth redirects. Derived from request headers when unset.
    pub public_base_url: Option<String>,
    /// Spins allowed per client per UTC day.
    pub daily_spin_limit: i64,
    /// Days between segment requests from one client; 0 disables the check.
    pub request_cooldown_days: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8788".into(),
            database_url: "sqlite://spinfate.db".into(),
            session_secret: None,
            discord_client_id: None,
            discord_client_secret: None,
            discord_authorize_url: DISCORD_AUTHORIZE_URL.into(),
            discord_api_base: DISCORD_API_BASE.into(),
            spin_webhook_url: None,
            request_webhook_url: None,
            public_base_url: None,
            daily_spin_limit: DEFAULT_DAILY_SPIN_LIMIT,
            request_cooldown_days: DEFAULT_REQUEST_COOLDOWN_DAYS,
        }
    }
}

/// Non-empty environment variable.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_i64(key: &str, default: i64) -> i64 {
    env_opt(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                  | Default                   |
    /// |---------------------------|---------------------------|
    /// | `BIND_ADDR`               | `127.0.0.1:8788`          |
    /// | `DATABASE_URL`            | `sqlite://spinfate.db`    |
    /// | `SESSION_SECRET`          | unset (sessions disabled) |
    /// | `DISCORD_CLIENT_ID`       | unset (login disabled)    |
    /// | `DISCORD_CLIENT_SECRET`   | unset (login disabled)    |
    /// | `DISCORD_SPIN_WEBHOOK`    | unset                     |
    /// | `DISCORD_REQUEST_WEBHOOK` | unset                     |
    /// | `PUBLIC_BASE_URL`         | unset                     |
    /// | `DAILY_SPIN_LIMIT`        | `3`                       |
    /// | `REQUEST_COOLDOWN_DAYS`   | `30`                      |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env_opt("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: env_opt("DATABASE_URL").unwrap_or(defaults.database_url),
            session_secret: env_opt("SESSION_SECRET"),
            discord_client_id: env_opt("DISCORD_CLIENT_ID"),
            discord_client_secret: env_opt("DISCORD_CLIENT_SECRET"),
            discord_authorize_url: env_opt("DISCORD_AUTHORIZE_URL")
                .unwrap_or(defaults.discord_authorize_url),
            discord_api_base: env_opt("DISCORD_API_BASE").unwrap_or(defaults.discord_api_base),
            spin_webhook_url: env_opt("DISCORD_SPIN_WEBHOOK"),
            request_webhook_url: env_opt("DISCORD_REQUEST_WEBHOOK"),
            public_base_url: env_opt("PUBLIC_BASE_URL"),
            daily_spin_limit: env_i64("DAILY_SPIN_LIMIT", defaults.daily_spin_limit),
            request_cooldown_days: env_i64("REQUEST_COOLDOWN_DAYS", defaults.request_cooldown_days),
        }
    }

    /// Both OAuth credentials, if configured.
    pub fn discord_credentials(&self) -> Option<(&str, &str)> {
        Some((
            self.discord_client_id.as_deref()?,
            self.discord_client_secret.as_deref()?,
        ))
    }
}
