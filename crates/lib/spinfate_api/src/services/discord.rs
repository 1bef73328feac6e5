//! Discord OAuth: authorize URL, code exchange and profile fetch.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// OAuth scope requested at login: profile read only.
pub const SCOPES: &str = "identify";

/// Discord CDN base for avatars.
const CDN_BASE: &str = "https://cdn.discordapp.com";

/// Discord OAuth failures.
#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no access token in response")]
    MissingToken,

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Response from the token endpoint. Discord returns an error object
/// without `access_token` on failure.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
}

/// Subset of the `users/@me` profile.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    pub global_name: Option<String>,
    /// Avatar hash.
    pub avatar: Option<String>,
    pub discriminator: Option<String>,
}

impl DiscordUser {
    /// Global display name, falling back to the username.
    pub fn display_name(&self) -> &str {
        self.global_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }

    /// Custom avatar if set, else the default avatar picked by discriminator.
    pub fn avatar_url(&self) -> String {
        match self.avatar.as_deref().filter(|a| !a.is_empty()) {
            Some(hash) => format!("{CDN_BASE}/avatars/{}/{hash}.png", self.id),
            None => {
                let index = self
                    .discriminator
                    .as_deref()
                    .and_then(|d| d.parse::<u32>().ok())
                    .unwrap_or(0)
                    % 5;
                format!("{CDN_BASE}/embed/avatars/{index}.png")
            }
        }
    }
}

/// Authorization page URL the browser is sent to.
pub fn authorize_url(
    authorize_base: &str,
    client_id: &str,
    redirect_uri: &str,
) -> Result<Url, DiscordError> {
    let url = Url::parse_with_params(
        authorize_base,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", SCOPES),
        ],
    )?;
    Ok(url)
}

/// Exchange an authorization code for an access token.
pub async fn exchange_code(
    client: &reqwest::Client,
    api_base: &str,
    client_id: &str,
    client_secret: &str,
    code: &str,
    redirect_uri: &str,
) -> Result<String, DiscordError> {
    let params = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri),
    ];

    let resp = client
        .post(format!("{api_base}/oauth2/token"))
        .form(&params)
        .send()
        .await?;
    debug!(status = %resp.status(), "discord token exchange");

    resp.json::<TokenResponse>()
        .await?
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or(DiscordError::MissingToken)
}

/// Fetch the profile of the token's owner.
pub async fn fetch_profile(
    client: &reqwest::Client,
    api_base: &str,
    access_token: &str,
) -> Result<DiscordUser, DiscordError> {
    let user = client
        .get(format!("{api_base}/users/@me"))
        .bearer_auth(access_token)
        .send()
        .await?
        .error_for_status()?
        .json::<DiscordUser>()
        .await?;
    Ok(user)
}
