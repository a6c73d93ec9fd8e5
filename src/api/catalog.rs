//! osu! catalog access: token exchange and beatmapset search.
//!
//! Authentication uses the client-credentials OAuth flow. The bearer token
//! is cached and re-exchanged shortly before its server-side expiry, so
//! callers never handle tokens themselves.

use crate::models::search::{SearchRequest, SearchResponse};
use serde::Deserialize;
use std::fmt;
use std::time::{Duration, Instant};

const TOKEN_URL: &str = "https://osu.ppy.sh/oauth/token";
const SEARCH_URL: &str = "https://osu.ppy.sh/api/v2/beatmapsets/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Tokens are renewed this long before the server says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Error type for catalog failures.
#[derive(Debug)]
pub enum CatalogError {
    /// No usable credentials; recoverable by configuring them.
    NoCredentials,
    /// The token exchange was rejected.
    Token(String),
    /// The request failed in transit.
    Request(String),
    /// The response body did not match the expected shape.
    Decode(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NoCredentials => {
                write!(f, "No catalog credentials configured")
            }
            CatalogError::Token(msg) => write!(f, "Token exchange failed: {}", msg),
            CatalogError::Request(msg) => write!(f, "Catalog request failed: {}", msg),
            CatalogError::Decode(msg) => write!(f, "Unexpected catalog response: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Client-credential pair for the public API.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Reads `OSU_CLIENT_ID` / `OSU_CLIENT_SECRET` from the environment.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("OSU_CLIENT_ID").ok()?;
        let client_secret = std::env::var("OSU_CLIENT_SECRET").ok()?;
        Some(Self {
            client_id,
            client_secret,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Lifetime in seconds.
    expires_in: u64,
}

struct CachedToken {
    bearer: String,
    expires_at: Instant,
}

/// Stateful catalog client owning the HTTP agent and the token cache.
pub struct CatalogClient {
    agent: ureq::Agent,
    credentials: Option<Credentials>,
    token: Option<CachedToken>,
}

impl CatalogClient {
    pub fn new(credentials: Option<Credentials>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self {
            agent,
            credentials,
            token: None,
        }
    }

    pub fn from_env() -> Self {
        Self::new(Credentials::from_env())
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Installs new credentials, dropping any token issued for the old ones.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
        self.token = None;
    }

    /// Runs one page of a beatmapset search, mania difficulties only.
    pub fn search(&mut self, request: &SearchRequest) -> Result<SearchResponse, CatalogError> {
        let bearer = self.bearer()?;

        let mut call = self
            .agent
            .get(SEARCH_URL)
            .header("Authorization", format!("Bearer {}", bearer))
            .query("q", &request.q())
            .query("m", "3")
            .query("sort", &request.sort_param())
            .query("nsfw", if request.nsfw { "true" } else { "false" });
        if let Some(category) = request.category.as_param() {
            call = call.query("s", category);
        }
        if let Some(cursor) = &request.cursor {
            call = call.query("cursor_string", cursor);
        }
        if let Some(genre) = request.genre_param() {
            call = call.query("g", &genre.to_string());
        }
        if let Some(language) = request.language {
            call = call.query("l", &language.to_string());
        }

        let response = match call.call() {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(401)) => {
                // Token rejected server-side; drop it so the next call
                // runs the exchange again.
                self.token = None;
                return Err(CatalogError::NoCredentials);
            }
            Err(e) => return Err(CatalogError::Request(e.to_string())),
        };

        let page: SearchResponse = response
            .into_body()
            .read_json()
            .map_err(|e| CatalogError::Decode(e.to_string()))?;
        log::info!(
            "CATALOG: Page with {} sets ({} total matches)",
            page.beatmapsets.len(),
            page.total
        );
        Ok(page)
    }

    /// Returns a bearer token, exchanging credentials when the cached one
    /// is missing or about to expire.
    fn bearer(&mut self) -> Result<String, CatalogError> {
        if let Some(token) = &self.token {
            if Instant::now() < token.expires_at {
                return Ok(token.bearer.clone());
            }
        }

        let credentials = self
            .credentials
            .as_ref()
            .ok_or(CatalogError::NoCredentials)?;

        log::info!("CATALOG: Exchanging client credentials for a token");
        let body = serde_json::json!({
            "client_id": credentials.client_id,
            "client_secret": credentials.client_secret,
            "grant_type": "client_credentials",
            "scope": "public",
        });

        let response = self
            .agent
            .post(TOKEN_URL)
            .send_json(&body)
            .map_err(|e| CatalogError::Token(e.to_string()))?;
        let token: TokenResponse = response
            .into_body()
            .read_json()
            .map_err(|e| CatalogError::Decode(e.to_string()))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        let bearer = token.access_token;
        self.token = Some(CachedToken {
            bearer: bearer.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(bearer)
    }
}
