//! Storefront configuration loaded from environment variables.
//!
//! Configuration is read once at startup into an immutable
//! [`StorefrontConfig`] and handed to the content client and image resolver.
//! Nothing reads the environment at request time.
//!
//! # Environment Variables
//!
//! ## Content store
//! - `SANITY_PROJECT_ID` - Sanity project id. When missing or blank, the
//!   content store is treated as unconfigured: every list renders empty and
//!   every detail page renders "not found".
//! - `SANITY_DATASET` - Dataset name (default: production)
//! - `SANITY_API_VERSION` - Query API version (default: 2024-01-01)
//! - `SANITY_API_HOST` - Query API origin (default: `https://{project}.api.sanity.io`)
//! - `SANITY_API_READ_TOKEN` - Optional token for private datasets
//!
//! ## Server
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` or `SITE_URL` - Public URL (default: `http://localhost:3000`)
//! - `STOREFRONT_MARKETPLACE_URL` - Marketplace shop link (default: `https://shopee.tw/kiyone`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `LOG_FORMAT` - `json` for JSON lines, anything else for text (default: text)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
/// Marketplace shop linked from the site header.
pub const DEFAULT_MARKETPLACE_URL: &str = "https://shopee.tw/kiyone";
const DEFAULT_DATASET: &str = "production";
const DEFAULT_API_VERSION: &str = "2024-01-01";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront, without a trailing slash
    pub base_url: String,
    /// External marketplace shop used by site-wide "shop" links
    pub marketplace_url: String,
    /// Content store connection
    pub sanity: SanityConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Log output format
    pub log_format: LogFormat,
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines for local development.
    #[default]
    Text,
    /// Flattened JSON lines for log collectors.
    Json,
}

impl LogFormat {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Content store configuration state.
///
/// A missing project id is an explicit state rather than a client that
/// fails on every call; the content client routes it into the same
/// empty / not-found path as a transport failure.
#[derive(Debug, Clone, Default)]
pub enum SanityConfig {
    /// No project id was supplied.
    #[default]
    Unconfigured,
    /// Reads go to this project.
    Configured(SanityProject),
}

impl SanityConfig {
    /// The configured project, if any.
    #[must_use]
    pub const fn project(&self) -> Option<&SanityProject> {
        match self {
            Self::Unconfigured => None,
            Self::Configured(project) => Some(project),
        }
    }

    /// Whether reads are enabled.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }
}

/// Sanity project identity.
///
/// Implements `Debug` manually to redact the read token.
#[derive(Clone)]
pub struct SanityProject {
    /// Project id (e.g., `abc123xy`)
    pub project_id: String,
    /// Dataset name (e.g., `production`)
    pub dataset: String,
    /// Dated API version without the `v` prefix (e.g., `2024-01-01`)
    pub api_version: String,
    /// Query API origin
    pub api_host: Url,
    /// Optional bearer token for private datasets
    pub read_token: Option<SecretString>,
}

impl std::fmt::Debug for SanityProject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityProject")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("api_host", &self.api_host.as_str())
            .field(
                "read_token",
                &self.read_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl SanityProject {
    /// Project on the public Sanity API host.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the project id cannot form a valid host name.
    pub fn new(
        project_id: impl Into<String>,
        dataset: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let project_id = project_id.into();
        let api_host = default_api_host(&project_id)?;
        Ok(Self {
            project_id,
            dataset: dataset.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            api_host,
            read_token: None,
        })
    }

    /// Replace the query API origin (used for proxies and tests).
    #[must_use]
    pub fn with_api_host(mut self, api_host: Url) -> Self {
        self.api_host = api_host;
        self
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = get_or_default(&get, "STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_or_default(&get, "STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = normalize_site_url(
            get_optional(&get, "STOREFRONT_BASE_URL").or_else(|| get_optional(&get, "SITE_URL")),
        );
        let marketplace_url =
            get_or_default(&get, "STOREFRONT_MARKETPLACE_URL", DEFAULT_MARKETPLACE_URL);

        let sanity = SanityConfig::from_lookup(&get)?;

        Ok(Self {
            host,
            port,
            base_url,
            marketplace_url,
            sanity,
            sentry_dsn: get_optional(&get, "SENTRY_DSN"),
            sentry_environment: get_optional(&get, "SENTRY_ENVIRONMENT"),
            log_format: LogFormat::parse(get_optional(&get, "LOG_FORMAT").as_deref()),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Absolute URL for a site path (e.g., `/blog`).
    #[must_use]
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl SanityConfig {
    fn from_lookup<F>(get: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(project_id) = get_optional(get, "SANITY_PROJECT_ID") else {
            return Ok(Self::Unconfigured);
        };

        let dataset = get_or_default(get, "SANITY_DATASET", DEFAULT_DATASET);
        let api_version = get_or_default(get, "SANITY_API_VERSION", DEFAULT_API_VERSION)
            .trim_start_matches('v')
            .to_string();
        let api_host = match get_optional(get, "SANITY_API_HOST") {
            Some(raw) => Url::parse(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("SANITY_API_HOST".to_string(), e.to_string())
            })?,
            None => default_api_host(&project_id)?,
        };
        let read_token = get_optional(get, "SANITY_API_READ_TOKEN").map(SecretString::from);

        Ok(Self::Configured(SanityProject {
            project_id,
            dataset,
            api_version,
            api_host,
            read_token,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as missing.
fn get_optional<F>(get: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Get a variable with a default value.
fn get_or_default<F>(get: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional(get, key).unwrap_or_else(|| default.to_string())
}

fn default_api_host(project_id: &str) -> Result<Url, ConfigError> {
    Url::parse(&format!("https://{project_id}.api.sanity.io")).map_err(|e| {
        ConfigError::InvalidEnvVar("SANITY_PROJECT_ID".to_string(), e.to_string())
    })
}

/// Normalize the public site URL.
///
/// Bare host names get an `https://` scheme and trailing slashes are removed,
/// so paths can be appended with a leading `/`.
fn normalize_site_url(configured: Option<String>) -> String {
    let base = configured.map_or_else(
        || DEFAULT_BASE_URL.to_string(),
        |value| {
            if value.starts_with("http") {
                value
            } else {
                format!("https://{value}")
            }
        },
    );
    base.trim_end_matches('/').to_string()
}
