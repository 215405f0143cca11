/*
 * Responsibility
 * - load settings from the environment (PORT, CORS allowlist, auth secret, ...)
 * - validate them (missing/invalid values fail startup)
 * - hand an explicit Config to everything built in app.rs
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Longest access token lifetime accepted (30 days).
pub const MAX_ACCESS_TOKEN_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;
/// Largest clock skew allowance accepted on `exp`.
pub const MAX_LEEWAY_SECONDS: u64 = 300;

/// Settings consumed by the token verifier and issuer.
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 shared secret. Never logged.
    pub secret: String,
    pub access_token_ttl_seconds: u64,
    pub leeway_seconds: u64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match var("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let secret = var("AUTH_SECRET").ok_or(ConfigError::Missing("AUTH_SECRET"))?;
        if secret.trim().is_empty() {
            return Err(ConfigError::Invalid("AUTH_SECRET"));
        }

        let access_token_ttl_seconds = parse_u64(&var, "ACCESS_TOKEN_TTL_SECONDS", 3600)?;
        if access_token_ttl_seconds == 0 || access_token_ttl_seconds > MAX_ACCESS_TOKEN_TTL_SECONDS {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"));
        }
        let leeway_seconds = parse_u64(&var, "ACCESS_TOKEN_LEEWAY_SECONDS", 60)?;
        if leeway_seconds > MAX_LEEWAY_SECONDS.min(access_token_ttl_seconds) {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"));
        }

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            auth: AuthConfig {
                secret,
                access_token_ttl_seconds,
                leeway_seconds,
            },
        })
    }
}

fn parse_u64<F>(var: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
