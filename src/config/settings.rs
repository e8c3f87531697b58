//! Settings read from the process environment (after `.env` is loaded).

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "memory://";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:8000"];
pub const DEFAULT_TRUSTED_HOSTS: &[&str] = &["localhost", "127.0.0.1"];
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Backing store selected by `DATABASE_URL`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Postgres(String),
}

impl Backend {
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        if url == "memory" || url.starts_with("memory://") {
            Ok(Backend::Memory)
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Backend::Postgres(url.to_string()))
        } else {
            Err(ConfigError::UnsupportedDatabaseUrl(url.to_string()))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Memory => "memory",
            Backend::Postgres(_) => "postgres",
        }
    }
}

/// How not-found conditions reach the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presentation {
    /// 200 with `{message, status: "error"}`.
    Soft,
    /// Error status code with `{detail}`.
    Structured,
}

impl Presentation {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "soft" => Ok(Presentation::Soft),
            "structured" => Ok(Presentation::Structured),
            _ => Err(ConfigError::Invalid {
                key: "ERROR_STYLE",
                value: value.to_string(),
            }),
        }
    }
}

/// What `PUT /items/{id}` does with fields missing from the body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    /// Overwrite every field; omitted optional fields become null.
    Replace,
    /// Overwrite supplied fields only.
    Merge,
}

impl UpdateMode {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(UpdateMode::Replace),
            "merge" => Ok(UpdateMode::Merge),
            _ => Err(ConfigError::Invalid {
                key: "UPDATE_MODE",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub backend: Backend,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub presentation: Presentation,
    pub update_mode: UpdateMode,
    pub cors_origins: Vec<String>,
    pub trusted_hosts: Vec<String>,
    pub max_body_bytes: usize,
    pub seed_on_startup: bool,
}

impl Settings {
    /// Settings for the given backend with every other value at its default.
    pub fn for_backend(backend: Backend) -> Self {
        let (presentation, update_mode) = match backend {
            Backend::Memory => (Presentation::Soft, UpdateMode::Replace),
            Backend::Postgres(_) => (Presentation::Structured, UpdateMode::Merge),
        };
        Self {
            backend,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            presentation,
            update_mode,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            trusted_hosts: DEFAULT_TRUSTED_HOSTS.iter().map(|s| s.to_string()).collect(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            seed_on_startup: false,
        }
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let mut settings = Self::for_backend(Backend::parse(&database_url)?);

        if let Some(v) = get("BIND_ADDR") {
            settings.bind_addr = v.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "BIND_ADDR",
                value: v.clone(),
            })?;
        }
        if let Some(v) = get("DB_MAX_CONNECTIONS") {
            settings.max_connections = parse_number("DB_MAX_CONNECTIONS", &v)?;
            if settings.max_connections == 0 {
                return Err(ConfigError::Validation("DB_MAX_CONNECTIONS must be at least 1".into()));
            }
        }
        if let Some(v) = get("ERROR_STYLE") {
            settings.presentation = Presentation::parse(&v)?;
        }
        if let Some(v) = get("UPDATE_MODE") {
            settings.update_mode = UpdateMode::parse(&v)?;
        }
        if let Some(v) = get("CORS_ORIGINS") {
            settings.cors_origins = split_list(&v);
        }
        if let Some(v) = get("TRUSTED_HOSTS") {
            settings.trusted_hosts = split_list(&v);
            if settings.trusted_hosts.is_empty() {
                return Err(ConfigError::Validation("TRUSTED_HOSTS must name at least one host".into()));
            }
        }
        if let Some(v) = get("MAX_BODY_BYTES") {
            settings.max_body_bytes = parse_number("MAX_BODY_BYTES", &v)?;
        }
        if let Some(v) = get("SEED_ON_STARTUP") {
            settings.seed_on_startup = parse_bool("SEED_ON_STARTUP", &v)?;
        }
        Ok(settings)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}
