//! Configuration for icinga-api consumers.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `icinga_api::ClientConfig`. The API crate never reads
//! files; tools build a `ClientConfig` here and hand it to `WebClient::new`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use icinga_api::{ClientConfig, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("certificate error: {0}")]
    Certificate(#[from] icinga_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is requested explicitly.
    pub default_profile: Option<String>,

    /// Fallbacks for settings a profile leaves unset.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named API endpoints.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub disable_keep_alives: bool,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// A named Icinga API endpoint.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API root (e.g., "https://icinga.example.com:5665").
    pub url: String,

    /// API user. Falls back to `ICINGA_USERNAME`.
    pub username: Option<String>,

    /// Plaintext password. Keyring and env vars take precedence.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Zone label handed through to the client.
    pub zone: Option<String>,

    /// PEM bundle replacing the platform trust store.
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,
    pub disable_keep_alives: Option<bool>,
    pub debug: Option<bool>,
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "icinga-rs", "icinga").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("icinga");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path`, then overlay `ICINGA_*` variables.
///
/// Nested keys use a double underscore:
/// `ICINGA_PROFILES__PROD__URL=https://...`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ICINGA_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile selection ───────────────────────────────────────────────

/// Pick the requested profile, else `default_profile`, else `"default"`.
pub fn active_profile<'a>(
    cfg: &'a Config,
    requested: Option<&'a str>,
) -> Result<(&'a str, &'a Profile), ConfigError> {
    let name = requested
        .or(cfg.default_profile.as_deref())
        .unwrap_or("default");
    cfg.profiles
        .get(name)
        .map(|profile| (name, profile))
        .ok_or_else(|| ConfigError::UnknownProfile {
            profile: name.into(),
        })
}

// ── Credential resolution ───────────────────────────────────────────

pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var("ICINGA_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the API password.
///
/// Order: the profile's `password_env` variable, `ICINGA_PASSWORD`, the
/// system keyring (`icinga` / `<profile>/password`), plaintext in config.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(val) = std::env::var("ICINGA_PASSWORD") {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new("icinga", &format!("{profile_name}/password")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ClientConfig` from a profile, falling back to `defaults`.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    if profile.url.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "url".into(),
            reason: format!("profile '{profile_name}' has no url"),
        });
    }

    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;

    let mut transport = TransportConfig {
        debug: profile.debug.unwrap_or(defaults.debug),
        insecure: profile.insecure.unwrap_or(defaults.insecure),
        disable_keep_alives: profile
            .disable_keep_alives
            .unwrap_or(defaults.disable_keep_alives),
        root_certificates: None,
        timeout: profile
            .timeout
            .or(defaults.timeout)
            .map(Duration::from_secs),
    };
    if let Some(ref ca_path) = profile.ca_cert {
        transport = transport.with_ca_bundle(ca_path)?;
    }

    let mut config = ClientConfig::new(profile.url.clone(), username, password);
    config.zone.clone_from(&profile.zone);
    config.transport = transport;
    Ok(config)
}

/// Load config, select a profile and build its `ClientConfig`.
pub fn client_config(requested: Option<&str>) -> Result<ClientConfig, ConfigError> {
    let cfg = load_config()?;
    let (name, profile) = active_profile(&cfg, requested)?;
    profile_to_client_config(profile, name, &cfg.defaults)
}
