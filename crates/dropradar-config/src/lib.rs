//! Shared configuration for DropRadar tools.
//!
//! TOML profiles, bark key resolution (env + keyring + plaintext), and
//! translation to `dropradar_core::DashboardConfig`. The CLI layers its
//! flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dropradar_core::{
    DEFAULT_API_URL, DEFAULT_LOW_SPAM_THRESHOLD, DashboardConfig, ScanMode, StatsSource,
};

/// Keyring service name for stored bark keys.
pub const KEYRING_SERVICE: &str = "dropradar";

/// Environment variable that points at an alternate config file.
pub const CONFIG_PATH_ENV: &str = "DROPRADAR_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
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

impl Config {
    /// Name of the active profile: explicit choice, then `default_profile`,
    /// then `"default"`.
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Look up a profile. The implicit `default` profile always exists.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == "default" => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile { name: name.into() }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Read deadline in seconds for list/stats/delete calls.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Scan deadline in seconds.
    #[serde(default = "default_scan_timeout")]
    pub scan_timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            scan_timeout: default_scan_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_scan_timeout() -> u64 {
    300
}

/// A named backend profile. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Default scan mode: mock, domainsdb, expireddomains, or mixed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_mode: Option<String>,

    /// "server" or "local".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats_source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_spam_threshold: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_timeout: Option<u64>,

    /// Bark device key (plaintext; prefer keyring or env var).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bark_key: Option<String>,

    /// Environment variable name containing the bark key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bark_key_env: Option<String>,
}

impl Profile {
    /// Parsed `scan_mode`, if set.
    pub fn scan_mode(&self) -> Result<Option<ScanMode>, ConfigError> {
        self.scan_mode
            .as_deref()
            .map(|raw| {
                raw.parse().map_err(|_| ConfigError::Validation {
                    field: "scan_mode".into(),
                    reason: format!(
                        "expected 'mock', 'domainsdb', 'expireddomains', or 'mixed', got '{raw}'"
                    ),
                })
            })
            .transpose()
    }

    /// Parsed `stats_source`, defaulting to the server.
    pub fn stats_source(&self) -> Result<StatsSource, ConfigError> {
        match self.stats_source.as_deref() {
            None => Ok(StatsSource::default()),
            Some(raw) => raw.parse().map_err(|_| ConfigError::Validation {
                field: "stats_source".into(),
                reason: format!("expected 'server' or 'local', got '{raw}'"),
            }),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `DROPRADAR_CONFIG`, then the platform
/// config dir.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("app", "dropradar", "dropradar").map_or_else(
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
    p.push("dropradar");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` (missing files are fine) with `DROPRADAR_` env
/// overrides. Nested keys use `__`, e.g. `DROPRADAR_DEFAULTS__TIMEOUT`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DROPRADAR_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Bark key resolution ─────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/bark-key"))
}

/// Resolve a bark key from the profile chain (no CLI flag step):
/// `bark_key_env` → system keyring → plaintext. A missing key is not an
/// error; scans simply run without notifications.
pub fn resolve_bark_key(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's bark_key_env → env var lookup
    if let Some(ref env_name) = profile.bark_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    profile
        .bark_key
        .as_ref()
        .map(|key| SecretString::from(key.clone()))
}

/// Store a bark key in the system keyring for `profile_name`.
pub fn store_bark_key(profile_name: &str, key: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(key.expose_secret())?;
    Ok(())
}

// ── Dashboard configuration ─────────────────────────────────────────

/// Build a `DashboardConfig` from a profile and global defaults, without
/// CLI flag overrides.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let raw_url = profile.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
    let api_url: url::Url = raw_url.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw_url}"),
    })?;

    Ok(DashboardConfig {
        api_url,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        scan_timeout: Duration::from_secs(profile.scan_timeout.unwrap_or(defaults.scan_timeout)),
        stats_source: profile.stats_source()?,
        low_spam_threshold: profile
            .low_spam_threshold
            .unwrap_or(DEFAULT_LOW_SPAM_THRESHOLD),
        ..DashboardConfig::default()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert_eq!(cfg.defaults.scan_timeout, 300);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profiles_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
default_profile = "staging"

[defaults]
timeout = 10

[profiles.staging]
api_url = "http://localhost:8000"
stats_source = "local"
low_spam_threshold = 8
scan_mode = "mock"
"#,
        );

        let cfg = load_config_from(&path).unwrap();
        let name = cfg.active_profile_name(None);
        assert_eq!(name, "staging");

        let profile = cfg.profile(&name).unwrap();
        assert_eq!(profile.scan_mode().unwrap(), Some(ScanMode::Mock));

        let dash = profile_to_dashboard_config(&profile, &cfg.defaults).unwrap();
        assert_eq!(dash.api_url.as_str(), "http://localhost:8000/");
        assert_eq!(dash.stats_source, StatsSource::Local);
        assert_eq!(dash.low_spam_threshold, 8);
        assert_eq!(dash.timeout, Duration::from_secs(10));
        assert_eq!(dash.scan_timeout, Duration::from_secs(300));
    }

    #[test]
    fn implicit_default_profile_uses_public_backend() {
        let cfg = Config::default();
        let profile = cfg.profile("default").unwrap();
        let dash = profile_to_dashboard_config(&profile, &cfg.defaults).unwrap();

        assert_eq!(dash.api_url.as_str(), "https://dropradar-production.up.railway.app/");
        assert_eq!(dash.stats_source, StatsSource::Server);
        assert_eq!(dash.low_spam_threshold, DEFAULT_LOW_SPAM_THRESHOLD);
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile("prod"),
            Err(ConfigError::UnknownProfile { ref name }) if name == "prod"
        ));
    }

    #[test]
    fn bad_values_fail_validation() {
        let profile = Profile {
            stats_source: Some("both".into()),
            scan_mode: Some("everything".into()),
            ..Profile::default()
        };
        assert!(matches!(
            profile.stats_source(),
            Err(ConfigError::Validation { ref field, .. }) if field == "stats_source"
        ));
        assert!(profile.scan_mode().is_err());

        let bad_url = Profile {
            api_url: Some("not a url".into()),
            ..Profile::default()
        };
        assert!(profile_to_dashboard_config(&bad_url, &Defaults::default()).is_err());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "local".into(),
            Profile {
                api_url: Some("http://127.0.0.1:8000".into()),
                bark_key_env: Some("LOCAL_BARK_KEY".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let profile = loaded.profile("local").unwrap();
        assert_eq!(profile.api_url.as_deref(), Some("http://127.0.0.1:8000"));
        assert_eq!(profile.bark_key_env.as_deref(), Some("LOCAL_BARK_KEY"));
    }

    #[test]
    fn plaintext_bark_key_is_last_resort() {
        let profile = Profile {
            bark_key: Some("plain-key".into()),
            bark_key_env: Some("DROPRADAR_TEST_UNSET_BARK_KEY_VAR".into()),
            ..Profile::default()
        };
        let key = resolve_bark_key(&profile, "dropradar-test-no-keyring-entry").unwrap();
        assert_eq!(key.expose_secret(), "plain-key");

        assert!(resolve_bark_key(&Profile::default(), "dropradar-test-no-keyring-entry").is_none());
    }
}
