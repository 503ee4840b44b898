//! CLI configuration: thin wrapper around `dropradar_config` shared types.
//!
//! Adds the resolution steps that honor `GlobalOpts` flag overrides
//! (--api-url, --timeout, --bark-key).

use std::time::Duration;

use clap::parser::ValueSource;
use clap::{ArgMatches, ValueEnum};
use secrecy::SecretString;
use tracing::warn;

use dropradar_core::DashboardConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use dropradar_config::{
    Config, Defaults, Profile, config_path, load_config, load_config_or_default, save_config,
    store_bark_key,
};

/// Everything a backend-bound command needs from config + flags.
pub struct Resolved {
    pub profile_name: String,
    pub profile: Profile,
    pub dashboard: DashboardConfig,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Translate the active profile + global flags into a `DashboardConfig`.
///
/// Flag values win over profile values, which win over `[defaults]`.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profile(&profile_name)?;

    let mut dashboard = dropradar_config::profile_to_dashboard_config(&profile, &cfg.defaults)?;

    if let Some(ref raw) = global.api_url {
        dashboard.api_url = raw.parse().map_err(|_| CliError::Validation {
            field: "api-url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }
    if let Some(secs) = global.timeout {
        dashboard.timeout = Duration::from_secs(secs);
    }

    Ok(Resolved {
        profile_name,
        profile,
        dashboard,
    })
}

/// Fill `--output` and `--color` from `[defaults]` when neither the flag
/// nor its env var was given.
pub fn apply_output_defaults(global: &mut GlobalOpts, matches: &ArgMatches, defaults: &Defaults) {
    let unset = |id: &str| matches.value_source(id) == Some(ValueSource::DefaultValue);

    if unset("output") {
        match OutputFormat::from_str(&defaults.output, true) {
            Ok(format) => global.output = format,
            Err(_) => warn!(value = %defaults.output, "ignoring unknown [defaults] output"),
        }
    }
    if unset("color") {
        match ColorMode::from_str(&defaults.color, true) {
            Ok(mode) => global.color = mode,
            Err(_) => warn!(value = %defaults.color, "ignoring unknown [defaults] color"),
        }
    }
}

/// Bark key chain: CLI flag (or `DROPRADAR_BARK_KEY`), then the profile
/// chain (env var name, keyring, plaintext).
pub fn resolve_bark_key(
    flag: Option<&str>,
    profile: &Profile,
    profile_name: &str,
) -> Option<SecretString> {
    if let Some(key) = flag.filter(|k| !k.trim().is_empty()) {
        return Some(SecretString::from(key.to_owned()));
    }
    dropradar_config::resolve_bark_key(profile, profile_name)
}
