//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::{ExposeSecret, SecretString};

use dropradar_core::{DEFAULT_API_URL, ScanMode, StatsSource};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::{self, CliError};
use crate::output;

use super::util::prompt_err;

const REDACTED: &str = "********";

const SETTABLE_KEYS: &str =
    "api_url, scan_mode, stats_source, low_spam_threshold, timeout, scan_timeout, bark_key_env";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` with every plaintext bark key masked.
fn redacted(cfg: &Config) -> Config {
    let mut out = cfg.clone();
    for profile in out.profiles.values_mut() {
        if profile.bark_key.is_some() {
            profile.bark_key = Some(REDACTED.into());
        }
    }
    out
}

fn save(cfg: &Config, quiet: bool) -> Result<(), CliError> {
    let path = config::save_config(cfg)?;
    output::notice(&format!("Saved {}", path.display()), quiet);
    Ok(())
}

fn invalid(field: &str, reason: impl Into<String>) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, CliError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(field, format!("expected a non-negative number, got '{value}'")))
}

/// Apply `key = value` to a profile, validating the value first.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key.replace('-', "_").as_str() {
        "api_url" => {
            url::Url::parse(&value).map_err(|e| invalid("api_url", format!("{e}: {value}")))?;
            profile.api_url = Some(value);
        }
        "scan_mode" => {
            value.parse::<ScanMode>().map_err(|_| {
                invalid(
                    "scan_mode",
                    "must be 'mock', 'domainsdb', 'expireddomains', or 'mixed'",
                )
            })?;
            profile.scan_mode = Some(value.to_lowercase());
        }
        "stats_source" => {
            value
                .parse::<StatsSource>()
                .map_err(|_| invalid("stats_source", "must be 'server' or 'local'"))?;
            profile.stats_source = Some(value.to_lowercase());
        }
        "low_spam_threshold" => {
            profile.low_spam_threshold = Some(parse_number("low_spam_threshold", &value)?);
        }
        "timeout" => profile.timeout = Some(parse_number("timeout", &value)?),
        "scan_timeout" => profile.scan_timeout = Some(parse_number("scan_timeout", &value)?),
        "bark_key_env" => profile.bark_key_env = Some(value),
        "bark_key" => {
            return Err(invalid(
                "bark_key",
                "use `dropradar config set-bark-key` to store it in the keyring",
            ));
        }
        other => {
            return Err(invalid(
                other,
                format!("unknown config key '{other}'. Valid keys: {SETTABLE_KEYS}"),
            ));
        }
    }
    Ok(())
}

fn prompt_bark_key() -> Result<SecretString, CliError> {
    let key = rpassword::prompt_password("Bark device key: ").map_err(prompt_err)?;
    if key.trim().is_empty() {
        return Err(invalid("bark_key", "bark key cannot be empty"));
    }
    Ok(SecretString::from(key.trim().to_owned()))
}

// ── Init wizard ─────────────────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("DropRadar configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let api_url: String = Input::new()
        .with_prompt("Backend URL")
        .default(DEFAULT_API_URL.into())
        .validate_with(|input: &String| {
            url::Url::parse(input)
                .map(|_| ())
                .map_err(|e| format!("invalid URL: {e}"))
        })
        .interact_text()
        .map_err(prompt_err)?;

    let stats_choices = &[
        "Server (aggregate stats from the backend)",
        "Local (computed from the listed domains)",
    ];
    let stats_source = match Select::new()
        .with_prompt("Where should stats come from?")
        .items(stats_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?
    {
        0 => StatsSource::Server,
        _ => StatsSource::Local,
    };

    let mode_choices = &[
        "Backend default",
        "mock",
        "domainsdb",
        "expireddomains",
        "mixed",
    ];
    let mode_selection = Select::new()
        .with_prompt("Default scan mode")
        .items(mode_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    let scan_mode = mode_choices
        .get(mode_selection)
        .filter(|_| mode_selection > 0)
        .map(|m| (*m).to_owned());

    let bark_choices = &[
        "Skip (no push notifications)",
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let bark_key = match Select::new()
        .with_prompt("Bark key for high-value notifications")
        .items(bark_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?
    {
        0 => None,
        1 => {
            config::store_bark_key(&profile_name, &prompt_bark_key()?)?;
            eprintln!("   Bark key stored in system keyring");
            None
        }
        _ => Some(prompt_bark_key()?.expose_secret().to_owned()),
    };

    let mut cfg = config::load_config_or_default();
    let profile = cfg.profiles.entry(profile_name.clone()).or_default();
    profile.api_url = Some(api_url);
    profile.stats_source = Some(stats_source.to_string());
    profile.scan_mode = scan_mode;
    if bark_key.is_some() {
        profile.bark_key = bark_key;
    }
    cfg.default_profile = Some(profile_name.clone());

    save(&cfg, global.quiet)?;
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Try it: dropradar dashboard");
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);

    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config()?);
            let path = config::config_path();
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("# unrenderable: {e}")),
                |_| path.display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let active = config::active_profile_name(global, &cfg);
            let mut names: Vec<&String> = cfg.profiles.keys().collect();
            names.sort();
            if names.is_empty() {
                output::notice(
                    "No profiles configured; using the built-in default. Run: dropradar config init",
                    global.quiet,
                );
            }
            for name in names {
                if *name == active {
                    println!("{} {}", name, output::accent("*", color));
                } else {
                    println!("{name}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if name != "default" && !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: error::join_or_none(cfg.profiles.keys().cloned().collect()),
                });
            }
            cfg.default_profile = Some(name.clone());
            save(&cfg, global.quiet)?;
            output::notice(
                &output::success(&format!("Default profile set to '{name}'"), color),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;
            save(&cfg, global.quiet)?;
            output::notice(
                &output::success(&format!("Set {key} on profile '{profile_name}'"), color),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::SetBarkKey { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            let key = prompt_bark_key()?;
            config::store_bark_key(&profile_name, &key)?;
            output::notice(
                &output::success(
                    &format!("Bark key stored in keyring for profile '{profile_name}'"),
                    color,
                ),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use dropradar_config::Defaults;

    #[test]
    fn show_masks_plaintext_bark_keys() {
        let mut profiles = HashMap::new();
        profiles.insert(
            "default".to_owned(),
            Profile {
                bark_key: Some("abc123".into()),
                bark_key_env: Some("BARK".into()),
                ..Profile::default()
            },
        );
        let cfg = Config {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles,
        };

        let text = toml::to_string_pretty(&redacted(&cfg)).unwrap();
        assert!(text.contains(REDACTED));
        assert!(!text.contains("abc123"));
        assert!(text.contains("BARK"));
    }

    #[test]
    fn set_validates_values() {
        let mut profile = Profile::default();

        set_profile_key(&mut profile, "stats-source", "Local".into()).unwrap();
        assert_eq!(profile.stats_source.as_deref(), Some("local"));

        set_profile_key(&mut profile, "timeout", "45".into()).unwrap();
        assert_eq!(profile.timeout, Some(45));

        assert!(set_profile_key(&mut profile, "api_url", "not a url".into()).is_err());
        assert!(set_profile_key(&mut profile, "scan_mode", "everything".into()).is_err());
        assert!(set_profile_key(&mut profile, "timeout", "-1".into()).is_err());
        assert!(set_profile_key(&mut profile, "bark_key", "secret".into()).is_err());
        assert!(matches!(
            set_profile_key(&mut profile, "colour", "red".into()),
            Err(CliError::Validation { ref field, .. }) if field == "colour"
        ));
    }
}
