//! Shared helpers for command handlers.

use std::io::IsTerminal;

use tracing::debug;

use dropradar_core::{DashboardConfig, ListQuery, StatsSource};

use crate::cli::{ListArgs, StatsArgs};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so the operation is refused
/// instead of silently declined.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Server-side filters from list flags.
pub fn list_query(args: &ListArgs) -> ListQuery {
    ListQuery {
        skip: args.skip,
        limit: args.limit,
        min_da: args.min_da,
        max_spam: args.max_spam,
        status: args.status.clone(),
    }
}

/// Whether the rows shown are a subset of what the backend tracks.
pub fn narrows(args: &ListArgs) -> bool {
    args.high_value || list_query(args) != ListQuery::default()
}

/// Resolve `--source` and `--low-spam-threshold` against the profile.
///
/// Server stats always aggregate the whole table, so a narrowed view or
/// an explicit threshold switches to local stats. Asking for server stats
/// explicitly in either case is rejected.
pub fn apply_stats_args(
    config: &mut DashboardConfig,
    args: &StatsArgs,
    narrowed: bool,
) -> Result<(), CliError> {
    let needs_local = narrowed || args.low_spam_threshold.is_some();

    match args.source {
        Some(StatsSource::Server) if narrowed => {
            return Err(CliError::Validation {
                field: "source".into(),
                reason: "server stats cover every domain and can't describe a filtered list; \
                         drop the filters or use --source local"
                    .into(),
            });
        }
        Some(StatsSource::Server) if args.low_spam_threshold.is_some() => {
            return Err(CliError::Validation {
                field: "low_spam_threshold".into(),
                reason: "only applies to --source local".into(),
            });
        }
        Some(source) => config.stats_source = source,
        None if needs_local && config.stats_source == StatsSource::Server => {
            debug!(narrowed, "computing stats locally for this view");
            config.stats_source = StatsSource::Local;
        }
        None => {}
    }

    if let Some(threshold) = args.low_spam_threshold {
        config.low_spam_threshold = threshold;
    }
    Ok(())
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stats_args(source: Option<StatsSource>, threshold: Option<u32>) -> StatsArgs {
        StatsArgs {
            source,
            low_spam_threshold: threshold,
        }
    }

    #[test]
    fn filters_mark_the_view_narrowed() {
        assert!(!narrows(&ListArgs::default()));
        assert!(narrows(&ListArgs {
            min_da: Some(30),
            ..ListArgs::default()
        }));
        assert!(narrows(&ListArgs {
            high_value: true,
            ..ListArgs::default()
        }));
    }

    #[test]
    fn narrowed_view_switches_to_local_stats() {
        let mut config = DashboardConfig::default();
        apply_stats_args(&mut config, &stats_args(None, None), true).unwrap();
        assert_eq!(config.stats_source, StatsSource::Local);

        let mut config = DashboardConfig::default();
        apply_stats_args(&mut config, &stats_args(None, None), false).unwrap();
        assert_eq!(config.stats_source, StatsSource::Server);
    }

    #[test]
    fn explicit_server_source_rejects_filters() {
        let mut config = DashboardConfig::default();
        let err =
            apply_stats_args(&mut config, &stats_args(Some(StatsSource::Server), None), true)
                .unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "source"));
    }

    #[test]
    fn threshold_needs_local_stats() {
        let mut config = DashboardConfig::default();
        apply_stats_args(&mut config, &stats_args(None, Some(3)), false).unwrap();
        assert_eq!(config.stats_source, StatsSource::Local);
        assert_eq!(config.low_spam_threshold, 3);

        let mut config = DashboardConfig::default();
        let err = apply_stats_args(
            &mut config,
            &stats_args(Some(StatsSource::Server), Some(3)),
            false,
        )
        .unwrap_err();
        assert!(
            matches!(err, CliError::Validation { ref field, .. } if field == "low_spam_threshold")
        );
    }
}
