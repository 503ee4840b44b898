//! Aggregate stats handler and the stats card renderer.

use dropradar_core::{Dashboard, Stats};

use crate::cli::{GlobalOpts, StatsArgs};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

/// Four labelled numbers, one per line.
pub(crate) fn stat_cards(stats: &Stats, color: bool) -> String {
    let cards = [
        ("Total domains", stats.total.to_string()),
        ("Avg DA", format!("{:.1}", stats.average_authority_score)),
        ("Available", stats.available_count.to_string()),
        ("Low spam", stats.low_spam_count.to_string()),
    ];
    cards
        .iter()
        .map(|(label, value)| {
            format!(
                "  {}  {}",
                output::muted(&format!("{label:<14}"), color),
                output::accent(value, color)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn handle(
    args: &StatsArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut config = resolved.dashboard.clone();
    util::apply_stats_args(&mut config, args, false)?;

    let stats = Dashboard::oneshot(config, |dash| async move {
        dash.refresh().await?;
        Ok(dash.stats())
    })
    .await?;

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        &stats,
        |s| stat_cards(s, color),
        |s| {
            format!(
                "total={} avg_da={:.1} available={} low_spam={}",
                s.total, s.average_authority_score, s.available_count, s.low_spam_count
            )
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
