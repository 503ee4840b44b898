//! Dashboard handler: stats cards above the domain table, once or live.

use std::io::IsTerminal;
use std::sync::Arc;

use tracing::{debug, warn};

use dropradar_core::{Dashboard, DashboardConfig, DashboardView, RequestState, Slot, Stats};

use crate::cli::{DashboardArgs, GlobalOpts, OutputFormat};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::{domains, stats, util};

/// Minimum `--watch` interval accepted.
const MIN_WATCH_SECS: u64 = 5;

pub async fn handle(
    args: DashboardArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut config = resolved.dashboard.clone();
    config.query = util::list_query(&args.list);
    util::apply_stats_args(&mut config, &args.stats, util::narrows(&args.list))?;
    let threshold = config.low_spam_threshold;

    match args.watch {
        None => {
            let view = Dashboard::oneshot(config, |dash| async move {
                dash.refresh().await?;
                Ok(dash.view())
            })
            .await?;
            let out = render(global, &narrow(view, args.list.high_value, threshold))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        Some(secs) => {
            if secs < MIN_WATCH_SECS {
                return Err(CliError::Validation {
                    field: "watch".into(),
                    reason: format!("interval must be at least {MIN_WATCH_SECS}s"),
                });
            }
            config.refresh_interval_secs = secs;
            watch(config, args.list.high_value, global).await
        }
    }
}

/// Keep the dashboard live, re-rendering on every applied refresh until
/// Ctrl-C.
async fn watch(
    config: DashboardConfig,
    high_value: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let threshold = config.low_spam_threshold;
    let dash = Dashboard::new(config)?;
    let mut view_rx = dash.subscribe_view();
    let mut load_rx = dash.subscribe_state(Slot::Load);

    if let Err(e) = dash.start().await {
        warn!(error = %e, "initial load failed; will retry on the next tick");
    }
    redraw(global, &narrow(dash.view(), high_value, threshold))?;
    view_rx.borrow_and_update();

    let color = output::should_color(global.color);
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    let result = loop {
        tokio::select! {
            biased;

            _ = &mut interrupt => {
                debug!("interrupted");
                break Ok(());
            }

            Ok(()) = view_rx.changed() => {
                let view = view_rx.borrow_and_update().clone();
                if let Err(e) = redraw(global, &narrow(view, high_value, threshold)) {
                    break Err(e);
                }
            }

            Ok(()) = load_rx.changed() => {
                let state = load_rx.borrow_and_update().clone();
                if let RequestState::Failed { reason } = state {
                    output::notice(
                        &output::muted(&format!("refresh failed: {reason}"), color),
                        global.quiet,
                    );
                }
            }
        }
    };

    dash.dispose().await;
    result
}

/// Apply the client-side `--high-value` filter. Stats are recomputed so
/// the cards describe the rows shown.
fn narrow(view: DashboardView, high_value: bool, low_spam_threshold: u32) -> DashboardView {
    if !high_value {
        return view;
    }
    let domains = view.high_value().cloned().collect::<Vec<_>>();
    DashboardView {
        stats: Stats::from_domains(&domains, low_spam_threshold),
        domains: Arc::new(domains),
        ..view
    }
}

fn redraw(global: &GlobalOpts, view: &DashboardView) -> Result<(), CliError> {
    let out = render(global, view)?;
    if global.output == OutputFormat::Table && std::io::stdout().is_terminal() {
        // Clear screen, cursor home.
        print!("\x1b[2J\x1b[H");
    }
    output::print_output(&out, global.quiet);
    Ok(())
}

fn render(global: &GlobalOpts, view: &DashboardView) -> Result<String, CliError> {
    let color = output::should_color(global.color);
    match global.output {
        OutputFormat::Table => {
            let cards = stats::stat_cards(&view.stats, color);
            let table = domains::render_domains(OutputFormat::Table, &view.domains)?;
            let stamp = view.updated_at.map_or_else(
                || "never refreshed".to_owned(),
                |at| format!("updated {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            );
            Ok(format!(
                "{cards}\n\n{table}\n{}",
                output::muted(&stamp, color)
            ))
        }
        OutputFormat::Plain => domains::render_domains(OutputFormat::Plain, &view.domains),
        format => output::render_single(format, view, |_| String::new(), |_| String::new()),
    }
}
