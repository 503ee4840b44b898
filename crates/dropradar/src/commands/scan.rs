//! Scan trigger with a progress spinner.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use dropradar_core::{Dashboard, ScanOptions, ScanResult};

use crate::cli::{GlobalOpts, ScanArgs};
use crate::config::{self, Resolved};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    args: ScanArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mode = match args.mode {
        Some(mode) => Some(mode),
        None => resolved.profile.scan_mode()?,
    };
    let options = ScanOptions {
        mode,
        bark_key: config::resolve_bark_key(
            args.bark_key.as_deref(),
            &resolved.profile,
            &resolved.profile_name,
        ),
    };

    let mut dash_config = resolved.dashboard.clone();
    if let Some(secs) = args.scan_timeout {
        dash_config.scan_timeout = Duration::from_secs(secs);
    }

    let spinner = (!global.quiet).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(match mode {
            Some(mode) => format!("Scanning ({mode})"),
            None => "Scanning".to_owned(),
        });
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let outcome = Dashboard::oneshot(dash_config, |dash| async move {
        let result = dash.scan(&options).await?;
        let high_value = dash.view().high_value().count();
        Ok((result, high_value))
    })
    .await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let (result, high_value) = outcome?;

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        &result,
        |r| summary(r, high_value, color),
        |r| r.domains_found.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn summary(result: &ScanResult, high_value: usize, color: bool) -> String {
    let mut lines = vec![
        output::success(&result.message, color),
        format!(
            "{} {}",
            output::muted("Found:", color),
            output::accent(&result.domains_found.to_string(), color)
        ),
    ];
    if high_value > 0 {
        lines.push(format!(
            "{} {}",
            output::muted("High value now tracked:", color),
            output::accent(&high_value.to_string(), color)
        ));
    }
    lines.join("\n")
}
