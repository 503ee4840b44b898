//! Domain list / delete / clear handlers.

use tabled::Tabled;

use dropradar_core::{Dashboard, Domain, DomainId, StatsSource};

use crate::cli::{DomainsArgs, DomainsCommand, GlobalOpts, ListArgs, OutputFormat};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct DomainRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Domain")]
    name: String,
    #[tabled(rename = "DA")]
    authority: u32,
    #[tabled(rename = "Backlinks")]
    backlinks: u64,
    #[tabled(rename = "Spam")]
    spam: u32,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Drops")]
    drop_date: String,
}

impl From<&Domain> for DomainRow {
    fn from(d: &Domain) -> Self {
        Self {
            id: d.id.to_string(),
            name: if d.is_high_value() {
                format!("{} *", d.name)
            } else {
                d.name.clone()
            },
            authority: d.authority_score,
            backlinks: d.backlinks,
            spam: d.spam_score,
            status: d.status.to_string(),
            drop_date: d
                .drop_date
                .map_or_else(|| "-".into(), |date| date.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Render domains in the chosen format. Plain output is one name per line.
pub(crate) fn render_domains(format: OutputFormat, domains: &[Domain]) -> Result<String, CliError> {
    output::render_list(format, domains, |d| DomainRow::from(d), |d| d.name.clone())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: DomainsArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DomainsCommand::List(list) => {
            let domains = fetch(resolved, &list).await?;
            let out = render_domains(global.output, &domains)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DomainsCommand::Delete { id } => {
            if !util::confirm("delete", &format!("Delete domain {id}?"), global.yes)? {
                output::notice("Aborted", global.quiet);
                return Ok(());
            }
            let message =
                Dashboard::oneshot(resolved.dashboard.clone(), |dash| async move {
                    dash.remove(id).await
                })
                .await?;
            output::notice(&message, global.quiet);
            Ok(())
        }

        DomainsCommand::Clear => {
            if !util::confirm(
                "clear",
                "Delete ALL tracked domains? This cannot be undone.",
                global.yes,
            )? {
                output::notice("Aborted", global.quiet);
                return Ok(());
            }
            let message =
                Dashboard::oneshot(resolved.dashboard.clone(), |dash| async move {
                    dash.clear_all().await
                })
                .await?;
            output::notice(&message, global.quiet);
            Ok(())
        }

        DomainsCommand::Link { id } => {
            let domains = fetch(resolved, &ListArgs::default()).await?;
            let domain = find(&domains, id)?;
            output::print_output(&domain.registration_url(), global.quiet);
            Ok(())
        }
    }
}

/// One refresh with the given filters; `--high-value` narrows locally.
/// Stats are never shown here, so `/stats` is not fetched.
async fn fetch(resolved: &Resolved, list: &ListArgs) -> Result<Vec<Domain>, CliError> {
    let mut config = resolved.dashboard.clone();
    config.query = util::list_query(list);
    config.stats_source = StatsSource::Local;

    let view = Dashboard::oneshot(config, |dash| async move {
        dash.refresh().await?;
        Ok(dash.view())
    })
    .await?;

    let domains = if list.high_value {
        view.high_value().cloned().collect()
    } else {
        view.domains.as_ref().clone()
    };
    Ok(domains)
}

fn find(domains: &[Domain], id: DomainId) -> Result<&Domain, CliError> {
    domains
        .iter()
        .find(|d| d.id == id)
        .ok_or_else(|| CliError::NotFound { id: id.to_string() })
}
