//! Clap derive structures for the `dropradar` CLI.
//!
//! Defines the command tree, global flags, and shared value types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use dropradar_core::{DomainId, ScanMode, StatsSource};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// dropradar -- watch expiring domains from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "dropradar",
    version,
    about = "Track expiring and dropped domains from the command line",
    long_about = "A terminal dashboard for the DropRadar backend.\n\n\
        Lists expiring domains with their authority, backlink and spam scores,\n\
        shows aggregate stats, and triggers backend scans.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "DROPRADAR_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, short = 'u', env = "DROPRADAR_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "DROPRADAR_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "DROPRADAR_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, delete, and clear tracked domains
    #[command(alias = "d")]
    Domains(DomainsArgs),

    /// Show aggregate statistics
    Stats(StatsArgs),

    /// Stats cards plus the domain table, optionally kept live
    #[command(alias = "dash")]
    Dashboard(DashboardArgs),

    /// Trigger a backend scan for newly dropped domains
    Scan(ScanArgs),

    /// Push notification helpers
    Notify(NotifyArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Server-side filters plus client-side narrowing for domain lists.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Max rows to fetch
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Rows to skip
    #[arg(long)]
    pub skip: Option<u32>,

    /// Minimum authority score
    #[arg(long)]
    pub min_da: Option<u32>,

    /// Maximum spam score
    #[arg(long)]
    pub max_spam: Option<u32>,

    /// Only rows with this status (available, auction, pending)
    #[arg(long)]
    pub status: Option<String>,

    /// Only domains that would trigger a high-value notification
    #[arg(long)]
    pub high_value: bool,
}

// ── Domains ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DomainsArgs {
    #[command(subcommand)]
    pub command: DomainsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DomainsCommand {
    /// List tracked domains
    #[command(alias = "ls")]
    List(ListArgs),

    /// Delete one domain by id
    #[command(alias = "rm")]
    Delete {
        /// Domain id (see `domains list`)
        id: DomainId,
    },

    /// Delete every tracked domain
    Clear,

    /// Print the registrar search link for a domain
    Link {
        /// Domain id (see `domains list`)
        id: DomainId,
    },
}

// ── Stats / Dashboard ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Where stats come from: server or local
    #[arg(long)]
    pub source: Option<StatsSource>,

    /// Low-spam threshold for local stats (exclusive)
    #[arg(long)]
    pub low_spam_threshold: Option<u32>,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub list: ListArgs,

    #[command(flatten)]
    pub stats: StatsArgs,

    /// Refresh every N seconds until interrupted
    #[arg(long, short = 'w', value_name = "SECS")]
    pub watch: Option<u64>,
}

// ── Scan ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Data source: mock, domainsdb, expireddomains, mixed
    #[arg(long, short = 'm')]
    pub mode: Option<ScanMode>,

    /// Bark device key for high-value notifications
    #[arg(long, env = "DROPRADAR_BARK_KEY", hide_env_values = true)]
    pub bark_key: Option<String>,

    /// Scan deadline in seconds (minimum 30)
    #[arg(long)]
    pub scan_timeout: Option<u64>,
}

// ── Notify ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NotifyArgs {
    #[command(subcommand)]
    pub command: NotifyCommand,
}

#[derive(Debug, Subcommand)]
pub enum NotifyCommand {
    /// Send a test push to the configured Bark device
    Test {
        /// Bark device key (overrides profile)
        #[arg(long, env = "DROPRADAR_BARK_KEY", hide_env_values = true)]
        bark_key: Option<String>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Show the current configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Set a key on the active profile
    Set {
        /// api_url, scan_mode, stats_source, low_spam_threshold, timeout,
        /// scan_timeout, bark_key_env
        key: String,
        value: String,
    },

    /// Store a bark key in the system keyring
    SetBarkKey {
        /// Profile to store it for (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_scan_mode_and_domain_id() {
        let cli = Cli::try_parse_from(["dropradar", "scan", "--mode", "mixed"]).ok();
        assert!(matches!(
            cli.map(|c| c.command),
            Some(Command::Scan(ScanArgs {
                mode: Some(ScanMode::Mixed),
                ..
            }))
        ));

        let cli = Cli::try_parse_from(["dropradar", "domains", "delete", "42"]).ok();
        assert!(matches!(
            cli.map(|c| c.command),
            Some(Command::Domains(DomainsArgs {
                command: DomainsCommand::Delete { id },
            })) if id == DomainId::from(42)
        ));
    }
}
