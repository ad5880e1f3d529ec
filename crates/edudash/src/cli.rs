//! Clap derive structures for the `edudash` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// edudash -- analytics and content admin for an education platform
#[derive(Debug, Parser)]
#[command(
    name = "edudash",
    version,
    about = "Education platform admin dashboard for the terminal",
    long_about = "Browse platform analytics (visits, content, users, payments,\n\
        favorites) and update courses and programs from the command line.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "EDUDASH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "EDUDASH_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Admin email (overrides profile)
    #[arg(long, env = "EDUDASH_EMAIL", global = true)]
    pub email: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "EDUDASH_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "EDUDASH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "EDUDASH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Debug, Clone, ValueEnum)]
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
    /// Check the configured credentials against the backend
    Login,

    /// Show an analytics view
    #[command(alias = "st")]
    Stats(StatsArgs),

    /// Update courses
    #[command(alias = "course")]
    Courses(RecordArgs),

    /// Update programs
    #[command(alias = "program")]
    Programs(RecordArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Stats ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: StatsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StatsCommand {
    /// Headline counters and the visit trend
    Overview(StatsQuery),

    /// Visits over time, top pages, device split
    Visits(StatsQuery),

    /// Most viewed courses and programs, category split
    Content(StatsQuery),

    /// Registrations, roles, most active users
    Users(StatsQuery),

    /// Revenue over time and payment status split
    Payments(StatsQuery),

    /// Most favorited courses and programs
    Favorites(StatsQuery),
}

/// Date range and presentation options shared by every view.
#[derive(Debug, Args)]
pub struct StatsQuery {
    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day of the range (YYYY-MM-DD, default today)
    #[arg(long)]
    pub to: Option<String>,

    /// Days before --to when --from is not given
    #[arg(long, conflicts_with = "from", value_parser = clap::value_parser!(u64).range(1..=3660))]
    pub days: Option<u64>,

    /// Time-series bucket size
    #[arg(long, short = 'g', value_enum)]
    pub group_by: Option<GroupByArg>,

    /// Entries shown in ranked lists
    #[arg(long, short = 'l', value_parser = clap::value_parser!(u32).range(1..=100))]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupByArg {
    Day,
    Week,
    Month,
    Year,
}

// ── Records ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RecordArgs {
    #[command(subcommand)]
    pub command: RecordCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Update a record and upload its image and video
    Save(SaveArgs),
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Record ID
    pub id: String,

    /// Title (required, at most 120 characters)
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Description (required)
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Price, non-negative
    #[arg(long, allow_hyphen_values = true)]
    pub price: Option<String>,

    /// Duration in hours, non-negative
    #[arg(long, allow_hyphen_values = true)]
    pub duration_hours: Option<String>,

    /// beginner, intermediate or advanced
    #[arg(long)]
    pub level: Option<String>,

    /// Cover image (jpeg, png, webp, gif; at most 5 MiB)
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Video (mp4, webm, mov; at most 500 MiB)
    #[arg(long)]
    pub video: Option<PathBuf>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
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
