//! Clap derive structures for the `aerogarden` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// aerogarden -- check on and control cloud-connected AeroGardens
#[derive(Debug, Parser)]
#[command(
    name = "aerogarden",
    version,
    about = "Monitor and control AeroGarden gardens from the command line",
    long_about = "Talks to the AeroGarden cloud service with your account credentials.\n\n\
        Lists gardens and their sensors, toggles grow lights, and watches\n\
        for changes with a background poller.",
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
    /// Account profile to use
    #[arg(long, short = 'p', env = "AEROGARDEN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service base URL (overrides profile)
    #[arg(long, env = "AEROGARDEN_HOST", global = true)]
    pub host: Option<String>,

    /// Account e-mail address (overrides profile)
    #[arg(long, short = 'u', env = "AEROGARDEN_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "AEROGARDEN_OUTPUT",
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

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "AEROGARDEN_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "AEROGARDEN_TIMEOUT", global = true)]
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
    /// List and inspect gardens
    #[command(alias = "g")]
    Gardens(GardensArgs),

    /// Read garden sensors
    #[command(alias = "s")]
    Sensors(SensorsArgs),

    /// Grow light status and control
    #[command(alias = "l")]
    Light(LightArgs),

    /// Check that the account credentials are accepted
    Login,

    /// Poll the service and print every change
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Gardens ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GardensArgs {
    #[command(subcommand)]
    pub command: GardensCommand,
}

#[derive(Debug, Subcommand)]
pub enum GardensCommand {
    /// List every garden on the account
    #[command(alias = "ls")]
    List,

    /// Show one garden with all its raw fields
    Show {
        /// Garden key (device address plus config id)
        key: String,
    },

    /// Print a single raw field of a garden
    Get {
        /// Garden key
        key: String,

        /// Field name, e.g. "pumpLevel"
        field: String,
    },
}

// ── Sensors ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SensorsArgs {
    /// Only show sensors of this garden
    #[arg(long, short = 'g')]
    pub garden: Option<String>,
}

// ── Light ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LightArgs {
    #[command(subcommand)]
    pub command: LightCommand,
}

#[derive(Debug, Subcommand)]
pub enum LightCommand {
    /// Show the light state of every garden
    #[command(alias = "ls")]
    List,

    /// Advance a garden's light one step (bright, dimmed, off)
    Toggle {
        /// Garden key
        key: String,
    },
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll period in seconds (overrides profile)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Watch every configured profile instead of the active one
    #[arg(long, short = 'a')]
    pub all: bool,
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

    /// Display current configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key, e.g. "username" or "poll_interval_secs"
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the active profile's password in the system keyring
    SetPassword,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
