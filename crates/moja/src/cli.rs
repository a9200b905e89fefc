//! Clap derive structures for the `moja` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

use moja_core::{Role, UpstreamVariant};

use crate::commands::util::parse_time;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// moja -- reach your cameras locally when you can, through the cloud when you can't
#[derive(Debug, Parser)]
#[command(
    name = "moja",
    version,
    about = "Talk to moja cameras and the recorder from the command line",
    long_about = "Query and control moja camera devices.\n\n\
        Live calls (status, sensor, stream) probe the device on the local\n\
        network first and fall back to the recorder or relay when it does\n\
        not answer. History and administration always go to the recorder.",
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
    /// Deployment profile to use
    #[arg(long, short = 'p', env = "MOJA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Recorder URL (overrides profile)
    #[arg(long, short = 'r', env = "MOJA_RECORDER_URL", global = true)]
    pub recorder: Option<String>,

    /// Relay URL (overrides profile)
    #[arg(long, env = "MOJA_RELAY_URL", global = true)]
    pub relay: Option<String>,

    /// Fallback upstream for live calls (overrides profile)
    #[arg(long, global = true)]
    pub variant: Option<VariantArg>,

    /// Bearer token
    #[arg(long, env = "MOJA_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MOJA_OUTPUT",
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

    /// Accept self-signed TLS certificates from devices on the local network
    #[arg(long, short = 'k', env = "MOJA_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default: none)
    #[arg(long, env = "MOJA_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Local reachability probe deadline in milliseconds
    #[arg(long, env = "MOJA_PROBE_TIMEOUT_MS", global = true)]
    pub probe_timeout_ms: Option<u64>,
}

// ── Shared Enums ─────────────────────────────────────────────────────

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

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VariantArg {
    /// Fall back through the recorder's `get/<name>` proxy
    Recorder,
    /// Fall back through the bare relay
    Relay,
}

impl From<VariantArg> for UpstreamVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Recorder => UpstreamVariant::Recorder,
            VariantArg::Relay => UpstreamVariant::Relay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Admin,
    User,
}

impl From<RoleArg> for Role {
    fn from(r: RoleArg) -> Self {
        match r {
            RoleArg::Admin => Role::Admin,
            RoleArg::User => Role::User,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List devices and manage their role allowlists
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage recorder users and roles
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Live status document from a device
    Status(DeviceArg),

    /// Live sensor sample from a device
    Sensor(DeviceArg),

    /// Start a device's live stream and print the playlist URL
    Stream(DeviceArg),

    /// Recordings stored for a device
    #[command(alias = "rec")]
    Recordings(HistoryArgs),

    /// Logged sensor readings for a device
    Sensors(HistoryArgs),

    /// Relay service operations
    Relay(RelayArgs),

    /// Recorder liveness check
    Health,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeviceArg {
    /// Device name
    pub name: String,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Device name
    pub name: String,

    /// Start of range (RFC 3339 or YYYY-MM-DD, UTC)
    #[arg(long, value_parser = parse_time)]
    pub from: Option<DateTime<Utc>>,

    /// End of range (RFC 3339 or YYYY-MM-DD, UTC)
    #[arg(long, value_parser = parse_time)]
    pub to: Option<DateTime<Utc>>,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices visible to you
    #[command(alias = "ls")]
    List,

    /// Show one device
    Get(DeviceArg),

    /// Replace a device's role allowlist
    SetRoles {
        /// Device name
        name: String,

        /// Roles allowed to see the device (none clears the list)
        #[arg(value_enum)]
        roles: Vec<RoleArg>,
    },
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List all users
    #[command(alias = "ls")]
    List,

    /// Show the signed-in user
    Me,

    /// Print the signed-in user's role
    Role,

    /// Grant or revoke a user's role
    SetRole {
        /// User ID
        id: String,

        /// New role (omit to revoke)
        #[arg(value_enum)]
        role: Option<RoleArg>,
    },
}

// ── Relay ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RelayArgs {
    #[command(subcommand)]
    pub command: RelayCommand,
}

#[derive(Debug, Subcommand)]
pub enum RelayCommand {
    /// Devices currently registered with the relay
    #[command(alias = "ls")]
    List,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the loaded configuration (secrets masked)
    Show,

    /// Create or update a profile
    Init(InitArgs),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Profile name
    #[arg(long, default_value = "default")]
    pub name: String,

    /// Recorder URL
    #[arg(long)]
    pub recorder_url: String,

    /// Relay URL
    #[arg(long)]
    pub relay_url: Option<String>,

    /// Fallback upstream for live calls
    #[arg(long, value_enum, default_value = "recorder")]
    pub variant: VariantArg,

    /// Environment variable to read the token from
    #[arg(long)]
    pub token_env: Option<String>,

    /// Store the --token value in the system keyring
    #[arg(long)]
    pub keyring: bool,

    /// Make this the default profile
    #[arg(long)]
    pub default: bool,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
