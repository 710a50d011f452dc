use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

use coffer_core::VERSION;

use crate::ui::ListFormat;

/// Coffer - hybrid-encrypted file backups with admin-only restore
#[derive(Parser)]
#[command(name = "coffer")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Vault root directory (overrides the config file)
    #[arg(short, long, global = true, env = "COFFER_ROOT")]
    pub root: Option<String>,

    /// Username for commands that need a session
    #[arg(short, long, global = true, env = "COFFER_USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Vault root to create (defaults to $XDG_DATA_HOME/coffer)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `register` command
#[derive(Args)]
pub struct RegisterArgs {
    /// Username for the new account
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Role for the new account (admin or user)
    #[arg(long)]
    pub role: String,
}

/// Arguments for the `backup` command
#[derive(Args)]
pub struct BackupArgs {
    /// File to back up
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Backup name (defaults to a generated, time-ordered id)
    #[arg(long)]
    pub name: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format
    #[arg(long, value_enum, conflicts_with = "json")]
    pub format: Option<ListFormat>,

    /// Only print backup names
    #[arg(long)]
    pub names_only: bool,
}

/// Arguments for the `restore` command
#[derive(Args)]
pub struct RestoreArgs {
    /// Backup name as shown by `coffer list`
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Output path (defaults to the original file name in the current directory)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `status` command
#[derive(Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a vault and write the config file
    Init(InitArgs),

    /// Register a new account
    Register(RegisterArgs),

    /// Generate the vault key pair (admin only)
    Keygen,

    /// Encrypt a file into a new backup
    Backup(BackupArgs),

    /// List backups
    List(ListArgs),

    /// Decrypt a backup (admin only)
    Restore(RestoreArgs),

    /// Show vault, account and key status
    Status(StatusArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
