//! Coffer CLI - hybrid-encrypted file backups with admin-only restore
//!
//! A thin presentation layer over `coffer-core`: each subcommand performs
//! one core operation and renders its result. All cryptographic state
//! lives in the core.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod ui;

use clap::{CommandFactory, Parser};
use coffer_core::CofferError;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{accounts, backups, init, keys, misc};
use crate::constants::{env, DEFAULT_LOG_FILTER};
use crate::errors::{core_hint, exit_code_for, CliError};
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);
    init_tracing(&ctx);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context(false, None);
        let (message, hint) = describe_error(&e);
        print_error(&ui_ctx, &message, hint.as_deref());
        std::process::exit(exit_code_for(&e));
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => init::handle_init(ctx, args),
        Some(Commands::Register(args)) => accounts::handle_register(ctx, args),
        Some(Commands::Keygen) => keys::handle_keygen(ctx),
        Some(Commands::Backup(args)) => backups::handle_backup(ctx, args),
        Some(Commands::List(args)) => backups::handle_list(ctx, args),
        Some(Commands::Restore(args)) => backups::handle_restore(ctx, args),
        Some(Commands::Status(args)) => keys::handle_status(ctx, args),
        Some(Commands::Completions(args)) => misc::handle_completions(args.shell),
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Install the stderr log subscriber.
///
/// Precedence: `-v`/`-vv`, then COFFER_LOG, then `[logging] filter` from
/// the config file, then `warn`.
fn init_tracing(ctx: &AppContext) {
    let directive = match ctx.cli().verbose {
        0 => std::env::var(env::LOG)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                ctx.config()
                    .ok()
                    .flatten()
                    .and_then(|config| config.logging.filter.clone())
            })
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    };
    let filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Split an error into its message and a hint line, if any.
fn describe_error(err: &anyhow::Error) -> (String, Option<String>) {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        let text = cli_err.to_string();
        return match text.split_once("\nHint: ") {
            Some((message, hint)) => (message.to_string(), Some(hint.to_string())),
            None => (text, None),
        };
    }
    if let Some(core) = err.downcast_ref::<CofferError>() {
        return (core.to_string(), core_hint(core).map(String::from));
    }
    (format!("{:#}", err), None)
}
