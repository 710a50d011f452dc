use std::path::{Path, PathBuf};

use coffer_core::BackupInfo;

use crate::app::AppContext;
use crate::cli::{BackupArgs, ListArgs, RestoreArgs};
use crate::errors::CliError;
use crate::ui::format::{format_bytes, format_datetime, format_size};
use crate::ui::{hint, receipt, table, UiContext};

pub fn handle_backup(ctx: &AppContext, args: &BackupArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let session = ctx.login(&vault)?;
    let source = Path::new(&args.file);

    let info = match args.name.as_deref() {
        Some(name) => vault.create_backup_named(&session, source, name)?,
        None => vault.create_backup(&session, source)?,
    };
    session.logout();

    let ui = ctx.ui_context(args.json, None);
    if ui.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else if ctx.quiet() {
        println!("{}", info.name);
    } else {
        let pretty = ui.mode.is_pretty();
        println!(
            "{}",
            receipt(
                &ui,
                "Backup created",
                &[
                    ("Name", info.name.to_string()),
                    ("Original file", info.original_file_name.clone()),
                    ("Size", format_size(info.size, pretty)),
                    ("Created", format_datetime(info.created_at.as_ref(), pretty)),
                ],
            )
        );
    }
    Ok(())
}

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let ui = ctx.ui_context(args.json, args.format);

    if args.names_only {
        let names = vault.list_backups()?;
        if ui.mode.is_json() {
            println!("{}", serde_json::to_string_pretty(&names)?);
        } else {
            for name in names {
                println!("{}", name);
            }
        }
        return Ok(());
    }

    let details = vault.backup_details()?;
    if ui.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    if details.is_empty() {
        if ui.mode.is_pretty() && !ctx.quiet() {
            println!("No backups yet.");
            println!("{}", hint(&ui, "coffer backup <FILE>"));
        }
        return Ok(());
    }

    println!("{}", render_backups(&ui, &details));
    Ok(())
}

fn render_backups(ui: &UiContext, details: &[BackupInfo]) -> String {
    let pretty = ui.mode.is_pretty();
    let rows: Vec<Vec<String>> = details
        .iter()
        .map(|info| {
            vec![
                info.name.to_string(),
                info.original_file_name.clone(),
                format_datetime(info.created_at.as_ref(), pretty),
                format_size(info.size, pretty),
            ]
        })
        .collect();
    table(ui, &["NAME", "ORIGINAL FILE", "CREATED", "SIZE"], &rows)
}

pub fn handle_restore(ctx: &AppContext, args: &RestoreArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let session = ctx.login(&vault)?;
    session.require_admin("restore backups")?;

    let output = match args.output.as_deref() {
        Some(path) => PathBuf::from(path),
        None => {
            let info = vault.backup_info(&args.name)?;
            default_output_path(&info.original_file_name)?
        }
    };

    let report = vault.restore_backup(&session, &args.name, &output)?;
    session.logout();

    let ui = ctx.ui_context(args.json, None);
    if ui.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if ctx.quiet() {
        println!("{}", report.output_path.display());
    } else {
        println!(
            "{}",
            receipt(
                &ui,
                "Backup restored",
                &[
                    ("Name", report.name.to_string()),
                    ("Original file", report.original_file_name.clone()),
                    ("Output", report.output_path.display().to_string()),
                    ("Size", format_bytes(report.bytes_written)),
                ],
            )
        );
    }
    Ok(())
}

/// The recorded original name, reduced to its final component, in the
/// current directory.
fn default_output_path(original_file_name: &str) -> anyhow::Result<PathBuf> {
    let file_name = Path::new(original_file_name)
        .file_name()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            CliError::invalid_input(format!(
                "Backup records no usable file name ({:?}); pass an OUTPUT path",
                original_file_name
            ))
        })?;
    Ok(std::env::current_dir()?.join(file_name))
}
