use std::path::PathBuf;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_vault_root, write_config, CliConfig};
use crate::errors::CliError;
use crate::ui::{hint, receipt};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}. Use --force to overwrite it.",
            config_path.display()
        ))
        .into());
    }

    let root = match args.path.as_deref().or(ctx.cli().root.as_deref()) {
        Some(path) => absolute(PathBuf::from(path))?,
        None => default_vault_root()?,
    };

    let vault = ctx.open_vault_at(root)?;
    let root = vault.config().root().to_path_buf();
    write_config(&config_path, &CliConfig::new(&root))?;

    if !ctx.quiet() {
        let ui = ctx.ui_context(false, None);
        println!(
            "{}",
            receipt(
                &ui,
                "Vault initialized",
                &[
                    ("Root", root.display().to_string()),
                    ("Config", config_path.display().to_string()),
                ],
            )
        );
        if ui.mode.is_pretty() {
            println!(
                "{}",
                hint(&ui, "coffer register <USERNAME> --role admin")
            );
        }
    }
    Ok(())
}

fn absolute(path: PathBuf) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
