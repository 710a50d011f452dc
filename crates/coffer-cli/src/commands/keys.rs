use coffer_core::KeyPairStatus;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::StatusArgs;
use crate::ui::{kv, print_warning, receipt, Spinner};

pub fn handle_keygen(ctx: &AppContext) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let session = ctx.login(&vault)?;
    let ui = ctx.ui_context(false, None);

    let spinner = Spinner::start(&ui, "Generating RSA-2048 key pair");
    let info = match vault.generate_key_pair(&session) {
        Ok(info) => {
            spinner.finish("Key pair generated");
            info
        }
        Err(err) => {
            spinner.clear();
            return Err(err.into());
        }
    };
    session.logout();

    if !ctx.quiet() {
        println!(
            "{}",
            receipt(
                &ui,
                "Key pair written",
                &[
                    ("Public key", info.public_key_path.display().to_string()),
                    ("Private key", info.private_key_path.display().to_string()),
                    ("Sealed", yes_no(info.sealed).to_string()),
                ],
            )
        );
        if !info.sealed {
            print_warning(
                &ui,
                "Private key is stored unencrypted; anyone who can read it can restore every backup.",
            );
        }
    }
    Ok(())
}

pub fn handle_status(ctx: &AppContext, args: &StatusArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json, None);
    let vault = ctx.open_vault()?;
    let users = vault.usernames()?;
    let keys = vault.key_status()?;
    let backups = vault.list_backups()?;
    let config_path = resolve_config_path()?;

    if ui.mode.is_json() {
        let output = serde_json::json!({
            "root": vault.config().root(),
            "config": config_path,
            "users": users.len(),
            "public_key": keys.public_key_present,
            "private_key": keys.private_key_present,
            "private_key_sealed": keys.private_key_sealed,
            "backups": backups.len(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let lines = [
        kv(&ui, "Root", &vault.config().root().display().to_string()),
        kv(&ui, "Config", &config_path.display().to_string()),
        kv(&ui, "Users", &users.len().to_string()),
        kv(&ui, "Key pair", key_pair_label(&keys)),
        kv(&ui, "Backups", &backups.len().to_string()),
    ];
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn key_pair_label(status: &KeyPairStatus) -> &'static str {
    match (
        status.public_key_present,
        status.private_key_present,
        status.private_key_sealed,
    ) {
        (true, true, true) => "present (private key sealed)",
        (true, true, false) => "present",
        (true, false, _) => "public key only",
        (false, true, _) => "private key only",
        (false, false, _) => "missing",
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
