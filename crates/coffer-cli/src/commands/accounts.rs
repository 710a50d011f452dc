use crate::app::{read_new_password, AppContext};
use crate::cli::RegisterArgs;
use crate::ui::receipt;

pub fn handle_register(ctx: &AppContext, args: &RegisterArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let password = read_new_password(&args.username, ctx.interactive())?;
    let role = vault.register(&args.username, &password, &args.role)?;

    if !ctx.quiet() {
        let ui = ctx.ui_context(false, None);
        println!(
            "{}",
            receipt(
                &ui,
                "Account registered",
                &[
                    ("Username", args.username.clone()),
                    ("Role", role.to_string()),
                ],
            )
        );
    }
    Ok(())
}
