use clap::{Args, Subcommand};
use suds_app::{auth::ProfileUpdate, context::AppContext};

use crate::cli::output;

#[derive(Debug, Args)]
pub(crate) struct AccountCommand {
    #[command(subcommand)]
    command: AccountSubcommand,
}

#[derive(Debug, Subcommand)]
enum AccountSubcommand {
    /// Show the profile as stored by the shop
    Show,

    /// Change name, email or password
    Update(UpdateProfileArgs),

    /// Delete the account and sign out
    Delete(DeleteAccountArgs),
}

#[derive(Debug, Args)]
struct UpdateProfileArgs {
    /// New display name
    #[arg(long)]
    name: Option<String>,

    /// New email
    #[arg(long)]
    email: Option<String>,

    /// Current password, required to set a new one
    #[arg(long, requires = "new_password")]
    current_password: Option<String>,

    /// New password
    #[arg(long, requires = "current_password")]
    new_password: Option<String>,
}

#[derive(Debug, Args)]
struct DeleteAccountArgs {
    /// Confirm the deletion; it cannot be undone
    #[arg(long)]
    yes: bool,
}

pub(crate) async fn run(command: AccountCommand, context: &AppContext) -> Result<String, String> {
    let account = &context.account;

    match command.command {
        AccountSubcommand::Show => {
            let user = account
                .refresh_profile()
                .await
                .map_err(|error| format!("failed to load profile: {error}"))?;

            Ok(output::user(&user))
        }
        AccountSubcommand::Update(args) => {
            let user = account
                .update_profile(&ProfileUpdate {
                    name: args.name,
                    email: args.email,
                    current_password: args.current_password,
                    new_password: args.new_password,
                })
                .await
                .map_err(|error| format!("failed to update profile: {error}"))?;

            Ok(format!("profile updated: {}", output::user(&user)))
        }
        AccountSubcommand::Delete(args) => {
            if !args.yes {
                return Err("refusing to delete the account without --yes".to_string());
            }

            account
                .delete_account()
                .await
                .map_err(|error| format!("failed to delete account: {error}"))?;

            Ok("account deleted".to_string())
        }
    }
}
