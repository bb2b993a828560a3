use clap::{Args, Subcommand};
use suds_app::{
    auth::{Credentials, NewUser},
    context::AppContext,
};

use crate::cli::output;

#[derive(Debug, Args)]
pub(crate) struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
enum AuthSubcommand {
    /// Sign in; the cart switches to the customer's cart
    Login(LoginArgs),

    /// Create an account and sign in
    Register(RegisterArgs),

    /// Sign out; the cart switches back to the guest cart
    Logout,

    /// Show who is signed in
    Whoami,
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long, env = "SUDS_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Args)]
struct RegisterArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long, env = "SUDS_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(command: AuthCommand, context: &AppContext) -> Result<String, String> {
    let account = &context.account;

    match command.command {
        AuthSubcommand::Login(args) => {
            let user = account
                .login(&Credentials {
                    email: args.email,
                    password: args.password,
                })
                .await
                .map_err(|error| format!("failed to sign in: {error}"))?;

            Ok(format!(
                "signed in as {}\n{}",
                output::user(&user),
                output::cart(&context.cart.view(), context.cart.mode())
            ))
        }
        AuthSubcommand::Register(args) => {
            let user = account
                .register(&NewUser {
                    name: args.name,
                    email: args.email,
                    password: args.password,
                })
                .await
                .map_err(|error| format!("failed to register: {error}"))?;

            Ok(format!("registered and signed in as {}", output::user(&user)))
        }
        AuthSubcommand::Logout => {
            account
                .logout()
                .await
                .map_err(|error| format!("failed to sign out: {error}"))?;

            Ok("signed out".to_string())
        }
        AuthSubcommand::Whoami => Ok(account
            .user()
            .map_or_else(|| "guest".to_string(), |user| output::user(&user))),
    }
}
