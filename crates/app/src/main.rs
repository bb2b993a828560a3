//! Senda de Suds storefront client

use std::process;

use tracing::error;

use crate::cli::Cli;

mod cli;
mod config;
mod observability;

#[tokio::main]
pub async fn main() {
    let cli = Cli::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = observability::init_logging(&cli.config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("Logging error: {error}");
        }

        process::exit(1);
    }

    match cli.run().await {
        Ok(output) => {
            #[expect(clippy::print_stdout, reason = "command output")]
            {
                println!("{output}");
            }
        }
        Err(message) => {
            error!("{message}");
            process::exit(1);
        }
    }
}
