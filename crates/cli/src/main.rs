//! Grocery CLI - database migrations and user management.
//!
//! # Usage
//!
//! ```bash
//! # Apply schema migrations and create the session table
//! grocery-cli migrate
//!
//! # Create a user without going through the sign-up form
//! grocery-cli user create --username alice --password 'correct horse battery'
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "grocery-cli")]
#[command(author, version, about = "Grocery site CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Login name (3-80 characters, no spaces)
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create { username, password } => {
                commands::user::create(&username, &password).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_user_create() {
        let cli = Cli::try_parse_from([
            "grocery-cli",
            "user",
            "create",
            "--username",
            "alice",
            "--password",
            "longenough",
        ])
        .unwrap_or_else(|e| panic!("{e}"));

        match cli.command {
            Commands::User {
                action: UserAction::Create { username, password },
            } => {
                assert_eq!(username, "alice");
                assert_eq!(password, "longenough");
            }
            Commands::Migrate => panic!("expected user create"),
        }
    }
}
