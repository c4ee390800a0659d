use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

#[derive(Debug, Parser)]
#[command(name = "florin", about = "Personal finance tracking from the command line", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List accounts known to the server.
    Accounts,
    /// List categories known to the server.
    Categories,
    /// Import a CSV bank statement into an account.
    Import {
        /// Statement file to import (.csv).
        file: PathBuf,
        /// Target account id (see `florin accounts`).
        #[arg(long)]
        account: i64,
        /// Apply one category to every imported row.
        #[arg(long)]
        category: Option<String>,
        /// Fill empty categories from your categorized history.
        #[arg(long)]
        suggest: bool,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = config::Config::load()?;
    tracing::debug!(api_url = %config.api_url, "configuration loaded");
    let client = florin_import::ApiClient::new(&config.api_url, config.user_id);

    match cli.command {
        Command::Accounts => commands::list_accounts(&client).await,
        Command::Categories => commands::list_categories(&client).await,
        Command::Import {
            file,
            account,
            category,
            suggest,
            yes,
        } => commands::import(&client, &file, account, category.as_deref(), suggest, yes).await,
    }
}
