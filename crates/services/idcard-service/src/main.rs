//! ID Card Service - command-line entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use idcard_service_lib::{
    cli::{Cli, Commands},
    commands, IdCardServiceConfig,
};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = IdCardServiceConfig::from_env();
    if let Some(url) = cli.database_url {
        config = config.with_database_url(url);
    }

    // Verbose mode sets debug level
    init_tracing(cli.verbose, &config.logging.level);
    tracing::debug!(database = ?config.database, "Configuration loaded");

    let result = match cli.command {
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
        Commands::Users(args) => commands::users::execute(args, config).await,
        Commands::Requests(args) => commands::requests::execute(args, config).await,
    };

    if let Err(e) = result {
        if e.is_client_error() {
            tracing::debug!(error = %e, "Command rejected");
        } else {
            tracing::error!(code = e.code(), "Command failed");
        }
        eprintln!("[{}] {}", e.code(), e.user_message());
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool, level: &str) {
    let filter = if verbose { "debug" } else { level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
