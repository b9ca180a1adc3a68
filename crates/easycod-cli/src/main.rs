mod import;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "easycod-cli")]
#[command(about = "EasyCOD delivery-rate command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the supported delivery providers
    Providers,
    /// Fetch and normalize delivery rates from a provider
    Import(ImportArgs),
    /// Database operations
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, clap::Args)]
struct ImportArgs {
    /// Provider id (e.g. `noest`, `ecotrack`, `maystro`)
    #[arg(long)]
    provider: String,
    /// Provider API token
    #[arg(long, env = "EASYCOD_PROVIDER_TOKEN", hide_env_values = true)]
    token: String,
    /// User GUID (Noest only)
    #[arg(long)]
    guid: Option<String>,
    /// Override the provider's base URL
    #[arg(long)]
    api_url: Option<String>,
    /// Print the outcome as JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Shop whose manual rates should be replaced by the import
    #[arg(long, requires = "save")]
    shop: Option<String>,
    /// Persist the imported rates as the shop's manual fallback
    #[arg(long, requires = "shop")]
    save: bool,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(std::env::var("EASYCOD_LOG_LEVEL").unwrap_or_else(|_| "info".into()))
    })?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Providers) => import::print_providers(),
        Some(Commands::Import(args)) => import::run_import(args).await?,
        Some(Commands::Db { command }) => run_db(command).await?,
        None => println!("easycod-cli: run with --help for usage"),
    }

    Ok(())
}

async fn run_db(command: DbCommands) -> anyhow::Result<()> {
    let config = easycod_core::load_app_config_from_env()?;
    let pool = easycod_db::connect_pool(
        &config.database_url,
        easycod_db::PoolConfig::from_app_config(&config),
    )
    .await?;

    let result = match command {
        DbCommands::Ping => easycod_db::ping(&pool).await.map(|()| {
            println!("database reachable");
        }),
        DbCommands::Migrate => easycod_db::run_migrations(&pool)
            .await
            .map(|applied| println!("applied {applied} migration(s)"))
            .map_err(sqlx::Error::from),
    };

    easycod_db::close_pool(&pool).await;
    result.map_err(Into::into)
}
