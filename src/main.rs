use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use sqlx::migrate::Migrator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payportal::adapters::{PostgresProfileRepository, PostgresTransactionRepository};
use payportal::cli::{Cli, Commands, DbCommands, TxCommands};
use payportal::config::Config;
use payportal::gateway::request::RequestBuilder;
use payportal::gateway::HttpGatewayClient;
use payportal::ledger::TransactionLedger;
use payportal::services::{PaymentService, ProfileService};
use payportal::{cli, create_app, db, startup, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Cli::parse();

    match args.command {
        Some(Commands::Db(DbCommands::Migrate)) => cli::handle_db_migrate(&config).await,
        Some(Commands::Tx(TxCommands::Lookup { invoice_id })) => {
            let pool = db::create_pool(&config).await?;
            cli::handle_tx_lookup(&pool, &invoice_id).await
        }
        Some(Commands::Config) => cli::handle_config_validate(&config),
        Some(Commands::Serve) | None => serve(config).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let pool = db::create_pool(&config).await?;

    let migrator = Migrator::new(Path::new("./migrations")).await?;
    migrator.run(&pool).await?;
    tracing::info!("Database migrations completed");

    let report = startup::validate_environment(&config, &pool).await?;
    report.print();
    if !report.is_valid() {
        anyhow::bail!("startup validation failed");
    }

    let endpoint = match &config.gateway_url {
        Some(url) => url.clone(),
        None => config.environment()?.endpoint().to_string(),
    };
    let gateway = Arc::new(HttpGatewayClient::with_endpoint(endpoint.clone()));
    tracing::info!("Payment gateway client initialized with URL: {}", endpoint);

    let builder = RequestBuilder::new(
        config.merchant_login_id.clone(),
        config.merchant_transaction_key.clone(),
    );

    let transactions = Arc::new(PostgresTransactionRepository::new(pool.clone()));
    let profiles = Arc::new(PostgresProfileRepository::new(pool.clone()));

    let ledger = TransactionLedger::new(transactions);
    let payments = PaymentService::new(
        ledger,
        profiles.clone(),
        gateway.clone(),
        builder.clone(),
    );
    let profile_service = ProfileService::new(profiles, gateway, builder);

    let state = AppState {
        db: pool,
        payments,
        profiles: profile_service,
    };
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
