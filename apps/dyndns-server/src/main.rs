//! Daemon binary (C7 HTTP Surface composition root, plus the `create-user`
//! admin path). `SPEC_FULL.md` §6.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use dyndns_core::api::rest::{build_router, AppState};
use dyndns_core::domain::engine::AliasEngine;
use dyndns_core::domain::models::DomainConfig;
use dyndns_core::domain::provisioner::Provisioner;
use dyndns_core::domain::registry::ProvisionerRegistry;
use dyndns_core::domain::storage::StorageBackend;
use dyndns_core::infra::storage::{Migrator, SeaOrmStorage};
use dyndns_provisioner_ovh::{OvhCredentials, OvhProvisioner};
use sea_orm_migration::MigratorTrait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Dynamic DNS control-plane daemon.
#[derive(Parser)]
#[command(name = "dyndns-server")]
#[command(about = "Dynamic DNS control-plane daemon")]
struct Cli {
    /// Path to a YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon (default).
    Run,
    /// Create a user account; the password is read from standard input.
    CreateUser {
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config =
        AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.level))
        .init();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(config).await,
        Commands::CreateUser { email } => create_user(config, &email).await,
    }
}

fn token_codec(config: &AppConfig) -> dyndns_auth::TokenCodec {
    let ttl = time::Duration::try_from(config.api.token_ttl)
        .ok()
        .filter(|d| *d > time::Duration::ZERO);
    dyndns_auth::TokenCodec::new(config.api.signing_key.as_bytes(), ttl)
}

async fn build_engine(
    config: &AppConfig,
    tokens: dyndns_auth::TokenCodec,
) -> Result<AliasEngine> {
    let db = dyndns_db::DbManager::connect(&config.database.driver, &config.database.dsn)
        .await
        .context("failed to connect to database")?;
    db.migrate::<Migrator>().await.context("failed to run migrations")?;

    let storage: Arc<dyn StorageBackend> = Arc::new(SeaOrmStorage::new(db.connection().clone()));

    let mut bindings = Vec::new();
    for entry in &config.daemon.dns_provisioners {
        let domains: Vec<DomainConfig> = entry
            .domains
            .iter()
            .map(|d| DomainConfig {
                host: d.host.clone(),
                apex: d.apex.clone(),
            })
            .collect();

        let provisioner: Arc<dyn Provisioner> = match entry.name.as_str() {
            "ovh" => {
                let credentials = OvhCredentials {
                    endpoint: required_option(&entry.config, "endpoint", &entry.name)?,
                    app_key: required_option(&entry.config, "app-key", &entry.name)?,
                    app_secret: required_option(&entry.config, "app-secret", &entry.name)?,
                    consumer_key: required_option(&entry.config, "consumer-key", &entry.name)?,
                };
                Arc::new(OvhProvisioner::new(credentials)?)
            }
            other => anyhow::bail!("unknown provisioner: {other}"),
        };

        bindings.push((entry.name.clone(), provisioner, domains));
    }

    let registry = ProvisionerRegistry::build(bindings)
        .map_err(|e| anyhow::anyhow!("provisioner registry configuration error: {e}"))?;

    Ok(AliasEngine::new(storage, Arc::new(registry), tokens))
}

fn required_option(
    options: &std::collections::HashMap<String, String>,
    key: &str,
    provisioner: &str,
) -> Result<String> {
    options
        .get(key)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("provisioner {provisioner} is missing option {key}"))
}

async fn run(config: AppConfig) -> Result<()> {
    let listen_addr = config.api.listen_addr.clone();
    let tokens = token_codec(&config);

    let engine = Arc::new(build_engine(&config, tokens.clone()).await?);
    let state = AppState {
        engine,
        tokens: Arc::new(tokens),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    tracing::info!(%listen_addr, "dyndns-server listening");

    let cancel = CancellationToken::new();
    let shutdown_token = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received");
        shutdown_token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("server error")?;

    Ok(())
}

async fn create_user(config: AppConfig, email: &str) -> Result<()> {
    let tokens = token_codec(&config);
    let engine = build_engine(&config, tokens).await?;

    let password = rpassword::prompt_password("Password: ").context("failed to read password")?;
    let confirm =
        rpassword::prompt_password("Confirm password: ").context("failed to read password")?;
    if password != confirm {
        anyhow::bail!("passwords do not match");
    }

    engine
        .create_user(email, &password)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.wire_message()))?;

    println!("user {email} created");
    Ok(())
}
