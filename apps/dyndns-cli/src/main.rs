//! Client binary (C8/C9 composition root). `SPEC_FULL.md` §6.
//!
//! Every subcommand exits non-zero on the first surfaced error (`spec.md`
//! §6): handlers return `anyhow::Result<()>`, and `main` prints the error
//! and exits with status 1 when one bubbles up.

mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::{AliasFlags, ClientConfig};
use dyndns_client::{AliasDto, ClientError, DaemonClient, HttpDaemonClient};
use std::net::IpAddr;
use std::path::PathBuf;

/// Dynamic DNS control-plane client.
#[derive(Parser)]
#[command(name = "dyndns-cli")]
#[command(about = "Dynamic DNS control-plane client")]
struct Cli {
    /// Path to the client's YAML config/state file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate and persist the returned token.
    Login { email: String },
    /// List the user's domains or aliases.
    Ls {
        #[command(subcommand)]
        what: LsWhat,
    },
    /// Register a new alias under one of the operator's domains.
    Register { name: String },
    /// Remove an alias.
    Rm { name: String },
    /// Set an alias's current value directly.
    SetIp { name: String, ip: String },
    /// Toggle whether `synchronize` drives this alias.
    SetSynchronize { name: String, enabled: bool },
    /// Push the discovered public IP into every alias flagged for sync.
    Synchronize,
}

#[derive(Subcommand)]
enum LsWhat {
    /// The fully-qualified suffixes available to register under.
    Domains,
    /// The user's own aliases.
    Aliases,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
        .init();

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config::default_path);
    let mut state = ClientConfig::load(&config_path)?;

    match cli.command {
        Commands::Login { email } => login(&mut state, &config_path, &email).await,
        Commands::Ls { what } => ls(&state, what).await,
        Commands::Register { name } => register(&mut state, &config_path, &name).await,
        Commands::Rm { name } => rm(&mut state, &config_path, &name).await,
        Commands::SetIp { name, ip } => set_ip(&state, &name, &ip).await,
        Commands::SetSynchronize { name, enabled } => {
            set_synchronize(&mut state, &config_path, &name, enabled)
        }
        Commands::Synchronize => synchronize(&state).await,
    }
}

fn daemon_client(config: &ClientConfig) -> Result<HttpDaemonClient> {
    if config.api_addr.is_empty() {
        bail!("no api_addr configured; set it in the client config file");
    }
    let http = dyndns_http::HttpClient::new().context("failed to build HTTP client")?;
    Ok(HttpDaemonClient::new(http, config.api_addr.clone()))
}

fn token(config: &ClientConfig) -> Result<&str> {
    config
        .token
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("not logged in; run `login <EMAIL>` first"))
}

/// Surfaces a [`ClientError`] with its server-provided message, matching
/// the CLI's "errors surface the server's `message` field directly"
/// contract (`SPEC_FULL.md` §7).
fn map_client_error(context: &str, err: ClientError) -> anyhow::Error {
    anyhow::anyhow!("{context}: {err}")
}

async fn login(state: &mut ClientConfig, path: &std::path::Path, email: &str) -> Result<()> {
    let client = daemon_client(state)?;
    let password =
        rpassword::prompt_password("Password: ").context("failed to read password")?;
    let token = client
        .authenticate(email, &password)
        .await
        .map_err(|e| map_client_error("login failed", e))?;

    state.token = Some(token);
    state.save(path)?;
    println!("logged in as {email}");
    Ok(())
}

async fn ls(state: &ClientConfig, what: LsWhat) -> Result<()> {
    let client = daemon_client(state)?;
    let tok = token(state)?;

    match what {
        LsWhat::Domains => {
            let domains = client
                .get_domains(tok)
                .await
                .map_err(|e| map_client_error("failed to list domains", e))?;
            for d in domains {
                println!("{}", d.domain);
            }
        }
        LsWhat::Aliases => {
            let aliases = client
                .get_aliases(tok)
                .await
                .map_err(|e| map_client_error("failed to list aliases", e))?;
            for a in aliases {
                println!("{}\t{}", a.domain, a.value);
            }
        }
    }
    Ok(())
}

async fn register(state: &mut ClientConfig, path: &std::path::Path, name: &str) -> Result<()> {
    let client = daemon_client(state)?;
    let tok = token(state)?.to_string();

    // The value is resolved at registration time from the same public-IP
    // echo used by `synchronize`, so a freshly registered alias starts
    // pointed at the host's current address (`spec.md` §4.9's discovery
    // path, reused here rather than asking the operator to type an IP).
    let http = dyndns_http::HttpClient::new().context("failed to build HTTP client")?;
    let ip = dyndns_client::discover_public_ip(&http, &state.ip_echo_urls)
        .await
        .context("could not discover a public IP to register with")?;

    let alias = client
        .register_alias(
            &tok,
            AliasDto {
                domain: name.to_string(),
                value: ip.to_string(),
            },
        )
        .await
        .map_err(|e| map_client_error("registration failed", e))?;

    state
        .aliases
        .entry(alias.domain.clone())
        .or_insert_with(AliasFlags::default);
    state.save(path)?;

    println!("registered {} -> {}", alias.domain, alias.value);
    Ok(())
}

async fn rm(state: &mut ClientConfig, path: &std::path::Path, name: &str) -> Result<()> {
    let client = daemon_client(state)?;
    let tok = token(state)?.to_string();

    client
        .delete_alias(&tok, name)
        .await
        .map_err(|e| map_client_error("removal failed", e))?;

    state.aliases.remove(name);
    state.save(path)?;

    println!("removed {name}");
    Ok(())
}

async fn set_ip(state: &ClientConfig, name: &str, ip: &str) -> Result<()> {
    let parsed: IpAddr = ip
        .parse()
        .with_context(|| format!("{ip} is not a valid IP address"))?;

    let client = daemon_client(state)?;
    let tok = token(state)?;

    let alias = client
        .update_alias(
            tok,
            AliasDto {
                domain: name.to_string(),
                value: parsed.to_string(),
            },
        )
        .await
        .map_err(|e| map_client_error("update failed", e))?;

    println!("{} -> {}", alias.domain, alias.value);
    Ok(())
}

fn set_synchronize(
    state: &mut ClientConfig,
    path: &std::path::Path,
    name: &str,
    enabled: bool,
) -> Result<()> {
    state
        .aliases
        .entry(name.to_string())
        .or_insert_with(AliasFlags::default)
        .synchronize = enabled;
    state.save(path)?;

    println!("{name}: synchronize = {enabled}");
    Ok(())
}

async fn synchronize(state: &ClientConfig) -> Result<()> {
    let client = daemon_client(state)?;
    let tok = token(state)?;
    let http = dyndns_http::HttpClient::new().context("failed to build HTTP client")?;

    let ip = dyndns_client::discover_public_ip(&http, &state.ip_echo_urls)
        .await
        .context("could not discover a public IP")?;

    let flags: std::collections::BTreeMap<String, bool> = state
        .aliases
        .iter()
        .map(|(domain, flags)| (domain.clone(), flags.synchronize))
        .collect();

    let outcomes = dyndns_client::synchronize(&client, tok, &flags, ip).await;

    let mut any_failed = false;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => println!("{} -> {ip} ok", outcome.domain),
            Err(e) => {
                any_failed = true;
                eprintln!("{}: {e}", outcome.domain);
            }
        }
    }

    // `spec.md` §4.9: "Failures on one alias MUST NOT abort the loop" —
    // the engine itself always returns success; per-alias failures are
    // reported but do not turn the overall command non-zero, matching the
    // testable property in `spec.md` §8 ("the engine returns success
    // overall").
    let _ = any_failed;
    Ok(())
}
