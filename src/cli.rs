//! # nomad-lease CLI
//!
//! Command-line interface for exercising the Nomad token lease handlers
//! outside a secrets host.
//!
//! ## Usage
//!
//! ```bash
//! # Revoke a token by accessor ID (address/token from NOMAD_ADDR / NOMAD_TOKEN)
//! nomad-lease revoke --accessor-id 8f4e2d4a-7c1b-4a52-9d3e-0b6a40b3c1d7
//!
//! # Show the lease a renewal would produce under a given policy
//! nomad-lease renew --ttl 1h --max-ttl 24h
//!
//! # Print Prometheus metrics after the command
//! nomad-lease --metrics revoke --accessor-id abc123
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nomad_secrets_lease::constants::DEFAULT_LOG_FILTER;
use nomad_secrets_lease::observability::metrics;
use nomad_secrets_lease::{
    InMemoryStorage, LeaseConfig, NomadBackend, NomadConfig, Request, RequestContext,
    RevokeOutcome, Secret, StorageClientFactory, StoredLeasePolicy, TokenInternalData,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use zeroize::Zeroizing;

/// Nomad token lease CLI
#[derive(Parser)]
#[command(name = "nomad-lease")]
#[command(about = "Renew and revoke leased Nomad ACL tokens", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print Prometheus metrics after the command completes
    #[arg(long, global = true)]
    metrics: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete a leased token from Nomad
    Revoke {
        /// Accessor ID of the ACL token
        #[arg(long)]
        accessor_id: String,

        /// Nomad address (overrides NOMAD_ADDR)
        #[arg(long)]
        address: Option<String>,

        /// Management token (overrides NOMAD_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// CA certificate PEM file (overrides NOMAD_CACERT)
        #[arg(long)]
        ca_cert: Option<PathBuf>,

        /// Request timeout, e.g. `10s` (overrides NOMAD_HTTP_TIMEOUT_SECS)
        #[arg(long, value_parser = humantime::parse_duration)]
        timeout: Option<Duration>,
    },
    /// Renew a synthetic token lease against the given policy
    Renew {
        /// Lease TTL, e.g. `1h`; omitted means host default
        #[arg(long, value_parser = humantime::parse_duration)]
        ttl: Option<Duration>,

        /// Lease max TTL, e.g. `24h`; omitted means host default
        #[arg(long, value_parser = humantime::parse_duration)]
        max_ttl: Option<Duration>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    // Required for rustls 0.23+ when no default provider is set via features
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider was already installed");
    }

    metrics::register_metrics()?;

    let cli = Cli::parse();
    let cancel = CancellationToken::new();
    let ctx = RequestContext::with_cancellation("cli", cancel.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    match cli.command {
        Commands::Revoke {
            accessor_id,
            address,
            token,
            ca_cert,
            timeout,
        } => {
            let mut nomad = NomadConfig::from_env();
            if address.is_some() {
                nomad.address = address;
            }
            if let Some(token) = token {
                nomad.token = Some(Zeroizing::new(token));
            }
            if ca_cert.is_some() {
                nomad.ca_cert_path = ca_cert;
            }
            if let Some(timeout) = timeout {
                nomad.http_timeout = timeout;
            }
            revoke_command(&ctx, nomad, accessor_id).await?;
        }
        Commands::Renew { ttl, max_ttl } => {
            renew_command(&ctx, ttl.unwrap_or_default(), max_ttl.unwrap_or_default()).await?;
        }
    }

    if cli.metrics {
        print!("{}", metrics::gather_metrics()?);
    }

    Ok(())
}

async fn revoke_command(ctx: &RequestContext, nomad: NomadConfig, accessor_id: String) -> Result<()> {
    let backend = NomadBackend::new(
        Arc::new(StoredLeasePolicy),
        Arc::new(StorageClientFactory::new(nomad)),
    );
    let secret = Secret::new(TokenInternalData::new(accessor_id.clone()).into_internal_data());
    let req = Request::new(secret, Arc::new(InMemoryStorage::new()));

    let outcome = backend
        .revoke(ctx, &req)
        .await
        .with_context(|| format!("Failed to revoke Nomad token '{accessor_id}'"))?;

    match outcome {
        RevokeOutcome::Revoked => println!("Revoked token {accessor_id}"),
        RevokeOutcome::AlreadyRevoked => println!("Token {accessor_id} was already revoked"),
    }
    Ok(())
}

async fn renew_command(ctx: &RequestContext, ttl: Duration, max_ttl: Duration) -> Result<()> {
    let storage = InMemoryStorage::new();
    if !ttl.is_zero() || !max_ttl.is_zero() {
        StoredLeasePolicy::write_lease_config(&storage, &LeaseConfig::new(ttl, max_ttl))
            .await
            .context("Failed to store lease configuration")?;
    }

    let backend = NomadBackend::new(
        Arc::new(StoredLeasePolicy),
        Arc::new(StorageClientFactory::default()),
    );
    let req = Request::new(Secret::default(), Arc::new(storage));
    let resp = backend
        .renew(ctx, req)
        .await
        .context("Failed to renew lease")?;

    let lease = resp.secret.map(|s| s.lease).unwrap_or_default();
    println!(
        "{}",
        serde_json::to_string_pretty(&lease).context("Failed to serialize lease")?
    );
    Ok(())
}
