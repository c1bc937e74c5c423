// # cfpurge - Cloudflare cache purge
//
// Purges every cached file of the zone serving a domain. Exactly one zone
// must match the domain; otherwise nothing is purged.
//
// ## Example
//
// ```bash
// cfpurge --email user@example.com --key-file ~/.cloudflare-key --domain example.com
// ```

use anyhow::Result;
use cfdns_core::{Credentials, purge_zone_cache};
use cfdns_provider_cloudflare::CloudflareClient;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes (clap exits with 2 on usage errors before any of these)
#[derive(Debug, Clone, Copy)]
enum PurgeExitCode {
    Success = 0,
    Failure = 1,
}

impl From<PurgeExitCode> for ExitCode {
    fn from(code: PurgeExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, Parser)]
#[command(name = "cfpurge")]
#[command(about = "Purge all cached files of a Cloudflare domain")]
#[command(version)]
struct Args {
    /// Email address on your Cloudflare account
    #[arg(long)]
    email: String,

    /// Domain whose zone is purged
    #[arg(long)]
    domain: String,

    /// Path to file containing API key. The file should contain nothing but your key
    #[arg(long)]
    key_file: PathBuf,

    /// Toggle verbose output, including API requests and responses
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return PurgeExitCode::Failure.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return PurgeExitCode::Failure.into();
        }
    };

    match rt.block_on(run(args)) {
        Ok(()) => PurgeExitCode::Success.into(),
        Err(e) => {
            error!("{}", e);
            PurgeExitCode::Failure.into()
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let credentials = Credentials::from_key_file(&args.email, &args.key_file)
        .map_err(|e| e.context("Unable to read key"))?;

    let client = CloudflareClient::new(credentials)?.with_debug(args.verbose);

    let zone = purge_zone_cache(&client, &args.domain).await?;
    info!("Purge complete for zone {} ({})", zone.name, zone.id);
    Ok(())
}
