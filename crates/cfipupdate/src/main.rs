// # cfipupdate - Cloudflare A record updater
//
// This binary is a THIN integration layer:
// 1. Parse the command line
// 2. Initialize logging and the runtime
// 3. Wire the Cloudflare client, IP lookup and direct resolver together
// 4. Run one reconciliation and exit
//
// All record logic lives in cfdns-core.
//
// ## Example
//
// ```bash
// cfipupdate --email user@example.com --key-file ~/.cloudflare-key \
//     --domain example.com --hostname host.example.com --only-if-different
// ```

use anyhow::Result;
use cfdns_core::{Credentials, RecordReconciler, UpdateRequest};
use cfdns_ip_http::HttpIpSource;
use cfdns_provider_cloudflare::CloudflareClient;
use cfdns_resolv::DirectResolver;
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

/// Exit codes
///
/// Usage errors never get here: clap prints the usage and exits with 2.
#[derive(Debug, Clone, Copy)]
enum UpdateExitCode {
    /// Record is (or would be) current
    Success = 0,
    /// Any runtime failure
    Failure = 1,
}

impl From<UpdateExitCode> for ExitCode {
    fn from(code: UpdateExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, Parser)]
#[command(name = "cfipupdate")]
#[command(about = "Point a Cloudflare A record at this host's current IP")]
#[command(version)]
struct Args {
    /// Email address on your Cloudflare account
    #[arg(long)]
    email: String,

    /// Domain involved in the update
    #[arg(long)]
    domain: String,

    /// Hostname to update
    #[arg(long)]
    hostname: String,

    /// Path to file containing API key. The file should contain nothing but your key
    #[arg(long)]
    key_file: PathBuf,

    /// IP to set. If not given, it is looked up via ipv4.icanhazip.com
    #[arg(long)]
    ip: Option<IpAddr>,

    /// Check the host's current IP via DNS and only contact the Cloudflare API
    /// if it does not match the IP provided or found
    #[arg(long)]
    only_if_different: bool,

    /// Find the record and log the change without updating it
    #[arg(long)]
    dry_run: bool,

    /// Toggle verbose output
    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn request(&self) -> UpdateRequest {
        let request = UpdateRequest::new(&self.domain, &self.hostname)
            .with_only_if_different(self.only_if_different)
            .with_dry_run(self.dry_run);

        match self.ip {
            Some(ip) => request.with_ip(ip),
            None => request,
        }
    }
}

fn log_level(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::INFO }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(args.verbose))
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return UpdateExitCode::Failure.into();
    }

    // One sequential chain; nothing is spawned
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return UpdateExitCode::Failure.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run(args).await {
            error!("{}", e);
            UpdateExitCode::Failure
        } else {
            UpdateExitCode::Success
        }
    });

    result.into()
}

async fn run(args: Args) -> Result<()> {
    let credentials = Credentials::from_key_file(&args.email, &args.key_file)
        .map_err(|e| e.context("Unable to read key"))?;

    let reconciler = RecordReconciler::new(
        Box::new(CloudflareClient::new(credentials)?),
        Box::new(HttpIpSource::new()?),
        Box::new(DirectResolver::new()),
    );

    reconciler.run(&args.request()).await?;
    Ok(())
}
