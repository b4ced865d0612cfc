//! # docpipe CLI
//!
//! The `docpipe` binary submits one invoice document to the remote
//! document-understanding service and prints the parsed extraction result
//! as JSON on stdout. Diagnostics for each step (parameters received,
//! namespace resolved, job id/state, completion) go to stderr.
//!
//! ## Usage
//!
//! ```bash
//! docpipe --config ./config/docpipe.toml invoice.pdf
//! ```
//!
//! Any failure (unusable credentials, unreadable document, rejected
//! submission, missing or malformed output) terminates the process with a
//! non-zero status and a descriptive message. No partial result is ever
//! printed as if successful.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use docpipe::config::load_config;
use docpipe::credentials::create_provider;
use docpipe::document_job::DocumentJobClient;
use docpipe::object_store::ObjectStoreClient;
use docpipe::pipeline::{InvoicePipeline, ProcessParams};

/// Submit an invoice document for key-value extraction and print the
/// structured result.
#[derive(Parser)]
#[command(
    name = "docpipe",
    about = "Submit invoice documents to a remote document-understanding service and fetch structured extraction results",
    version
)]
struct Cli {
    /// Path to the invoice document (image or PDF) to process.
    document: PathBuf,

    /// Path to configuration file (TOML).
    #[arg(long, default_value = "./config/docpipe.toml")]
    config: PathBuf,

    /// Profile to use (overrides `auth.profile` from the config).
    #[arg(long)]
    profile: Option<String>,

    /// Output container (overrides `output.container`).
    #[arg(long)]
    container: Option<String>,

    /// Output key prefix (overrides `output.prefix`).
    #[arg(long)]
    prefix: Option<String>,

    /// Display name for the created extraction job.
    #[arg(long, default_value = "docpipe-invoice-processor")]
    display_name: String,

    /// Enable verbose output.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli.config)?;
    let profile_name = cli.profile.as_deref().unwrap_or(&config.auth.profile);
    let profile = config.profile.get(profile_name).with_context(|| {
        format!(
            "profile '{}' not found in {}",
            profile_name,
            cli.config.display()
        )
    })?;

    let container = cli
        .container
        .clone()
        .unwrap_or_else(|| config.output.container.clone());
    let prefix = cli
        .prefix
        .clone()
        .unwrap_or_else(|| config.output.prefix.clone());

    info!("compartment: {}", profile.compartment);
    info!("region: {}", profile.region);
    info!("container: {}", container);
    info!("prefix: {}", prefix);
    info!("document: {}", cli.document.display());

    let timeout = Duration::from_secs(config.http.timeout_secs);
    let credentials = create_provider(&config, &cli.config)?;
    let store = ObjectStoreClient::new(
        config.service.storage_endpoint_for(&profile.region),
        profile.region.as_str(),
        timeout,
    )?;
    let jobs = DocumentJobClient::new(
        config.service.document_endpoint_for(&profile.region),
        profile.region.as_str(),
        timeout,
    )?;

    let pipeline = InvoicePipeline::new(credentials, Box::new(store), Box::new(jobs));
    let params = ProcessParams {
        compartment_id: profile.compartment.clone(),
        container,
        prefix,
        display_name: cli.display_name.clone(),
        document_path: cli.document.clone(),
    };

    let artifact = pipeline.process_invoice(&params).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::Value::Object(artifact))?
    );
    Ok(())
}
