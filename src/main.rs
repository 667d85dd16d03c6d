use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use smartsum::{
    api, config, logging,
    processing::{ProcessingError, SUMMARY_FILE_NAME, SummaryService},
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(
    name = "smartsum",
    about = "Classify and summarize every page of a PDF with a hosted LLM"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a PDF and write the result to disk.
    Summarize {
        /// PDF to summarize.
        input: PathBuf,
        /// Where to write the summary.
        #[arg(long, short, default_value = SUMMARY_FILE_NAME)]
        output: PathBuf,
        /// Print the JSON report instead of the summary text.
        #[arg(long)]
        json: bool,
    },
    /// Serve the HTTP upload API.
    Serve,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing();
    let config = config::init_config().context("Failed to load config from environment")?;
    if let Err(error) = config.require_api_key() {
        tracing::warn!(%error, "Page summaries will report the missing credential");
    }
    let service = Arc::new(
        SummaryService::from_config(config).context("Failed to build summarization client")?,
    );

    match cli.command {
        Command::Summarize {
            input,
            output,
            json,
        } => summarize_file(&service, input, output, json).await,
        Command::Serve => serve(service, config).await,
    }
}

async fn summarize_file(
    service: &SummaryService,
    input: PathBuf,
    output: PathBuf,
    json: bool,
) -> Result<()> {
    let bytes = tokio::fs::read(&input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let report = match service.summarize_document(bytes).await {
        Ok(report) => report,
        Err(error @ ProcessingError::NoTextDetected { .. }) => {
            anyhow::bail!("{error}");
        }
        Err(error) => {
            return Err(error).with_context(|| format!("Failed to summarize {}", input.display()));
        }
    };

    let summary = report.render();
    tokio::fs::write(&output, &summary)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!(
        pages = report.extracted_pages,
        failures = report.failed_pages(),
        output = %output.display(),
        "Summary written"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}

async fn serve(service: Arc<SummaryService>, config: &config::Config) -> Result<()> {
    let app = api::create_router(service, config.max_upload_bytes);
    let (listener, port) = bind_listener(config.server_port)
        .await
        .context("Failed to bind listener")?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}

async fn bind_listener(port_override: Option<u16>) -> Result<(TcpListener, u16), std::io::Error> {
    use std::net::Ipv4Addr;

    if let Some(port) = port_override {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    const PORT_RANGE: std::ops::RangeInclusive<u16> = 4100..=4199;
    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "No available port found in range 4100-4199",
    ))
}
