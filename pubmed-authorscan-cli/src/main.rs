use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use pubmed_authorscan::{ClientConfig, PubMedClient};
use tracing::info;

mod output;

#[derive(Parser, Debug)]
#[command(
    name = "get-papers-list",
    version,
    about = "Fetch PubMed papers with at least one non-academic (pharma/biotech) author",
    long_about = "Searches PubMed, keeps papers with at least one author affiliated with a \
                  pharmaceutical, biotech or other commercial organization, and writes them \
                  as CSV with a best-effort corresponding author email."
)]
struct Cli {
    /// PubMed query (use quotes for complex queries)
    #[arg(value_name = "QUERY")]
    query: Option<String>,

    /// Output CSV filename; prints to stdout if omitted
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// API key for NCBI E-utilities (increases rate limit)
    #[arg(long, env = "NCBI_API_KEY")]
    api_key: Option<String>,

    /// Email for NCBI requests (recommended)
    #[arg(long, env = "NCBI_EMAIL")]
    email: Option<String>,

    /// Tool name for NCBI requests
    #[arg(long, env = "NCBI_TOOL")]
    tool: Option<String>,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();

        if let Some(key) = &self.api_key {
            config = config.with_api_key(key);
        }

        if let Some(email) = &self.email {
            config = config.with_email(email);
        }

        if let Some(tool) = &self.tool {
            config = config.with_tool(tool);
        }

        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(query) = cli.query.as_deref() else {
        return match Cli::command().print_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        };
    };

    let filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match run(&cli, query).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n[ERROR] {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, query: &str) -> Result<()> {
    let client =
        PubMedClient::with_config(cli.client_config()).context("Failed to set up PubMed client")?;

    info!("Fetching PubMed IDs for query: {}", query);
    let ids = client
        .fetch_ids(query)
        .await
        .context("Failed to search PubMed")?;
    info!("Found {} PubMed IDs.", ids.len());

    let papers = client
        .fetch_details(&ids)
        .await
        .context("Failed to fetch PubMed article details")?;
    info!(
        "Filtered to {} papers with non-academic authors.",
        papers.len()
    );

    if papers.is_empty() {
        println!("No papers found with non-academic (pharma/biotech) authors.");
        return Ok(());
    }

    match &cli.file {
        Some(path) => {
            output::save_csv(path, &papers)?;
            println!("Results saved to {}", path.display());
        }
        None => output::write_csv(io::stdout().lock(), &papers)?,
    }

    Ok(())
}
