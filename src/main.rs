use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use cnpj_sheets::app::CompanyService;
use cnpj_sheets::config::Config;
use cnpj_sheets::pipeline::storage::{InMemoryRecordStore, RecordStore};
use cnpj_sheets::{logging, observability, server};

#[derive(Parser)]
#[command(name = "cnpj_sheets")]
#[command(about = "Ingest company spreadsheets and serve the CNPJ records")]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Address to bind (overrides configuration)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Ingest a local spreadsheet once and print the records as JSON
    Ingest {
        /// CSV, XLSX or XLS file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    let _log_guard = logging::init_logging(&config.logging);

    if let Some(addr) = config.metrics.listen_addr.as_deref() {
        if let Err(e) = observability::init(addr) {
            warn!("Metrics disabled: {}", e);
        }
    }

    let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    let service = Arc::new(CompanyService::from_config(store, &config.ingest));

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Starting server");
            server::start_server(service, &config.server).await?;
        }
        Commands::Ingest { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let filename = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();

            let summary = service.ingest(bytes, &filename).await?;
            info!(
                count = summary.count,
                skipped = summary.skipped,
                "Ingested {}",
                file.display()
            );
            println!("{}", serde_json::to_string_pretty(&service.list().await)?);
        }
    }
    Ok(())
}
