//! stem-server binary.
//!
//! Reads `stem.toml` (or the path given with `--config`), builds the complete dataset once, and
//! serves the dashboard API over HTTP. The process refuses to start if the build fails.
//!
//! ```text
//! PORT=8080 cargo run --bin stem-server -- --data NCES_IPEDS_RAW_DATA.csv
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use stem_pipeline::{
    config::{PipelineConfig, ServiceConfig},
    execution::{ExecutionEngine, ExecutionOptions, TracingExecutionObserver},
    ingestion::{LoadOptions, TracingObserver},
    pipeline::build,
    server::{AppState, router},
};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "US STEM degree pipeline dashboard API")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "stem.toml")]
    config: PathBuf,

    /// Source CSV/TSV; overrides `data_path` from the configuration.
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Worker threads for query execution (defaults to available parallelism).
    #[arg(long)]
    query_threads: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    let mut service_cfg = ServiceConfig::load(&cli.config).context("failed to read configuration")?;
    if let Some(data) = cli.data {
        service_cfg.data_path = data;
    }

    let load_opts = LoadOptions {
        observer: Some(Arc::new(TracingObserver)),
        ..Default::default()
    };
    let dataset = build(&service_cfg.data_path, &PipelineConfig::default(), &load_opts)
        .with_context(|| format!("failed to build dataset from {:?}", service_cfg.data_path))?;

    let engine = ExecutionEngine::new(ExecutionOptions {
        num_threads: cli.query_threads,
        ..Default::default()
    })
    .context("failed to start query pool")?
    .with_observer(Arc::new(TracingExecutionObserver));

    let app = router(AppState {
        dataset: Arc::new(dataset),
        engine: Arc::new(engine),
    });

    let address = service_cfg.bind_address();
    tracing::info!("Listening on http://{address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
