use anyhow::{Context, Result};
use console::style;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::{Config, IndexBackend};
use crate::embeddings::{Embedder, OllamaClient};
use crate::faq::FaqSource;
use crate::index::{MemoryIndex, QdrantIndex, VectorIndex};
use crate::ingest::{IngestReport, IngestSettings, ingest};
use crate::server;
use crate::service::QueryService;

/// Shared clients and settings, built once per process and handed to
/// ingestion and the query service
#[derive(Clone)]
pub struct AppContext {
    pub embedder: Arc<dyn Embedder>,
    pub index: Arc<dyn VectorIndex>,
    pub ingest_settings: IngestSettings,
    pub faq_source: FaqSource,
    pub min_score: Option<f32>,
}

impl AppContext {
    #[inline]
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        ingest_settings: IngestSettings,
        faq_source: FaqSource,
    ) -> Self {
        Self {
            embedder,
            index,
            ingest_settings,
            faq_source,
            min_score: None,
        }
    }

    /// Build the Ollama embedder and the configured index backend
    #[inline]
    pub fn from_config(config: &Config) -> Result<Self> {
        let embedder =
            OllamaClient::new(&config.ollama).context("Failed to create Ollama client")?;

        let index: Arc<dyn VectorIndex> = match config.index.backend {
            IndexBackend::Qdrant => Arc::new(
                QdrantIndex::new(&config.index).context("Failed to create Qdrant client")?,
            ),
            IndexBackend::Memory => Arc::new(MemoryIndex::new()),
        };

        let ingest_settings = IngestSettings {
            collection: config.index.collection.clone(),
            distance: config.index.distance,
            id_strategy: config.faq.id_strategy,
            batch_size: config.ollama.batch_size as usize,
        };

        Ok(Self {
            embedder: Arc::new(embedder),
            index,
            ingest_settings,
            faq_source: config.faq_source(),
            min_score: config.faq.min_score,
        })
    }

    #[inline]
    pub fn with_min_score(mut self, min_score: Option<f32>) -> Self {
        self.min_score = min_score;
        self
    }

    /// Load the FAQ source and index every entry
    #[inline]
    pub fn ingest(&self) -> crate::Result<IngestReport> {
        let entries = self.faq_source.load();
        ingest(
            self.embedder.as_ref(),
            self.index.as_ref(),
            &self.ingest_settings,
            &entries,
        )
    }

    #[inline]
    pub fn query_service(&self) -> QueryService {
        QueryService::new(
            Arc::clone(&self.embedder),
            Arc::clone(&self.index),
            self.ingest_settings.collection.clone(),
        )
        .with_min_score(self.min_score)
    }
}

/// Ingest the FAQ data, then serve HTTP queries until Ctrl-C
#[inline]
pub async fn serve(bind: Option<String>, skip_ingest: bool) -> Result<()> {
    let config = Config::load_default().context("Failed to load configuration")?;

    let addr: SocketAddr = match bind {
        Some(bind) => bind
            .parse()
            .with_context(|| format!("Invalid bind address: {}", bind))?,
        None => config.bind_address()?,
    };

    check_ollama(&config).await;
    let context = AppContext::from_config(&config)?;

    if skip_ingest {
        if config.index.backend == IndexBackend::Memory {
            warn!("Skipping ingestion with the in-memory backend leaves the index empty");
        }
        info!("Skipping ingestion");
    } else {
        let report = run_ingest(&context).await?;
        print_report(&report);
    }

    let service = Arc::new(context.query_service());
    println!(
        "{} Serving FAQ queries on {}",
        style("🌐").cyan(),
        style(format!("http://{}", addr)).bold()
    );

    server::serve(service, addr)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Run ingestion on its own and print the outcome
#[inline]
pub async fn run_ingestion() -> Result<()> {
    let config = Config::load_default().context("Failed to load configuration")?;
    let context = AppContext::from_config(&config)?;

    if config.index.backend == IndexBackend::Memory {
        warn!("The in-memory backend discards ingested points when this command exits");
    }

    let report = run_ingest(&context).await?;
    print_report(&report);
    Ok(())
}

/// Answer a single question and print the result
#[inline]
pub async fn ask(question: String) -> Result<()> {
    let config = Config::load_default().context("Failed to load configuration")?;
    let context = AppContext::from_config(&config)?;

    // Nothing persists between runs in memory
    if config.index.backend == IndexBackend::Memory {
        run_ingest(&context).await?;
    }

    let service = context.query_service();
    let response = tokio::task::spawn_blocking(move || service.answer(&question))
        .await
        .context("Query task failed")?
        .context("Failed to answer question")?;

    println!("{}", style(&response.answer).bold());
    println!("{} {:.4}", style("score:").dim(), response.score);
    Ok(())
}

/// Warn early when Ollama is unreachable or lacks the configured model
async fn check_ollama(config: &Config) {
    let client = match OllamaClient::new(&config.ollama) {
        Ok(client) => client,
        Err(e) => {
            warn!("Cannot create Ollama client: {:#}", e);
            return;
        }
    };

    match tokio::task::spawn_blocking(move || client.health_check()).await {
        Ok(Ok(())) => info!(
            "Ollama connected at {}:{} with model {}",
            config.ollama.host, config.ollama.port, config.ollama.model
        ),
        Ok(Err(e)) => {
            warn!("Ollama is not ready: {:#}", e);
            println!(
                "{} Ollama at {}:{} is not ready. Use 'faq-search config' to update connection settings.",
                style("⚠️").yellow(),
                config.ollama.host,
                config.ollama.port
            );
        }
        Err(e) => warn!("Ollama health check did not complete: {}", e),
    }
}

async fn run_ingest(context: &AppContext) -> Result<IngestReport> {
    let context = context.clone();
    let report = tokio::task::spawn_blocking(move || context.ingest())
        .await
        .context("Ingestion task failed")?
        .inspect_err(|e| error!("Ingestion failed: {}", e))
        .context("Failed to ingest FAQ data")?;

    info!(
        "Ingested {} points into {}",
        report.points_upserted, report.collection
    );
    Ok(report)
}

fn print_report(report: &IngestReport) {
    let action = if report.created_collection {
        "created"
    } else {
        "reused"
    };
    println!(
        "{} Indexed {} FAQ entries into {} ({})",
        style("✅").green(),
        style(report.points_upserted).bold(),
        style(&report.collection).cyan(),
        action
    );
}
