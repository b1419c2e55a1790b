//! The per-record refresh pipeline.
//!
//! Walks every stored property, strictly one at a time: rewrite the
//! title/description through the generation backend, parse the markers
//! back out, generate a summary of the result, then persist both in a
//! single transaction. A failure in any step skips that record only;
//! the batch always runs to the end.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::backend::{join_fragments, Backend, GenFragment, GenRequest, OllamaBackend};
use crate::config::GenerationConfig;
use crate::content::{parse_listing, Listing};
use crate::error::{RefreshError, Result};
use crate::model::{Property, PropertyUpdate};
use crate::prompt;
use crate::store::Store;

/// What happened over one batch run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Records the batch attempted.
    pub processed: usize,
    /// Records fully rewritten, summarized, and persisted.
    pub updated: usize,
    /// Records abandoned on a network, parse, or storage failure.
    pub skipped: usize,
    pub elapsed: Duration,
}

/// The update pipeline.
///
/// Construction takes the generation configuration explicitly; there
/// are no ambient endpoint globals. The backend is pluggable so tests
/// can install a [`MockBackend`](crate::backend::MockBackend).
pub struct Refresher {
    config: GenerationConfig,
    client: Client,
    backend: Arc<dyn Backend>,
}

impl Refresher {
    /// Create a refresher talking to a real Ollama server.
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            client: Client::new(),
            backend: Arc::new(OllamaBackend),
        }
    }

    /// Replace the generation backend.
    pub fn with_backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = backend;
        self
    }

    /// Replace the HTTP client, e.g. to set a request timeout.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Process every property in the store, strictly sequentially.
    ///
    /// Each record runs to completion (persisted or skipped) before the
    /// next one starts. Per-record failures are logged and counted but
    /// never abort the batch; the error return covers only the initial
    /// listing of properties.
    pub async fn run(&self, store: &Store) -> Result<RunReport> {
        let started = Instant::now();
        let properties = store.list_properties().await?;
        info!(
            count = properties.len(),
            model = %self.config.model,
            backend = self.backend.name(),
            "starting property refresh"
        );

        let mut report = RunReport::default();

        for property in &properties {
            report.processed += 1;
            info!(property_id = property.id, "processing property");

            match self.refresh_one(store, property).await {
                Ok(()) => {
                    report.updated += 1;
                    info!(property_id = property.id, "updated property");
                }
                Err(RefreshError::Parse(parse_err)) => {
                    report.skipped += 1;
                    warn!(
                        property_id = property.id,
                        "skipping property, generated content not usable: {parse_err}"
                    );
                    debug!(property_id = property.id, raw = %parse_err.raw, "raw generated text");
                }
                Err(err) => {
                    report.skipped += 1;
                    warn!(property_id = property.id, "skipping property: {err}");
                }
            }
        }

        report.elapsed = started.elapsed();
        info!(
            updated = report.updated,
            skipped = report.skipped,
            "all properties processed"
        );
        Ok(report)
    }

    /// Drive one property through rewrite, parse, summarize, persist.
    ///
    /// Nothing touches the store until both generation steps have
    /// succeeded; the store write itself is one transaction.
    async fn refresh_one(&self, store: &Store, property: &Property) -> Result<()> {
        let listing = self.rewrite(property).await?;
        let summary = self.summarize(&listing, property).await?;

        store
            .apply_update(&PropertyUpdate {
                property_id: property.id,
                title: listing.title,
                description: listing.description,
                summary,
            })
            .await
    }

    async fn rewrite(&self, property: &Property) -> Result<Listing> {
        let prompt = prompt::rewrite_prompt(&property.title, &property.description);
        let fragments = self.generate(prompt).await?;
        let text = join_fragments(&fragments);
        Ok(parse_listing(&text)?)
    }

    async fn summarize(&self, listing: &Listing, property: &Property) -> Result<String> {
        let prompt = prompt::summary_prompt(listing, property);
        let fragments = self.generate(prompt).await?;
        Ok(join_fragments(&fragments))
    }

    async fn generate(&self, prompt: String) -> Result<Vec<GenFragment>> {
        let request = GenRequest::new(self.config.model.clone(), prompt);
        self.backend
            .generate(&self.client, &self.config.endpoint, &request)
            .await
    }
}
