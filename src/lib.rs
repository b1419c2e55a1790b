//! # Listing Refresh
//!
//! Batch rewriting of property listings through a local LLM.
//!
//! The crate walks a SQLite database of rental properties and, for each
//! record, asks an Ollama model to rewrite the title and description,
//! parses the rewritten text back out of the reply, asks the model for
//! a short summary of the result, and persists everything in a single
//! transaction. Records that fail any step are logged and skipped; the
//! batch always runs to completion.
//!
//! ## Core pieces
//!
//! - [`Store`]: libsql-backed storage for properties and summaries.
//! - [`Refresher`]: the strictly sequential update pipeline.
//! - [`Backend`]: object-safe generation trait, implemented by
//!   [`OllamaBackend`] for real servers and [`MockBackend`] for tests.
//! - [`StreamingDecoder`]: incremental framing for streamed NDJSON
//!   replies, tolerant of chunk boundaries landing anywhere.
//! - [`parse_listing`]: extracts the `Title:` / `Description:` markers
//!   from generated text.
//!
//! ## Quick start
//!
//! ```no_run
//! use listing_refresh::{RefreshConfig, Refresher, Store};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RefreshConfig::default();
//!     let store = Store::open(&config.database.path).await?;
//!
//!     let report = Refresher::new(config.generation).run(&store).await?;
//!     println!(
//!         "updated {} of {} properties ({} skipped)",
//!         report.updated, report.processed, report.skipped
//!     );
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod content;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod store;
pub mod streaming;

pub use backend::{Backend, GenFragment, GenRequest, MockBackend, MockReply, OllamaBackend};
pub use config::{load_config, DatabaseConfig, GenerationConfig, RefreshConfig};
pub use content::{parse_listing, Listing, ParseError};
pub use error::{RefreshError, Result};
pub use model::{NewProperty, Property, PropertyUpdate, Summary};
pub use pipeline::{Refresher, RunReport};
pub use store::Store;
pub use streaming::StreamingDecoder;
