//! # ZooKeeper Exporter Collector
//!
//! Scrapes ZooKeeper through its four-letter-word admin commands and turns the
//! replies into Prometheus gauges.
//!
//! ## Architecture
//!
//! - **`client`**: one-shot TCP client sending a single command per connection
//! - **`parsers`**: total parsers turning each command's reply into `StatsRecord`s
//! - **`metrics`**: records, the label injector and the gauge wrappers
//! - **`collectors`**: the `Module` trait, the built-in modules, the registry and the `Exporter`
//!
//! ## Usage
//!
//! ```no_run
//! use std::{
//!     sync::Arc,
//!     time::Duration,
//! };
//! use zookeeper_exporter_collector::{
//!     Exporter,
//!     ExporterSettings,
//!     FourLetterClient,
//!     ModuleRegistry,
//! };
//!
//! # async fn scrape() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(FourLetterClient::new("127.0.0.1:2181", Duration::from_secs(30)));
//! let settings = ExporterSettings {
//!     enabled_modules: vec!["mntr".to_string(), "ruok".to_string()],
//!     ..Default::default()
//! };
//! let exporter = Exporter::new(&ModuleRegistry::with_defaults(), settings, backend)?;
//! let families = exporter.collect().await;
//! # let _ = families;
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate tracing;

pub mod client;
pub mod collectors;
pub mod error;
pub mod metrics;
pub mod parsers;

pub use client::{
    Backend,
    Command,
    FourLetterClient,
};
pub use collectors::*;
pub use error::{
    RegistryError,
    ScrapeError,
};
pub use metrics::*;
