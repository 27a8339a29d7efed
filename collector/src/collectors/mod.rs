//! # Collectors Module
//!
//! The scrape engine: pluggable modules, the registry that builds them and the
//! exporter that runs them.
//!
//! ## Architecture
//!
//! - **`Module` trait**: the interface every collector module implements
//! - **`ConfCollector`**: server settings from `conf`
//! - **`ConsCollector`**: per-connection statistics from `cons`
//! - **`MntrCollector`**: server statistics from `mntr`
//! - **`RuokCollector`**: liveness from `ruok`
//! - **`ModuleRegistry`**: maps module names to factories
//! - **`Exporter`**: runs the enabled modules and tracks per-module health
//!
//! ## Failure Handling
//!
//! A module whose backend call fails keeps its last values exposed and is
//! reported as down; the other modules of the same scrape are unaffected.

pub mod collector;
pub mod conf_collector;
pub mod cons_collector;
pub mod exporter;
pub mod mntr_collector;
pub mod registry;
pub mod ruok_collector;
#[cfg(test)]
pub(crate) mod testing;

// Re-export the main types for easy access
pub use collector::{
    GaugeSet,
    Module,
    ScrapeContext,
};
pub use conf_collector::ConfCollector;
pub use cons_collector::ConsCollector;
pub use exporter::{
    Exporter,
    ExporterSettings,
};
pub use mntr_collector::MntrCollector;
pub use registry::{
    ModuleFactory,
    ModuleRegistry,
};
pub use ruok_collector::RuokCollector;
