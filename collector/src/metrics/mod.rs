//! Parsed backend data and the gauge plumbing shared by every module.

mod build_info;
mod gauge;
mod labels;

pub use build_info::BuildInfo;
pub use gauge::GaugeFamily;
pub use labels::{
    LabelInjector,
    NodeIdentity,
    IDENTITY_LABELS,
};
use std::collections::BTreeMap;

/// Prefix of every metric name the exporter emits.
pub const NAMESPACE: &str = "zookeeper";

pub type LabelMap = BTreeMap<String, String>;
pub type MetricMap = BTreeMap<String, String>;

/// One parsed unit of a backend reply.
///
/// `labels` identify the unit (e.g. the client of a connection), `metrics`
/// maps the backend's metric keys to their raw, unconverted values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsRecord {
    pub labels: LabelMap,
    pub metrics: MetricMap,
}

impl StatsRecord {
    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(name.into(), value.into());
        self
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    pub fn metric(&self, key: &str) -> Option<&str> {
        self.metrics.get(key).map(String::as_str)
    }

    pub fn insert_metric(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metrics.insert(key.into(), value.into());
    }
}
