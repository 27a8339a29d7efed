use crate::{
    client::Backend,
    error::ScrapeError,
    metrics::{
        GaugeFamily,
        LabelInjector,
        NodeIdentity,
        StatsRecord,
    },
};
use prometheus::{
    core::Desc,
    proto::MetricFamily,
};
use std::{
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    sync::Arc,
};

/// Everything a module needs for one scrape.
pub struct ScrapeContext<'a> {
    pub backend: &'a dyn Backend,
    pub identity: &'a NodeIdentity,
}

impl ScrapeContext<'_> {
    pub fn node(&self) -> &str {
        &self.identity.node
    }
}

/// A pluggable unit that turns one admin command into gauges.
pub trait Module: Send {
    /// Name the module is registered and configured under.
    fn name(&self) -> &'static str;

    /// Descriptors of every gauge family the module owns.
    fn describe(&self) -> Vec<Desc>;

    /// Refreshes the gauges from the backend and appends all of them to `out`.
    ///
    /// Gauges are appended even when the backend call fails, so the last
    /// observed values stay exposed; the failure is returned afterwards.
    fn collect<'a>(
        &'a mut self,
        ctx: &'a ScrapeContext<'a>,
        out: &'a mut Vec<MetricFamily>,
    ) -> Pin<Box<dyn Future<Output = Result<(), ScrapeError>> + Send + 'a>>;
}

/// Gauges of one module, keyed by the backend's metric key.
pub struct GaugeSet {
    gauges: BTreeMap<&'static str, GaugeFamily>,
}

impl GaugeSet {
    /// `specs` lists `(backend key, metric name, help)`.
    pub fn new(
        injector: &Arc<LabelInjector>,
        own_labels: &[&str],
        specs: &[(&'static str, &str, &str)],
    ) -> prometheus::Result<Self> {
        let mut gauges = BTreeMap::new();
        for (key, name, help) in specs {
            gauges.insert(*key, GaugeFamily::new(injector, name, help, own_labels)?);
        }
        Ok(Self { gauges })
    }

    /// Sets every gauge whose key is present in `record`.
    ///
    /// Values that are not numbers are logged and skipped. Gauges whose key is
    /// missing keep their previous value.
    pub fn apply(&self, record: &StatsRecord, own_values: &[&str]) {
        for (key, gauge) in &self.gauges {
            let Some(raw) = record.metric(key) else {
                continue;
            };

            match raw.parse::<f64>() {
                Ok(value) => {
                    trace!(key, value, "set metric");
                    gauge.set(own_values, value);
                }
                Err(error) => warn!(key, value = raw, %error, "cannot convert value to a number"),
            }
        }
    }

    pub fn describe(&self) -> Vec<Desc> {
        self.gauges.values().flat_map(GaugeFamily::desc).collect()
    }

    pub fn collect(&self) -> Vec<MetricFamily> {
        self.gauges.values().flat_map(GaugeFamily::collect).collect()
    }
}
