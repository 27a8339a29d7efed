use super::{
    LabelInjector,
    NAMESPACE,
};
use prometheus::{
    core::{
        Collector as _,
        Desc,
    },
    proto::MetricFamily,
    GaugeVec,
    Opts,
};
use std::sync::Arc;

/// A labeled gauge whose label vector always ends with the injected labels.
#[derive(Clone)]
pub struct GaugeFamily {
    name: String,
    vec: GaugeVec,
    injector: Arc<LabelInjector>,
}

impl GaugeFamily {
    pub fn new(injector: &Arc<LabelInjector>, name: &str, help: &str, own_labels: &[&str]) -> prometheus::Result<Self> {
        let opts = Opts::new(name, help).namespace(NAMESPACE);
        let vec = GaugeVec::new(opts, &injector.label_names(own_labels))?;

        Ok(Self {
            name: format!("{NAMESPACE}_{name}"),
            vec,
            injector: Arc::clone(injector),
        })
    }

    /// Sets the sample identified by `own_values` plus the injected label values.
    pub fn set(&self, own_values: &[&str], value: f64) {
        let values = self.injector.label_values(own_values);
        match self.vec.get_metric_with_label_values(&values) {
            Ok(gauge) => gauge.set(value),
            Err(error) => warn!(metric = %self.name, %error, "cannot set gauge"),
        }
    }

    pub fn desc(&self) -> Vec<Desc> {
        self.vec.desc().into_iter().cloned().collect()
    }

    pub fn collect(&self) -> Vec<MetricFamily> {
        self.vec.collect()
    }
}
