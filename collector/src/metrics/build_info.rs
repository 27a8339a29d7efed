use super::{
    GaugeFamily,
    LabelInjector,
};
use std::sync::Arc;

/// Build metadata reported by the `zookeeper_exporter_build_info` metric.
///
/// The version comes from the crate; revision, branch and build date are
/// picked up from `ZOOKEEPER_EXPORTER_REVISION`, `ZOOKEEPER_EXPORTER_BRANCH` and
/// `ZOOKEEPER_EXPORTER_BUILD_DATE` at compile time and stay empty otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub revision: &'static str,
    pub branch: &'static str,
    pub build_date: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            revision: option_env!("ZOOKEEPER_EXPORTER_REVISION").unwrap_or(""),
            branch: option_env!("ZOOKEEPER_EXPORTER_BRANCH").unwrap_or(""),
            build_date: option_env!("ZOOKEEPER_EXPORTER_BUILD_DATE").unwrap_or(""),
        }
    }

    /// A gauge with the constant value 1, labeled with this build's metadata.
    pub fn gauge(&self, injector: &Arc<LabelInjector>) -> prometheus::Result<GaugeFamily> {
        let gauge = GaugeFamily::new(
            injector,
            "exporter_build_info",
            "A metric with a constant '1' value labeled by version, revision, branch and build date on which the \
             zookeeper_exporter was built.",
            &["version", "revision", "branch", "build_date"],
        )?;
        gauge.set(&[self.version, self.revision, self.branch, self.build_date], 1.0);
        Ok(gauge)
    }
}
