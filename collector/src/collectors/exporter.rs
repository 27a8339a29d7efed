use crate::{
    client::Backend,
    collectors::{
        Module,
        ModuleRegistry,
        ScrapeContext,
    },
    error::RegistryError,
    metrics::{
        BuildInfo,
        GaugeFamily,
        LabelInjector,
        NodeIdentity,
    },
};
use prometheus::{
    core::Desc,
    proto::MetricFamily,
};
use std::{
    collections::BTreeMap,
    sync::Arc,
    time::Instant,
};
use tokio::sync::Mutex;

/// What the exporter needs to know about the deployment at startup.
#[derive(Debug, Clone, Default)]
pub struct ExporterSettings {
    /// Module names to instantiate; unknown names are ignored.
    pub enabled_modules: Vec<String>,
    pub identity: NodeIdentity,
    /// Extra `(name, value)` labels appended to every sample, in order.
    pub extra_labels: Vec<(String, String)>,
}

/// Runs the enabled modules and merges their gauges into one snapshot.
///
/// Scrapes are serialized: a second `collect` waits until the running one has
/// finished and then performs its own scrape.
pub struct Exporter {
    backend: Arc<dyn Backend>,
    identity: NodeIdentity,
    build_info: GaugeFamily,
    state: Mutex<ScrapeState>,
}

struct ScrapeState {
    modules: BTreeMap<String, Box<dyn Module>>,
    up: GaugeFamily,
    module_up: GaugeFamily,
    module_duration: GaugeFamily,
    last_scrape_ok: bool,
}

impl Exporter {
    pub fn new(
        registry: &ModuleRegistry,
        settings: ExporterSettings,
        backend: Arc<dyn Backend>,
    ) -> Result<Self, RegistryError> {
        let injector = Arc::new(LabelInjector::new(&settings.identity, settings.extra_labels));
        let modules = registry.instantiate(&settings.enabled_modules, &injector)?;
        info!(modules = ?modules.keys().collect::<Vec<_>>(), "enabled modules");

        let meta = |source| RegistryError::Metric {
            module: "exporter".to_string(),
            source,
        };
        let up = GaugeFamily::new(
            &injector,
            "exporter_up",
            "Whether every module succeeded in the last scrape.",
            &[],
        )
        .map_err(meta)?;
        let module_up = GaugeFamily::new(
            &injector,
            "exporter_module_up",
            "Whether the module succeeded in the last scrape.",
            &["module"],
        )
        .map_err(meta)?;
        let module_duration = GaugeFamily::new(
            &injector,
            "exporter_module_scrape_duration_seconds",
            "Duration of the module's last scrape in seconds.",
            &["module"],
        )
        .map_err(meta)?;
        let build_info = BuildInfo::current().gauge(&injector).map_err(meta)?;

        Ok(Self {
            backend,
            identity: settings.identity,
            build_info,
            state: Mutex::new(ScrapeState {
                modules,
                up,
                module_up,
                module_duration,
                // Healthy until the first scrape says otherwise.
                last_scrape_ok: true,
            }),
        })
    }

    pub async fn module_names(&self) -> Vec<String> {
        self.state.lock().await.modules.keys().cloned().collect()
    }

    /// Outcome of the most recent scrape, `true` before the first one.
    pub async fn last_scrape_ok(&self) -> bool {
        self.state.lock().await.last_scrape_ok
    }

    /// Descriptors of every family `collect` can emit.
    pub async fn describe(&self) -> Vec<Desc> {
        let state = self.state.lock().await;
        let mut descs: Vec<Desc> = state.modules.values().flat_map(|module| module.describe()).collect();
        descs.extend(state.up.desc());
        descs.extend(state.module_up.desc());
        descs.extend(state.module_duration.desc());
        descs.extend(self.build_info.desc());
        descs
    }

    /// Runs one scrape across all enabled modules and returns the snapshot.
    ///
    /// Module failures are logged and reported through the module's up gauge;
    /// they never fail the scrape itself.
    #[instrument(level = "debug", skip(self))]
    pub async fn collect(&self) -> Vec<MetricFamily> {
        let mut state = self.state.lock().await;
        let ScrapeState {
            modules,
            up,
            module_up,
            module_duration,
            last_scrape_ok,
        } = &mut *state;

        let ctx = ScrapeContext {
            backend: self.backend.as_ref(),
            identity: &self.identity,
        };
        let start = Instant::now();
        let mut families = Vec::new();
        let mut all_up = true;

        for (name, module) in modules.iter_mut() {
            let module_start = Instant::now();
            let result = module.collect(&ctx, &mut families).await;
            module_duration.set(&[name.as_str()], module_start.elapsed().as_secs_f64());

            match result {
                Ok(()) => module_up.set(&[name.as_str()], 1.0),
                Err(error) => {
                    warn!(module = %name, %error, "retrieving module failed");
                    module_up.set(&[name.as_str()], 0.0);
                    all_up = false;
                }
            }
        }

        up.set(&[], if all_up { 1.0 } else { 0.0 });
        *last_scrape_ok = all_up;

        families.extend(up.collect());
        families.extend(module_up.collect());
        families.extend(module_duration.collect());
        families.extend(self.build_info.collect());
        // Families without samples cannot be encoded.
        families.retain(|family| !family.get_metric().is_empty());
        families.sort_by(|a, b| a.get_name().cmp(b.get_name()));

        info!(duration = ?start.elapsed(), all_up, "metrics updated");
        families
    }
}
