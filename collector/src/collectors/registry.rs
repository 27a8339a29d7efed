use crate::{
    collectors::{
        ConfCollector,
        ConsCollector,
        MntrCollector,
        Module,
        RuokCollector,
    },
    error::RegistryError,
    metrics::LabelInjector,
};
use std::{
    collections::{
        BTreeMap,
        HashMap,
    },
    fmt,
    sync::Arc,
};

/// Builds a module whose gauges carry the given injected labels.
pub type ModuleFactory = Arc<dyn Fn(&Arc<LabelInjector>) -> prometheus::Result<Box<dyn Module>> + Send + Sync>;

/// Maps module names to factories.
///
/// Populated once at startup, then used to instantiate the configured
/// modules. Registering a name twice replaces the earlier factory.
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    factories: HashMap<String, ModuleFactory>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in `conf`, `cons`, `mntr` and `ruok` modules.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(ConfCollector::NAME, Arc::new(ConfCollector::factory));
        registry.insert(ConsCollector::NAME, Arc::new(ConsCollector::factory));
        registry.insert(MntrCollector::NAME, Arc::new(MntrCollector::factory));
        registry.insert(RuokCollector::NAME, Arc::new(RuokCollector::factory));
        registry
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&Arc<LabelInjector>) -> prometheus::Result<Box<dyn Module>> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        self.insert(&name, Arc::new(factory));
        Ok(())
    }

    fn insert(&mut self, name: &str, factory: ModuleFactory) {
        if self.factories.insert(name.to_string(), factory).is_some() {
            debug!(module = name, "replacing registered module factory");
        }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Builds one instance per enabled name that has a registered factory.
    ///
    /// Unknown names are logged and skipped so that a configuration listing an
    /// unsupported module still starts.
    pub fn instantiate<S: AsRef<str>>(
        &self,
        enabled: &[S],
        injector: &Arc<LabelInjector>,
    ) -> Result<BTreeMap<String, Box<dyn Module>>, RegistryError> {
        let mut modules = BTreeMap::new();
        for name in enabled {
            let name = name.as_ref();
            let Some(factory) = self.factories.get(name) else {
                warn!(module = name, known = ?self.names(), "ignoring unknown module");
                continue;
            };

            let module = factory(injector).map_err(|source| RegistryError::Metric {
                module: name.to_string(),
                source,
            })?;
            modules.insert(name.to_string(), module);
        }
        Ok(modules)
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry").field("modules", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collectors::testing::injector,
        metrics::NodeIdentity,
    };

    #[test]
    fn defaults_register_the_four_modules() {
        assert_eq!(ModuleRegistry::with_defaults().names(), vec!["conf", "cons", "mntr", "ruok"]);
    }

    #[test]
    fn unknown_names_are_ignored() {
        let (injector, _) = injector();
        let modules = ModuleRegistry::with_defaults()
            .instantiate(&["mntr", "node", "overview", "ruok"], &injector)
            .unwrap();

        let names: Vec<_> = modules.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["mntr", "ruok"]);
        assert_eq!(modules["mntr"].name(), "mntr");
    }

    #[test]
    fn last_registration_wins() {
        let (injector, _) = injector();
        let mut registry = ModuleRegistry::with_defaults();
        registry.register("mntr", RuokCollector::factory).unwrap();

        let modules = registry.instantiate(&["mntr"], &injector).unwrap();
        assert_eq!(modules["mntr"].name(), "ruok");
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut registry = ModuleRegistry::new();
        assert!(matches!(
            registry.register("  ", MntrCollector::factory),
            Err(RegistryError::EmptyName)
        ));
        assert!(registry.names().is_empty());
    }

    #[test]
    fn invalid_extra_label_fails_instantiation() {
        let injector = Arc::new(LabelInjector::new(
            &NodeIdentity::default(),
            [("not-a-label".to_string(), "x".to_string())],
        ));

        let error = ModuleRegistry::with_defaults()
            .instantiate(&["ruok"], &injector)
            .err()
            .unwrap();
        assert!(matches!(error, RegistryError::Metric { ref module, .. } if module == "ruok"));
    }
}
