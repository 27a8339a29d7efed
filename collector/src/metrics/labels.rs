/// Labels appended to every sample, before the configured extra labels.
pub const IDENTITY_LABELS: [&str; 4] = ["hostname", "subsystemName", "subsystemID", "clusterName"];

/// Identifies the scraped node and the deployment it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeIdentity {
    /// Address the exporter talks to.
    pub host: String,
    /// Value of the per-module `node` label.
    pub node: String,
    pub cluster: String,
    pub subsystem_name: String,
    pub subsystem_id: String,
}

/// Label names and values appended, in order, to every gauge.
///
/// Built once at startup and never changed. `names` and `values` always have
/// the same length and the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelInjector {
    names: Vec<String>,
    values: Vec<String>,
}

impl LabelInjector {
    pub fn new(identity: &NodeIdentity, extra: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut names: Vec<String> = IDENTITY_LABELS.iter().map(|name| name.to_string()).collect();
        let mut values = vec![
            identity.host.clone(),
            identity.subsystem_name.clone(),
            identity.subsystem_id.clone(),
            identity.cluster.clone(),
        ];

        for (name, value) in extra {
            names.push(name);
            values.push(value);
        }

        Self { names, values }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// A metric's own label names followed by the injected ones.
    pub fn label_names<'a>(&'a self, own: &[&'a str]) -> Vec<&'a str> {
        own.iter()
            .copied()
            .chain(self.names.iter().map(String::as_str))
            .collect()
    }

    /// A sample's own label values followed by the injected ones.
    pub fn label_values<'a>(&'a self, own: &[&'a str]) -> Vec<&'a str> {
        own.iter()
            .copied()
            .chain(self.values.iter().map(String::as_str))
            .collect()
    }
}
