#[macro_use]
extern crate tracing;

mod app_config;
mod args;

pub use app_config::get_config_dir;
pub use args::{
    version,
    Args,
};
use color_eyre::Result;
use eyre::{
    eyre,
    Context as _,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    collections::BTreeMap,
    net::{
        SocketAddr,
        ToSocketAddrs,
    },
    time::Duration,
};
use strum::{
    Display,
    EnumString,
};

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

/// Format of the log lines written to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    #[serde(alias = "TTY")]
    Tty,
    #[serde(alias = "JSON")]
    Json,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub zk_host: String,
    /// Seconds allowed for connecting to and reading from the server.
    pub timeout: u64,
    #[serde(default)]
    pub publish_addr: String,
    pub publish_port: u16,
    #[serde(default)]
    pub output_format: OutputFormat,
    /// A list, or one comma separated string as set from the environment.
    #[serde(default, deserialize_with = "list_or_joined")]
    pub enabled_exporters: Vec<String>,
    /// Each entry is a single `name: value` map, kept in file order.
    #[serde(default)]
    pub extra_labels: Vec<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default)]
    pub subsystem_name: String,
    #[serde(default)]
    pub subsystem_id: String,
}

impl Default for Config {
    fn default() -> Self {
        serde_yml::from_str(DEFAULT_CONFIG).expect("Failed to parse default config")
    }
}

impl Config {
    /// Layers the embedded defaults, the config file, the environment and
    /// the command line, later sources winning.
    pub fn new(args: &Args) -> Result<Self, config::ConfigError> {
        Self::build(args, environment())
    }

    fn build(args: &Args, env: config::Environment) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml));

        builder = match &args.config_file {
            Some(path) => builder.add_source(config::File::from(path.clone()).required(true)),
            None => builder.add_source(
                config::File::from(get_config_dir().join("config.yaml"))
                    .format(config::FileFormat::Yaml)
                    .required(false),
            ),
        };

        builder = builder.add_source(env).add_source(args.clone());

        let cfg: Self = builder.build()?.try_deserialize()?;
        debug!(zk_host = %cfg.zk_host, modules = ?cfg.enabled_exporters, "Loaded configuration");

        Ok(cfg)
    }

    /// Rejects settings the exporter cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.zk_host.trim().is_empty() {
            return Err(eyre!("zk_host must not be empty"));
        }
        if self.timeout == 0 {
            return Err(eyre!("timeout must be at least one second"));
        }
        if self.publish_port == 0 {
            return Err(eyre!("publish_port must be between 1 and 65535"));
        }
        self.listen_address()?;
        Ok(())
    }

    /// Socket address of the metrics endpoint.
    pub fn listen_address(&self) -> Result<SocketAddr> {
        let host = match self.publish_addr.trim() {
            "" => "0.0.0.0",
            addr => addr,
        };
        (host, self.publish_port)
            .to_socket_addrs()
            .wrap_err_with(|| format!("Invalid listen address {host}:{}", self.publish_port))?
            .next()
            .ok_or_else(|| eyre!("Listen address {host} did not resolve"))
    }

    /// Extra labels as ordered `(name, value)` pairs.
    pub fn extra_labels(&self) -> Vec<(String, String)> {
        self.extra_labels
            .iter()
            .flat_map(|entry| entry.iter().map(|(name, value)| (name.clone(), value.clone())))
            .collect()
    }

    pub fn enabled_modules(&self) -> Vec<String> {
        self.enabled_exporters
            .iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Value of the `node` label, falling back to the server address.
    pub fn node(&self) -> &str {
        match self.node_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.zk_host,
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yml::to_string(self).context("Failed to serialize config")
    }
}

/// Values stay strings so label values such as `007` keep their exact text;
/// numeric fields are converted when deserializing.
fn environment() -> config::Environment {
    config::Environment::default()
}

fn list_or_joined<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrJoined {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match ListOrJoined::deserialize(deserializer)? {
        ListOrJoined::List(list) => list,
        ListOrJoined::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    })
}
