use crate::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Prometheus exporter for ZooKeeper's four-letter-word admin commands.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version = version(), about, long_about = None)]
pub struct Args {
    /// YAML or JSON configuration file. Defaults to `config.yaml` in the config directory.
    #[clap(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Address of the ZooKeeper server to scrape.
    #[clap(long, value_name = "HOST:PORT")]
    pub zk_host: Option<String>,

    /// Connect and read timeout for every command, in seconds.
    #[clap(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Address the metrics endpoint listens on. Empty means all interfaces.
    #[clap(long, value_name = "ADDR")]
    pub publish_addr: Option<String>,

    /// Port the metrics endpoint listens on.
    #[clap(long, value_name = "PORT")]
    pub publish_port: Option<u16>,

    /// Log output format: `tty` or `json`.
    #[clap(long, value_name = "FORMAT")]
    pub output_format: Option<OutputFormat>,

    /// Comma separated list of modules to run (conf, cons, mntr, ruok).
    #[clap(long, value_name = "MODULES", value_delimiter = ',')]
    pub enabled_exporters: Option<Vec<String>>,

    /// Value of the `node` label. Defaults to the ZooKeeper address.
    #[clap(long)]
    pub node_name: Option<String>,

    #[clap(long)]
    pub cluster_name: Option<String>,

    #[clap(long)]
    pub subsystem_name: Option<String>,

    #[clap(long)]
    pub subsystem_id: Option<String>,

    /// Print the effective configuration and exit.
    #[clap(long, action)]
    pub print_config: bool,
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            if let Some(zk_host) = &self.zk_host {
                cache.insert("zk_host".to_string(), zk_host.clone().into());
            }
            if let Some(timeout) = self.timeout {
                cache.insert("timeout".to_string(), timeout.into());
            }
            if let Some(publish_addr) = &self.publish_addr {
                cache.insert("publish_addr".to_string(), publish_addr.clone().into());
            }
            if let Some(publish_port) = self.publish_port {
                cache.insert("publish_port".to_string(), u64::from(publish_port).into());
            }
            if let Some(output_format) = self.output_format {
                cache.insert("output_format".to_string(), output_format.to_string().into());
            }
            if let Some(enabled_exporters) = &self.enabled_exporters {
                cache.insert("enabled_exporters".to_string(), enabled_exporters.clone().into());
            }
            let identity = [
                ("node_name", &self.node_name),
                ("cluster_name", &self.cluster_name),
                ("subsystem_name", &self.subsystem_name),
                ("subsystem_id", &self.subsystem_id),
            ];
            for (key, value) in identity {
                if let Some(value) = value {
                    cache.insert(key.to_string(), value.clone().into());
                }
            }
            Ok(cache)
        }
    }
}

pub fn version() -> String {
    let author = clap::crate_authors!();
    let version = clap::crate_version!();
    let config_dir_path = crate::get_config_dir().display().to_string();

    format!(
        "\
{version}

Authors: {author}

Config directory: {config_dir_path}"
    )
}
