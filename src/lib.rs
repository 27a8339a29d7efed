#[macro_use]
extern crate tracing;

mod errors;
mod logging;

use color_eyre::Result;
pub use errors::init_errors;
use eyre::Context as _;
pub use logging::init_logging;
use std::sync::Arc;
use tokio::net::TcpListener;
use zookeeper_exporter_collector::{
    BuildInfo,
    Exporter,
    ExporterSettings,
    FourLetterClient,
    ModuleRegistry,
    NodeIdentity,
};
use zookeeper_exporter_config::Config;

/// Identity labels of the scraped server, derived from the configuration.
pub fn node_identity(config: &Config) -> NodeIdentity {
    NodeIdentity {
        host: config.zk_host.clone(),
        node: config.node().to_string(),
        cluster: config.cluster_name.clone(),
        subsystem_name: config.subsystem_name.clone(),
        subsystem_id: config.subsystem_id.clone(),
    }
}

/// Builds the exporter from `config` and serves it until SIGINT or SIGTERM.
pub async fn run(config: Config) -> Result<()> {
    let build = BuildInfo::current();
    info!(version = build.version, revision = build.revision, "starting zookeeper exporter");
    info!(
        zk_host = %config.zk_host,
        timeout = ?config.timeout(),
        modules = ?config.enabled_modules(),
        extra_labels = ?config.extra_labels(),
        "configuration"
    );

    let settings = ExporterSettings {
        enabled_modules: config.enabled_modules(),
        identity: node_identity(&config),
        extra_labels: config.extra_labels(),
    };
    let backend = Arc::new(FourLetterClient::new(config.zk_host.clone(), config.timeout()));
    let exporter = Exporter::new(&ModuleRegistry::with_defaults(), settings, backend)
        .wrap_err("Failed to set up the exporter")?;

    let addr = config.listen_address()?;
    let listener = TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("Failed to listen on {addr}"))?;

    zookeeper_exporter_http::serve(listener, Arc::new(exporter), shutdown_signal())
        .await
        .wrap_err("HTTP server failed")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::io::{
        AsyncReadExt,
        AsyncWriteExt,
    };

    /// Answers four-letter words on a loopback port like a standalone server would.
    async fn fake_zookeeper() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                tokio::spawn(async move {
                    let mut command = [0u8; 4];
                    if stream.read_exact(&mut command).await.is_err() {
                        return;
                    }
                    let reply: &[u8] = match &command {
                        b"ruok" => b"imok",
                        b"mntr" => b"zk_version\t3.8.4\nzk_server_state\tfollower\nzk_num_alive_connections\t4\n",
                        b"cons" => b" /10.0.0.5:51234[1](queued=0,recved=12,sent=12,sid=0x100,lop=PING,est=1700000000000,to=30000,lcxid=0x3,lzxid=0x20,lresp=1700000001000,llat=0,minlat=0,avglat=1,maxlat=3)\n\n",
                        _ => b"",
                    };
                    let _ = stream.write_all(reply).await;
                });
            }
        });
        addr
    }

    fn sample(families: &[prometheus::proto::MetricFamily], name: &str) -> Option<f64> {
        families
            .iter()
            .find(|family| family.get_name() == name)
            .and_then(|family| family.get_metric().first())
            .map(|metric| metric.get_gauge().get_value())
    }

    #[tokio::test]
    async fn test_scrape_against_loopback_server() {
        let addr = fake_zookeeper().await;
        let config = Config {
            zk_host: addr.clone(),
            enabled_exporters: vec!["cons".to_string(), "mntr".to_string(), "ruok".to_string()],
            cluster_name: "main".to_string(),
            ..Config::default()
        };
        let settings = ExporterSettings {
            enabled_modules: config.enabled_modules(),
            identity: node_identity(&config),
            extra_labels: vec![("env".to_string(), "test".to_string())],
        };
        let backend = Arc::new(FourLetterClient::new(addr, Duration::from_secs(5)));
        let exporter = Exporter::new(&ModuleRegistry::with_defaults(), settings, backend).unwrap();

        let families = exporter.collect().await;
        assert_eq!(sample(&families, "zookeeper_up"), Some(1.0));
        assert_eq!(sample(&families, "zookeeper_server_is_leader"), Some(0.0));
        assert_eq!(sample(&families, "zookeeper_connections"), Some(4.0));
        assert_eq!(sample(&families, "zookeeper_client_recved"), Some(12.0));
        assert_eq!(sample(&families, "zookeeper_exporter_up"), Some(1.0));
        assert!(exporter.last_scrape_ok().await);

        for family in &families {
            for metric in family.get_metric() {
                let env = metric.get_label().iter().find(|label| label.get_name() == "env");
                assert_eq!(env.map(|label| label.get_value()), Some("test"), "{}", family.get_name());
            }
        }
    }

    #[test]
    fn test_node_identity_defaults_node_to_host() {
        let config = Config {
            zk_host: "zk1:2181".to_string(),
            cluster_name: "main".to_string(),
            subsystem_name: "coordination".to_string(),
            subsystem_id: "7".to_string(),
            ..Config::default()
        };
        assert_eq!(
            node_identity(&config),
            NodeIdentity {
                host: "zk1:2181".to_string(),
                node: "zk1:2181".to_string(),
                cluster: "main".to_string(),
                subsystem_name: "coordination".to_string(),
                subsystem_id: "7".to_string(),
            }
        );
    }

    #[test]
    fn test_node_identity_uses_node_name() {
        let config = Config {
            node_name: Some("zookeeper-0".to_string()),
            ..Config::default()
        };
        assert_eq!(node_identity(&config).node, "zookeeper-0");
    }
}
