use color_eyre::Result;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
    Registry,
};
use zookeeper_exporter_config::OutputFormat;

const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Installs the global subscriber. The filter comes from `LOG_LEVEL` and
/// defaults to `info`.
pub fn init_logging(format: OutputFormat) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
        OutputFormat::Json => fmt::layer().json().with_current_span(false).boxed(),
        OutputFormat::Tty => fmt::layer().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .with(tracing_error::ErrorLayer::default())
        .try_init()?;

    Ok(())
}
