use crate::client::Command;
use std::io;

/// Failure of one module during a scrape.
///
/// Resolution, connect, timeout, write and read failures all collapse into
/// [`ScrapeError::BackendUnreachable`]; the underlying cause is kept as the
/// error source.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("ZooKeeper at {address} is unreachable while sending `{command}`: {source}")]
    BackendUnreachable {
        address: String,
        command: Command,
        #[source]
        source: io::Error,
    },
}

/// Startup errors while assembling the module set.
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("A module cannot be registered without a name")]
    EmptyName,
    #[error("Building the metrics of `{module}` failed: {source}")]
    Metric {
        module: String,
        #[source]
        source: prometheus::Error,
    },
}
