//! HTTP surface of the exporter: `/metrics`, `/health` and a landing page.

#[macro_use]
extern crate tracing;

pub mod error;
pub mod router;

pub use error::AppError;
pub use router::{
    create_router,
    AppState,
};
use std::{
    future::Future,
    io,
    sync::Arc,
};
use tokio::net::TcpListener;
use zookeeper_exporter_collector::Exporter;

/// Serves the exporter on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, exporter: Arc<Exporter>, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "listening");

    axum::serve(listener, create_router(exporter))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("server stopped");
    Ok(())
}
