use crate::error::AppError;
use axum::{
    extract::State,
    http::{
        header,
        StatusCode,
    },
    response::{
        Html,
        IntoResponse,
        Response,
    },
    routing::get,
    Router,
};
use prometheus::{
    Encoder,
    TextEncoder,
};
use std::sync::Arc;
use zookeeper_exporter_collector::Exporter;

const INDEX_PAGE: &str = r#"<html>
<head><title>ZooKeeper Exporter</title></head>
<body>
<h1>ZooKeeper Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
</body>
</html>
"#;

#[derive(Clone)]
pub struct AppState {
    pub exporter: Arc<Exporter>,
}

pub fn create_router(exporter: Arc<Exporter>) -> Router {
    let state = AppState { exporter };

    Router::new()
        .route("/", get(index))
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// Runs one scrape and renders it in the text exposition format.
async fn metrics(State(state): State<AppState>) -> Result<Response, AppError> {
    // Scrape on its own task so a client disconnect cannot abort it halfway.
    let exporter = Arc::clone(&state.exporter);
    let families = tokio::spawn(async move { exporter.collect().await }).await?;

    let encoder = TextEncoder::new();
    let mut body = Vec::new();
    encoder.encode(&families, &mut body)?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response())
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.exporter.last_scrape_ok().await {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::GATEWAY_TIMEOUT, "last scrape failed")
    }
}
