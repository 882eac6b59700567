use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use photo_scroll::utils::config::Config;
use photo_scroll::utils::logging;
use photo_scroll::provider::flickr::FlickrProvider;
use photo_scroll::AppState;
use tracing::{info, warn};

// One thread: session updates only happen between suspension points.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cfg = Config::from_env();
    if cfg.api_key.is_empty() {
        warn!("SCROLL_API_KEY is not set; every search will be rejected by the provider");
    }

    let provider = FlickrProvider::new(&cfg).context("building provider client")?;
    let (state, _observer) = AppState::start(Arc::new(provider), cfg.throttle_window());

    let app = photo_scroll::api::routes::router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("listening" = %addr, throttle_ms = cfg.throttle_ms);
    axum::serve(listener, app).await?;
    Ok(())
}
