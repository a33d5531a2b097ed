//! `serve`: run the REST service over the document store

use tracing::info;

use crate::{api, config::Settings, documents::DocumentStore};

/// Apply the serve flags on top of the resolved settings.
pub fn serve_settings(
    mut settings: Settings,
    bind: Option<String>,
    port: Option<u16>,
    timeout: Option<u64>,
) -> Settings {
    if let Some(bind) = bind {
        settings.bind = bind;
    }
    if let Some(port) = port {
        settings.port = port;
    }
    if let Some(timeout) = timeout.filter(|t| *t > 0) {
        settings.timeout_secs = timeout;
    }
    settings
}

/// Handle the serve command
pub async fn handle_serve(settings: &Settings) -> anyhow::Result<()> {
    let addr = settings.listen_addr()?;
    let store = DocumentStore::open(&settings.store_paths().documents)?;
    info!(%addr, timeout_secs = settings.timeout_secs, "starting REST service");
    api::serve(store, addr, settings.timeout_secs).await
}
