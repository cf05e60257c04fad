use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use medwell_core::config::ClientConfig;
use medwell_engine::client::WellnessClient;
use medwell_engine::traits::{SessionStorage, Transport};
use medwell_providers::runtime::HttpClient;

use crate::config_store::ConfigStore;
use crate::session_store::FileSessionStorage;

/// Build a ready client: reqwest transport + file-backed session.
pub fn build_client(cfg: ClientConfig, session_path: &Path) -> anyhow::Result<WellnessClient> {
    let storage: Arc<dyn SessionStorage> = Arc::new(
        FileSessionStorage::open(session_path).context("open session storage")?,
    );
    let transport: Arc<dyn Transport> = Arc::new(HttpClient::new()?);

    log::info!(
        "medwell client ready: base_url={} session={}",
        cfg.base_url,
        session_path.display()
    );
    Ok(WellnessClient::new(cfg, storage, transport))
}

/// Same as `build_client`, reading the config file first (defaults if absent).
pub fn build_client_from_config_file(
    config_path: &Path,
    session_path: &Path,
) -> anyhow::Result<WellnessClient> {
    let cfg = ConfigStore::at_path(config_path).load_or_default()?;
    build_client(cfg, session_path)
}
