use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::itunes::{CatalogSearch, ItunesClient};
use crate::config::Config;
use crate::constants::catalog::USER_AGENT;
use crate::db::{ResultCacheStore, Store};
use crate::services::{PopularService, SearchService};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub search_service: Arc<SearchService>,

    pub popular_service: Arc<PopularService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        // One pooled HTTP client serves every catalog lookup.
        let http_client =
            build_shared_http_client(config.catalog.request_timeout_seconds.into())?;

        let catalog: Arc<dyn CatalogSearch> = Arc::new(
            ItunesClient::with_shared_client(http_client)
                .with_base_url(config.catalog.base_url.clone()),
        );

        let config_arc = Arc::new(RwLock::new(config));

        let cache_store: Arc<dyn ResultCacheStore> = Arc::new(store.clone());

        let search_service = Arc::new(SearchService::new(cache_store, catalog.clone()));
        let popular_service = Arc::new(PopularService::new(catalog));

        Ok(Self {
            config: config_arc,
            store,
            search_service,
            popular_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
