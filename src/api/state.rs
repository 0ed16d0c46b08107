use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        catalog::AggregationCache,
        movie_search::MovieSearchService,
        providers::{CatalogProvider, ImageUrls},
        watch_list::WatchList,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn CatalogProvider>,
    pub catalog: Arc<AggregationCache>,
    pub search: MovieSearchService,
    pub watch_list: WatchList,
    pub images: ImageUrls,
}

impl AppState {
    /// Wires the services around a provider
    pub fn new(provider: Arc<dyn CatalogProvider>, config: &Config) -> Self {
        let catalog = Arc::new(AggregationCache::new(
            provider.clone(),
            config.catalog_ttl(),
            config.request_timeout(),
        ));

        Self {
            search: MovieSearchService::new(catalog.clone(), provider.clone()),
            provider,
            catalog,
            watch_list: WatchList::in_memory(),
            images: ImageUrls::new(config),
        }
    }
}
