use axum::extract::FromRef;

use crate::catalogue_store::CatalogueStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogueStore = Arc<dyn CatalogueStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalogue_store: GuardedCatalogueStore,
}

impl ServerState {
    pub fn new(config: ServerConfig, catalogue_store: GuardedCatalogueStore) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            catalogue_store,
        }
    }
}

impl FromRef<ServerState> for GuardedCatalogueStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalogue_store.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
