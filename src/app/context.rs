use std::sync::Arc;

use crate::app::Result;
use crate::config::Config;
use crate::fetcher::{HttpPhotoClient, PhotoFetcher};

/// Wires configuration to the HTTP client.
pub struct AppContext {
    pub config: Config,
    pub client: Arc<HttpPhotoClient>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let client = Arc::new(HttpPhotoClient::new(&config.api)?);
        Ok(Self { config, client })
    }

    /// The client behind the narrow fetch contract, for the feed worker.
    pub fn fetcher(&self) -> Arc<dyn PhotoFetcher + Send + Sync> {
        self.client.clone()
    }
}
