use reqwest::{Client, Response};
use tracing::{debug, warn};

use super::{Collection, Entity, StoreApi, StoreError};

/// Where the original json-server setup listens.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct StoreConfig {
    /// The root URL under which the collections are served, e.g.
    /// `http://localhost:4000`.
    pub base_url: String,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        StoreConfig { base_url: base_url.into() }
    }

    pub fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), collection.path())
    }

    pub fn record_url(&self, collection: Collection, id: u64) -> String {
        format!("{}/{}", self.collection_url(collection), id)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new(DEFAULT_BASE_URL)
    }
}

/// Talks to the backing store over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpStore {
    config: StoreConfig,
    client: Client,
}

impl HttpStore {
    pub fn new(config: StoreConfig) -> Self {
        HttpStore { config, client: Client::new() }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl StoreApi for HttpStore {
    async fn list<E: Entity>(&self) -> Result<Vec<E>, StoreError> {
        let collection = E::COLLECTION;
        let url = self.config.collection_url(collection);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "fetch failed");
            return Err(StoreError::FetchFailed { collection, status: status.as_u16() });
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| StoreError::Decode { collection, source })
    }

    async fn create<E: Entity>(&self, entity: &E) -> Result<(), StoreError> {
        let collection = E::COLLECTION;
        let url = self.config.collection_url(collection);
        debug!(%url, id = entity.raw_id(), "POST");
        let response = self.client.post(&url).json(entity).send().await?;
        check_write(collection, response)
    }

    async fn delete(&self, collection: Collection, id: u64) -> Result<(), StoreError> {
        let url = self.config.record_url(collection, id);
        debug!(%url, "DELETE");
        let response = self.client.delete(&url).send().await?;
        check_write(collection, response)
    }
}

// the body of a successful write is never needed, only its status
fn check_write(collection: Collection, response: Response) -> Result<(), StoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        warn!(url = %response.url(), %status, "write rejected");
        Err(StoreError::RequestFailed { collection, status: status.as_u16() })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_points_at_local_json_server() {
        assert_eq!(
            StoreConfig::default().collection_url(Collection::Formulas),
            "http://localhost:4000/formulas"
        );
    }

    #[test]
    fn record_urls_ignore_trailing_slash() {
        let config = StoreConfig::new("http://example.test/api/");
        assert_eq!(
            config.record_url(Collection::Categories, 1700000000000),
            "http://example.test/api/categories/1700000000000"
        );
    }

    #[tokio::test]
    async fn unreachable_store_is_a_transport_error() {
        // port 9 (discard) is essentially never served on loopback
        let store = HttpStore::new(StoreConfig::new("http://127.0.0.1:9"));
        let err = store.list::<crate::data::Category>().await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }
}
