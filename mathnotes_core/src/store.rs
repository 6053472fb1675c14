//! Access to the backing store, a json-server style service exposing the
//! `categories` and `formulas` collections.

mod http;
mod memory;

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::data::{Catalog, Category, Formula};

pub use http::{HttpStore, StoreConfig, DEFAULT_BASE_URL};
pub use memory::{MemoryStore, Request};

/// A named collection of the backing store.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Collection {
    Categories,
    Formulas,
}

impl Collection {
    /// The path segment under which the collection is served.
    pub fn path(self) -> &'static str {
        match self {
            Collection::Categories => "categories",
            Collection::Formulas => "formulas",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A record type that lives in one of the store's collections.
pub trait Entity: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn raw_id(&self) -> u64;
}

impl Entity for Category {
    const COLLECTION: Collection = Collection::Categories;

    fn raw_id(&self) -> u64 {
        self.id.0
    }
}

impl Entity for Formula {
    const COLLECTION: Collection = Collection::Formulas;

    fn raw_id(&self) -> u64 {
        self.id.0
    }
}

/// Defines the requests that can be made to the backing store. Nothing is
/// retried and nothing times out; every request either completes with an
/// outcome or fails.
#[allow(async_fn_in_trait)]
pub trait StoreApi {
    /// Downloads every record of the entity's collection.
    async fn list<E: Entity>(&self) -> Result<Vec<E>, StoreError>;

    /// Stores the full record, including its client-assigned id.
    async fn create<E: Entity>(&self, entity: &E) -> Result<(), StoreError>;

    /// Removes the record with the given id from the collection.
    async fn delete(&self, collection: Collection, id: u64) -> Result<(), StoreError>;
}

/// Downloads both collections concurrently. Fails as a whole if either of
/// the downloads fails.
pub async fn list_all<S: StoreApi>(store: &S) -> Result<Catalog, StoreError> {
    let (categories, formulas) =
        tokio::try_join!(store.list::<Category>(), store.list::<Formula>())?;
    debug!(categories = categories.len(), formulas = formulas.len(), "downloaded catalog");
    Ok(Catalog::new(categories, formulas))
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to fetch {collection} (status {status}).")]
    FetchFailed { collection: Collection, status: u16 },
    #[error("Request to {collection} was rejected (status {status}).")]
    RequestFailed { collection: Collection, status: u16 },
    #[error("No record with id {id} in {collection}.")]
    NotFound { collection: Collection, id: u64 },
    #[error("Malformed {collection} data: {source}")]
    Decode {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unable to communicate with the store: {0}")]
    Transport(#[from] reqwest::Error),
}
