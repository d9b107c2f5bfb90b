mod cache_store;
mod data_store;
mod errors;
mod types;

pub(crate) use cache_store::{CacheStore, GENERIC_CACHE_STORE};
pub(crate) use data_store::{DB_TABLE_IDENTITIES, DB_TABLE_USERS, DataStore, GENERIC_DATA_STORE};
pub(crate) use errors::StorageError;
pub(crate) use types::CacheData;

/// Verify the cache backend is reachable before serving traffic
pub(crate) async fn init() -> Result<(), StorageError> {
    GENERIC_CACHE_STORE.lock().await.init().await
}
