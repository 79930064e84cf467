use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::query::Predicate;
use crate::resources::{NewResource, Resource};

mod memory;
mod postgres;

#[cfg(test)]
pub use memory::resource_created_at;
pub use memory::MemoryResourceStore;
pub use postgres::PgResourceStore;

/// Enumeration of errors for operations against the resource store.
/// Errors originating from sqlx are classified by whether the store could be reached at all.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    #[error("query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),
    #[error("timed out waiting for the database")]
    Timeout,
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(error),
            _ => StoreError::QueryFailed(error),
        }
    }
}

impl From<tokio::time::error::Elapsed> for StoreError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        StoreError::Timeout
    }
}

pub type ResourceStoreHandle = Arc<dyn ResourceStore + Send + Sync>;

/// Read access to the resources table, plus the insert-if-absent used by seeding.
#[async_trait]
pub trait ResourceStore {
    /// Resources matching every predicate, most recently created first.
    async fn find_many(&self, predicates: &[Predicate]) -> Result<Vec<Resource>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Resource>, StoreError>;

    /// Insert the resource unless one with the same id exists. Returns whether a row was inserted.
    async fn upsert(&self, resource: &NewResource) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    /// Release the underlying connections. Calling it twice is a no-op.
    async fn close(&self);
}
