use thiserror::Error;
use tracing::instrument;

use crate::query::ResourceFilters;
use crate::resources::Resource;
use crate::store::{ResourceStoreHandle, StoreError};

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("resource not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parse a resource id the lenient way: leading whitespace and an optional sign are
/// accepted, then the leading run of digits is used and anything after it ignored.
/// Input without leading digits, or outside the i32 range, has no id.
pub fn parse_resource_id(raw: &str) -> Option<i32> {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    if digits == 0 {
        return None;
    }

    trimmed[..sign_len + digits].parse::<i32>().ok()
}

/// Queries over the resource directory. The store is injected at construction.
#[derive(Clone)]
pub struct ResourceService {
    store: ResourceStoreHandle,
}

impl ResourceService {
    pub fn new(store: ResourceStoreHandle) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ResourceStoreHandle {
        &self.store
    }

    /// Resources matching all present filters, most recently created first.
    /// No match is an empty list, not an error.
    #[instrument(skip(self))]
    pub async fn list(&self, filters: &ResourceFilters) -> Result<Vec<Resource>, StoreError> {
        let resources = self.store.find_many(&filters.predicates()).await?;

        metrics::histogram!("resources_list_results").record(resources.len() as f64);

        Ok(resources)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, raw_id: &str) -> Result<Resource, LookupError> {
        let result = match parse_resource_id(raw_id) {
            Some(id) => self.store.find_by_id(id).await,
            None => Ok(None),
        };

        let outcome = match &result {
            Ok(Some(_)) => "found",
            Ok(None) => "not_found",
            Err(_) => "error",
        };
        metrics::counter!("resources_lookup_total", "outcome" => outcome).increment(1);

        result?.ok_or(LookupError::NotFound)
    }
}
