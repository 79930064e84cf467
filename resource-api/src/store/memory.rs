use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::{ResourceStore, StoreError};
use crate::query::Predicate;
use crate::resources::{NewResource, Resource};
use crate::seed::seed_resources;

/// An in-process ResourceStore with the same filtering and ordering rules as the
/// PostgreSQL one. Used by tests, and handy for running the API without a database.
#[derive(Default)]
pub struct MemoryResourceStore {
    resources: RwLock<Vec<Resource>>,
    failing: AtomicBool,
    closed: AtomicBool,
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the seed records, created in id order.
    pub fn seeded() -> Self {
        let store = Self::new();
        for resource in seed_resources() {
            store.insert_new(resource);
        }
        store
    }

    /// Insert a fully formed resource, replacing any with the same id.
    pub fn insert(&self, resource: Resource) {
        let mut resources = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        resources.retain(|r| r.id != resource.id);
        resources.push(resource);
    }

    /// Make every subsequent call fail as if the database went away.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) || self.is_closed() {
            return Err(StoreError::Unavailable(sqlx::Error::PoolClosed));
        }
        Ok(())
    }

    fn insert_new(&self, resource: NewResource) -> bool {
        let mut resources = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        if resources.iter().any(|r| r.id == resource.id) {
            return false;
        }

        // Creation times are strictly increasing, even when the clock doesn't move between inserts.
        let now = Utc::now();
        let created_at = match resources.iter().map(|r| r.created_at).max() {
            Some(latest) if latest >= now => latest + Duration::microseconds(1),
            _ => now,
        };

        resources.push(resource.into_resource(created_at));
        true
    }
}

fn newest_first(a: &Resource, b: &Resource) -> std::cmp::Ordering {
    b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn find_many(&self, predicates: &[Predicate]) -> Result<Vec<Resource>, StoreError> {
        self.check_available()?;

        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        let mut matching: Vec<Resource> = resources
            .iter()
            .filter(|r| predicates.iter().all(|p| p.matches(r)))
            .cloned()
            .collect();
        matching.sort_by(newest_first);

        Ok(matching)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Resource>, StoreError> {
        self.check_available()?;

        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        Ok(resources.iter().find(|r| r.id == id).cloned())
    }

    async fn upsert(&self, resource: &NewResource) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self.insert_new(resource.clone()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Build a resource with an explicit creation time, for ordering tests.
#[cfg(test)]
pub fn resource_created_at(
    id: i32,
    location: &str,
    category: &str,
    created_at: chrono::DateTime<Utc>,
) -> Resource {
    NewResource {
        id,
        name: format!("resource {id}"),
        category: category.to_string(),
        location: location.to_string(),
        phone: "555-0100".to_string(),
        website: "https://example.org".to_string(),
        available_24h: false,
        description: String::new(),
    }
    .into_resource(created_at)
}
