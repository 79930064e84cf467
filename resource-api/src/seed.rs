use tracing::info;

use crate::resources::NewResource;
use crate::store::{ResourceStore, StoreError};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// The fixed set of records loaded by the `seed` command.
pub fn seed_resources() -> Vec<NewResource> {
    vec![
        NewResource {
            id: 1,
            name: "National Domestic Violence Hotline".to_string(),
            category: "domestic-violence".to_string(),
            location: "National".to_string(),
            phone: "1-800-799-7233".to_string(),
            website: "https://www.thehotline.org".to_string(),
            available_24h: true,
            description: "24/7 confidential support".to_string(),
        },
        NewResource {
            id: 2,
            name: "Crisis Text Line".to_string(),
            category: "mental-health".to_string(),
            location: "National".to_string(),
            phone: "Text HOME to 741741".to_string(),
            website: "https://www.crisistextline.org".to_string(),
            available_24h: true,
            description: "24/7 crisis support via text".to_string(),
        },
        NewResource {
            id: 3,
            name: "Local Women's Shelter - NYC".to_string(),
            category: "domestic-violence".to_string(),
            location: "New York".to_string(),
            phone: "212-555-0123".to_string(),
            website: "https://example-shelter.org".to_string(),
            available_24h: false,
            description: "Safe housing and support services".to_string(),
        },
    ]
}

/// Insert every seed record that is not already present. Existing rows are never modified,
/// so running this repeatedly is safe.
pub async fn seed_store(
    store: &(dyn ResourceStore + Send + Sync),
) -> Result<SeedReport, StoreError> {
    let mut report = SeedReport::default();

    for resource in seed_resources() {
        if store.upsert(&resource).await? {
            info!(id = resource.id, "inserted seed resource");
            report.inserted += 1;
        } else {
            report.skipped += 1;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Predicate;
    use crate::store::MemoryResourceStore;

    #[tokio::test]
    async fn seeding_twice_inserts_once() {
        let store = MemoryResourceStore::new();

        let first = seed_store(&store).await.unwrap();
        let second = seed_store(&store).await.unwrap();

        assert_eq!(first, SeedReport { inserted: 3, skipped: 0 });
        assert_eq!(second, SeedReport { inserted: 0, skipped: 3 });
        assert_eq!(store.find_many(&[Predicate::All]).await.unwrap().len(), 3);
    }

    #[test]
    fn seed_ids_are_one_to_three() {
        let ids: Vec<i32> = seed_resources().iter().map(|r| r.id).collect();

        assert_eq!(ids, vec![1, 2, 3]);
    }
}
