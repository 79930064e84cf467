use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use tokio::time::timeout;
use tracing::instrument;

use super::{ResourceStore, StoreError};
use crate::config::Config;
use crate::query::{push_predicates, Predicate};
use crate::resources::{NewResource, Resource};

const SELECT_RESOURCES: &str = r#"
SELECT
    id, name, category, location, phone, website, available_24h, description, created_at
FROM
    resources"#;

/// A ResourceStore backed by the `resources` table in PostgreSQL.
pub struct PgResourceStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgResourceStore {
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_pg_connections)
            .acquire_timeout(Duration::from_millis(config.acquire_timeout_ms))
            .connect(&config.database_url)
            .await?;

        Ok(Self::from_pool(
            pool,
            Duration::from_millis(config.query_timeout_ms),
        ))
    }

    pub fn from_pool(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Apply any pending migrations from `migrations/`.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Move the id sequence past the highest id, so rows inserted with explicit ids
    /// don't collide with later generated ones.
    pub async fn sync_id_sequence(&self) -> Result<(), StoreError> {
        let query = sqlx::query(
            r#"
SELECT setval(
    pg_get_serial_sequence('resources', 'id'),
    COALESCE((SELECT MAX(id) FROM resources), 0) + 1,
    false
)
            "#,
        )
        .execute(&self.pool);

        timeout(self.query_timeout, query).await??;
        Ok(())
    }
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    #[instrument(skip_all)]
    async fn find_many(&self, predicates: &[Predicate]) -> Result<Vec<Resource>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_RESOURCES);
        push_predicates(&mut qb, predicates);
        qb.push(" ORDER BY created_at DESC, id DESC");

        let query = qb.build_query_as::<Resource>().fetch_all(&self.pool);
        let resources = timeout(self.query_timeout, query).await??;

        Ok(resources)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> Result<Option<Resource>, StoreError> {
        let base_query = format!("{SELECT_RESOURCES} WHERE id = $1");
        let query = sqlx::query_as::<_, Resource>(&base_query)
            .bind(id)
            .fetch_optional(&self.pool);

        let resource = timeout(self.query_timeout, query).await??;

        Ok(resource)
    }

    #[instrument(skip_all, fields(id = resource.id))]
    async fn upsert(&self, resource: &NewResource) -> Result<bool, StoreError> {
        let query = sqlx::query(
            r#"
INSERT INTO resources
    (id, name, category, location, phone, website, available_24h, description)
VALUES
    ($1, $2, $3, $4, $5, $6, $7, $8)
ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(resource.id)
        .bind(&resource.name)
        .bind(&resource.category)
        .bind(&resource.location)
        .bind(&resource.phone)
        .bind(&resource.website)
        .bind(resource.available_24h)
        .bind(&resource.description)
        .execute(&self.pool);

        let result = timeout(self.query_timeout, query).await??;

        Ok(result.rows_affected() == 1)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let query = sqlx::query("SELECT 1").execute(&self.pool);
        timeout(self.query_timeout, query).await??;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
