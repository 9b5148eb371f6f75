use crate::db;
use crate::errors::Result;
use sqlx::SqlitePool;

#[derive(Debug, Clone)]
pub struct Service {
    pub db_pool: SqlitePool,
}

impl Service {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    /// Opens the store at `database_url` and applies pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = db::connect(database_url, max_connections).await?;
        Ok(Self::new(pool))
    }

    pub async fn in_memory() -> anyhow::Result<Self> {
        let pool = db::connect_in_memory().await?;
        Ok(Self::new(pool))
    }

    /// Seeds the catalog and the test identity. Idempotent.
    pub async fn seed(&self) -> anyhow::Result<()> {
        db::seed::seed_all(&self.db_pool).await
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.db_pool)
            .await?;
        Ok(())
    }
}
