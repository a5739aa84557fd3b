use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;

use crate::dates::today;
use crate::models::profile::Profile;
use crate::store::{migrate, ProfileStore, StoreError};

/// Postgres-backed record store. Each profile is one JSONB row keyed by id;
/// `upsert` is a full-record replace. Upvote facts live in their own table
/// with a composite primary key, so `record_fact` is a single conditional
/// insert — the check and the record cannot be split by a concurrent writer.
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the two tables on startup if they do not exist.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id         TEXT PRIMARY KEY,
                record     JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS upvote_facts (
                target_key TEXT NOT NULL,
                visitor_id TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (target_key, visitor_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Profile store schema ready");
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let raw: Option<Value> =
            sqlx::query_scalar("SELECT record FROM profiles WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match raw {
            Some(value) => Ok(Some(migrate::upgrade(value, today())?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Profile>, StoreError> {
        let raws: Vec<Value> =
            sqlx::query_scalar("SELECT record FROM profiles ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        raws.into_iter()
            .map(|v| migrate::upgrade(v, today()).map_err(StoreError::from))
            .collect()
    }

    async fn upsert(&self, profile: &Profile) -> Result<(), StoreError> {
        let record = serde_json::to_value(profile)?;
        sqlx::query(
            r#"
            INSERT INTO profiles (id, record, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (id) DO UPDATE
                SET record = EXCLUDED.record, updated_at = now()
            "#,
        )
        .bind(&profile.id)
        .bind(record)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn record_fact(&self, target_key: &str, visitor_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO upvote_facts (target_key, visitor_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(target_key)
        .bind(visitor_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn has_fact(&self, target_key: &str, visitor_id: &str) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM upvote_facts WHERE target_key = $1 AND visitor_id = $2)",
        )
        .bind(target_key)
        .bind(visitor_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn wipe(&self) -> Result<(), StoreError> {
        sqlx::query("TRUNCATE profiles, upvote_facts")
            .execute(&self.pool)
            .await?;
        info!("Profile store wiped");
        Ok(())
    }
}
