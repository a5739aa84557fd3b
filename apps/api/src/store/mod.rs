pub mod memory;
pub mod migrate;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::profile::Profile;

/// Failures at the record-store boundary. Mutating operations abort and leave
/// the profile unmutated when the store is unavailable.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    #[error("malformed profile record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The Profile Record Store collaborator.
///
/// `upsert` is a full-record replace keyed by id. `record_fact` is the upvote
/// ledger primitive: it atomically records the `(target_key, visitor_id)`
/// fact and returns `false` when the fact already existed, so check-then-
/// record is a single call. Facts are write-once; there is no retraction.
///
/// Implementations upgrade raw records via `migrate::upgrade` on read, so the
/// core always sees fully-populated `Profile`s.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError>;

    async fn list(&self) -> Result<Vec<Profile>, StoreError>;

    async fn upsert(&self, profile: &Profile) -> Result<(), StoreError>;

    async fn record_fact(&self, target_key: &str, visitor_id: &str) -> Result<bool, StoreError>;

    async fn has_fact(&self, target_key: &str, visitor_id: &str) -> Result<bool, StoreError>;

    /// Administrative bulk reset: drops every profile and every recorded
    /// fact. The only in-band deletion path.
    async fn wipe(&self) -> Result<(), StoreError>;
}

/// Ledger key for a project upvote target. Profile targets use the bare
/// profile id; the composite key keeps profile and project votes independent.
pub fn project_target_key(project_id: &str) -> String {
    format!("project-{project_id}")
}
