use std::sync::Arc;

use crate::config::Config;
use crate::locks::ProfileLocks;
use crate::profiles::session::SessionCache;
use crate::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The profile record store collaborator. Postgres in production,
    /// in-memory in tests.
    pub store: Arc<dyn ProfileStore>,
    /// Per-profile write serialization for read-modify-write operations.
    pub locks: ProfileLocks,
    /// Explicit expiring read cache for profile lookups.
    pub sessions: Arc<SessionCache>,
    pub config: Config,
}
