//! Session middleware configuration.
//!
//! Sessions live in a bounded in-memory [`MokaStore`]. Records that go
//! untouched for the idle window are evicted, as are the least recently used
//! ones once `STOREFRONT_MAX_SESSIONS` is reached. Nothing survives a restart.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tower_sessions::{
    Expiry, SessionManagerLayer, SessionStore,
    cookie::time::OffsetDateTime,
    session::{Id, Record},
    session_store,
};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tl_session";

/// Session store backed by a `moka` cache with idle eviction.
#[derive(Debug, Clone)]
pub struct MokaStore {
    records: Cache<Id, Record>,
}

impl MokaStore {
    /// Create a store holding at most `max_capacity` sessions, each evicted
    /// after `idle` without a load or save.
    #[must_use]
    pub fn new(max_capacity: u64, idle: Duration) -> Self {
        Self {
            records: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Number of live sessions, after applying pending evictions.
    pub async fn session_count(&self) -> u64 {
        self.records.run_pending_tasks().await;
        self.records.entry_count()
    }
}

#[async_trait]
impl SessionStore for MokaStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.records.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .records
            .get(session_id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.invalidate(session_id).await;
        Ok(())
    }
}

/// Create the session store sized from configuration.
#[must_use]
pub fn create_session_store(config: &StorefrontConfig) -> MokaStore {
    MokaStore::new(config.max_sessions, config.session_idle())
}

/// Create the session layer.
///
/// Sessions are saved on every request so the inactivity expiry (and the
/// cookie's max-age) slides with activity.
///
/// # Arguments
///
/// * `store` - Session store shared with the rest of the app
/// * `config` - Storefront configuration (for cookie security and expiry)
#[must_use]
pub fn create_session_layer(
    store: MokaStore,
    config: &StorefrontConfig,
) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::minutes(i64::from(
                config.session_idle_minutes,
            )),
        ))
        .with_always_save(true)
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
