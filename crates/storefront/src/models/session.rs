//! Per-visitor cart state.
//!
//! Each visitor's [`SessionState`] lives in the [`CartRegistry`], keyed by
//! their session id, behind its own mutex. A mutation holds that mutex from
//! [`SessionCart::load`] until [`SessionCart::save`], so concurrent requests
//! in one session apply one after another and none of them is lost. The
//! session record itself only carries a visitor marker.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use threadline_core::cart::{CartObserver, CartStore, SessionState, StateChange};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower_sessions::{Session, session::Id};

use crate::error::{AppError, Result};
use crate::htmx::ViewRefresh;

/// Session keys.
pub mod keys {
    /// Marks a session that owns a cart.
    pub const VISITOR: &str = "visitor";
}

/// Cart state for every live session.
///
/// Entries idle for longer than the session window are evicted along with
/// the session, and the registry never holds more than `max_capacity` carts.
#[derive(Debug, Clone)]
pub struct CartRegistry {
    carts: Cache<Id, Arc<Mutex<SessionState>>>,
}

impl CartRegistry {
    #[must_use]
    pub fn new(max_capacity: u64, idle: Duration) -> Self {
        Self {
            carts: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_idle(idle)
                .build(),
        }
    }

    async fn entry(&self, id: Id) -> Arc<Mutex<SessionState>> {
        self.carts
            .get_with(id, async { Arc::new(Mutex::new(SessionState::default())) })
            .await
    }

    /// Copy of a visitor's state, waiting for any mutation in flight.
    pub async fn snapshot(&self, id: &Id) -> Option<SessionState> {
        let entry = self.carts.get(id).await?;
        let state = entry.lock().await.clone();
        Some(state)
    }

    /// Number of carts held, after applying pending evictions.
    pub async fn cart_count(&self) -> u64 {
        self.carts.run_pending_tasks().await;
        self.carts.entry_count()
    }
}

/// Logs every state change for a session.
#[derive(Debug)]
struct ChangeLogger;

impl CartObserver for ChangeLogger {
    fn on_change(&self, snapshot: &SessionState, change: StateChange) {
        tracing::debug!(
            aspects = ?change.aspects().collect::<Vec<_>>(),
            lines = snapshot.items.len(),
            units = snapshot.item_count(),
            cart_open = snapshot.cart_open,
            checkout_open = snapshot.checkout_open,
            selected = ?snapshot.selected_product,
            "Session state changed"
        );
    }
}

/// The session id, creating the session first if the visitor has none.
async fn visitor_id(session: &Session) -> Result<Id> {
    if session.get::<bool>(keys::VISITOR).await?.is_none() {
        session.insert(keys::VISITOR, true).await?;
        session.save().await?;
    }

    session
        .id()
        .ok_or_else(|| AppError::Internal("session has no id after save".to_string()))
}

/// A visitor's cart store, holding their cart lock until saved.
pub struct SessionCart {
    guard: OwnedMutexGuard<SessionState>,
    store: CartStore,
    refresh: Arc<ViewRefresh>,
}

impl SessionCart {
    /// Lock the visitor's cart and load it into a store.
    ///
    /// Waits for any other mutation in the same session to finish first.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or created.
    pub async fn load(session: &Session, carts: &CartRegistry) -> Result<Self> {
        let id = visitor_id(session).await?;
        let guard = carts.entry(id).await.lock_owned().await;

        let mut store = CartStore::from_snapshot(guard.clone());
        let refresh = Arc::new(ViewRefresh::default());
        store.subscribe(Arc::clone(&refresh) as Arc<dyn CartObserver>);
        store.subscribe(Arc::new(ChangeLogger));

        Ok(Self {
            guard,
            store,
            refresh,
        })
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut CartStore {
        &mut self.store
    }

    /// Write the snapshot back if it changed and release the lock.
    ///
    /// Returns the current snapshot and everything that changed since
    /// [`SessionCart::load`].
    pub fn save(mut self) -> (Arc<SessionState>, StateChange) {
        let change = self.refresh.take();
        let snapshot = self.store.snapshot();

        if !change.is_empty() {
            *self.guard = snapshot.as_ref().clone();
        }

        (snapshot, change)
    }
}

/// Read the visitor's state without locking it for a mutation.
///
/// Visitors without a session see the empty state, and no session is
/// created for them.
pub async fn current_state(session: &Session, carts: &CartRegistry) -> SessionState {
    match session.get::<bool>(keys::VISITOR).await {
        Ok(Some(_)) => {}
        Ok(None) => return SessionState::default(),
        Err(e) => {
            tracing::warn!("Ignoring unreadable session: {e}");
            return SessionState::default();
        }
    }

    match session.id() {
        Some(id) => carts.snapshot(&id).await.unwrap_or_default(),
        None => SessionState::default(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use threadline_core::{CurrencyCode, Price, Product, ProductId, Size};
    use tower_sessions::{
        SessionStore,
        session::Record,
        session_store::{self, Error as StoreError},
    };

    use super::*;
    use crate::middleware::MokaStore;

    /// A store that is always down.
    #[derive(Debug)]
    struct UnavailableStore;

    #[async_trait]
    impl SessionStore for UnavailableStore {
        async fn save(&self, _record: &Record) -> session_store::Result<()> {
            Err(StoreError::Backend("unavailable".to_string()))
        }

        async fn load(&self, _session_id: &Id) -> session_store::Result<Option<Record>> {
            Err(StoreError::Backend("unavailable".to_string()))
        }

        async fn delete(&self, _session_id: &Id) -> session_store::Result<()> {
            Err(StoreError::Backend("unavailable".to_string()))
        }
    }

    fn unavailable_session() -> Session {
        Session::new(Some(Id::default()), Arc::new(UnavailableStore), None)
    }

    fn session() -> Session {
        let store = MokaStore::new(100, Duration::from_secs(60));
        Session::new(None, Arc::new(store), None)
    }

    fn registry() -> CartRegistry {
        CartRegistry::new(100, Duration::from_secs(60))
    }

    fn product() -> Product {
        Product {
            id: ProductId::parse("tee-1").unwrap(),
            name: "Tee".to_string(),
            price: Price::from_cents(3400, CurrencyCode::USD),
            image: String::new(),
            description: String::new(),
            category: String::new(),
            sizes: vec![Size::M],
        }
    }

    #[tokio::test]
    async fn test_load_empty_session() {
        let session = session();
        let cart = SessionCart::load(&session, &registry()).await.unwrap();
        assert!(cart.store().items().is_empty());
        assert!(!cart.store().is_cart_open());
        assert!(session.id().is_some());
    }

    #[tokio::test]
    async fn test_save_persists_changes() {
        let session = session();
        let carts = registry();

        let mut cart = SessionCart::load(&session, &carts).await.unwrap();
        cart.store_mut().add_to_cart(&product(), Size::M);
        let (snapshot, change) = cart.save();

        assert!(!change.is_empty());
        assert_eq!(snapshot.item_count(), 1);
        assert_eq!(current_state(&session, &carts).await, *snapshot);
    }

    #[tokio::test]
    async fn test_noop_reports_no_change() {
        let session = session();
        let mut cart = SessionCart::load(&session, &registry()).await.unwrap();
        cart.store_mut().close_cart();
        let (_, change) = cart.save();
        assert!(change.is_empty());
    }

    #[tokio::test]
    async fn test_read_without_session_is_empty() {
        let session = session();
        let carts = registry();

        assert_eq!(current_state(&session, &carts).await, SessionState::default());
        assert!(session.id().is_none());
        assert_eq!(carts.cart_count().await, 0);
    }

    #[tokio::test]
    async fn test_read_with_unavailable_store_is_empty() {
        let carts = registry();

        let state = current_state(&unavailable_session(), &carts).await;

        assert_eq!(state, SessionState::default());
    }

    #[tokio::test]
    async fn test_mutation_with_unavailable_store_fails() {
        let result = SessionCart::load(&unavailable_session(), &registry()).await;

        let err = result.err().unwrap();
        assert!(matches!(err, AppError::Session(_)));
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_mutations_in_one_session_all_apply() {
        let session = session();
        let carts = registry();
        let product = product();

        let mut first = SessionCart::load(&session, &carts).await.unwrap();
        first.store_mut().add_to_cart(&product, Size::M);
        first.save();

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let session = session.clone();
                let carts = carts.clone();
                let product = product.clone();
                tokio::spawn(async move {
                    let mut cart = SessionCart::load(&session, &carts).await.unwrap();
                    tokio::task::yield_now().await;
                    cart.store_mut().add_to_cart(&product, Size::M);
                    cart.save();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let state = current_state(&session, &carts).await;
        assert_eq!(state.item_count(), 11);
    }

    #[tokio::test]
    async fn test_idle_cart_is_evicted() {
        let session = session();
        let carts = CartRegistry::new(100, Duration::from_millis(50));

        let mut cart = SessionCart::load(&session, &carts).await.unwrap();
        cart.store_mut().add_to_cart(&product(), Size::M);
        cart.save();
        assert_eq!(carts.cart_count().await, 1);

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(carts.cart_count().await, 0);
        assert_eq!(current_state(&session, &carts).await, SessionState::default());
    }
}
