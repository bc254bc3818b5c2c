//! Change notification for [`CartStore`](super::CartStore) subscribers.

use super::state::{SessionState, StateChange};

/// Receives every snapshot a store produces.
///
/// Observers are only called when a mutation actually changed something, and
/// always after the new snapshot is in place.
pub trait CartObserver: Send + Sync {
    fn on_change(&self, snapshot: &SessionState, change: StateChange);
}

impl<F> CartObserver for F
where
    F: Fn(&SessionState, StateChange) + Send + Sync,
{
    fn on_change(&self, snapshot: &SessionState, change: StateChange) {
        self(snapshot, change);
    }
}

/// Handle returned by [`CartStore::subscribe`](super::CartStore::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
