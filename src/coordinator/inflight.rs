//! In-flight fetch registrations.

use std::any::Any;
use std::sync::Arc;

use futures::future::{BoxFuture, Shared};

use crate::error::Result;

/// A fetch every caller for the same key awaits together.
pub type SharedFetch<V> = Shared<BoxFuture<'static, Result<Arc<V>>>>;

// == In-Flight Registration ==
/// A fetch registered under a key, with its value type erased.
///
/// `id` identifies this particular registration: once it has been detached
/// (by invalidation or `clear_all`) a later registration under the same key
/// gets a new id, and the completing fetch can tell it no longer owns the key.
pub(crate) struct InFlight {
    pub(crate) id: u64,
    fetch: Box<dyn Any + Send + Sync>,
}

impl InFlight {
    pub(crate) fn new<V: Send + Sync + 'static>(id: u64, fetch: SharedFetch<V>) -> Self {
        Self {
            id,
            fetch: Box::new(fetch),
        }
    }

    /// Returns a handle on the shared fetch, or None if it produces another type.
    pub(crate) fn join<V: Send + Sync + 'static>(&self) -> Option<SharedFetch<V>> {
        self.fetch.downcast_ref::<SharedFetch<V>>().cloned()
    }
}
