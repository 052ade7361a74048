//! Derived views memoized against collection revisions.

use parking_lot::Mutex;
use std::sync::Arc;

use super::collection::Collection;
use crate::domain::Record;

type Compute<R, T> = Box<dyn Fn(&[&R]) -> T + Send + Sync>;

/// A view derived from a collection, recomputed only after the collection
/// mutated.
///
/// The cached value is tagged with the revision it was computed from; any
/// mutation bumps the revision and the next [`Projection::get`] recomputes.
pub struct Projection<R: Record, T> {
    compute: Compute<R, T>,
    cache: Mutex<Option<(u64, Arc<T>)>>,
}

impl<R: Record, T> Projection<R, T> {
    pub fn new(compute: impl Fn(&[&R]) -> T + Send + Sync + 'static) -> Self {
        Self {
            compute: Box::new(compute),
            cache: Mutex::new(None),
        }
    }

    /// Current value of the view for `collection`.
    pub fn get(&self, collection: &Collection<R>) -> Arc<T> {
        collection.read(|revision, records| {
            let mut cache = self.cache.lock();
            if let Some((cached_at, value)) = cache.as_ref() {
                if *cached_at == revision {
                    return Arc::clone(value);
                }
            }
            let value = Arc::new((self.compute)(&records));
            *cache = Some((revision, Arc::clone(&value)));
            value
        })
    }

    /// Drop the cached value.
    pub fn invalidate(&self) {
        *self.cache.lock() = None;
    }
}
