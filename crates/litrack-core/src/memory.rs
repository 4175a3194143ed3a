//! In-process document store.
//!
//! Implements [`RemoteCollection`] with the same observable behaviour as the
//! managed store: every write is followed by a full snapshot pushed to each
//! live subscriber of the collection. Used by the demo binary and tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::StoreError;
use crate::remote::{Document, Fields, RemoteCollection, Snapshot, SnapshotResult, Subscription};

/// Thread-safe in-memory document store.
#[derive(Clone, Default)]
pub struct MemoryCollection {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    /// Documents per collection, in creation order.
    collections: HashMap<String, Vec<Document>>,
    subscribers: Vec<Subscriber>,
    next_subscriber: u64,
    /// Failure returned by the next write, for exercising error paths.
    fail_next_write: Option<StoreError>,
}

struct Subscriber {
    id: u64,
    collection: String,
    tx: mpsc::UnboundedSender<SnapshotResult>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert documents without notifying anyone, e.g. to seed a demo.
    pub fn seed(
        &self,
        collection: &str,
        docs: impl IntoIterator<Item = Fields>,
    ) -> Result<Vec<String>, StoreError> {
        let mut inner = self.lock()?;
        let target = inner.collections.entry(collection.to_string()).or_default();
        let mut ids = Vec::new();
        for fields in docs {
            let id = new_document_id();
            target.push(Document {
                id: id.clone(),
                fields,
            });
            ids.push(id);
        }
        Ok(ids)
    }

    /// Current contents of a collection.
    pub fn snapshot(&self, collection: &str) -> Result<Snapshot, StoreError> {
        Ok(self.lock()?.snapshot(collection))
    }

    /// Number of live listeners on a collection.
    pub fn subscriber_count(&self, collection: &str) -> usize {
        self.lock()
            .map(|inner| {
                inner
                    .subscribers
                    .iter()
                    .filter(|s| s.collection == collection && !s.tx.is_closed())
                    .count()
            })
            .unwrap_or(0)
    }

    /// Make the next write fail with `error`.
    pub fn fail_next_write(&self, error: StoreError) {
        if let Ok(mut inner) = self.lock() {
            inner.fail_next_write = Some(error);
        }
    }

    /// Deliver an error to every listener on a collection.
    pub fn push_error(&self, collection: &str, error: StoreError) {
        if let Ok(mut inner) = self.lock() {
            inner.send_to(collection, || Err(error.clone()));
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Storage(format!("Mutex poisoned: {}", e)))
    }

    /// Run a write against the collection, then broadcast the new snapshot.
    fn write<T>(
        &self,
        collection: &str,
        apply: impl FnOnce(&mut Vec<Document>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut inner = self.lock()?;
        if let Some(error) = inner.fail_next_write.take() {
            return Err(error);
        }
        let docs = inner.collections.entry(collection.to_string()).or_default();
        let result = apply(docs)?;
        inner.broadcast(collection);
        Ok(result)
    }
}

impl Inner {
    fn snapshot(&self, collection: &str) -> Snapshot {
        self.collections.get(collection).cloned().unwrap_or_default()
    }

    fn broadcast(&mut self, collection: &str) {
        let snapshot = self.snapshot(collection);
        self.send_to(collection, || Ok(snapshot.clone()));
    }

    fn send_to(&mut self, collection: &str, message: impl Fn() -> SnapshotResult) {
        // Listeners whose receiver is gone are dropped here.
        self.subscribers
            .retain(|s| s.collection != collection || s.tx.send(message()).is_ok());
    }

    fn remove_subscriber(&mut self, id: u64) {
        self.subscribers.retain(|s| s.id != id);
    }
}

#[async_trait]
impl RemoteCollection for MemoryCollection {
    async fn subscribe(&self, collection: &str) -> Result<Subscription, StoreError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock()?;

        // Initial snapshot, like the managed store's first notification.
        let _ = tx.send(Ok(inner.snapshot(collection)));

        let id = inner.next_subscriber;
        inner.next_subscriber += 1;
        inner.subscribers.push(Subscriber {
            id,
            collection: collection.to_string(),
            tx,
        });
        tracing::debug!(collection, subscriber = id, "listener attached");

        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        Ok(Subscription::new(rx, move || {
            if let Some(inner) = weak.upgrade() {
                if let Ok(mut inner) = inner.lock() {
                    inner.remove_subscriber(id);
                    tracing::debug!(subscriber = id, "listener detached");
                }
            }
        }))
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        self.write(collection, |docs| {
            let id = new_document_id();
            docs.push(Document {
                id: id.clone(),
                fields,
            });
            Ok(id)
        })
    }

    async fn replace(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.write(collection, |docs| {
            let doc = find_mut(docs, id)?;
            doc.fields = fields;
            Ok(())
        })
    }

    async fn patch(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.write(collection, |docs| {
            let doc = find_mut(docs, id)?;
            doc.fields.extend(fields);
            Ok(())
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        // Deleting a missing document succeeds, as in the managed store.
        self.write(collection, |docs| {
            docs.retain(|d| d.id != id);
            Ok(())
        })
    }
}

fn find_mut<'a>(docs: &'a mut [Document], id: &str) -> Result<&'a mut Document, StoreError> {
    docs.iter_mut()
        .find(|d| d.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
