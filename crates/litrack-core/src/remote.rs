//! Boundary to the remote document store.
//!
//! The store delivers complete snapshots of a collection, never deltas.
//! Writes are acknowledged asynchronously; their effect becomes visible
//! through the next snapshot.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::error::StoreError;

/// Stored fields of a document.
pub type Fields = Map<String, Value>;

/// One document as delivered by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// Complete current contents of a collection.
pub type Snapshot = Vec<Document>;

/// Notification delivered on a subscription.
pub type SnapshotResult = Result<Snapshot, StoreError>;

/// The trait every document store backend implements.
#[async_trait]
pub trait RemoteCollection: Send + Sync {
    /// Open a live subscription. The first notification carries the
    /// current contents.
    async fn subscribe(&self, collection: &str) -> Result<Subscription, StoreError>;

    /// Create a document. Returns the assigned id.
    async fn create(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Replace every field of an existing document.
    async fn replace(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Overwrite only the given fields of an existing document.
    async fn patch(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Delete a document.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

type CancelFn = Box<dyn FnOnce() + Send + Sync>;

/// Cancellable handle to a live snapshot stream.
///
/// Dropping the handle cancels it, so a listener cannot outlive its owner.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<SnapshotResult>,
    cancel: Option<CancelFn>,
}

impl Subscription {
    /// Wrap a receiver; `on_cancel` detaches the listener on the store side.
    pub fn new(
        receiver: mpsc::UnboundedReceiver<SnapshotResult>,
        on_cancel: impl FnOnce() + Send + Sync + 'static,
    ) -> Self {
        Self {
            receiver,
            cancel: Some(Box::new(on_cancel)),
        }
    }

    /// Wait for the next notification. `None` once the stream has ended or
    /// been cancelled.
    pub async fn next(&mut self) -> Option<SnapshotResult> {
        if self.cancel.is_none() {
            return None;
        }
        self.receiver.recv().await
    }

    /// Detach the listener. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
            self.receiver.close();
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
