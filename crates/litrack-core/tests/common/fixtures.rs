//! Shared test fixtures: stores, identity providers and sample entries

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use litrack_core::domain::{LiteratureEntry, Roster, Status};
use litrack_core::{
    IdentityError, IdentityProvider, IdentityToken, MemoryCollection, SyncConfig, SyncController,
    ViewModelStore,
};

pub const COLLECTION: &str = "literature";

/// Identity provider failing a fixed number of times before succeeding.
pub struct FlakyIdentity {
    failures: u32,
    error: IdentityError,
    calls: AtomicU32,
}

impl FlakyIdentity {
    pub fn new(failures: u32, error: IdentityError) -> Self {
        Self {
            failures,
            error,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FlakyIdentity {
    async fn sign_in_anonymously(&self) -> Result<IdentityToken, IdentityError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(self.error.clone())
        } else {
            Ok(IdentityToken::new("anon-test"))
        }
    }
}

pub fn roster() -> Roster {
    Roster::parse_list("Ana, Ben")
}

pub fn sync_config(identity_attempts: u32) -> SyncConfig {
    SyncConfig {
        identity_attempts,
        retry_backoff_ms: 1_000,
        ..SyncConfig::default()
    }
}

/// Controller over `store` with an identity that always succeeds.
pub fn controller(store: &MemoryCollection) -> SyncController {
    controller_with_identity(store, Arc::new(FlakyIdentity::new(0, unavailable())), 3)
}

pub fn controller_with_identity(
    store: &MemoryCollection,
    identity: Arc<dyn IdentityProvider>,
    identity_attempts: u32,
) -> SyncController {
    SyncController::new(
        Arc::new(store.clone()),
        identity,
        sync_config(identity_attempts),
        roster(),
    )
}

/// Activate and apply the initial snapshot.
pub async fn connected(store: &MemoryCollection) -> (SyncController, ViewModelStore) {
    let mut sync = controller(store);
    let mut view = ViewModelStore::new();
    sync.activate().await.expect("activate");
    assert!(sync.sync_next(&mut view).await.expect("initial snapshot"));
    (sync, view)
}

pub fn unavailable() -> IdentityError {
    IdentityError::Unavailable("network down".to_string())
}

pub fn entry(title: &str, year: i32, status: Status, relevance: i32) -> LiteratureEntry {
    LiteratureEntry {
        title: title.to_string(),
        authors: "Doe, J.".to_string(),
        year,
        pic: "Ana".to_string(),
        relevance,
        status,
        ..Default::default()
    }
}

/// Seed the store with stored-field versions of `entries`.
pub fn seed(store: &MemoryCollection, entries: &[LiteratureEntry]) -> Vec<String> {
    store
        .seed(
            COLLECTION,
            entries.iter().map(|e| e.to_fields().expect("encode entry")),
        )
        .expect("seed")
}
