//! Sync controller: keeps the local mirror in step with the remote collection.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──activate──▶ Connecting ──identity + subscribe──▶ Subscribed
//!   ▲                    │                                   │
//!   └──── deactivate ────┴──────── failure ──▶ Error ◀───────┘
//! ```
//!
//! Each notification carries the whole collection and replaces the mirror.
//! Mutations never touch the mirror; their effect arrives with the next
//! snapshot, so the store stays the only ordering authority.

use std::sync::Arc;
use std::time::Duration;

use litrack_domain::{
    validate_entry, EntryId, LiteratureEntry, Roster, Status, ValidationError, ValidationSeverity,
};

use crate::config::SyncConfig;
use crate::editor::{EntryEditor, SaveTarget, Submission};
use crate::error::{LitrackError, StoreError, SyncError};
use crate::identity::{IdentityProvider, IdentityToken};
use crate::remote::{Fields, RemoteCollection, Snapshot, Subscription};
use crate::view::{Notice, ViewModelStore};

/// Subscription lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Connecting,
    Subscribed,
    Error(String),
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncState::Idle => f.write_str("idle"),
            SyncState::Connecting => f.write_str("connecting"),
            SyncState::Subscribed => f.write_str("subscribed"),
            SyncState::Error(reason) => write!(f, "error: {reason}"),
        }
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Saved {
    Created(EntryId),
    Updated(EntryId),
}

impl Saved {
    pub fn id(&self) -> &str {
        match self {
            Saved::Created(id) | Saved::Updated(id) => id,
        }
    }
}

/// Owns the subscription and issues mutations against the remote store.
pub struct SyncController {
    store: Arc<dyn RemoteCollection>,
    identity: Arc<dyn IdentityProvider>,
    config: SyncConfig,
    roster: Roster,
    state: SyncState,
    token: Option<IdentityToken>,
    subscription: Option<Subscription>,
}

impl SyncController {
    pub fn new(
        store: Arc<dyn RemoteCollection>,
        identity: Arc<dyn IdentityProvider>,
        config: SyncConfig,
        roster: Roster,
    ) -> Self {
        Self {
            store,
            identity,
            config,
            roster,
            state: SyncState::Idle,
            token: None,
            subscription: None,
        }
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn identity(&self) -> Option<&IdentityToken> {
        self.token.as_ref()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn is_subscribed(&self) -> bool {
        self.state == SyncState::Subscribed
            && self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    fn transition(&mut self, next: SyncState) {
        tracing::debug!(from = %self.state, to = %next, "sync state transition");
        self.state = next;
    }

    fn fail(&mut self, error: &SyncError) {
        tracing::error!("Sync failed: {}", error);
        self.teardown();
        self.transition(SyncState::Error(error.to_string()));
    }

    fn teardown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
            tracing::debug!(collection = %self.config.collection, "subscription cancelled");
        }
    }

    // ===== Lifecycle =====

    /// Obtain an identity, then open the single subscription.
    ///
    /// A no-op when already subscribed.
    pub async fn activate(&mut self) -> Result<(), SyncError> {
        if self.is_subscribed() {
            return Ok(());
        }
        self.teardown();
        self.transition(SyncState::Connecting);

        let token = match self.token.clone() {
            Some(token) => token,
            None => match self.acquire_identity().await {
                Ok(token) => token,
                Err(e) => {
                    self.fail(&e);
                    return Err(e);
                }
            },
        };
        self.token = Some(token);

        match self.store.subscribe(&self.config.collection).await {
            Ok(subscription) => {
                self.subscription = Some(subscription);
                self.transition(SyncState::Subscribed);
                tracing::info!(collection = %self.config.collection, "subscribed to collection");
                Ok(())
            }
            Err(source) => {
                let error = SyncError::Subscription(source);
                self.fail(&error);
                Err(error)
            }
        }
    }

    /// Drop the current identity and subscription, then activate again.
    ///
    /// The previous listener is cancelled before the new one is opened.
    pub async fn reactivate(&mut self) -> Result<(), SyncError> {
        self.deactivate();
        self.token = None;
        self.activate().await
    }

    /// Cancel the subscription (view teardown).
    pub fn deactivate(&mut self) {
        self.teardown();
        self.transition(SyncState::Idle);
    }

    /// Activate and surface a failure as a notice on the view.
    pub async fn start(&mut self, view: &mut ViewModelStore) -> Result<(), SyncError> {
        let result = self.activate().await;
        if let Err(ref e) = result {
            view.set_notice(Notice::error(format!("Could not connect: {e}"), true));
        }
        result
    }

    async fn acquire_identity(&self) -> Result<IdentityToken, SyncError> {
        let attempts = self.config.identity_attempts.max(1);
        let backoff = Duration::from_millis(self.config.retry_backoff_ms);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.identity.sign_in_anonymously().await {
                Ok(token) => return Ok(token),
                Err(e) if e.is_transient() && attempt < attempts => {
                    tracing::warn!(attempt, attempts, "Identity unavailable, retrying: {}", e);
                    tokio::time::sleep(backoff).await;
                }
                Err(source) => {
                    return Err(SyncError::Identity {
                        attempts: attempt,
                        source,
                    })
                }
            }
        }
    }

    // ===== Snapshots =====

    /// Wait for the next notification and normalize it.
    ///
    /// `Ok(None)` means the stream ended; the controller is then Idle.
    pub async fn recv_snapshot(&mut self) -> Result<Option<Vec<LiteratureEntry>>, SyncError> {
        let Some(subscription) = self.subscription.as_mut() else {
            return Err(SyncError::NotConnected(self.state.to_string()));
        };

        let notification = subscription.next().await;
        match notification {
            Some(Ok(snapshot)) => Ok(Some(normalize(snapshot))),
            Some(Err(source)) => {
                let error = SyncError::Subscription(source);
                self.fail(&error);
                Err(error)
            }
            None => {
                tracing::info!(collection = %self.config.collection, "subscription ended");
                self.deactivate();
                Ok(None)
            }
        }
    }

    /// Wait for the next notification and replace the mirror with it.
    ///
    /// Returns `false` once the stream has ended. A subscription error is
    /// also recorded as a notice; the mirror keeps its last contents.
    pub async fn sync_next(&mut self, view: &mut ViewModelStore) -> Result<bool, SyncError> {
        match self.recv_snapshot().await {
            Ok(Some(entries)) => {
                tracing::debug!(count = entries.len(), "applying snapshot");
                view.replace_entries(entries);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                view.set_notice(Notice::error(format!("Live updates stopped: {e}"), true));
                Err(e)
            }
        }
    }

    // ===== Mutations =====

    fn ensure_connected(&self) -> Result<(), SyncError> {
        if self.token.is_none() {
            return Err(SyncError::NotConnected(self.state.to_string()));
        }
        Ok(())
    }

    fn mutation_failed(operation: &'static str, source: StoreError) -> SyncError {
        let error = SyncError::Mutation { operation, source };
        tracing::error!("{}", error);
        error
    }

    /// Create or fully replace an entry, as decided by the submission target.
    pub async fn save(&self, submission: Submission) -> Result<Saved, SyncError> {
        self.ensure_connected()?;

        let errors: Vec<ValidationError> = validate_entry(&submission.record, &self.roster)
            .into_iter()
            .filter(ValidationError::is_error)
            .collect();
        if !errors.is_empty() {
            tracing::warn!(count = errors.len(), "Refusing to save invalid entry");
            return Err(SyncError::Invalid(errors));
        }

        let fields = submission.record.to_fields()?;
        let collection = &self.config.collection;
        match submission.target {
            SaveTarget::Create => {
                let id = self
                    .store
                    .create(collection, fields)
                    .await
                    .map_err(|e| Self::mutation_failed("create", e))?;
                tracing::debug!(%id, "entry created");
                Ok(Saved::Created(id))
            }
            SaveTarget::Update(id) => {
                self.store
                    .replace(collection, &id, fields)
                    .await
                    .map_err(|e| Self::mutation_failed("update", e))?;
                tracing::debug!(%id, "entry updated");
                Ok(Saved::Updated(id))
            }
        }
    }

    /// Delete an entry.
    pub async fn remove(&self, id: &str) -> Result<(), SyncError> {
        self.ensure_connected()?;
        self.store
            .delete(&self.config.collection, id)
            .await
            .map_err(|e| Self::mutation_failed("delete", e))?;
        tracing::debug!(%id, "entry deleted");
        Ok(())
    }

    /// Patch only the status of an entry.
    pub async fn set_status(&self, id: &str, status: Status) -> Result<(), SyncError> {
        self.ensure_connected()?;
        if !status.is_known() {
            return Err(SyncError::Invalid(vec![ValidationError {
                field: "status".to_string(),
                message: format!("Unknown status '{status}'"),
                severity: ValidationSeverity::Error,
            }]));
        }

        let mut fields = Fields::new();
        fields.insert("status".to_string(), serde_json::Value::from(String::from(status)));
        self.store
            .patch(&self.config.collection, id, fields)
            .await
            .map_err(|e| Self::mutation_failed("status change", e))?;
        tracing::debug!(%id, "entry status changed");
        Ok(())
    }

    // ===== Dialog flows =====

    /// Submit the editor and close the dialog.
    ///
    /// An incomplete draft keeps the dialog open. Once the save is attempted
    /// the dialog closes whatever the outcome; a failure is left as a notice.
    pub async fn submit_editor(
        &self,
        view: &mut ViewModelStore,
        editor: &EntryEditor,
    ) -> Result<Saved, LitrackError> {
        let submission = editor.submit()?;
        let result = self.save(submission).await;
        view.close_editor();
        if let Err(ref e) = result {
            view.set_notice(Notice::error(format!("Could not save entry: {e}"), true));
        }
        Ok(result?)
    }

    /// Delete the entry awaiting confirmation, if any, and close the prompt.
    pub async fn confirm_delete(
        &self,
        view: &mut ViewModelStore,
    ) -> Result<Option<EntryId>, SyncError> {
        let Some(id) = view.take_pending_delete() else {
            return Ok(None);
        };
        match self.remove(&id).await {
            Ok(()) => Ok(Some(id)),
            Err(e) => {
                view.set_notice(Notice::error(format!("Could not delete entry: {e}"), true));
                Err(e)
            }
        }
    }

    /// Change an entry's status from the list, reporting failure as a notice.
    pub async fn change_status(
        &self,
        view: &mut ViewModelStore,
        id: &str,
        status: Status,
    ) -> Result<(), SyncError> {
        let result = self.set_status(id, status).await;
        if let Err(ref e) = result {
            view.set_notice(Notice::error(format!("Could not change status: {e}"), true));
        }
        result
    }
}

impl std::fmt::Debug for SyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncController")
            .field("collection", &self.config.collection)
            .field("state", &self.state)
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

/// Decode a snapshot; undecodable documents are skipped, not fatal.
pub fn normalize(snapshot: Snapshot) -> Vec<LiteratureEntry> {
    snapshot
        .into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            match LiteratureEntry::from_document(doc.id, doc.fields) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(%id, "Skipping malformed document: {}", e);
                    None
                }
            }
        })
        .collect()
}
