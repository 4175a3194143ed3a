//! Litrack Core - real-time synchronized literature list
//!
//! This crate provides the presentation core of the litrack literature tracker:
//!
//! - **Remote**: boundary to the managed document store (subscribe, create, replace, patch, delete)
//! - **Identity**: anonymous identity acquisition
//! - **Memory**: in-process store with the same snapshot semantics, for tests and demos
//! - **View**: the local mirror plus UI-only state (search, sort, filter, dialogs, notices)
//! - **Sync**: subscription state machine (Idle→Connecting→Subscribed→Error) and mutations
//! - **Projector**: pure filter/search/sort of the mirror for display
//! - **Editor**: draft staging with create-vs-update decided by the opened entry
//! - **Gate**: shared-password UX gate backed by a session store
//! - **Config**: store connection parameters and shared secret from the environment
//! - **Export**: CSV rendering of the displayed list
//!
//! # Data flow
//!
//! ```text
//! gate ─▶ sync.activate ─▶ snapshot ─▶ view mirror ─▶ project ─▶ render
//!                             ▲                                   │
//!                             └──── store ◀── save/remove/status ◀┘
//! ```
//!
//! The mirror is only ever written by applying a snapshot; mutations wait for
//! the store to report their effect.

pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod gate;
pub mod identity;
pub mod memory;
pub mod projector;
pub mod remote;
pub mod sync;
pub mod view;

pub use config::{LitrackConfig, StoreConfig, SyncConfig};
pub use editor::{EntryEditor, SaveTarget, Submission};
pub use error::{
    ConfigError, EditorError, ExportError, GateError, IdentityError, LitrackError, Result,
    StoreError, SyncError,
};
pub use export::{to_csv_string, write_csv};
pub use gate::{AccessGate, AuthSession, MemorySessionStore, SessionStore};
pub use identity::{IdentityProvider, IdentityToken, StaticIdentity};
pub use memory::MemoryCollection;
pub use projector::{project, status_counts, SortConfig, SortDirection, StatusFilter};
pub use remote::{Document, Fields, RemoteCollection, Snapshot, Subscription};
pub use sync::{normalize, Saved, SyncController, SyncState};
pub use view::{EditorDialog, Notice, NoticeLevel, ViewModelStore, ViewState};

pub use litrack_domain as domain;
