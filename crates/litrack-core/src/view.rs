//! Local view model: the mirror of the remote collection plus UI-only state.
//!
//! The store holds no business logic. Every setter bumps a revision that is
//! published on a watch channel, which is what a renderer waits on.

use litrack_domain::{EntryId, LiteratureEntry};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::projector::{project, SortConfig, StatusFilter};

/// State of the entry dialog.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorDialog {
    #[default]
    Closed,
    /// Creating a new entry.
    Creating,
    /// Editing the given entry.
    Editing(LiteratureEntry),
}

impl EditorDialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// The entry being edited, `None` meaning "new".
    pub fn editing_entry(&self) -> Option<&LiteratureEntry> {
        match self {
            Self::Editing(entry) => Some(entry),
            _ => None,
        }
    }
}

/// How serious a notice is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-visible notification, e.g. a failed save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Whether repeating the action may succeed.
    pub retryable: bool,
}

impl Notice {
    pub fn error(message: impl Into<String>, retryable: bool) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            retryable,
        }
    }
}

/// UI-local state, never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub search_term: String,
    pub sort_config: SortConfig,
    pub status_filter: StatusFilter,
    pub editor: EditorDialog,
    pub pending_delete: Option<EntryId>,
    pub notice: Option<Notice>,
}

/// Mirror of the remote collection and the view state around it.
#[derive(Debug)]
pub struct ViewModelStore {
    entries: Vec<LiteratureEntry>,
    state: ViewState,
    loaded: bool,
    revision: watch::Sender<u64>,
}

impl Default for ViewModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewModelStore {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            entries: Vec::new(),
            state: ViewState::default(),
            loaded: false,
            revision,
        }
    }

    /// Receiver that changes on every mutation of the store.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn touch(&mut self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    // ===== Mirror =====

    pub fn entries(&self) -> &[LiteratureEntry] {
        &self.entries
    }

    /// Whether a first snapshot has arrived.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replace the whole mirror with a snapshot.
    pub fn replace_entries(&mut self, entries: Vec<LiteratureEntry>) {
        self.entries = entries;
        self.loaded = true;
        self.touch();
    }

    pub fn entry(&self, id: &str) -> Option<&LiteratureEntry> {
        self.entries.iter().find(|e| e.id.as_deref() == Some(id))
    }

    /// Entries as currently displayed.
    pub fn visible_entries(&self) -> Vec<&LiteratureEntry> {
        project(
            &self.entries,
            &self.state.search_term,
            &self.state.status_filter,
            &self.state.sort_config,
        )
    }

    // ===== View state =====

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
        self.touch();
    }

    pub fn set_sort_config(&mut self, sort: SortConfig) {
        self.state.sort_config = sort;
        self.touch();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.state.status_filter = filter;
        self.touch();
    }

    pub fn open_editor(&mut self, editing: Option<LiteratureEntry>) {
        self.state.editor = match editing {
            Some(entry) => EditorDialog::Editing(entry),
            None => EditorDialog::Creating,
        };
        self.touch();
    }

    pub fn close_editor(&mut self) {
        self.state.editor = EditorDialog::Closed;
        self.touch();
    }

    pub fn request_delete(&mut self, id: impl Into<EntryId>) {
        self.state.pending_delete = Some(id.into());
        self.touch();
    }

    /// Close the delete confirmation, returning the id it was for.
    pub fn take_pending_delete(&mut self) -> Option<EntryId> {
        let id = self.state.pending_delete.take();
        self.touch();
        id
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.state.notice = Some(notice);
        self.touch();
    }

    pub fn dismiss_notice(&mut self) {
        self.state.notice = None;
        self.touch();
    }
}
