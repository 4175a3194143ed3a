//! Entry editor: stages edits to a single entry.
//!
//! Whether a submission creates or updates is decided by the entry the
//! editor was opened on, never by the draft's own `id`.

use chrono::Datelike;
use litrack_domain::{validate_entry, EntryField, EntryId, LiteratureEntry, Roster, Status};

use crate::error::EditorError;

/// Relevance given to new drafts.
pub const DEFAULT_RELEVANCE: i32 = 2;

/// Where a submitted record goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update(EntryId),
}

/// A validated record ready for the sync controller.
///
/// `record.id` is always `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub target: SaveTarget,
    pub record: LiteratureEntry,
}

/// Stateful form over one draft.
#[derive(Debug, Clone)]
pub struct EntryEditor {
    original: Option<LiteratureEntry>,
    draft: LiteratureEntry,
    roster: Roster,
}

impl EntryEditor {
    /// Create mode: defaults for a new entry in the given year.
    pub fn create(roster: Roster, year: i32) -> Self {
        let draft = LiteratureEntry {
            year,
            pic: roster.default_member().to_string(),
            relevance: DEFAULT_RELEVANCE,
            status: Status::KNOWN[0].clone(),
            ..Default::default()
        };
        Self {
            original: None,
            draft,
            roster,
        }
    }

    /// Create mode with the current calendar year.
    pub fn create_now(roster: Roster) -> Self {
        Self::create(roster, chrono::Local::now().year())
    }

    /// Edit mode: the draft starts as a copy of `entry`.
    pub fn edit(entry: LiteratureEntry, roster: Roster) -> Self {
        Self {
            draft: entry.clone(),
            original: Some(entry),
            roster,
        }
    }

    /// Open for `editing`, or for a new entry when `None`.
    pub fn open(editing: Option<&LiteratureEntry>, roster: Roster) -> Self {
        match editing {
            Some(entry) => Self::edit(entry.clone(), roster),
            None => Self::create_now(roster),
        }
    }

    pub fn draft(&self) -> &LiteratureEntry {
        &self.draft
    }

    pub fn original(&self) -> Option<&LiteratureEntry> {
        self.original.as_ref()
    }

    pub fn is_new(&self) -> bool {
        self.original.is_none()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Apply a form input to the draft.
    ///
    /// `year` and `relevance` are coerced to integers; unparseable input
    /// leaves the draft unchanged. An empty `link` clears it.
    pub fn set_field(&mut self, field: EntryField, value: &str) -> Result<(), EditorError> {
        let draft = &mut self.draft;
        match field {
            EntryField::Id => return Err(EditorError::ReadOnly(field.name())),
            EntryField::Title => draft.title = value.to_string(),
            EntryField::Authors => draft.authors = value.to_string(),
            EntryField::Year => draft.year = parse_int(field, value)?,
            EntryField::Publication => draft.publication = value.to_string(),
            EntryField::Topic => draft.topic = value.to_string(),
            EntryField::Data => draft.data = value.to_string(),
            EntryField::UnitOfObservations => draft.unit_of_observations = value.to_string(),
            EntryField::Pic => draft.pic = value.to_string(),
            EntryField::Summary => draft.summary = value.to_string(),
            EntryField::Findings => draft.findings = value.to_string(),
            EntryField::Method => draft.method = value.to_string(),
            EntryField::Contributions => draft.contributions = value.to_string(),
            EntryField::Relevance => draft.relevance = parse_int(field, value)?,
            EntryField::Status => draft.status = Status::from_label(value),
            EntryField::Link => {
                let link = value.trim();
                draft.link = (!link.is_empty()).then(|| link.to_string());
            }
        }
        Ok(())
    }

    /// Set a field by its stored name, as a form change handler would.
    pub fn set_named(&mut self, name: &str, value: &str) -> Result<(), EditorError> {
        let field = EntryField::from_name(name).ok_or_else(|| EditorError::InvalidValue {
            field: "field",
            value: name.to_string(),
        })?;
        self.set_field(field, value)
    }

    /// Validate and hand over the draft.
    ///
    /// The draft's `id` is always stripped; the target comes from the
    /// original entry.
    pub fn submit(&self) -> Result<Submission, EditorError> {
        let errors: Vec<_> = validate_entry(&self.draft, &self.roster)
            .into_iter()
            .filter(|e| e.is_error())
            .collect();
        if !errors.is_empty() {
            return Err(EditorError::Invalid(errors));
        }

        let mut record = self.draft.clone();
        record.id = None;

        let target = match self.original.as_ref().and_then(|e| e.id.clone()) {
            Some(id) => SaveTarget::Update(id),
            None => SaveTarget::Create,
        };

        Ok(Submission { target, record })
    }
}

fn parse_int(field: EntryField, value: &str) -> Result<i32, EditorError> {
    value.trim().parse().map_err(|_| EditorError::InvalidValue {
        field: field.name(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::parse_list("Ana, Ben")
    }

    fn filled(mut editor: EntryEditor) -> EntryEditor {
        editor.set_field(EntryField::Title, "Paper").unwrap();
        editor.set_field(EntryField::Authors, "Doe").unwrap();
        editor
    }

    #[test]
    fn create_defaults() {
        let editor = EntryEditor::create(roster(), 2024);
        let draft = editor.draft();
        assert!(editor.is_new());
        assert_eq!(draft.year, 2024);
        assert_eq!(draft.pic, "Ana");
        assert_eq!(draft.relevance, 2);
        assert_eq!(draft.status, Status::ToRead);
        assert!(draft.title.is_empty() && draft.summary.is_empty());
        assert_eq!(draft.link, None);
        assert_eq!(draft.id, None);
    }

    #[test]
    fn create_now_uses_current_year() {
        let before = chrono::Local::now().year();
        let editor = EntryEditor::create_now(roster());
        let after = chrono::Local::now().year();
        assert!((before..=after).contains(&editor.draft().year));
        assert!(editor.is_new());
        assert!(EntryEditor::open(None, roster()).is_new());
    }

    #[test]
    fn year_is_coerced_to_integer() {
        let mut editor = EntryEditor::create(roster(), 2024);
        editor.set_field(EntryField::Year, " 1999 ").unwrap();
        assert_eq!(editor.draft().year, 1999);

        let err = editor.set_field(EntryField::Year, "nineteen").unwrap_err();
        assert!(matches!(err, EditorError::InvalidValue { field: "year", .. }));
        assert_eq!(editor.draft().year, 1999);
    }

    #[test]
    fn empty_link_clears() {
        let mut editor = EntryEditor::create(roster(), 2024);
        editor.set_field(EntryField::Link, "https://doi.org/10.1/x").unwrap();
        assert_eq!(editor.draft().link.as_deref(), Some("https://doi.org/10.1/x"));
        editor.set_field(EntryField::Link, "  ").unwrap();
        assert_eq!(editor.draft().link, None);
    }

    #[test]
    fn id_is_read_only() {
        let mut editor = EntryEditor::create(roster(), 2024);
        assert_eq!(
            editor.set_named("id", "forged"),
            Err(EditorError::ReadOnly("id"))
        );
        assert!(editor.set_named("nonsense", "x").is_err());
        editor.set_named("unitOfObservations", "Households").unwrap();
        assert_eq!(editor.draft().unit_of_observations, "Households");
    }

    #[test]
    fn submit_requires_title_and_authors() {
        let editor = EntryEditor::create(roster(), 2024);
        match editor.submit() {
            Err(EditorError::Invalid(errors)) => {
                assert!(errors.iter().any(|e| e.field == "title"));
                assert!(errors.iter().any(|e| e.field == "authors"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn new_draft_submits_as_create() {
        let submission = filled(EntryEditor::create(roster(), 2024)).submit().unwrap();
        assert_eq!(submission.target, SaveTarget::Create);
        assert_eq!(submission.record.id, None);
        assert_eq!(submission.record.title, "Paper");
    }

    #[test]
    fn target_comes_from_original_not_draft() {
        let existing = LiteratureEntry {
            id: Some("doc-7".to_string()),
            title: "Old".to_string(),
            authors: "Doe".to_string(),
            pic: "Ben".to_string(),
            relevance: 1,
            ..Default::default()
        };
        let mut editor = EntryEditor::edit(existing, roster());
        editor.set_field(EntryField::Title, "New").unwrap();
        let submission = editor.submit().unwrap();
        assert_eq!(submission.target, SaveTarget::Update("doc-7".to_string()));
        assert_eq!(submission.record.id, None);
        assert_eq!(submission.record.title, "New");
    }

    #[test]
    fn out_of_range_relevance_rejected_on_submit() {
        let mut editor = filled(EntryEditor::create(roster(), 2024));
        editor.set_field(EntryField::Relevance, "5").unwrap();
        assert!(matches!(editor.submit(), Err(EditorError::Invalid(_))));
    }
}
