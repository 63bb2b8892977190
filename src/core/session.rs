//! Upload session state
//!
//! Each selected file travels with its draft and its errors in one
//! [`UploadEntry`], so there is no parallel-array bookkeeping to get out of
//! step. The index-keyed [`ValidationErrorMap`] is derived on demand and can
//! therefore never name an index that does not exist.

use super::notify::Notifier;
use super::validation::{validate_file, FileRules};
use crate::domain::{Field, FieldError, ProductDraft, Result, SelectedFile, StockroomError};
use std::collections::BTreeMap;

/// Draft index → field → message
///
/// Only indices with at least one error are present.
pub type ValidationErrorMap = BTreeMap<usize, BTreeMap<Field, String>>;

/// A selected file with its draft and current errors
#[derive(Debug, Clone, PartialEq)]
pub struct UploadEntry {
    /// The file
    pub file: SelectedFile,

    /// Metadata being edited for it
    pub draft: ProductDraft,

    errors: BTreeMap<Field, String>,
}

impl UploadEntry {
    fn new(file: SelectedFile) -> Self {
        Self {
            file,
            draft: ProductDraft::default(),
            errors: BTreeMap::new(),
        }
    }

    /// Errors currently shown for this entry
    pub fn errors(&self) -> &BTreeMap<Field, String> {
        &self.errors
    }

    /// Message for one field, if any
    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }
}

/// In-memory state of one upload workflow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadSession {
    entries: Vec<UploadEntry>,
}

impl UploadSession {
    /// An empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `files`
    ///
    /// Every file gets a blank draft. Files failing [`validate_file`] get their
    /// first error under [`Field::File`] and one notification each. Previous
    /// files, drafts and errors are discarded.
    pub fn select_files(
        &mut self,
        files: Vec<SelectedFile>,
        rules: &FileRules,
        notifier: &dyn Notifier,
    ) {
        self.entries = files
            .into_iter()
            .map(|file| {
                let mut entry = UploadEntry::new(file);
                if let Some(first) = validate_file(&entry.file, rules).into_iter().next() {
                    notifier.error(&format!("{}: {}", entry.file.name, first.message));
                    entry.errors.insert(Field::File, first.message);
                }
                entry
            })
            .collect();

        tracing::debug!(
            files = self.entries.len(),
            rejected = self.entries.iter().filter(|e| e.error(Field::File).is_some()).count(),
            "Files selected"
        );
    }

    /// Set one draft field and clear its error, if any
    ///
    /// The field is not re-validated; that happens on the next submit.
    ///
    /// # Errors
    ///
    /// Returns [`StockroomError::Validation`] when `index` is out of range or
    /// `field` is [`Field::File`]. The session is unchanged in that case.
    pub fn update_draft_field(
        &mut self,
        index: usize,
        field: Field,
        value: impl Into<String>,
    ) -> Result<()> {
        let len = self.entries.len();
        let entry = self.entries.get_mut(index).ok_or_else(|| {
            StockroomError::Validation(format!(
                "Draft index {index} out of range for {len} selected file(s)"
            ))
        })?;
        let slot = entry.draft.slot_mut(field).ok_or_else(|| {
            StockroomError::Validation(format!("Field '{field}' is not editable"))
        })?;

        *slot = value.into();
        entry.errors.remove(&field);
        Ok(())
    }

    /// Apply every field of `draft` to the entry at `index`
    pub fn fill_draft(&mut self, index: usize, draft: ProductDraft) -> Result<()> {
        self.update_draft_field(index, Field::Name, draft.name)?;
        self.update_draft_field(index, Field::Description, draft.description)?;
        self.update_draft_field(index, Field::Price, draft.price)?;
        self.update_draft_field(index, Field::Category, draft.category)?;
        Ok(())
    }

    /// Clear files, drafts and errors
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Replace every entry's errors with `errors`
    ///
    /// Indices outside the selection and empty inner maps are ignored.
    pub(crate) fn replace_errors(&mut self, mut errors: ValidationErrorMap) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.errors = errors.remove(&index).unwrap_or_default();
        }
    }

    /// Current errors, keyed by index
    pub fn errors(&self) -> ValidationErrorMap {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.errors.is_empty())
            .map(|(index, entry)| (index, entry.errors.clone()))
            .collect()
    }

    /// Whether any entry has an error
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|entry| !entry.errors.is_empty())
    }

    /// All entries in selection order
    pub fn entries(&self) -> &[UploadEntry] {
        &self.entries
    }

    /// Entry at `index`
    pub fn entry(&self, index: usize) -> Option<&UploadEntry> {
        self.entries.get(index)
    }

    /// Selected files in order
    pub fn files(&self) -> impl Iterator<Item = &SelectedFile> {
        self.entries.iter().map(|entry| &entry.file)
    }

    /// Drafts in order
    pub fn drafts(&self) -> impl Iterator<Item = &ProductDraft> {
        self.entries.iter().map(|entry| &entry.draft)
    }

    /// Number of selected files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of declared file sizes
    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|entry| entry.file.size).sum()
    }
}

/// Collapse field errors into one message per field, first one wins
pub(crate) fn errors_by_field(errors: Vec<FieldError>) -> BTreeMap<Field, String> {
    let mut map = BTreeMap::new();
    for error in errors {
        map.entry(error.field).or_insert(error.message);
    }
    map
}
