//! Classification of controls between two document versions.
//!
//! Controls are correlated by identifier only. Identifiers present in just one
//! version are added or removed; identifiers present in both are diffed and
//! reported as changed when the diff shows a meaningful edit.
//!
//! # Examples
//!
//! ```
//! use controldiff::{classify, ControlIndex, ControlRecord, SchemaDialect};
//!
//! let record = |id: u32, text: &str| ControlRecord {
//!     id,
//!     title: "1.1.1.C.01.".to_string(),
//!     classifications: "All Classifications".to_string(),
//!     compliances: "Must".to_string(),
//!     text: text.to_string(),
//! };
//!
//! let old = ControlIndex::from_records(SchemaDialect::V1, [record(5, "Keep.")]);
//! let new = ControlIndex::from_records(SchemaDialect::V1, [record(5, "Keep."), record(6, "New.")]);
//!
//! let changes = classify(&old, &new).unwrap();
//! assert_eq!(changes.added.len(), 1);
//! assert_eq!(changes.added[0].id, 6);
//! assert!(changes.removed.is_empty());
//! assert!(changes.changed.is_empty());
//! ```

use crate::diff::diff_text;
use crate::error::SortKeyError;
use crate::model::{ControlIndex, ControlRecord};
use crate::sortkey::sortkey;
use serde::Serialize;
use tracing::trace;

/// A control as shown in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedControl {
    pub id: u32,
    pub sortkey: String,
    pub title: String,
    pub classifications: String,
    pub compliances: String,
    /// Raw text for added and removed controls, highlighted diff for changed ones
    pub text: String,
}

impl AnnotatedControl {
    fn from_record(record: &ControlRecord, text: String) -> Result<Self, SortKeyError> {
        Ok(Self {
            id: record.id,
            sortkey: sortkey(&record.title)?,
            title: record.title.clone(),
            classifications: record.classifications.clone(),
            compliances: record.compliances.clone(),
            text,
        })
    }
}

/// Counts of each classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ChangeStats {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub unchanged: usize,
}

impl ChangeStats {
    /// Returns the total number of changes (excluding unchanged).
    pub fn total_changes(&self) -> usize {
        self.added + self.removed + self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }
}

/// Result of comparing two document versions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ChangeSet {
    pub added: Vec<AnnotatedControl>,
    pub removed: Vec<AnnotatedControl>,
    pub changed: Vec<AnnotatedControl>,
    /// Identifiers in both versions with no meaningful text change
    pub unchanged: Vec<u32>,
    pub stats: ChangeStats,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Sorts every group by sort key, then title, then identifier.
    pub fn into_display_order(mut self) -> Self {
        for group in [&mut self.added, &mut self.removed, &mut self.changed] {
            group.sort_by(|x, y| {
                (&x.sortkey, &x.title, x.id).cmp(&(&y.sortkey, &y.title, y.id))
            });
        }
        self
    }
}

/// Classifies every control of two document versions.
///
/// Neither index is modified. Controls whose raw text is byte-identical are
/// not diffed at all; controls whose diff contains only whitespace deletions
/// count as unchanged.
///
/// # Errors
///
/// Returns `SortKeyError::MalformedTitle` if any reported control has a title
/// that does not yield a sort key.
pub fn classify(old: &ControlIndex, new: &ControlIndex) -> Result<ChangeSet, SortKeyError> {
    let mut changes = ChangeSet::default();

    for record in new.records().filter(|r| !old.contains(r.id)) {
        changes
            .added
            .push(AnnotatedControl::from_record(record, record.text.clone())?);
    }

    for record in old.records().filter(|r| !new.contains(r.id)) {
        changes
            .removed
            .push(AnnotatedControl::from_record(record, record.text.clone())?);
    }

    for old_record in old.records() {
        let Some(new_record) = new.get(old_record.id) else {
            continue;
        };

        if old_record.text == new_record.text {
            changes.unchanged.push(old_record.id);
            continue;
        }

        let diff = diff_text(&old_record.text, &new_record.text);
        if !diff.changed {
            trace!(id = old_record.id, "whitespace-only difference");
            changes.unchanged.push(old_record.id);
            continue;
        }

        changes
            .changed
            .push(AnnotatedControl::from_record(new_record, diff.highlighted)?);
    }

    changes.stats = ChangeStats {
        added: changes.added.len(),
        removed: changes.removed.len(),
        changed: changes.changed.len(),
        unchanged: changes.unchanged.len(),
    };

    Ok(changes)
}
