//! Control records and per-document indexes.

use crate::dialect::SchemaDialect;
use serde::Serialize;
use std::collections::BTreeMap;

/// One control as it appears in one document version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlRecord {
    pub id: u32,
    /// Dotted title such as `1.1.65.C.01.`
    pub title: String,
    pub classifications: String,
    pub compliances: String,
    /// Raw inner content of the control element, inline markup included.
    pub text: String,
}

/// All controls of one document version, keyed by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlIndex {
    dialect: SchemaDialect,
    controls: BTreeMap<u32, ControlRecord>,
}

impl ControlIndex {
    pub fn new(dialect: SchemaDialect, controls: BTreeMap<u32, ControlRecord>) -> Self {
        Self { dialect, controls }
    }

    /// Builds an index from records, keeping the last record for a repeated id.
    ///
    /// Document extraction rejects repeated ids instead; this is meant for
    /// callers that assemble indexes directly.
    pub fn from_records(
        dialect: SchemaDialect,
        records: impl IntoIterator<Item = ControlRecord>,
    ) -> Self {
        let controls = records.into_iter().map(|r| (r.id, r)).collect();
        Self { dialect, controls }
    }

    pub fn dialect(&self) -> SchemaDialect {
        self.dialect
    }

    pub fn get(&self, id: u32) -> Option<&ControlRecord> {
        self.controls.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.controls.contains_key(&id)
    }

    /// Identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.controls.keys().copied()
    }

    pub fn records(&self) -> impl Iterator<Item = &ControlRecord> {
        self.controls.values()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}
