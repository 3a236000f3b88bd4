//! Outcome of a bulk run, per type and per record.

use crate::error::MaskError;

/// How the pass over one type ended.
#[derive(Debug)]
pub enum TypeStatus {
    /// Records were visited; see the per-record outcomes.
    Masked,
    /// The type has no backing table or collection.
    NoStorage,
    NoMaskableAttributes,
    NoRecords,
    /// Records could not be enumerated; no record of this type was touched.
    Aborted(MaskError),
}

impl TypeStatus {
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            Self::NoStorage | Self::NoMaskableAttributes | Self::NoRecords
        )
    }
}

#[derive(Debug)]
pub enum RecordOutcome {
    /// All masked columns were written in a single update.
    Updated { columns: usize },
    /// Nothing was written for this record.
    Failed(MaskError),
}

#[derive(Debug)]
pub struct RecordReport {
    pub id: String,
    pub outcome: RecordOutcome,
}

#[derive(Debug)]
pub struct TypeReport {
    pub type_name: String,
    pub status: TypeStatus,
    pub records: Vec<RecordReport>,
}

impl TypeReport {
    pub(crate) fn new(type_name: impl Into<String>, status: TypeStatus) -> Self {
        Self {
            type_name: type_name.into(),
            status,
            records: Vec::new(),
        }
    }

    pub fn updated(&self) -> usize {
        self.records
            .iter()
            .filter(|record| matches!(record.outcome, RecordOutcome::Updated { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.updated()
    }
}

/// Everything a completed run did.
#[derive(Debug, Default)]
pub struct RunReport {
    pub types: Vec<TypeReport>,
}

impl RunReport {
    pub fn updated(&self) -> usize {
        self.types.iter().map(TypeReport::updated).sum()
    }

    pub fn failed(&self) -> usize {
        self.types.iter().map(TypeReport::failed).sum()
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeReport> {
        self.types.iter().find(|report| report.type_name == type_name)
    }
}
