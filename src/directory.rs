//! Read-only lookup over the loaded patient table.

use crate::models::PatientRecord;

/// In-memory patient table, loaded once at startup and never mutated.
///
/// Lookup is an exact string match on `patient_id`. An id matching zero
/// records is not found; so is an id matching more than one, since a
/// duplicated identifier cannot be resolved safely.
#[derive(Debug, Clone, Default)]
pub struct PatientDirectory {
    records: Vec<PatientRecord>,
}

impl PatientDirectory {
    pub fn new(records: Vec<PatientRecord>) -> Self {
        Self { records }
    }

    /// Find the record whose `patient_id` equals `patient_id` exactly.
    /// Zero or multiple matches resolve to `None`.
    pub fn lookup(&self, patient_id: &str) -> Option<&PatientRecord> {
        let mut matches = self
            .records
            .iter()
            .filter(|r| r.patient_id() == Some(patient_id));
        let first = matches.next()?;
        match matches.next() {
            Some(_) => {
                tracing::warn!(patient_id, "duplicate patient_id in directory, treating as not found");
                None
            }
            None => Some(first),
        }
    }

    /// Selector labels for the presentation layer, one `"<id>, <name>"` per
    /// record in load order. Records missing either column are skipped.
    pub fn selection_labels(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| match (r.patient_id(), r.name()) {
                (Some(id), Some(name)) => Some(format!("{id}, {name}")),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
