use serde::{Deserialize, Serialize};

/// Column holding the unique patient identifier.
pub const PATIENT_ID_FIELD: &str = "patient_id";

/// Column holding the patient's display name.
pub const NAME_FIELD: &str = "name";

/// One row of the patient dataset: an ordered list of `(field, value)`
/// pairs preserving the dataset's natural column order.
///
/// Records are immutable once loaded and live for the lifetime of the
/// directory that owns them. Beyond `patient_id` and `name` the field set is
/// open-ended: whatever clinical columns the dataset carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    fields: Vec<(String, String)>,
}

impl PatientRecord {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Value of a field by exact name, or `None` if the record has no such
    /// column.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.get(PATIENT_ID_FIELD)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(NAME_FIELD)
    }

    /// Fields in natural column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Human-readable profile shown to the caller: every field *except*
    /// `patient_id`, one `"<field>: <value>"` line per field, newline-joined.
    pub fn profile_summary(&self) -> String {
        self.render(false)
    }

    /// Full serialization embedded in the prompt's system message: every
    /// field *including* `patient_id`, same line format as the summary.
    ///
    /// The displayed summary omits the identifier while the prompt keeps it;
    /// the asymmetry is intentional.
    pub fn profile_full(&self) -> String {
        self.render(true)
    }

    fn render(&self, include_id: bool) -> String {
        self.fields
            .iter()
            .filter(|(name, _)| include_id || name != PATIENT_ID_FIELD)
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> PatientRecord {
        PatientRecord::new(vec![
            ("patient_id".into(), "P1".into()),
            ("name".into(), "Jane Doe".into()),
            ("age".into(), "40".into()),
            ("condition".into(), "hypertension".into()),
        ])
    }

    #[test]
    fn summary_excludes_patient_id() {
        assert_eq!(
            jane().profile_summary(),
            "name: Jane Doe\nage: 40\ncondition: hypertension"
        );
    }

    #[test]
    fn full_rendering_keeps_patient_id_and_order() {
        assert_eq!(
            jane().profile_full(),
            "patient_id: P1\nname: Jane Doe\nage: 40\ncondition: hypertension"
        );
    }

    #[test]
    fn get_is_exact_match() {
        let record = jane();
        assert_eq!(record.get("age"), Some("40"));
        assert_eq!(record.get("Age"), None);
        assert_eq!(record.patient_id(), Some("P1"));
        assert_eq!(record.name(), Some("Jane Doe"));
    }

    #[test]
    fn empty_record_renders_empty() {
        let record = PatientRecord::new(vec![]);
        assert!(record.is_empty());
        assert_eq!(record.profile_summary(), "");
        assert_eq!(record.profile_full(), "");
    }
}
