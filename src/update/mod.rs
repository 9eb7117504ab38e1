//! Partial updates.
//!
//! A [`PatientPatch`] names only the fields a caller wants to change. Each
//! field is a [`Patch`], which keeps "not sent" apart from "sent as null"
//! and from an actual value. The merger applies the values onto a copy of
//! the stored record and re-validates the whole result; the stored record
//! is never touched here.

use crate::core::{PatientRecord, ValidationError};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    /// Field was not present in the request.
    Absent,
    /// Field was present with an explicit `null`.
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Overwrite `target` when a value was provided. Absent and null leave
    /// it as it was.
    pub fn apply_to(self, target: &mut T) {
        if let Patch::Value(value) = self {
            *target = value;
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

// Only called when the key is present; missing keys fall back to
// `Default` through `#[serde(default)]` on the containing struct.
impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

/// Fields a caller may change. The identifier is not among them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PatientPatch {
    pub name: Patch<String>,
    pub city: Patch<String>,
    pub age: Patch<i64>,
    pub gender: Patch<String>,
    pub height: Patch<f64>,
    pub weight: Patch<f64>,
}

impl PatientPatch {
    /// True when no field carries a value, so merging cannot change the
    /// record. Explicit nulls count as empty.
    pub fn is_empty(&self) -> bool {
        self.name.value().is_none()
            && self.city.value().is_none()
            && self.age.value().is_none()
            && self.gender.value().is_none()
            && self.height.value().is_none()
            && self.weight.value().is_none()
    }
}

pub struct UpdateMerger;

impl UpdateMerger {
    /// Apply `patch` onto a copy of `existing` and validate the complete
    /// result. All-or-nothing: either every provided field lands in a new
    /// valid record or a `ValidationError` comes back.
    pub fn merge(
        existing: &PatientRecord,
        patch: PatientPatch,
    ) -> Result<PatientRecord, ValidationError> {
        let mut draft = existing.to_draft();

        patch.name.apply_to(&mut draft.name);
        patch.city.apply_to(&mut draft.city);
        patch.age.apply_to(&mut draft.age);
        patch.gender.apply_to(&mut draft.gender);
        patch.height.apply_to(&mut draft.height);
        patch.weight.apply_to(&mut draft.weight);

        PatientRecord::try_from(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Gender, PatientDraft, Verdict};

    fn existing() -> PatientRecord {
        PatientRecord::try_from(PatientDraft {
            name: "Alice".to_string(),
            city: "Pune".to_string(),
            age: 30,
            gender: "female".to_string(),
            height: 1.6,
            weight: 50.0,
        })
        .unwrap()
    }

    #[test]
    fn test_patch_distinguishes_absent_null_and_value() {
        let patch: PatientPatch =
            serde_json::from_str(r#"{"city": null, "weight": 80.0}"#).unwrap();

        assert_eq!(patch.name, Patch::Absent);
        assert_eq!(patch.city, Patch::Null);
        assert_eq!(patch.weight, Patch::Value(80.0));
        assert_eq!(patch.weight.value(), Some(&80.0));
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_empty_string_is_a_value_not_absent() {
        let patch: PatientPatch = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert_eq!(patch.name, Patch::Value(String::new()));
    }

    #[test]
    fn test_identifier_in_body_is_ignored() {
        let patch: PatientPatch = serde_json::from_str(r#"{"id": "P777"}"#).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_null_only_patch_is_empty() {
        let patch: PatientPatch =
            serde_json::from_str(r#"{"name": null, "age": null}"#).unwrap();
        assert_eq!(patch.age, Patch::Null);
        assert!(patch.is_empty());
    }

    #[test]
    fn test_merge_overwrites_only_provided_fields() {
        let patch = PatientPatch {
            weight: Patch::Value(80.0),
            city: Patch::Null,
            ..Default::default()
        };

        let merged = UpdateMerger::merge(&existing(), patch).unwrap();
        assert_eq!(merged.weight(), 80.0);
        assert_eq!(merged.city(), "Pune");
        assert_eq!(merged.name(), "Alice");
        assert_eq!(merged.bmi(), 31.25);
        assert_eq!(merged.verdict(), Verdict::Obese);
    }

    #[test]
    fn test_merge_revalidates_whole_record() {
        let patch = PatientPatch {
            age: Patch::Value(200),
            gender: Patch::Value("robot".to_string()),
            ..Default::default()
        };

        let err = UpdateMerger::merge(&existing(), patch).unwrap_err();
        assert_eq!(err.fields(), vec!["age", "gender"]);
    }

    #[test]
    fn test_merge_can_change_gender() {
        let patch = PatientPatch {
            gender: Patch::Value("others".to_string()),
            ..Default::default()
        };
        let merged = UpdateMerger::merge(&existing(), patch).unwrap();
        assert_eq!(merged.gender(), Gender::Others);
    }

    #[test]
    fn test_empty_patch_keeps_record() {
        let merged = UpdateMerger::merge(&existing(), PatientPatch::default()).unwrap();
        assert_eq!(merged, existing());
    }
}
