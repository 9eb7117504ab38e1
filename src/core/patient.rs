use crate::core::error::ValidationError;
use crate::core::metrics::{self, Verdict};
use crate::validation::Validator;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    pub const ALLOWED: [&'static str; 3] = ["male", "female", "others"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "others" => Some(Gender::Others),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Others => "others",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated patient fields, as submitted by a caller or read from disk.
///
/// Types are deliberately loose (`i64` age, free-form gender) so that every
/// out-of-range value reaches the [`Validator`] and is reported per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientDraft {
    pub name: String,
    pub city: String,
    pub age: i64,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
}

/// A create request: the identifier plus the fields stored under it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewPatient {
    pub id: String,
    #[serde(flatten)]
    pub draft: PatientDraft,
}

impl NewPatient {
    pub fn new(id: impl Into<String>, draft: PatientDraft) -> Self {
        Self {
            id: id.into(),
            draft,
        }
    }
}

/// A patient record that passed validation.
///
/// The identifier is not part of the record; it is the store key.
/// Deserializing goes through [`PatientDraft`] and the validator, so a
/// record read back from storage satisfies the same constraints as one
/// that was just written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PatientDraft")]
pub struct PatientRecord {
    name: String,
    city: String,
    age: u8,
    gender: Gender,
    height: f64,
    weight: f64,
}

impl PatientRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn bmi(&self) -> f64 {
        metrics::bmi(self.height, self.weight)
    }

    pub fn verdict(&self) -> Verdict {
        metrics::verdict(self.bmi())
    }

    pub fn to_draft(&self) -> PatientDraft {
        PatientDraft {
            name: self.name.clone(),
            city: self.city.clone(),
            age: i64::from(self.age),
            gender: self.gender.as_str().to_string(),
            height: self.height,
            weight: self.weight,
        }
    }
}

impl TryFrom<PatientDraft> for PatientRecord {
    type Error = ValidationError;

    fn try_from(draft: PatientDraft) -> Result<Self, Self::Error> {
        Validator::default().validate(&draft)?;

        let gender = Gender::parse(&draft.gender)
            .ok_or_else(|| ValidationError::single("gender", "is not recognised"))?;
        let age = u8::try_from(draft.age)
            .map_err(|_| ValidationError::single("age", "is out of range"))?;

        Ok(Self {
            name: draft.name,
            city: draft.city,
            age,
            gender,
            height: draft.height,
            weight: draft.weight,
        })
    }
}

/// What every read returns: the record, its key, and freshly derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientView {
    pub id: String,
    #[serde(flatten)]
    pub record: PatientRecord,
    pub bmi: f64,
    pub verdict: Verdict,
}

impl PatientView {
    pub fn new(id: impl Into<String>, record: PatientRecord) -> Self {
        let bmi = record.bmi();
        let verdict = metrics::verdict(bmi);
        Self {
            id: id.into(),
            record,
            bmi,
            verdict,
        }
    }
}
