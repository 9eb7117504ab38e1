//! Patient Record Validator
//!
//! Checks a candidate [`PatientDraft`] against the per-field constraints a
//! stored record must satisfy. Rules form a chain; unlike a fail-fast chain,
//! every rule runs and all violations are reported together, in rule order.

use crate::core::{FieldViolation, Gender, PatientDraft, ValidationError};

pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 120;

/// A single constraint on a draft.
pub trait FieldRule: Send + Sync {
    fn check(&self, draft: &PatientDraft) -> Option<FieldViolation>;
}

/// `age` must lie in `[MIN_AGE, MAX_AGE]`
#[derive(Debug, Clone, Default)]
pub struct AgeRangeRule;

impl FieldRule for AgeRangeRule {
    fn check(&self, draft: &PatientDraft) -> Option<FieldViolation> {
        if (MIN_AGE..=MAX_AGE).contains(&draft.age) {
            None
        } else {
            Some(FieldViolation::new(
                "age",
                format!("must be between {} and {}", MIN_AGE, MAX_AGE),
            ))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Height,
    Weight,
}

/// A body measurement must be a finite number greater than zero.
#[derive(Debug, Clone)]
pub struct PositiveMeasureRule {
    measure: Measure,
}

impl PositiveMeasureRule {
    pub fn new(measure: Measure) -> Self {
        Self { measure }
    }
}

impl FieldRule for PositiveMeasureRule {
    fn check(&self, draft: &PatientDraft) -> Option<FieldViolation> {
        let (field, value) = match self.measure {
            Measure::Height => ("height", draft.height),
            Measure::Weight => ("weight", draft.weight),
        };

        if value.is_finite() && value > 0.0 {
            None
        } else {
            Some(FieldViolation::new(field, "must be greater than 0"))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenderRule;

impl FieldRule for GenderRule {
    fn check(&self, draft: &PatientDraft) -> Option<FieldViolation> {
        match Gender::parse(&draft.gender) {
            Some(_) => None,
            None => Some(FieldViolation::new(
                "gender",
                format!("must be one of {}", Gender::ALLOWED.join(", ")),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    City,
}

/// Text fields must contain something other than whitespace.
#[derive(Debug, Clone)]
pub struct NonBlankRule {
    field: TextField,
}

impl NonBlankRule {
    pub fn new(field: TextField) -> Self {
        Self { field }
    }
}

impl FieldRule for NonBlankRule {
    fn check(&self, draft: &PatientDraft) -> Option<FieldViolation> {
        let (field, value) = match self.field {
            TextField::Name => ("name", draft.name.as_str()),
            TextField::City => ("city", draft.city.as_str()),
        };

        if value.trim().is_empty() {
            Some(FieldViolation::new(field, "must not be empty"))
        } else {
            None
        }
    }
}

pub struct Validator {
    rules: Vec<Box<dyn FieldRule>>,
}

impl Validator {
    /// Create validator with default rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(AgeRangeRule),
                Box::new(PositiveMeasureRule::new(Measure::Height)),
                Box::new(PositiveMeasureRule::new(Measure::Weight)),
                Box::new(GenderRule),
                Box::new(NonBlankRule::new(TextField::Name)),
                Box::new(NonBlankRule::new(TextField::City)),
            ],
        }
    }

    /// Create validator with custom rules
    pub fn with_rules(rules: Vec<Box<dyn FieldRule>>) -> Self {
        Self { rules }
    }

    pub fn validate(&self, draft: &PatientDraft) -> Result<(), ValidationError> {
        let violations: Vec<FieldViolation> =
            self.rules.iter().filter_map(|rule| rule.check(draft)).collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
