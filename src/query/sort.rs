// ============================================================================
// src/query/sort.rs - Field-based ordering of patient views
// ============================================================================
//
// - Single numeric key (height, weight or bmi), ascending or descending
// - Stable: equal keys keep store order in both directions
// - Non-finite values compare as 0
//
// ============================================================================

use crate::core::{PatientError, PatientView, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// SORT FIELD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl SortField {
    pub const VALID: [&'static str; 3] = ["height", "weight", "bmi"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Height => "height",
            SortField::Weight => "weight",
            SortField::Bmi => "bmi",
        }
    }

    /// Numeric sort value of `view` for this field
    pub fn value_of(&self, view: &PatientView) -> f64 {
        let value = match self {
            SortField::Height => view.record.height(),
            SortField::Weight => view.record.weight(),
            SortField::Bmi => view.bmi,
        };
        if value.is_finite() { value } else { 0.0 }
    }
}

impl FromStr for SortField {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "height" => Ok(SortField::Height),
            "weight" => Ok(SortField::Weight),
            "bmi" => Ok(SortField::Bmi),
            _ => Err(PatientError::bad_request(format!(
                "Invalid field '{}', select from {}",
                s,
                Self::VALID.join(", ")
            ))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SORT ORDER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(PatientError::bad_request(format!(
                "Invalid order '{}', select from asc or desc",
                s
            ))),
        }
    }
}

// ============================================================================
// SORT KEY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortKey {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Parse raw request tokens. A missing order means ascending.
    pub fn parse(field: &str, order: Option<&str>) -> Result<Self> {
        let field = field.parse()?;
        let order = match order {
            Some(raw) => raw.parse()?,
            None => SortOrder::default(),
        };
        Ok(Self { field, order })
    }

    pub fn compare(&self, left: &PatientView, right: &PatientView) -> Ordering {
        let ordering = self.field.value_of(left).total_cmp(&self.field.value_of(right));
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

// ============================================================================
// SORT EXECUTOR
// ============================================================================

pub struct SortExecutor;

impl SortExecutor {
    /// Sort in place. `sort_by` is stable, and reversing the comparator for
    /// descending order still reports ties as `Equal`, so equal keys keep
    /// their incoming order either way.
    pub fn sort(views: &mut [PatientView], key: SortKey) {
        if views.len() < 2 {
            return;
        }
        views.sort_by(|left, right| key.compare(left, right));
    }
}

// ============================================================================
// TESTS
// ============================================================================
