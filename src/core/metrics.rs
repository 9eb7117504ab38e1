//! Body-mass metrics derived from a record's height and weight.
//!
//! Nothing in here is ever persisted. Every read recomputes both values so
//! they cannot drift from the stored measurements.

use serde::Serialize;
use std::fmt;

/// Health category assigned from a BMI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Underweight => "underweight",
            Verdict::Normal => "normal",
            Verdict::Overweight => "overweight",
            Verdict::Obese => "obese",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `weight / height²`, rounded to two decimals, half away from zero.
pub fn bmi(height: f64, weight: f64) -> f64 {
    round2(weight / (height * height))
}

/// Threshold table for [`Verdict`].
///
/// `[24.9, 25)` and everything from `29.9` up land in `Obese`. Stored
/// verdicts in existing deployments were produced by this exact table, so
/// the gaps stay until the thresholds are changed on purpose.
pub fn verdict(bmi: f64) -> Verdict {
    if bmi < 18.5 {
        Verdict::Underweight
    } else if (18.5..24.9).contains(&bmi) {
        Verdict::Normal
    } else if (25.0..29.9).contains(&bmi) {
        Verdict::Overweight
    } else {
        Verdict::Obese
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
