pub mod error;
pub mod metrics;
pub mod patient;

pub use error::{FieldViolation, PatientError, Result, ValidationError};
pub use metrics::Verdict;
pub use patient::{Gender, NewPatient, PatientDraft, PatientRecord, PatientView};
