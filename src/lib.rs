// ============================================================================
// patientdb Library
// ============================================================================

pub mod config;
pub mod core;
pub mod query;
pub mod service;
pub mod storage;
pub mod update;
pub mod validation;
pub mod web;

// Re-export main types for convenience
pub use crate::core::{
    FieldViolation, Gender, NewPatient, PatientDraft, PatientError, PatientRecord, PatientView,
    Result, ValidationError, Verdict,
};
pub use query::{SortField, SortKey, SortOrder};
pub use service::RecordService;
pub use storage::{FileGateway, MemoryGateway, PatientStore, StorageFormat, StoreGateway};
pub use update::{Patch, PatientPatch};
