//! Record Service
//!
//! The entry point an outer layer (HTTP, CLI, tests) calls. Every operation
//! loads the store fresh through the gateway; mutating operations hold the
//! service's write lock across load, change and save so two writers can
//! never interleave and lose an update. Reads take no lock.

use crate::core::{NewPatient, PatientError, PatientRecord, PatientView, Result, ValidationError};
use crate::query::{SortExecutor, SortKey};
use crate::storage::{PatientStore, StoreGateway};
use crate::update::{PatientPatch, UpdateMerger};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct RecordService {
    gateway: Arc<dyn StoreGateway>,
    write_lock: Arc<Mutex<()>>,
}

impl RecordService {
    pub fn new(gateway: Arc<dyn StoreGateway>) -> Self {
        Self {
            gateway,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Store a new record under `request.id`. Returns the identifier.
    pub fn create(&self, request: NewPatient) -> Result<String> {
        let NewPatient { id, draft } = request;
        if id.trim().is_empty() {
            warn!("rejected patient with blank id");
            return Err(ValidationError::single("id", "must not be empty").into());
        }

        let _guard = self.lock_writes();
        let mut store = self.gateway.load()?;

        if store.contains(&id) {
            warn!(patient_id = %id, "patient already exists");
            return Err(PatientError::conflict(id));
        }

        let record = PatientRecord::try_from(draft).inspect_err(|e| {
            warn!(patient_id = %id, error = %e, "rejected new patient");
        })?;

        store.insert(id.clone(), record)?;
        self.gateway.save(&store)?;

        info!(patient_id = %id, "patient created");
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Result<PatientView> {
        let store = self.gateway.load()?;
        let record = store.get(id).ok_or_else(|| PatientError::not_found(id))?;
        Ok(PatientView::new(id, record.clone()))
    }

    pub fn list(&self) -> Result<Vec<PatientView>> {
        Ok(self.gateway.load()?.views())
    }

    /// Merge `patch` into the stored record. Nothing is saved unless the
    /// merged record validates.
    pub fn update(&self, id: &str, patch: PatientPatch) -> Result<PatientView> {
        let _guard = self.lock_writes();
        let mut store = self.gateway.load()?;

        let existing = store.get(id).ok_or_else(|| PatientError::not_found(id))?;
        if patch.is_empty() {
            debug!(patient_id = %id, "update carries no values, nothing saved");
            return Ok(PatientView::new(id, existing.clone()));
        }

        let merged = UpdateMerger::merge(existing, patch).inspect_err(|e| {
            warn!(patient_id = %id, error = %e, "rejected patient update");
        })?;

        store.replace(id, merged.clone())?;
        self.gateway.save(&store)?;

        info!(patient_id = %id, "patient updated");
        Ok(PatientView::new(id, merged))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.lock_writes();
        let mut store = self.gateway.load()?;

        if store.remove(id).is_none() {
            return Err(PatientError::not_found(id));
        }
        self.gateway.save(&store)?;

        info!(patient_id = %id, "patient deleted");
        Ok(())
    }

    /// Records ordered by `field`. Without a field the store's natural
    /// order comes back and `order` is not looked at.
    pub fn sort(&self, field: Option<&str>, order: Option<&str>) -> Result<Vec<PatientView>> {
        let key = field.map(|field| SortKey::parse(field, order)).transpose()?;
        let mut views = self.gateway.load()?.views();
        if let Some(key) = key {
            SortExecutor::sort(&mut views, key);
        }
        Ok(views)
    }

    /// Current snapshot of the raw store.
    pub fn snapshot(&self) -> Result<PatientStore> {
        self.gateway.load()
    }

    // The guard protects no data, so a poisoned lock is safe to reuse.
    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
