use super::StoreGateway;
use super::format::StorageFormat;
use super::store::PatientStore;
use crate::core::Result;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// In-process backend holding one encoded snapshot.
///
/// Stores bytes rather than a live `PatientStore` so every load decodes a
/// fresh copy, the same as the file backend.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    snapshot: Mutex<Option<Vec<u8>>>,
    saves: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: &PatientStore) -> Result<Self> {
        let bytes = StorageFormat::Json.encode(store)?;
        Ok(Self {
            snapshot: Mutex::new(Some(bytes)),
            saves: AtomicUsize::new(0),
        })
    }

    /// Number of successful saves since construction.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The raw encoded snapshot, if anything was ever stored.
    pub fn snapshot_bytes(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.snapshot.lock()?.clone())
    }
}

impl StoreGateway for MemoryGateway {
    fn load(&self) -> Result<PatientStore> {
        match self.snapshot.lock()?.as_deref() {
            Some(bytes) => StorageFormat::Json.decode(bytes),
            None => Ok(PatientStore::new()),
        }
    }

    fn save(&self, store: &PatientStore) -> Result<()> {
        let bytes = StorageFormat::Json.encode(store)?;
        *self.snapshot.lock()? = Some(bytes);
        self.saves.fetch_add(1, Ordering::SeqCst);
        debug!(records = store.len(), "in-memory store saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PatientDraft, PatientRecord};

    #[test]
    fn test_empty_until_saved() {
        let gateway = MemoryGateway::new();
        assert!(gateway.load().unwrap().is_empty());
        assert_eq!(gateway.snapshot_bytes().unwrap(), None);
        assert_eq!(gateway.save_count(), 0);
    }

    #[test]
    fn test_loads_are_independent_copies() {
        let mut seed = PatientStore::new();
        let record = PatientRecord::try_from(PatientDraft {
            name: "Bob".to_string(),
            city: "Delhi".to_string(),
            age: 50,
            gender: "male".to_string(),
            height: 1.7,
            weight: 72.0,
        })
        .unwrap();
        seed.insert("P001", record).unwrap();
        let gateway = MemoryGateway::with_store(&seed).unwrap();

        let mut first = gateway.load().unwrap();
        first.remove("P001");
        assert_eq!(gateway.load().unwrap().len(), 1);

        gateway.save(&first).unwrap();
        assert!(gateway.load().unwrap().is_empty());
        assert_eq!(gateway.save_count(), 1);
    }
}
