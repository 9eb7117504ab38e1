pub mod file;
pub mod format;
pub mod memory;
pub mod store;

pub use file::FileGateway;
pub use format::StorageFormat;
pub use memory::MemoryGateway;
pub use store::PatientStore;

use crate::core::Result;

/// Persistence seam for the record service - allows pluggable backends
///
/// Both calls act on the whole collection. `load` on a backend that holds
/// nothing yet returns an empty store, not an error.
pub trait StoreGateway: Send + Sync {
    /// Materialize the full collection
    fn load(&self) -> Result<PatientStore>;

    /// Replace the backend's contents with `store`
    fn save(&self, store: &PatientStore) -> Result<()>;
}
