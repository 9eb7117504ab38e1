use super::store::PatientStore;
use crate::core::{PatientError, Result};
use clap::ValueEnum;
use serde::Serialize;

/// On-disk encoding of a [`PatientStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StorageFormat {
    /// Pretty-printed JSON object keyed by patient id
    #[default]
    Json,
    /// MessagePack map with named record fields
    #[value(name = "msgpack")]
    MessagePack,
}

impl StorageFormat {
    pub fn encode(&self, store: &PatientStore) -> Result<Vec<u8>> {
        match self {
            StorageFormat::Json => {
                let mut buf = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
                let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
                store.serialize(&mut serializer).map_err(|e| {
                    PatientError::storage(format!("Failed to serialize store: {}", e))
                })?;
                Ok(buf)
            }
            StorageFormat::MessagePack => rmp_serde::to_vec_named(store)
                .map_err(|e| PatientError::storage(format!("Failed to serialize store: {}", e))),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<PatientStore> {
        match self {
            StorageFormat::Json => serde_json::from_slice(bytes)
                .map_err(|e| PatientError::storage(format!("Failed to parse store: {}", e))),
            StorageFormat::MessagePack => rmp_serde::from_slice(bytes)
                .map_err(|e| PatientError::storage(format!("Failed to parse store: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PatientDraft, PatientRecord};

    fn store() -> PatientStore {
        let mut store = PatientStore::new();
        let record = PatientRecord::try_from(PatientDraft {
            name: "Alice".to_string(),
            city: "Pune".to_string(),
            age: 30,
            gender: "female".to_string(),
            height: 1.6,
            weight: 50.0,
        })
        .unwrap();
        store.insert("P001", record).unwrap();
        store
    }

    #[test]
    fn test_json_uses_four_space_indent() {
        let bytes = StorageFormat::Json.encode(&store()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("{\n    \"P001\": {\n        \"name\": \"Alice\","));
    }

    #[test]
    fn test_msgpack_decodes_what_it_encodes() {
        let bytes = StorageFormat::MessagePack.encode(&store()).unwrap();
        let decoded = StorageFormat::MessagePack.decode(&bytes).unwrap();
        assert_eq!(decoded, store());
    }

    #[test]
    fn test_garbage_is_a_storage_error() {
        for format in [StorageFormat::Json, StorageFormat::MessagePack] {
            let err = format.decode(b"\xc1not a store").unwrap_err();
            assert!(matches!(err, PatientError::Storage(_)));
        }
        assert!(matches!(
            StorageFormat::Json.decode(b""),
            Err(PatientError::Storage(_))
        ));
    }
}
