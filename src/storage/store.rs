use crate::core::{PatientError, PatientRecord, PatientView, Result};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// The whole patient collection, keyed by identifier.
///
/// Iteration follows insertion order. Removing an entry keeps the relative
/// order of the rest, so ties in a sort stay predictable across deletes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientStore {
    entries: Vec<(String, PatientRecord)>,
    index: HashMap<String, usize>,
}

impl PatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&PatientRecord> {
        self.index.get(id).map(|&pos| &self.entries[pos].1)
    }

    /// Append a new record. Fails with `Conflict` if the id is taken.
    pub fn insert(&mut self, id: impl Into<String>, record: PatientRecord) -> Result<()> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(PatientError::conflict(id));
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push((id, record));
        Ok(())
    }

    /// Swap the record stored under an existing id, keeping its position.
    pub fn replace(&mut self, id: &str, record: PatientRecord) -> Result<PatientRecord> {
        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| PatientError::not_found(id))?;
        Ok(std::mem::replace(&mut self.entries[pos].1, record))
    }

    pub fn remove(&mut self, id: &str) -> Option<PatientRecord> {
        let pos = self.index.remove(id)?;
        let (_, record) = self.entries.remove(pos);
        for (shifted, (key, _)) in self.entries.iter().enumerate().skip(pos) {
            self.index.insert(key.clone(), shifted);
        }
        Some(record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatientRecord)> {
        self.entries.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|(id, _)| id.as_str()).collect()
    }

    /// Every record with its derived metrics, in store order.
    pub fn views(&self) -> Vec<PatientView> {
        self.iter()
            .map(|(id, record)| PatientView::new(id, record.clone()))
            .collect()
    }
}

impl Serialize for PatientStore {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, record) in &self.entries {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

struct PatientStoreVisitor;

impl<'de> Visitor<'de> for PatientStoreVisitor {
    type Value = PatientStore;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of patient id to patient record")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut store = PatientStore::new();
        while let Some(id) = access.next_key::<String>()? {
            let record: PatientRecord = access
                .next_value()
                .map_err(|e| de::Error::custom(format!("patient '{}': {}", id, e)))?;
            if store.contains(&id) {
                return Err(de::Error::custom(format!("duplicate patient id '{}'", id)));
            }
            store.entries.push((id.clone(), record));
            store.index.insert(id, store.entries.len() - 1);
        }
        Ok(store)
    }
}

impl<'de> Deserialize<'de> for PatientStore {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(PatientStoreVisitor)
    }
}
