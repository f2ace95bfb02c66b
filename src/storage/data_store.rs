use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use indexmap::IndexMap;

use super::Record;
use crate::Result;
use crate::ServiceError;

/// Rejects the empty key.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ServiceError::invalid("key must not be empty").into());
    }
    Ok(())
}

/// Point-in-time copy of both maps, taken by the `backup` action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSnapshot {
    pub entries: Vec<(String, String)>,
    pub records: Vec<Record>,
}

/// Concurrent key/value store plus the id-addressed record store.
///
/// Single-key operations are atomic per key. Batch writes are atomic per key
/// only; concurrent readers may observe a partially applied batch.
#[derive(Debug, Default)]
pub struct DataStore {
    entries: DashMap<String, String>,
    records: DashMap<i32, Record>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    pub fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Option<String>> {
        self.set_with(key, value, || {})
    }

    /// Writes `value` and runs `on_commit` while the key is still locked.
    ///
    /// Two writers of the same key run their `on_commit` in the same order
    /// their writes became visible.
    pub fn set_with<F>(
        &self,
        key: &str,
        value: &str,
        on_commit: F,
    ) -> Result<Option<String>>
    where
        F: FnOnce(),
    {
        validate_key(key)?;
        let previous = match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let previous = occupied.insert(value.to_string());
                on_commit();
                Some(previous)
            }
            Entry::Vacant(vacant) => {
                let _inserted = vacant.insert(value.to_string());
                on_commit();
                None
            }
        };
        Ok(previous)
    }

    /// Values for `keys` in input order. Absent and empty keys yield `None`.
    pub fn get_batch(
        &self,
        keys: &[String],
    ) -> Vec<Option<String>> {
        keys.iter()
            .map(|key| {
                if key.is_empty() {
                    None
                } else {
                    self.entries.get(key.as_str()).map(|v| v.value().clone())
                }
            })
            .collect()
    }

    /// Validates every key before writing any of them.
    pub fn set_batch(
        &self,
        entries: &IndexMap<String, String>,
    ) -> Result<()> {
        for key in entries.keys() {
            validate_key(key)?;
        }
        for (key, value) in entries {
            self.entries.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    /// Returns whether a value was present.
    pub fn remove(
        &self,
        key: &str,
    ) -> Result<bool> {
        validate_key(key)?;
        Ok(self.entries.remove(key).is_some())
    }

    /// Empties both maps.
    pub fn clear(&self) {
        self.entries.clear();
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn get_record(
        &self,
        id: i32,
    ) -> Option<Record> {
        self.records.get(&id).map(|r| r.value().clone())
    }

    /// Stores `record` under its id, returning the record it replaced.
    pub fn put_record(
        &self,
        record: Record,
    ) -> Option<Record> {
        self.records.insert(record.id, record)
    }

    pub fn remove_record(
        &self,
        id: i32,
    ) -> bool {
        self.records.remove(&id).is_some()
    }

    /// Entries are sorted by key so restores replay deterministically.
    pub fn snapshot(&self) -> DataSnapshot {
        let mut entries: Vec<(String, String)> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut records: Vec<Record> = self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by_key(|r| r.id);

        DataSnapshot { entries, records }
    }

    /// Replaces the current contents with `snapshot`.
    pub fn restore(
        &self,
        snapshot: &DataSnapshot,
    ) {
        self.clear();
        for (key, value) in &snapshot.entries {
            self.entries.insert(key.clone(), value.clone());
        }
        for record in &snapshot.records {
            self.records.insert(record.id, record.clone());
        }
    }
}
