//! Saved audits.
//!
//! A document is persisted only on explicit save and always carries a result
//! snapshot recomputed from its record at save time.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculator::{compute_emissions, EmissionsResult};
use crate::error::AuditError;
use crate::record::ActivityRecord;

/// A saved audit: the raw record plus the snapshot of its emissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDocument {
    pub id: Uuid,
    pub record: ActivityRecord,
    pub result: EmissionsResult,
    pub saved_at: DateTime<Utc>,
}

impl AuditDocument {
    fn snapshot(id: Uuid, record: ActivityRecord) -> Self {
        let result = compute_emissions(&record);
        Self {
            id,
            record,
            result,
            saved_at: Utc::now(),
        }
    }
}

/// Create / read / update / delete keyed by an opaque id.
pub trait AuditStore {
    fn create(&mut self, record: ActivityRecord) -> Result<AuditDocument, AuditError>;

    /// Every document, oldest save first.
    fn list(&self) -> Result<Vec<AuditDocument>, AuditError>;

    fn get(&self, id: Uuid) -> Result<AuditDocument, AuditError>;

    /// Replace the record and refresh the snapshot.
    fn update(&mut self, id: Uuid, record: ActivityRecord) -> Result<AuditDocument, AuditError>;

    fn delete(&mut self, id: Uuid) -> Result<(), AuditError>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditStore {
    documents: BTreeMap<Uuid, AuditDocument>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn from_documents(docs: Vec<AuditDocument>) -> Self {
        Self {
            documents: docs.into_iter().map(|d| (d.id, d)).collect(),
        }
    }

    fn sorted(&self) -> Vec<AuditDocument> {
        let mut docs: Vec<AuditDocument> = self.documents.values().cloned().collect();
        docs.sort_by(|a, b| a.saved_at.cmp(&b.saved_at).then(a.id.cmp(&b.id)));
        docs
    }
}

impl AuditStore for InMemoryAuditStore {
    fn create(&mut self, record: ActivityRecord) -> Result<AuditDocument, AuditError> {
        let doc = AuditDocument::snapshot(Uuid::new_v4(), record);
        debug!(id = %doc.id, total_tonnes = doc.result.total_tonnes, "audit created");
        self.documents.insert(doc.id, doc.clone());
        Ok(doc)
    }

    fn list(&self) -> Result<Vec<AuditDocument>, AuditError> {
        Ok(self.sorted())
    }

    fn get(&self, id: Uuid) -> Result<AuditDocument, AuditError> {
        self.documents
            .get(&id)
            .cloned()
            .ok_or(AuditError::NotFound(id))
    }

    fn update(&mut self, id: Uuid, record: ActivityRecord) -> Result<AuditDocument, AuditError> {
        let slot = self
            .documents
            .get_mut(&id)
            .ok_or(AuditError::NotFound(id))?;
        *slot = AuditDocument::snapshot(id, record);
        debug!(%id, total_tonnes = slot.result.total_tonnes, "audit updated");
        Ok(slot.clone())
    }

    fn delete(&mut self, id: Uuid) -> Result<(), AuditError> {
        self.documents
            .remove(&id)
            .ok_or(AuditError::NotFound(id))?;
        debug!(%id, "audit deleted");
        Ok(())
    }
}

/// Documents kept as one JSON array on disk, rewritten after each change.
#[derive(Debug)]
pub struct JsonFileAuditStore {
    path: PathBuf,
    inner: InMemoryAuditStore,
}

impl JsonFileAuditStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();
        let docs: Vec<AuditDocument> = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            Vec::new()
        };
        info!(path = %path.display(), documents = docs.len(), "audit store opened");
        Ok(Self {
            path,
            inner: InMemoryAuditStore::from_documents(docs),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `docs` to disk and only then make them the live set, so a failed
    /// write leaves both the file and the in-memory view unchanged.
    fn commit(&mut self, docs: InMemoryAuditStore) -> Result<(), AuditError> {
        let body = serde_json::to_string_pretty(&docs.sorted())?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, body)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        self.inner = docs;
        Ok(())
    }
}

impl AuditStore for JsonFileAuditStore {
    fn create(&mut self, record: ActivityRecord) -> Result<AuditDocument, AuditError> {
        let mut next = self.inner.clone();
        let doc = next.create(record)?;
        self.commit(next)?;
        Ok(doc)
    }

    fn list(&self) -> Result<Vec<AuditDocument>, AuditError> {
        self.inner.list()
    }

    fn get(&self, id: Uuid) -> Result<AuditDocument, AuditError> {
        self.inner.get(id)
    }

    fn update(&mut self, id: Uuid, record: ActivityRecord) -> Result<AuditDocument, AuditError> {
        let mut next = self.inner.clone();
        let doc = next.update(id, record)?;
        self.commit(next)?;
        Ok(doc)
    }

    fn delete(&mut self, id: Uuid) -> Result<(), AuditError> {
        let mut next = self.inner.clone();
        next.delete(id)?;
        self.commit(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::FuelType;

    fn diesel(volume: f64) -> ActivityRecord {
        ActivityRecord {
            org_name: "Depot".into(),
            fuel_type: Some(FuelType::Diesel),
            fuel_volume: volume,
            ..ActivityRecord::default()
        }
    }

    #[test]
    fn create_get_roundtrip() {
        let mut store = InMemoryAuditStore::new();
        let doc = store.create(diesel(100.0)).unwrap();
        assert_eq!(store.get(doc.id).unwrap(), doc);
        assert!((doc.result.fuel_kg - 266.3).abs() < 1e-9);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_refreshes_snapshot() {
        let mut store = InMemoryAuditStore::new();
        let doc = store.create(diesel(100.0)).unwrap();
        let updated = store.update(doc.id, diesel(200.0)).unwrap();
        assert_eq!(updated.id, doc.id);
        assert!((updated.result.fuel_kg - 532.6).abs() < 1e-9);
        assert_eq!(store.list().unwrap(), vec![updated]);
    }

    #[test]
    fn delete_and_missing_ids() {
        let mut store = InMemoryAuditStore::new();
        let doc = store.create(diesel(1.0)).unwrap();
        store.delete(doc.id).unwrap();
        assert!(store.is_empty());
        assert!(matches!(store.get(doc.id), Err(AuditError::NotFound(id)) if id == doc.id));
        assert!(matches!(store.delete(doc.id), Err(AuditError::NotFound(_))));
        assert!(matches!(
            store.update(doc.id, diesel(1.0)),
            Err(AuditError::NotFound(_))
        ));
    }

    #[test]
    fn document_json_carries_snapshot() {
        let mut store = InMemoryAuditStore::new();
        let doc = store.create(diesel(100.0)).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value["result"]["totalTonnes"].is_number());
        assert!(value["result"]["perEmployeeTonnes"].is_null());
        assert_eq!(value["record"]["fuelType"], "diesel");
        assert!(value["savedAt"].is_string());
    }
}
