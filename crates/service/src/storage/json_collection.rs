use std::{collections::HashSet, marker::PhantomData, path::{Path, PathBuf}, sync::Arc, time::Instant};

use async_trait::async_trait;
use configs::IdStrategy;
use serde_json::Value;
use tokio::{fs, sync::RwLock};
use tracing::{debug, warn};

use crate::errors::StoreError;
use crate::ids::IdGenerator;
use crate::metrics;
use crate::record::{json_type_name, Record};
use crate::store::{Operation, RecordStore};

/// Generic JSON file-backed record collection.
///
/// The file holds a top-level JSON array and is the only source of truth:
/// every operation reloads it, and every mutation rewrites it whole
/// (pretty-printed, replaced through a temporary sibling file). The store
/// never creates the file.
///
/// `lock` serializes mutations (held across read, modify and persist) and
/// keeps readers from observing a write in progress.
pub struct JsonCollection<R> {
    name: String,
    file_path: PathBuf,
    lock: RwLock<()>,
    ids: IdGenerator,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> JsonCollection<R> {
    pub fn new<P: Into<PathBuf>>(name: impl Into<String>, path: P, strategy: IdStrategy) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            file_path: path.into(),
            lock: RwLock::new(()),
            ids: IdGenerator::new(strategy),
            _record: PhantomData,
        })
    }

    pub fn file_path(&self) -> &Path { &self.file_path }

    async fn load(&self) -> Result<Vec<R>, StoreError> {
        let bytes = fs::read(&self.file_path).await.map_err(|source| StoreError::Read {
            path: self.file_path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            path: self.file_path.clone(),
            source,
        })?;
        if !value.is_array() {
            return Err(self.corrupt(format!("top-level value is {}, expected an array", json_type_name(&value))));
        }
        serde_json::from_value(value).map_err(|e| self.corrupt(format!("unreadable record: {e}")))
    }

    async fn save(&self, records: &[R]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(records).map_err(|e| self.write_failed(e))?;
        let tmp = self.tmp_path();
        if let Err(e) = fs::write(&tmp, &data).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(self.write_failed(e));
        }
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(self.write_failed(e));
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let file_name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone());
        self.file_path.with_file_name(format!(".{file_name}.tmp"))
    }

    fn corrupt(&self, reason: String) -> StoreError {
        StoreError::CorruptCollection { path: self.file_path.clone(), reason }
    }

    fn write_failed(&self, e: impl std::fmt::Display) -> StoreError {
        StoreError::Write { path: self.file_path.clone(), reason: e.to_string() }
    }

    /// Apply a mutation to the loaded records and persist under the write lock.
    /// Nothing is written when `f` fails.
    pub async fn update_records<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Vec<R>, &IdGenerator) -> Result<T, StoreError>,
    {
        let _guard = self.lock.write().await;
        let mut records = self.load().await?;
        let out = f(&mut records, &self.ids)?;
        self.save(&records).await?;
        Ok(out)
    }

    pub async fn list(&self) -> Result<Vec<R>, StoreError> {
        let started = Instant::now();
        let res = self.list_unobserved().await;
        metrics::observe(&self.name, Operation::List, started, &res);
        res
    }

    pub async fn get(&self, id: &str) -> Result<R, StoreError> {
        let started = Instant::now();
        let res = self
            .list_unobserved()
            .await
            .and_then(|records| {
                records
                    .into_iter()
                    .find(|r| r.has_id(id))
                    .ok_or_else(|| StoreError::NotFound(id.to_string()))
            });
        metrics::observe(&self.name, Operation::Get, started, &res);
        res
    }

    async fn list_unobserved(&self) -> Result<Vec<R>, StoreError> {
        let _guard = self.lock.read().await;
        self.load().await
    }

    /// Append a record under a freshly generated id. Any id carried by the
    /// candidate is replaced.
    pub async fn create(&self, mut candidate: R) -> Result<R, StoreError> {
        let started = Instant::now();
        let res = if candidate.is_empty() {
            Err(StoreError::invalid("record has no fields"))
        } else {
            self.update_records(|records, ids| {
                let taken: HashSet<String> =
                    records.iter().filter_map(|r| r.id().map(|id| id.into_owned())).collect();
                candidate.set_id(ids.next_id(|c| taken.contains(c)));
                records.push(candidate.clone());
                Ok(candidate)
            })
            .await
        };
        if let Ok(rec) = &res {
            debug!(collection = %self.name, id = ?rec.id(), "record created");
        }
        metrics::observe(&self.name, Operation::Create, started, &res);
        res
    }

    pub async fn update(&self, id: &str, patch: R) -> Result<R, StoreError> {
        let started = Instant::now();
        if patch.id().is_some_and(|p| p != id) {
            warn!(collection = %self.name, %id, "ignoring id in update payload");
        }
        let res = self
            .update_records(|records, _| {
                let rec = records
                    .iter_mut()
                    .find(|r| r.has_id(id))
                    .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
                rec.merge(patch);
                Ok(rec.clone())
            })
            .await;
        if res.is_ok() {
            debug!(collection = %self.name, %id, "record updated");
        }
        metrics::observe(&self.name, Operation::Update, started, &res);
        res
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let started = Instant::now();
        let res = self
            .update_records(|records, _| {
                let index = records
                    .iter()
                    .position(|r| r.has_id(id))
                    .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
                records.remove(index);
                Ok(())
            })
            .await;
        if res.is_ok() {
            debug!(collection = %self.name, %id, "record deleted");
        }
        metrics::observe(&self.name, Operation::Delete, started, &res);
        res
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for JsonCollection<R> {
    fn name(&self) -> &str { &self.name }
    async fn list(&self) -> Result<Vec<R>, StoreError> { self.list().await }
    async fn get(&self, id: &str) -> Result<R, StoreError> { self.get(id).await }
    async fn create(&self, candidate: R) -> Result<R, StoreError> { self.create(candidate).await }
    async fn update(&self, id: &str, patch: R) -> Result<R, StoreError> { self.update(id, patch).await }
    async fn delete(&self, id: &str) -> Result<(), StoreError> { self.delete(id).await }
}
