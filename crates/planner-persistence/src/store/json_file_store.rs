use crate::store::atomic_writer::AtomicWriter;
use crate::traits::LocalStore;
use async_trait::async_trait;
use planner_core::{PlannerError, PlannerResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Local storage persisted as one flat JSON object.
///
/// Every write rewrites the whole file atomically. The mutex serialises
/// read-modify-write cycles from concurrent tasks in this process.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> PlannerResult<BTreeMap<String, String>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(BTreeMap::new());
        }
        let bytes = AtomicWriter::read_all(&self.path).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            PlannerError::Serialization(format!("{}: {}", self.path.display(), e))
        })
    }

    async fn write_map(&self, map: &BTreeMap<String, String>) -> PlannerResult<()> {
        let bytes = serde_json::to_vec_pretty(map)?;
        AtomicWriter::write_atomic(&self.path, &bytes).await
    }
}

#[async_trait]
impl LocalStore for JsonFileStore {
    async fn get(&self, key: &str) -> PlannerResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_map().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> PlannerResult<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await?;
        tracing::debug!("Stored key {} in {}", key, self.path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> PlannerResult<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
            tracing::debug!("Removed key {} from {}", key, self.path.display());
        }
        Ok(())
    }

    async fn keys(&self) -> PlannerResult<Vec<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_map().await?.into_keys().collect())
    }
}
