use crate::traits::LocalStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use planner_core::PlannerResult;
use std::collections::BTreeMap;

/// Process-lifetime storage; used for session-scoped keys and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn get(&self, key: &str) -> PlannerResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> PlannerResult<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> PlannerResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn keys(&self) -> PlannerResult<Vec<String>> {
        Ok(self.entries.lock().keys().cloned().collect())
    }
}
