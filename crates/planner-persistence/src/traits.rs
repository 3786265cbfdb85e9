use async_trait::async_trait;
use planner_core::{PlannerError, PlannerResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// String key/value storage with the semantics of browser local storage.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> PlannerResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> PlannerResult<()>;

    /// Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> PlannerResult<()>;

    async fn keys(&self) -> PlannerResult<Vec<String>>;
}

/// Typed helpers for values stored as JSON strings.
#[async_trait]
pub trait LocalStoreExt: LocalStore {
    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> PlannerResult<Option<T>> {
        match self.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| PlannerError::Serialization(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> PlannerResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw).await
    }
}

impl<S: LocalStore + ?Sized> LocalStoreExt for S {}
