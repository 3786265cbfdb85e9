use async_trait::async_trait;
use parking_lot::Mutex;
use planner_core::PlannerResult;
use planner_persistence::{keys, LocalStore, LocalStoreExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Entries kept by the persisted history; older ones fall off the front.
pub const MAX_PERSISTED_ENTRIES: usize = 50;

/// Browser-style navigation history of location search strings.
#[async_trait]
pub trait History: Send + Sync {
    /// Search string of the current entry (`?project=5`, or empty).
    fn current(&self) -> String;

    /// Add an entry after the current one, discarding any forward entries.
    async fn push(&self, location: String) -> PlannerResult<()>;

    /// Step back; returns false at the oldest entry.
    async fn back(&self) -> PlannerResult<bool>;

    /// Step forward; returns false at the newest entry.
    async fn forward(&self) -> PlannerResult<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct HistoryStack {
    entries: Vec<String>,
    index: usize,
}

impl HistoryStack {
    fn starting_at(location: String) -> Self {
        Self {
            entries: vec![location],
            index: 0,
        }
    }

    fn current(&self) -> String {
        self.entries.get(self.index).cloned().unwrap_or_default()
    }

    fn push(&mut self, location: String) {
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
    }

    fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    fn trim_to(&mut self, max: usize) {
        if self.entries.len() > max {
            let excess = self.entries.len() - max;
            self.entries.drain(..excess);
            self.index = self.index.saturating_sub(excess);
        }
    }

    fn is_valid(&self) -> bool {
        self.index < self.entries.len()
    }
}

/// In-memory history, lost when the process exits.
#[derive(Debug)]
pub struct MemoryHistory {
    stack: Mutex<HistoryStack>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::starting_at("")
    }

    /// History whose first entry is `location`, as when a page is opened.
    pub fn starting_at(location: impl Into<String>) -> Self {
        Self {
            stack: Mutex::new(HistoryStack::starting_at(location.into())),
        }
    }

    pub fn len(&self) -> usize {
        self.stack.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.lock().entries.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl History for MemoryHistory {
    fn current(&self) -> String {
        self.stack.lock().current()
    }

    async fn push(&self, location: String) -> PlannerResult<()> {
        self.stack.lock().push(location);
        Ok(())
    }

    async fn back(&self) -> PlannerResult<bool> {
        Ok(self.stack.lock().back())
    }

    async fn forward(&self) -> PlannerResult<bool> {
        Ok(self.stack.lock().forward())
    }
}

/// History saved under the `route_history` local-storage key after every
/// change, so separate CLI invocations behave like reloads of one page.
pub struct PersistedHistory {
    store: Arc<dyn LocalStore>,
    stack: Mutex<HistoryStack>,
}

impl PersistedHistory {
    /// Load the saved history. A missing or unreadable entry starts fresh.
    pub async fn load(store: Arc<dyn LocalStore>) -> PlannerResult<Self> {
        let stack = match store.get_json::<HistoryStack>(keys::ROUTE_HISTORY).await {
            Ok(Some(stack)) if stack.is_valid() => stack,
            Ok(Some(_)) => {
                tracing::warn!("Saved route history is inconsistent, starting fresh");
                HistoryStack::starting_at(String::new())
            }
            Ok(None) => HistoryStack::starting_at(String::new()),
            Err(e) => {
                tracing::warn!("Failed to read saved route history: {}", e);
                HistoryStack::starting_at(String::new())
            }
        };
        tracing::debug!(
            "Route history loaded: {} entries, at {}",
            stack.entries.len(),
            stack.index
        );
        Ok(Self {
            store,
            stack: Mutex::new(stack),
        })
    }

    async fn save(&self) -> PlannerResult<()> {
        let stack = self.stack.lock().clone();
        self.store.set_json(keys::ROUTE_HISTORY, &stack).await
    }

    /// Forget every entry.
    pub async fn clear(&self) -> PlannerResult<()> {
        *self.stack.lock() = HistoryStack::starting_at(String::new());
        self.store.remove(keys::ROUTE_HISTORY).await
    }
}

#[async_trait]
impl History for PersistedHistory {
    fn current(&self) -> String {
        self.stack.lock().current()
    }

    async fn push(&self, location: String) -> PlannerResult<()> {
        {
            let mut stack = self.stack.lock();
            stack.push(location);
            stack.trim_to(MAX_PERSISTED_ENTRIES);
        }
        self.save().await
    }

    async fn back(&self) -> PlannerResult<bool> {
        let moved = self.stack.lock().back();
        if moved {
            self.save().await?;
        }
        Ok(moved)
    }

    async fn forward(&self) -> PlannerResult<bool> {
        let moved = self.stack.lock().forward();
        if moved {
            self.save().await?;
        }
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_persistence::MemoryStore;

    #[tokio::test]
    async fn test_push_truncates_forward_entries() {
        let history = MemoryHistory::new();
        history.push("?project=1".to_string()).await.unwrap();
        history.push("?project=2".to_string()).await.unwrap();
        assert!(history.back().await.unwrap());
        assert_eq!(history.current(), "?project=1");

        history.push("?project=3".to_string()).await.unwrap();
        assert!(!history.forward().await.unwrap());
        assert_eq!(history.current(), "?project=3");
        assert_eq!(history.len(), 3);
    }

    #[tokio::test]
    async fn test_back_stops_at_first_entry() {
        let history = MemoryHistory::starting_at("?project=0");
        assert!(!history.back().await.unwrap());
        assert_eq!(history.current(), "?project=0");
    }

    #[tokio::test]
    async fn test_persisted_history_survives_reload() {
        let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
        let history = PersistedHistory::load(store.clone()).await.unwrap();
        history.push("?project=5".to_string()).await.unwrap();
        history.push("?project=5&task=42".to_string()).await.unwrap();
        history.back().await.unwrap();

        let reloaded = PersistedHistory::load(store).await.unwrap();
        assert_eq!(reloaded.current(), "?project=5");
        assert!(reloaded.forward().await.unwrap());
        assert_eq!(reloaded.current(), "?project=5&task=42");
    }

    #[tokio::test]
    async fn test_corrupt_saved_history_starts_fresh() {
        let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::with_entries(vec![(
            keys::ROUTE_HISTORY,
            "{not json",
        )]));
        let history = PersistedHistory::load(store).await.unwrap();
        assert_eq!(history.current(), "");
    }

    #[tokio::test]
    async fn test_persisted_history_is_bounded() {
        let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
        let history = PersistedHistory::load(store).await.unwrap();
        for task in 1..=(MAX_PERSISTED_ENTRIES + 10) {
            history.push(format!("?task={}", task)).await.unwrap();
        }
        let stack = history.stack.lock().clone();
        assert_eq!(stack.entries.len(), MAX_PERSISTED_ENTRIES);
        assert_eq!(stack.index, MAX_PERSISTED_ENTRIES - 1);
        assert_eq!(history.current(), format!("?task={}", MAX_PERSISTED_ENTRIES + 10));
    }
}
