use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

struct PendingTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

struct DebounceState<K> {
    next_generation: u64,
    pending: HashMap<K, PendingTimer>,
}

/// Trailing-edge debouncer with one timer per key.
///
/// Scheduling a key again aborts its pending timer and starts a new one, so
/// a burst of calls runs the action once, `delay` after the last call. When
/// a timer fires the key is released before the action starts: the action
/// then runs to completion even if the key is rescheduled or cancelled.
pub struct Debouncer<K> {
    delay: Duration,
    state: Arc<Mutex<DebounceState<K>>>,
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: Arc::new(Mutex::new(DebounceState {
                next_generation: 0,
                pending: HashMap::new(),
            })),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the timer for `key`. Must be called inside a tokio runtime.
    pub fn schedule<F, Fut>(&self, key: K, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut state = self.state.lock();
        state.next_generation += 1;
        let generation = state.next_generation;

        if let Some(previous) = state.pending.remove(&key) {
            previous.handle.abort();
        }

        let shared = Arc::clone(&self.state);
        let delay = self.delay;
        let fired_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let current = {
                let mut state = shared.lock();
                match state.pending.get(&fired_key) {
                    Some(timer) if timer.generation == generation => {
                        state.pending.remove(&fired_key);
                        true
                    }
                    _ => false,
                }
            };
            if current {
                action().await;
            }
        });

        state.pending.insert(key, PendingTimer { generation, handle });
    }

    /// Abort the pending timer for `key`; returns whether one was pending.
    pub fn cancel(&self, key: &K) -> bool {
        match self.state.lock().pending.remove(key) {
            Some(timer) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        let mut state = self.state.lock();
        for (_, timer) in state.pending.drain() {
            timer.handle.abort();
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.state.lock().pending.contains_key(key)
    }

    pub fn pending_keys(&self) -> Vec<K> {
        self.state.lock().pending.keys().cloned().collect()
    }

    pub fn pending(&self) -> PendingKeys<K> {
        PendingKeys {
            state: Arc::downgrade(&self.state),
        }
    }
}

/// Read-only view of a [`Debouncer`]'s pending keys that can move into its
/// own actions without keeping the debouncer alive.
pub struct PendingKeys<K> {
    state: Weak<Mutex<DebounceState<K>>>,
}

impl<K> Clone for PendingKeys<K> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
        }
    }
}

impl<K> PendingKeys<K> {
    /// True when no timer is armed, or the debouncer is gone.
    pub fn is_empty(&self) -> bool {
        match self.state.upgrade() {
            Some(state) => {
                let empty = state.lock().pending.is_empty();
                empty
            }
            None => true,
        }
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        for (_, timer) in self.state.lock().pending.drain() {
            timer.handle.abort();
        }
    }
}
