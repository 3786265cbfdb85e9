use planner_core::PlannerResult;
use planner_domain::ViewState;
use tokio::sync::watch;

/// Owner of the current [`ViewState`].
///
/// The controller is the only writer. Everyone else holds a receiver from
/// [`ViewStore::subscribe`] and reads snapshots; reading never fails and no
/// setter performs I/O.
pub struct ViewStore {
    tx: watch::Sender<ViewState>,
}

impl ViewStore {
    pub fn new() -> Self {
        Self::with_state(ViewState::default())
    }

    pub fn with_state(state: ViewState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self { tx }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ViewState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }

    /// Apply an infallible change.
    pub fn update<R>(&self, change: impl FnOnce(&mut ViewState) -> R) -> R {
        let mut next = self.snapshot();
        let result = change(&mut next);
        self.replace(next);
        result
    }

    /// Apply a change that may be rejected; on error the state is untouched.
    pub fn try_update<R>(
        &self,
        change: impl FnOnce(&mut ViewState) -> PlannerResult<R>,
    ) -> PlannerResult<R> {
        let mut next = self.snapshot();
        let result = change(&mut next)?;
        self.replace(next);
        Ok(result)
    }

    pub fn replace(&self, state: ViewState) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            tracing::debug!("View state changed: {:?}", self.tx.borrow().route_params());
        }
    }
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new()
    }
}
