use parking_lot::RwLock;
use planner_client::PlannerClient;
use planner_core::PlannerResult;
use planner_domain::{DailyNoteId, DailyNoteUpdate, ProjectId, ProjectSelection, TaskId, ViewState};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::debounce::{Debouncer, PendingKeys};

/// Entity whose notes the editor is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SaveTarget {
    Task(TaskId),
    DailyNote(DailyNoteId),
    Project(ProjectId),
}

impl SaveTarget {
    /// Target for the editor in `state`: the selected task, else the selected
    /// daily note inside the journal, else a stored project. The two virtual
    /// projects have no notes of their own.
    pub fn resolve(state: &ViewState) -> Option<Self> {
        if let Some(task) = state.task() {
            return Some(Self::Task(task));
        }
        match state.project() {
            ProjectSelection::Journal => state.daily_note().map(Self::DailyNote),
            ProjectSelection::Project(id) => Some(Self::Project(id)),
            ProjectSelection::AllTasks | ProjectSelection::None => None,
        }
    }
}

impl fmt::Display for SaveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(id) => write!(f, "task {}", id),
            Self::DailyNote(id) => write!(f, "daily note {}", id),
            Self::Project(id) => write!(f, "project {}", id),
        }
    }
}

/// Save indicator shown next to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum SaveStatus {
    Idle,
    Pending,
    Saving,
    Saved,
    Failed(String),
}

impl SaveStatus {
    /// An edit is waiting on its timer or its request.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Pending | Self::Saving)
    }
}

/// Editor content shared between the editor and the autosave timers.
///
/// Timers read the buffer when they fire, never a copy taken when they were
/// armed.
#[derive(Debug, Clone, Default)]
pub struct EditorBuffer {
    content: Arc<RwLock<String>>,
}

impl EditorBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, content: impl Into<String>) {
        *self.content.write() = content.into();
    }

    pub fn content(&self) -> String {
        self.content.read().clone()
    }
}

#[derive(Clone)]
struct Saver {
    client: PlannerClient,
    view: watch::Receiver<ViewState>,
    buffer: EditorBuffer,
    status: Arc<watch::Sender<SaveStatus>>,
    saves_started: Arc<AtomicU64>,
    pending: PendingKeys<SaveTarget>,
    linger: Duration,
}

impl Saver {
    async fn fire(self, armed: SaveTarget) {
        let current = SaveTarget::resolve(&self.view.borrow());
        if current != Some(armed) {
            tracing::warn!(
                "Dropping autosave for {}: editor now shows {:?}",
                armed,
                current
            );
            // Another target may still be waiting on its timer
            if self.pending.is_empty() {
                self.status.send_if_modified(|status| {
                    if *status == SaveStatus::Pending {
                        *status = SaveStatus::Idle;
                        true
                    } else {
                        false
                    }
                });
            }
            return;
        }
        // Failures are already reported through the status channel
        let _ = self.save_now(armed).await;
    }

    async fn save_now(&self, target: SaveTarget) -> PlannerResult<()> {
        let content = self.buffer.content();
        let sequence = self.saves_started.fetch_add(1, Ordering::SeqCst) + 1;
        self.status.send_replace(SaveStatus::Saving);
        tracing::debug!("Saving notes for {} ({} bytes)", target, content.len());

        let result = match target {
            SaveTarget::Task(id) => self.client.save_task_notes(id, &content).await,
            SaveTarget::Project(id) => self.client.save_project_notes(id, &content).await,
            SaveTarget::DailyNote(id) => {
                self.client
                    .update_daily_note(id, &DailyNoteUpdate::content(content))
                    .await
            }
        };

        match &result {
            Ok(()) => {
                tracing::info!("Notes saved for {}", target);
                self.status.send_replace(SaveStatus::Saved);
                self.clear_saved_later(sequence);
            }
            Err(e) => {
                tracing::error!("Autosave failed for {}: {}", target, e);
                self.status.send_replace(SaveStatus::Failed(e.to_string()));
            }
        }
        result
    }

    /// Return the indicator to idle after the linger delay, unless another
    /// save started meanwhile.
    fn clear_saved_later(&self, sequence: u64) {
        let status = Arc::clone(&self.status);
        let saves_started = Arc::clone(&self.saves_started);
        let linger = self.linger;
        tokio::spawn(async move {
            tokio::time::sleep(linger).await;
            if saves_started.load(Ordering::SeqCst) != sequence {
                return;
            }
            status.send_if_modified(|status| {
                if *status == SaveStatus::Saved {
                    *status = SaveStatus::Idle;
                    true
                } else {
                    false
                }
            });
        });
    }
}

/// Debounced saving of editor content to the entity in view.
pub struct AutosavePipeline {
    saver: Saver,
    debouncer: Debouncer<SaveTarget>,
}

impl AutosavePipeline {
    pub fn new(
        client: PlannerClient,
        view: watch::Receiver<ViewState>,
        buffer: EditorBuffer,
        delay: Duration,
        linger: Duration,
    ) -> Self {
        let (status, _rx) = watch::channel(SaveStatus::Idle);
        let debouncer = Debouncer::new(delay);
        Self {
            saver: Saver {
                client,
                view,
                buffer,
                status: Arc::new(status),
                saves_started: Arc::new(AtomicU64::new(0)),
                pending: debouncer.pending(),
                linger,
            },
            debouncer,
        }
    }

    pub fn buffer(&self) -> &EditorBuffer {
        &self.saver.buffer
    }

    pub fn status(&self) -> watch::Receiver<SaveStatus> {
        self.saver.status.subscribe()
    }

    pub fn current_status(&self) -> SaveStatus {
        self.saver.status.borrow().clone()
    }

    pub fn is_pending(&self, target: SaveTarget) -> bool {
        self.debouncer.is_pending(&target)
    }

    /// Record an edit and (re)arm the timer for the entity in view.
    ///
    /// Returns the armed target, or `None` when nothing in view has notes.
    pub fn on_edit(&self, content: impl Into<String>) -> Option<SaveTarget> {
        self.saver.buffer.set(content);
        let target = SaveTarget::resolve(&self.saver.view.borrow());
        let Some(target) = target else {
            tracing::debug!("Edit ignored: no entity with notes in view");
            return None;
        };

        self.saver.status.send_replace(SaveStatus::Pending);
        let saver = self.saver.clone();
        self.debouncer
            .schedule(target, move || async move { saver.fire(target).await });
        Some(target)
    }

    /// Save `target` now if it has a pending timer. Returns whether a save ran.
    pub async fn flush(&self, target: SaveTarget) -> PlannerResult<bool> {
        if !self.debouncer.cancel(&target) {
            return Ok(false);
        }
        tracing::debug!("Flushing pending autosave for {}", target);
        self.saver.save_now(target).await?;
        Ok(true)
    }

    /// Save every target with a pending timer.
    pub async fn flush_pending(&self) -> PlannerResult<()> {
        for target in self.debouncer.pending_keys() {
            self.flush(target).await?;
        }
        Ok(())
    }

    /// Drop pending timers without saving.
    pub fn discard_pending(&self) {
        self.debouncer.cancel_all();
        self.saver.status.send_if_modified(|status| {
            if *status == SaveStatus::Pending {
                *status = SaveStatus::Idle;
                true
            } else {
                false
            }
        });
    }

    /// Wait until no edit is waiting on its timer or request, and return the
    /// final status.
    pub async fn settled(&self) -> SaveStatus {
        let mut rx = self.status();
        let status = match rx.wait_for(|status| !status.is_busy()).await {
            Ok(status) => status.clone(),
            Err(_) => self.current_status(),
        };
        status
    }
}
