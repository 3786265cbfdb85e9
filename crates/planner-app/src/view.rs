use planner_core::PlannerResult;
use planner_domain::{
    CalendarEvent, DailyNote, Password, Project, SearchHit, Task, ViewState,
};
use serde::Serialize;

use crate::autosave::{SaveStatus, SaveTarget};

/// One region of the screen.
///
/// A failed request becomes an inline message for its panel instead of an
/// error for the whole view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready(T),
    Failed(String),
    Hidden,
}

impl<T> Panel<T> {
    pub fn from_result(panel: &str, result: PlannerResult<T>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", panel, e);
                Self::Failed(e.to_string())
            }
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorView {
    pub target: SaveTarget,
    pub content: String,
}

/// Everything a renderer needs to draw the current view.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub state: ViewState,
    pub location: String,
    pub save_status: SaveStatus,
    pub projects: Panel<Vec<Project>>,
    pub tasks: Panel<Vec<Task>>,
    pub search_results: Panel<Vec<SearchHit>>,
    pub passwords: Panel<Vec<Password>>,
    pub daily_notes: Panel<Vec<DailyNote>>,
    pub calendar_events: Panel<Vec<CalendarEvent>>,
    pub editor: Panel<EditorView>,
}

impl ViewSnapshot {
    /// Blank out stored secrets before the snapshot leaves the process.
    pub fn redact_secrets(&mut self) {
        if let Panel::Ready(passwords) = &mut self.passwords {
            for password in passwords.iter_mut() {
                *password = password.redacted();
            }
        }
    }
}
