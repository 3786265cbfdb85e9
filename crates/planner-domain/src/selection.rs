use serde::{Deserialize, Serialize};
use std::fmt;

use crate::project::ProjectId;

const ALL_TASKS_ID: ProjectId = 0;
const JOURNAL_ID: ProjectId = -1;

/// What the projects panel has selected.
///
/// The server and the URL encode the two virtual projects as reserved ids:
/// `0` for "all tasks" and `-1` for the daily-notes journal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ProjectSelection {
    #[default]
    None,
    AllTasks,
    Journal,
    Project(ProjectId),
}

impl ProjectSelection {
    /// Decode a raw id; other negative ids are not valid selections.
    pub fn from_raw(raw: ProjectId) -> Option<Self> {
        match raw {
            ALL_TASKS_ID => Some(Self::AllTasks),
            JOURNAL_ID => Some(Self::Journal),
            id if id > 0 => Some(Self::Project(id)),
            _ => None,
        }
    }

    pub fn to_raw(self) -> Option<ProjectId> {
        match self {
            Self::None => None,
            Self::AllTasks => Some(ALL_TASKS_ID),
            Self::Journal => Some(JOURNAL_ID),
            Self::Project(id) => Some(id),
        }
    }

    pub fn is_selected(self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn is_journal(self) -> bool {
        matches!(self, Self::Journal)
    }

    /// Id of a stored project, if the selection is one.
    pub fn project_id(self) -> Option<ProjectId> {
        match self {
            Self::Project(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::AllTasks => write!(f, "all tasks"),
            Self::Journal => write!(f, "journal"),
            Self::Project(id) => write!(f, "project {}", id),
        }
    }
}
