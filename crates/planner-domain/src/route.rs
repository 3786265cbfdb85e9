use chrono::NaiveDate;
use serde::Serialize;

use crate::daily_note::DailyNoteId;
use crate::field_update::FieldUpdate;
use crate::password::PasswordId;
use crate::selection::ProjectSelection;
use crate::task::TaskId;

/// Query keys understood by the router, in the order they are written.
pub const KEY_PROJECT: &str = "project";
pub const KEY_TASK: &str = "task";
pub const KEY_CALENDAR: &str = "calendar";
pub const KEY_DATE: &str = "date";
pub const KEY_PASSWORD: &str = "password";
pub const KEY_PASSWORD_ID: &str = "passwordId";
pub const KEY_DAILY_NOTE: &str = "dailyNote";

/// Flat view of the recognised query keys. An absent key is `None`/`false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteParams {
    pub project: Option<ProjectSelection>,
    pub task: Option<TaskId>,
    pub calendar: bool,
    pub date: Option<NaiveDate>,
    pub password: bool,
    pub password_id: Option<PasswordId>,
    pub daily_note: Option<DailyNoteId>,
}

impl RouteParams {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Partial change to the route, merged into the current query by `publish`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteUpdate {
    pub project: FieldUpdate<ProjectSelection>,
    pub task: FieldUpdate<TaskId>,
    pub calendar: FieldUpdate<bool>,
    pub date: FieldUpdate<NaiveDate>,
    pub password: FieldUpdate<bool>,
    pub password_id: FieldUpdate<PasswordId>,
    pub daily_note: FieldUpdate<DailyNoteId>,
}

impl RouteUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(mut self, selection: ProjectSelection) -> Self {
        self.project = match selection {
            ProjectSelection::None => FieldUpdate::Clear,
            other => FieldUpdate::Set(other),
        };
        self
    }

    pub fn task(mut self, task: Option<TaskId>) -> Self {
        self.task = task.into();
        self
    }

    pub fn calendar(mut self, open: bool, date: Option<NaiveDate>) -> Self {
        self.calendar = FieldUpdate::Set(open);
        self.date = if open { date.into() } else { FieldUpdate::Clear };
        self
    }

    pub fn password(mut self, mode: bool, password_id: Option<PasswordId>) -> Self {
        self.password = FieldUpdate::Set(mode);
        self.password_id = if mode {
            password_id.into()
        } else {
            FieldUpdate::Clear
        };
        self
    }

    pub fn daily_note(mut self, note: Option<DailyNoteId>) -> Self {
        self.daily_note = note.into();
        self
    }

    /// Update touching only the keys that differ between two routes.
    pub fn diff(before: &RouteParams, after: &RouteParams) -> Self {
        fn key<T: Clone + PartialEq>(before: &Option<T>, after: &Option<T>) -> FieldUpdate<T> {
            if before == after {
                FieldUpdate::NoChange
            } else {
                after.clone().into()
            }
        }
        fn flag(before: bool, after: bool) -> FieldUpdate<bool> {
            if before == after {
                FieldUpdate::NoChange
            } else {
                FieldUpdate::Set(after)
            }
        }

        Self {
            project: key(&before.project, &after.project),
            task: key(&before.task, &after.task),
            calendar: flag(before.calendar, after.calendar),
            date: key(&before.date, &after.date),
            password: flag(before.password, after.password),
            password_id: key(&before.password_id, &after.password_id),
            daily_note: key(&before.daily_note, &after.daily_note),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `params`; cleared and false keys disappear.
    pub fn apply_to(self, params: &mut RouteParams) {
        self.project.apply_to(&mut params.project);
        self.task.apply_to(&mut params.task);
        self.calendar.apply_to_flag(&mut params.calendar);
        self.date.apply_to(&mut params.date);
        self.password.apply_to_flag(&mut params.password);
        self.password_id.apply_to(&mut params.password_id);
        self.daily_note.apply_to(&mut params.daily_note);
    }
}
