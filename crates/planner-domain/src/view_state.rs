use chrono::NaiveDate;
use planner_core::{PlannerError, PlannerResult};
use serde::Serialize;

use crate::daily_note::DailyNoteId;
use crate::password::PasswordId;
use crate::route::RouteParams;
use crate::selection::ProjectSelection;
use crate::task::TaskId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CalendarView {
    #[default]
    Closed,
    Open { date: Option<NaiveDate> },
}

impl CalendarView {
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn date(self) -> Option<NaiveDate> {
        match self {
            Self::Open { date } => date,
            Self::Closed => None,
        }
    }
}

/// What the client currently shows.
///
/// Fields are only changed through the methods below, which keep the
/// selections consistent: a selected task never coexists with password mode or
/// a selected password, and daily notes and the calendar only exist inside the
/// journal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    project: ProjectSelection,
    task: Option<TaskId>,
    password: Option<PasswordId>,
    daily_note: Option<DailyNoteId>,
    calendar: CalendarView,
    search_mode: bool,
    password_mode: bool,
    panel_collapsed: bool,
    show_completed: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&self) -> ProjectSelection {
        self.project
    }

    pub fn task(&self) -> Option<TaskId> {
        self.task
    }

    pub fn password(&self) -> Option<PasswordId> {
        self.password
    }

    pub fn daily_note(&self) -> Option<DailyNoteId> {
        self.daily_note
    }

    pub fn calendar(&self) -> CalendarView {
        self.calendar
    }

    pub fn is_search_mode(&self) -> bool {
        self.search_mode
    }

    pub fn is_password_mode(&self) -> bool {
        self.password_mode
    }

    pub fn is_panel_collapsed(&self) -> bool {
        self.panel_collapsed
    }

    pub fn show_completed(&self) -> bool {
        self.show_completed
    }

    pub fn select_project(&mut self, selection: ProjectSelection) {
        self.project = selection;
        self.task = None;
        self.password = None;
        self.daily_note = None;
        self.search_mode = false;
        if !selection.is_journal() {
            self.calendar = CalendarView::Closed;
        }
    }

    pub fn select_task(&mut self, task: Option<TaskId>) {
        self.task = task;
        if task.is_some() {
            self.password_mode = false;
            self.password = None;
            self.daily_note = None;
        }
    }

    pub fn set_password_mode(&mut self, enabled: bool) {
        self.password_mode = enabled;
        self.task = None;
        self.password = None;
    }

    /// Selecting a password implies password mode.
    pub fn select_password(&mut self, password: Option<PasswordId>) {
        if password.is_some() {
            self.password_mode = true;
            self.task = None;
        }
        self.password = password;
    }

    pub fn select_daily_note(&mut self, note: Option<DailyNoteId>) -> PlannerResult<()> {
        if note.is_some() && !self.project.is_journal() {
            return Err(PlannerError::Validation(format!(
                "daily notes can only be selected in the journal, current selection is {}",
                self.project
            )));
        }
        self.daily_note = note;
        if note.is_some() {
            self.task = None;
        }
        Ok(())
    }

    pub fn open_calendar(&mut self, date: Option<NaiveDate>) -> PlannerResult<()> {
        if !self.project.is_journal() {
            return Err(PlannerError::Validation(format!(
                "the calendar lives in the journal, current selection is {}",
                self.project
            )));
        }
        self.calendar = CalendarView::Open { date };
        Ok(())
    }

    pub fn close_calendar(&mut self) {
        self.calendar = CalendarView::Closed;
    }

    pub fn set_search_mode(&mut self, enabled: bool) {
        self.search_mode = enabled;
        if enabled {
            self.task = None;
        }
    }

    pub fn set_panel_collapsed(&mut self, collapsed: bool) {
        self.panel_collapsed = collapsed;
    }

    pub fn set_show_completed(&mut self, show: bool) {
        self.show_completed = show;
    }

    /// True when no selection contradicts another.
    pub fn is_consistent(&self) -> bool {
        let task_excludes_passwords =
            self.task.is_none() || (!self.password_mode && self.password.is_none());
        let password_needs_mode = self.password.is_none() || self.password_mode;
        let journal_only = self.project.is_journal()
            || (self.daily_note.is_none() && !self.calendar.is_open());
        task_excludes_passwords && password_needs_mode && journal_only
    }

    /// Route describing this state.
    pub fn route_params(&self) -> RouteParams {
        RouteParams {
            project: match self.project {
                ProjectSelection::None => None,
                other => Some(other),
            },
            task: self.task,
            calendar: self.calendar.is_open(),
            date: self.calendar.date(),
            password: self.password_mode,
            password_id: self.password,
            daily_note: self.daily_note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selecting_project_clears_entity_selections() {
        let mut state = ViewState::new();
        state.select_project(ProjectSelection::Project(5));
        state.select_task(Some(42));
        state.set_search_mode(true);

        state.select_project(ProjectSelection::Project(7));
        assert_eq!(state.task(), None);
        assert!(!state.is_search_mode());
        assert_eq!(state.project(), ProjectSelection::Project(7));
    }

    #[test]
    fn test_task_and_password_mode_are_exclusive() {
        let mut state = ViewState::new();
        state.select_project(ProjectSelection::Project(5));
        state.select_task(Some(42));
        state.set_password_mode(true);
        assert_eq!(state.task(), None);
        assert!(state.is_consistent());

        state.select_password(Some(3));
        state.select_task(Some(8));
        assert!(!state.is_password_mode());
        assert_eq!(state.password(), None);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_password_toggle_preserves_project() {
        let mut state = ViewState::new();
        state.select_project(ProjectSelection::Project(5));
        let before = state.clone();

        state.set_password_mode(true);
        state.set_password_mode(false);
        assert_eq!(state, before);
    }

    #[test]
    fn test_daily_note_requires_journal() {
        let mut state = ViewState::new();
        state.select_project(ProjectSelection::AllTasks);
        assert!(state.select_daily_note(Some(4)).is_err());

        state.select_project(ProjectSelection::Journal);
        state.select_daily_note(Some(4)).unwrap();
        assert_eq!(state.daily_note(), Some(4));
    }

    #[test]
    fn test_leaving_journal_closes_calendar() {
        let mut state = ViewState::new();
        state.select_project(ProjectSelection::Journal);
        state
            .open_calendar(NaiveDate::from_ymd_opt(2026, 10, 16))
            .unwrap();
        assert!(state.calendar().is_open());

        state.select_project(ProjectSelection::Project(1));
        assert_eq!(state.calendar(), CalendarView::Closed);
    }

    #[test]
    fn test_search_mode_clears_task() {
        let mut state = ViewState::new();
        state.select_project(ProjectSelection::AllTasks);
        state.select_task(Some(1));
        state.set_search_mode(true);
        assert_eq!(state.task(), None);
    }

    #[test]
    fn test_route_params_mirror_state() {
        let mut state = ViewState::new();
        state.select_project(ProjectSelection::Project(5));
        state.select_task(Some(42));

        let params = state.route_params();
        assert_eq!(params.project, Some(ProjectSelection::Project(5)));
        assert_eq!(params.task, Some(42));
        assert!(!params.password);
        assert!(!params.calendar);
    }
}
