pub mod calendar;
pub mod daily_note;
pub mod field_update;
pub mod note;
pub mod password;
pub mod pomodoro;
pub mod project;
pub mod route;
pub mod selection;
pub mod server;
pub mod task;
pub mod ui_state;
pub mod view_state;

pub use calendar::{CalendarEvent, CalendarEventDraft, CalendarEventId, CalendarEventUpdate};
pub use daily_note::{DailyNote, DailyNoteDraft, DailyNoteId, DailyNoteUpdate};
pub use field_update::FieldUpdate;
pub use note::NoteContent;
pub use password::{Password, PasswordDraft, PasswordId, PasswordKind, PasswordUpdate};
pub use pomodoro::{PomodoroPhase, PomodoroState};
pub use project::{Project, ProjectDraft, ProjectId, ProjectOrder, ProjectUpdate};
pub use route::{RouteParams, RouteUpdate};
pub use selection::ProjectSelection;
pub use server::{AppVersion, ServerInfo};
pub use task::{SearchHit, Task, TaskDraft, TaskId, TaskUpdate};
pub use ui_state::{UiStateValue, PROJECTS_PANEL_COLLAPSED};
pub use view_state::{CalendarView, ViewState};
