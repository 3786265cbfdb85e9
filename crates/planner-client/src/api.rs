use chrono::NaiveDate;
use planner_core::{PlannerError, PlannerResult};
use planner_domain::{
    AppVersion, CalendarEvent, CalendarEventDraft, CalendarEventId, CalendarEventUpdate,
    DailyNote, DailyNoteDraft, DailyNoteId, DailyNoteUpdate, NoteContent, Password,
    PasswordDraft, PasswordId, PasswordUpdate, PomodoroState, Project, ProjectDraft, ProjectId,
    ProjectOrder, ProjectSelection, ProjectUpdate, SearchHit, ServerInfo, Task, TaskDraft,
    TaskId, TaskUpdate, UiStateValue,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::request::ApiRequest;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedId {
    pub id: i64,
}

#[derive(Deserialize)]
struct PomodoroSaved {
    state: PomodoroState,
}

/// Typed wrapper over the planner server endpoints.
#[derive(Clone)]
pub struct PlannerClient {
    transport: Arc<dyn Transport>,
}

impl PlannerClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> PlannerResult<T> {
        let path = request.clean_path().to_string();
        let value = self.transport.execute(request).await?;
        serde_json::from_value(value)
            .map_err(|e| PlannerError::Serialization(format!("{}: {}", path, e)))
    }

    /// For endpoints answering `{"success": true}`.
    async fn call_unit(&self, request: ApiRequest) -> PlannerResult<()> {
        self.transport.execute(request).await.map(|_| ())
    }

    // Projects

    pub async fn list_projects(&self) -> PlannerResult<Vec<Project>> {
        self.call(ApiRequest::get("api/projects")).await
    }

    pub async fn create_project(&self, draft: &ProjectDraft) -> PlannerResult<Project> {
        self.call(ApiRequest::post("api/projects").json(draft)?).await
    }

    pub async fn update_project(&self, id: ProjectId, update: &ProjectUpdate) -> PlannerResult<()> {
        self.call_unit(ApiRequest::put(format!("api/projects/{}", id)).json(update)?)
            .await
    }

    pub async fn reorder_projects(&self, orders: &[ProjectOrder]) -> PlannerResult<()> {
        if orders.is_empty() {
            return Err(PlannerError::Validation("orders required".to_string()));
        }
        self.call_unit(ApiRequest::put("api/projects/order").json(&json!({ "orders": orders }))?)
            .await
    }

    pub async fn delete_project(&self, id: ProjectId) -> PlannerResult<()> {
        self.call_unit(ApiRequest::delete(format!("api/projects/{}", id)))
            .await
    }

    // Tasks

    /// `AllTasks` lists every project's tasks; the journal has none.
    pub async fn list_tasks(
        &self,
        selection: ProjectSelection,
        include_completed: bool,
    ) -> PlannerResult<Vec<Task>> {
        let raw = match selection {
            ProjectSelection::AllTasks | ProjectSelection::Project(_) => selection.to_raw(),
            ProjectSelection::Journal | ProjectSelection::None => None,
        };
        let Some(raw) = raw else {
            return Ok(Vec::new());
        };
        self.call(
            ApiRequest::get(format!("api/projects/{}/tasks", raw))
                .query("include_completed", include_completed),
        )
        .await
    }

    pub async fn create_task(&self, project: ProjectId, draft: &TaskDraft) -> PlannerResult<CreatedId> {
        self.call(ApiRequest::post(format!("api/projects/{}/tasks", project)).json(draft)?)
            .await
    }

    pub async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> PlannerResult<()> {
        self.call_unit(ApiRequest::put(format!("api/tasks/{}", id)).json(update)?)
            .await
    }

    pub async fn delete_task(&self, id: TaskId) -> PlannerResult<()> {
        self.call_unit(ApiRequest::delete(format!("api/tasks/{}", id)))
            .await
    }

    pub async fn search_tasks(&self, query: &str) -> PlannerResult<Vec<SearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.call(ApiRequest::get("api/search/tasks").query("q", query))
            .await
    }

    // Notes

    pub async fn project_notes(&self, project: ProjectId) -> PlannerResult<NoteContent> {
        self.call(ApiRequest::get(format!("api/projects/{}/notes", project)))
            .await
    }

    pub async fn save_project_notes(&self, project: ProjectId, content: &str) -> PlannerResult<()> {
        self.call_unit(
            ApiRequest::post(format!("api/projects/{}/notes", project))
                .json(&NoteContent::new(content))?,
        )
        .await
    }

    pub async fn task_notes(&self, task: TaskId) -> PlannerResult<NoteContent> {
        self.call(ApiRequest::get(format!("api/tasks/{}/notes", task)))
            .await
    }

    pub async fn save_task_notes(&self, task: TaskId, content: &str) -> PlannerResult<()> {
        self.call_unit(
            ApiRequest::post(format!("api/tasks/{}/notes", task)).json(&NoteContent::new(content))?,
        )
        .await
    }

    // Daily notes

    pub async fn list_daily_notes(&self) -> PlannerResult<Vec<DailyNote>> {
        self.call(ApiRequest::get("api/daily-notes")).await
    }

    pub async fn daily_note(&self, id: DailyNoteId) -> PlannerResult<DailyNote> {
        self.call(ApiRequest::get(format!("api/daily-notes/{}", id)))
            .await
            .map_err(|e| match e {
                PlannerError::Status { status: 404, .. } => {
                    PlannerError::NotFound(format!("daily note {}", id))
                }
                other => other,
            })
    }

    pub async fn create_daily_note(&self, draft: &DailyNoteDraft) -> PlannerResult<DailyNote> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(PlannerError::Validation("note title cannot be empty".to_string()));
        }
        let draft = DailyNoteDraft {
            title: title.to_string(),
            content: draft.content.clone(),
        };
        self.call(ApiRequest::post("api/daily-notes").json(&draft)?)
            .await
    }

    pub async fn update_daily_note(
        &self,
        id: DailyNoteId,
        update: &DailyNoteUpdate,
    ) -> PlannerResult<()> {
        self.call_unit(ApiRequest::put(format!("api/daily-notes/{}", id)).json(update)?)
            .await
    }

    pub async fn delete_daily_note(&self, id: DailyNoteId) -> PlannerResult<()> {
        self.call_unit(ApiRequest::delete(format!("api/daily-notes/{}", id)))
            .await
    }

    // Passwords

    /// Both virtual projects list the whole vault.
    pub async fn list_passwords(&self, selection: ProjectSelection) -> PlannerResult<Vec<Password>> {
        let Some(raw) = selection.to_raw() else {
            return Ok(Vec::new());
        };
        self.call(ApiRequest::get(format!("api/projects/{}/passwords", raw)))
            .await
    }

    pub async fn password(&self, id: PasswordId) -> PlannerResult<Password> {
        self.call(ApiRequest::get(format!("api/passwords/{}", id)))
            .await
            .map_err(|e| match e {
                PlannerError::Status { status: 404, .. } => {
                    PlannerError::NotFound(format!("password {}", id))
                }
                other => other,
            })
    }

    pub async fn create_password(
        &self,
        project: ProjectId,
        draft: &PasswordDraft,
    ) -> PlannerResult<CreatedId> {
        self.call(ApiRequest::post(format!("api/projects/{}/passwords", project)).json(draft)?)
            .await
    }

    pub async fn update_password(&self, id: PasswordId, update: &PasswordUpdate) -> PlannerResult<()> {
        self.call_unit(ApiRequest::put(format!("api/passwords/{}", id)).json(update)?)
            .await
    }

    pub async fn delete_password(&self, id: PasswordId) -> PlannerResult<()> {
        self.call_unit(ApiRequest::delete(format!("api/passwords/{}", id)))
            .await
    }

    // Calendar

    pub async fn calendar_events(&self, date: Option<NaiveDate>) -> PlannerResult<Vec<CalendarEvent>> {
        let mut request = ApiRequest::get("api/calendar/events");
        if let Some(date) = date {
            request = request.query("date", date.format("%Y-%m-%d"));
        }
        self.call(request).await
    }

    pub async fn create_calendar_event(&self, draft: &CalendarEventDraft) -> PlannerResult<CreatedId> {
        self.call(ApiRequest::post("api/calendar/events").json(draft)?)
            .await
    }

    pub async fn update_calendar_event(
        &self,
        id: CalendarEventId,
        update: &CalendarEventUpdate,
    ) -> PlannerResult<()> {
        self.call_unit(ApiRequest::put(format!("api/calendar/events/{}", id)).json(update)?)
            .await
    }

    pub async fn delete_calendar_event(&self, id: CalendarEventId) -> PlannerResult<()> {
        self.call_unit(ApiRequest::delete(format!("api/calendar/events/{}", id)))
            .await
    }

    // UI state

    pub async fn ui_state(&self, key: &str) -> PlannerResult<UiStateValue> {
        self.call(ApiRequest::get("api/ui-state").query("key", key))
            .await
    }

    pub async fn set_ui_state(&self, key: &str, value: &UiStateValue) -> PlannerResult<()> {
        self.call_unit(
            ApiRequest::post("api/ui-state").json(&json!({ "key": key, "value": value.value }))?,
        )
        .await
    }

    // Server metadata

    pub async fn app_version(&self) -> PlannerResult<AppVersion> {
        self.call(ApiRequest::get("api/app-version")).await
    }

    pub async fn server_info(&self) -> PlannerResult<ServerInfo> {
        self.call(ApiRequest::get("api/server-info")).await
    }

    // Pomodoro

    pub async fn pomodoro_state(&self) -> PlannerResult<PomodoroState> {
        self.call(ApiRequest::get("api/pomodoro/state")).await
    }

    pub async fn save_pomodoro_state(&self, state: &PomodoroState) -> PlannerResult<PomodoroState> {
        let saved: PomodoroSaved = self
            .call(ApiRequest::post("api/pomodoro/state").json(state)?)
            .await?;
        Ok(saved.state)
    }

    // Statistics, passed through as opaque JSON

    pub async fn statistics(&self) -> PlannerResult<Value> {
        self.call(ApiRequest::get("api/statistics")).await
    }

    pub async fn detailed_statistics(&self) -> PlannerResult<Value> {
        self.call(ApiRequest::get("api/statistics/detailed")).await
    }

    pub async fn statistics_by_type(&self, kind: &str) -> PlannerResult<Value> {
        self.call(ApiRequest::get(format!("api/statistics/{}", kind)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;
    use crate::transport::MockTransport;
    use mockall::predicate::function;

    fn client(mock: MockTransport) -> PlannerClient {
        PlannerClient::new(Arc::new(mock))
    }

    /// Expect exactly one request with this method, path and body.
    fn expect_one(
        method: Method,
        path: &'static str,
        body: Option<Value>,
        reply: Value,
    ) -> MockTransport {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .with(function(move |r: &ApiRequest| {
                r.method == method && r.path == path && r.body == body
            }))
            .times(1)
            .returning(move |_| Ok(reply.clone()));
        mock
    }

    fn ok() -> Value {
        json!({"success": true})
    }

    #[tokio::test]
    async fn test_list_tasks_passes_include_completed() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .with(function(|r: &ApiRequest| {
                r.method == Method::Get
                    && r.path == "api/projects/0/tasks"
                    && r.query == vec![("include_completed".to_string(), "false".to_string())]
            }))
            .times(1)
            .returning(|_| Ok(json!([{"id": 1, "title": "Pay rent", "project_id": 2}])));

        let tasks = client(mock)
            .list_tasks(ProjectSelection::AllTasks, false)
            .await
            .unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].project_id, Some(2));
    }

    #[tokio::test]
    async fn test_journal_has_no_tasks() {
        let mut mock = MockTransport::new();
        mock.expect_execute().never();

        let tasks = client(mock)
            .list_tasks(ProjectSelection::Journal, true)
            .await
            .unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_save_task_notes_posts_content() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .with(function(|r: &ApiRequest| {
                r.method == Method::Post
                    && r.path == "api/tasks/7/notes"
                    && r.body == Some(json!({"content": "<p>final</p>"}))
            }))
            .times(1)
            .returning(|_| Ok(json!({"success": true})));

        client(mock)
            .save_task_notes(7, "<p>final</p>")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_search_skips_request() {
        let mut mock = MockTransport::new();
        mock.expect_execute().never();

        let hits = client(mock).search_tasks("   ").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_missing_daily_note_maps_to_not_found() {
        let mut mock = MockTransport::new();
        mock.expect_execute().returning(|_| {
            Err(PlannerError::Status {
                status: 404,
                path: "api/daily-notes/9".to_string(),
            })
        });

        let err = client(mock).daily_note(9).await.unwrap_err();
        assert!(matches!(err, PlannerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_status_errors_propagate() {
        let mut mock = MockTransport::new();
        mock.expect_execute().returning(|_| {
            Err(PlannerError::Status {
                status: 500,
                path: "api/projects".to_string(),
            })
        });

        let err = client(mock).list_projects().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_ui_state_round_trip_shape() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .with(function(|r: &ApiRequest| {
                r.method == Method::Post
                    && r.body == Some(json!({"key": "projects_panel_collapsed", "value": "1"}))
            }))
            .times(1)
            .returning(|_| Ok(json!({"success": true})));

        client(mock)
            .set_ui_state(
                planner_domain::PROJECTS_PANEL_COLLAPSED,
                &UiStateValue::from_flag(true),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_pomodoro_save_returns_server_state() {
        let mut mock = MockTransport::new();
        mock.expect_execute().returning(|_| {
            Ok(json!({
                "success": true,
                "state": {"timeLeft": 1200, "state": "work", "workCount": 1, "startTime": 5}
            }))
        });

        let saved = client(mock)
            .save_pomodoro_state(&PomodoroState::default())
            .await
            .unwrap();
        assert_eq!(saved.time_left, 1200);
        assert_eq!(saved.start_time, Some(5));
    }

    #[tokio::test]
    async fn test_blank_daily_note_title_rejected() {
        let mut mock = MockTransport::new();
        mock.expect_execute().never();

        let err = client(mock)
            .create_daily_note(&DailyNoteDraft::titled("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::Validation(_)));
    }

    mod project_endpoints {
        use super::*;

        #[tokio::test]
        async fn test_create_project_returns_record() {
            let mock = expect_one(
                Method::Post,
                "api/projects",
                Some(json!({"name": "Garden", "monthly_price": 0.0, "is_subscription": false})),
                json!({"id": 11, "name": "Garden"}),
            );
            let project = client(mock)
                .create_project(&ProjectDraft::named("Garden"))
                .await
                .unwrap();
            assert_eq!(project.id, 11);
            assert_eq!(project.name, "Garden");
        }

        #[tokio::test]
        async fn test_update_project_sends_only_set_fields() {
            let mock = expect_one(
                Method::Put,
                "api/projects/11",
                Some(json!({"name": "Allotment", "sort_order": 2})),
                ok(),
            );
            let update = ProjectUpdate {
                name: Some("Allotment".to_string()),
                sort_order: Some(2),
                ..Default::default()
            };
            client(mock).update_project(11, &update).await.unwrap();
        }

        #[tokio::test]
        async fn test_reorder_projects_wraps_orders() {
            let mock = expect_one(
                Method::Put,
                "api/projects/order",
                Some(json!({"orders": [{"id": 4, "order": 0}, {"id": 2, "order": 1}]})),
                ok(),
            );
            let orders = [ProjectOrder { id: 4, order: 0 }, ProjectOrder { id: 2, order: 1 }];
            client(mock).reorder_projects(&orders).await.unwrap();
        }

        #[tokio::test]
        async fn test_reorder_without_orders_is_rejected() {
            let mut mock = MockTransport::new();
            mock.expect_execute().never();
            let err = client(mock).reorder_projects(&[]).await.unwrap_err();
            assert!(matches!(err, PlannerError::Validation(_)));
        }

        #[tokio::test]
        async fn test_delete_project() {
            let mock = expect_one(Method::Delete, "api/projects/11", None, ok());
            client(mock).delete_project(11).await.unwrap();
        }
    }

    mod task_endpoints {
        use super::*;

        #[tokio::test]
        async fn test_create_task_in_project() {
            let mock = expect_one(
                Method::Post,
                "api/projects/5/tasks",
                Some(json!({
                    "title": "Renew passport",
                    "description": "",
                    "deadline": "2026-11-01",
                    "price": 0.0
                })),
                json!({"id": 77}),
            );
            let draft = TaskDraft {
                title: "Renew passport".to_string(),
                deadline: Some("2026-11-01".to_string()),
                ..Default::default()
            };
            let created = client(mock).create_task(5, &draft).await.unwrap();
            assert_eq!(created, CreatedId { id: 77 });
        }

        #[tokio::test]
        async fn test_complete_task() {
            let mock = expect_one(
                Method::Put,
                "api/tasks/77",
                Some(json!({"completed": true})),
                ok(),
            );
            let update = TaskUpdate {
                completed: Some(true),
                ..Default::default()
            };
            client(mock).update_task(77, &update).await.unwrap();
        }

        #[tokio::test]
        async fn test_delete_task() {
            let mock = expect_one(Method::Delete, "api/tasks/77", None, ok());
            client(mock).delete_task(77).await.unwrap();
        }

        #[tokio::test]
        async fn test_search_sends_trimmed_query() {
            let mut mock = MockTransport::new();
            mock.expect_execute()
                .with(function(|r: &ApiRequest| {
                    r.method == Method::Get
                        && r.path == "api/search/tasks"
                        && r.query == vec![("q".to_string(), "rent".to_string())]
                }))
                .times(1)
                .returning(|_| {
                    Ok(json!([{"id": 3, "project_id": 2, "title": "Pay rent"}]))
                });

            let hits = client(mock).search_tasks("  rent ").await.unwrap();
            assert_eq!(hits[0].project_id, 2);
        }
    }

    mod daily_note_endpoints {
        use super::*;

        #[tokio::test]
        async fn test_create_daily_note_trims_title() {
            let mock = expect_one(
                Method::Post,
                "api/daily-notes",
                Some(json!({"title": "Monday", "content": ""})),
                json!({"id": 4, "title": "Monday"}),
            );
            let note = client(mock)
                .create_daily_note(&DailyNoteDraft::titled("  Monday "))
                .await
                .unwrap();
            assert_eq!(note.id, 4);
        }

        #[tokio::test]
        async fn test_delete_daily_note() {
            let mock = expect_one(Method::Delete, "api/daily-notes/4", None, ok());
            client(mock).delete_daily_note(4).await.unwrap();
        }
    }

    mod password_endpoints {
        use super::*;

        #[tokio::test]
        async fn test_password_by_id() {
            let mock = expect_one(
                Method::Get,
                "api/passwords/6",
                None,
                json!({"id": 6, "name": "Router", "type": "website", "password": "hunter2"}),
            );
            let entry = client(mock).password(6).await.unwrap();
            assert_eq!(entry.name, "Router");
            assert_eq!(entry.password, "hunter2");
        }

        #[tokio::test]
        async fn test_missing_password_maps_to_not_found() {
            let mut mock = MockTransport::new();
            mock.expect_execute().returning(|_| {
                Err(PlannerError::Status {
                    status: 404,
                    path: "api/passwords/6".to_string(),
                })
            });
            let err = client(mock).password(6).await.unwrap_err();
            assert!(matches!(err, PlannerError::NotFound(_)));
        }

        #[tokio::test]
        async fn test_create_password_in_project() {
            let mock = expect_one(
                Method::Post,
                "api/projects/5/passwords",
                Some(json!({
                    "name": "NAS",
                    "username": "admin",
                    "password": "s3cret",
                    "url": "",
                    "notes": ""
                })),
                json!({"id": 8}),
            );
            let draft = PasswordDraft {
                name: "NAS".to_string(),
                username: "admin".to_string(),
                password: "s3cret".to_string(),
                ..Default::default()
            };
            let created = client(mock).create_password(5, &draft).await.unwrap();
            assert_eq!(created.id, 8);
        }

        #[tokio::test]
        async fn test_update_password_renames_kind_key() {
            let mock = expect_one(
                Method::Put,
                "api/passwords/8",
                Some(json!({"type": "ssh", "url": "nas.lan"})),
                ok(),
            );
            let update = PasswordUpdate {
                kind: Some(planner_domain::PasswordKind::Ssh),
                url: Some("nas.lan".to_string()),
                ..Default::default()
            };
            client(mock).update_password(8, &update).await.unwrap();
        }

        #[tokio::test]
        async fn test_delete_password() {
            let mock = expect_one(Method::Delete, "api/passwords/8", None, ok());
            client(mock).delete_password(8).await.unwrap();
        }
    }

    mod calendar_endpoints {
        use super::*;

        fn day() -> NaiveDate {
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
        }

        #[tokio::test]
        async fn test_create_calendar_event() {
            let mock = expect_one(
                Method::Post,
                "api/calendar/events",
                Some(json!({
                    "title": "Dentist",
                    "event_date": "2026-10-16",
                    "description": "",
                    "event_time": "09:30"
                })),
                json!({"id": 21}),
            );
            let draft = CalendarEventDraft {
                title: "Dentist".to_string(),
                event_date: day(),
                description: String::new(),
                event_time: Some("09:30".to_string()),
            };
            let created = client(mock).create_calendar_event(&draft).await.unwrap();
            assert_eq!(created.id, 21);
        }

        #[tokio::test]
        async fn test_move_calendar_event() {
            let mock = expect_one(
                Method::Put,
                "api/calendar/events/21",
                Some(json!({"event_date": "2026-10-16"})),
                ok(),
            );
            let update = CalendarEventUpdate {
                event_date: Some(day()),
                ..Default::default()
            };
            client(mock).update_calendar_event(21, &update).await.unwrap();
        }

        #[tokio::test]
        async fn test_delete_calendar_event() {
            let mock = expect_one(Method::Delete, "api/calendar/events/21", None, ok());
            client(mock).delete_calendar_event(21).await.unwrap();
        }

        #[tokio::test]
        async fn test_events_filtered_by_date() {
            let mut mock = MockTransport::new();
            mock.expect_execute()
                .with(function(|r: &ApiRequest| {
                    r.path == "api/calendar/events"
                        && r.query == vec![("date".to_string(), "2026-10-16".to_string())]
                }))
                .times(1)
                .returning(|_| Ok(json!([])));
            let events = client(mock).calendar_events(Some(day())).await.unwrap();
            assert!(events.is_empty());
        }
    }
}
