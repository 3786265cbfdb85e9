use chrono::NaiveDate;
use parking_lot::Mutex;
use planner_client::PlannerClient;
use planner_core::PlannerResult;
use planner_domain::{
    DailyNoteId, PasswordId, ProjectSelection, RouteUpdate, TaskId, UiStateValue, ViewState,
    PROJECTS_PANEL_COLLAPSED,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::autosave::{AutosavePipeline, EditorBuffer, SaveTarget};
use crate::router::{apply_route, History, Router};
use crate::state::ViewStore;
use crate::view::{EditorView, Panel, ViewSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub autosave_delay: Duration,
    pub indicator_linger: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            autosave_delay: Duration::from_millis(1000),
            indicator_linger: Duration::from_millis(2000),
        }
    }
}

/// Drives the view: applies user actions and navigation to the state store,
/// keeps the route in step and feeds edits to autosave.
///
/// Every interactive operation follows the same path: flush the pending save
/// of the entity being left, apply the change, publish the changed route
/// keys. Navigation (`restore`, `back`, `forward`) applies the route without
/// publishing. Call [`Controller::load_view`] afterwards to fetch what the
/// new state shows.
pub struct Controller {
    client: PlannerClient,
    store: ViewStore,
    router: Router,
    autosave: AutosavePipeline,
    search_query: Mutex<String>,
}

impl Controller {
    pub fn new(client: PlannerClient, history: Arc<dyn History>, options: ControllerOptions) -> Self {
        let store = ViewStore::new();
        let autosave = AutosavePipeline::new(
            client.clone(),
            store.subscribe(),
            EditorBuffer::new(),
            options.autosave_delay,
            options.indicator_linger,
        );
        Self {
            client,
            store,
            router: Router::new(history),
            autosave,
            search_query: Mutex::new(String::new()),
        }
    }

    pub fn state(&self) -> ViewState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.store.subscribe()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn autosave(&self) -> &AutosavePipeline {
        &self.autosave
    }

    pub fn client(&self) -> &PlannerClient {
        &self.client
    }

    pub fn search_query(&self) -> String {
        self.search_query.lock().clone()
    }

    /// Replace the state, saving the editor's pending edits first when the
    /// notes target changes.
    async fn switch_to(&self, before: &ViewState, next: ViewState) {
        let leaving = SaveTarget::resolve(before);
        if leaving != SaveTarget::resolve(&next) {
            if let Some(target) = leaving {
                if let Err(e) = self.autosave.flush(target).await {
                    tracing::warn!("Pending notes for {} were not saved: {}", target, e);
                }
            }
        }
        self.store.replace(next);
    }

    /// Update that makes the current route describe `next` exactly, so keys
    /// the state never took up are cleared rather than left to resurface.
    ///
    /// An unchanged project keeps its current spelling, which lets an absent
    /// `project` key stay absent while All Tasks is in view.
    fn route_update_for(&self, before: &ViewState, next: &ViewState) -> RouteUpdate {
        let current = self.router.current_params();
        let mut target = next.route_params();
        if before.project() == next.project() {
            target.project = current.project;
        }
        RouteUpdate::diff(&current, &target)
    }

    async fn transition(
        &self,
        change: impl FnOnce(&mut ViewState) -> PlannerResult<()>,
    ) -> PlannerResult<()> {
        let before = self.store.snapshot();
        let mut next = before.clone();
        change(&mut next)?;

        let update = self.route_update_for(&before, &next);
        self.switch_to(&before, next).await;
        if !update.is_empty() {
            self.router.publish(update).await?;
        }
        Ok(())
    }

    pub async fn select_project(&self, selection: ProjectSelection) -> PlannerResult<()> {
        tracing::debug!("Selecting {}", selection);
        self.search_query.lock().clear();
        self.transition(|s| {
            s.select_project(selection);
            Ok(())
        })
        .await
    }

    pub async fn select_task(&self, task: TaskId) -> PlannerResult<()> {
        self.transition(|s| {
            s.select_task(Some(task));
            Ok(())
        })
        .await
    }

    pub async fn close_task(&self) -> PlannerResult<()> {
        self.transition(|s| {
            s.select_task(None);
            Ok(())
        })
        .await
    }

    /// Flip password mode; returns the new mode.
    pub async fn toggle_password_mode(&self) -> PlannerResult<bool> {
        let enabled = !self.store.snapshot().is_password_mode();
        self.transition(|s| {
            s.set_password_mode(enabled);
            Ok(())
        })
        .await?;
        Ok(enabled)
    }

    pub async fn select_password(&self, password: PasswordId) -> PlannerResult<()> {
        self.transition(|s| {
            s.select_password(Some(password));
            Ok(())
        })
        .await
    }

    pub async fn open_calendar(&self, date: Option<NaiveDate>) -> PlannerResult<()> {
        self.transition(|s| s.open_calendar(date)).await
    }

    pub async fn close_calendar(&self) -> PlannerResult<()> {
        self.transition(|s| {
            s.close_calendar();
            Ok(())
        })
        .await
    }

    /// Pick a calendar day; picking the selected day again clears the filter.
    pub async fn select_calendar_date(&self, date: NaiveDate) -> PlannerResult<Option<NaiveDate>> {
        let selected = if self.store.snapshot().calendar().date() == Some(date) {
            None
        } else {
            Some(date)
        };
        self.transition(|s| s.open_calendar(selected)).await?;
        Ok(selected)
    }

    pub async fn select_daily_note(&self, note: DailyNoteId) -> PlannerResult<()> {
        self.transition(|s| s.select_daily_note(Some(note))).await
    }

    /// Search tasks; an empty query leaves search mode.
    pub async fn search(&self, query: &str) -> PlannerResult<()> {
        let query = query.trim().to_string();
        let active = !query.is_empty();
        *self.search_query.lock() = query;
        self.transition(|s| {
            s.set_search_mode(active);
            Ok(())
        })
        .await
    }

    /// Collapse or expand the projects panel and remember it on the server.
    ///
    /// A failed save is logged; the local flag keeps its new value.
    pub async fn toggle_panel(&self) -> bool {
        let collapsed = self.store.update(|s| {
            let collapsed = !s.is_panel_collapsed();
            s.set_panel_collapsed(collapsed);
            collapsed
        });
        if let Err(e) = self
            .client
            .set_ui_state(PROJECTS_PANEL_COLLAPSED, &UiStateValue::from_flag(collapsed))
            .await
        {
            tracing::warn!("Failed to save projects panel state: {}", e);
        }
        collapsed
    }

    pub fn set_show_completed(&self, show: bool) {
        self.store.update(|s| s.set_show_completed(show));
    }

    /// Feed an editor change to autosave.
    pub fn edit_notes(&self, content: impl Into<String>) -> Option<SaveTarget> {
        self.autosave.on_edit(content)
    }

    /// Read the panel flag saved on the server into the state.
    pub async fn load_panel_state(&self) -> PlannerResult<bool> {
        let collapsed = self.client.ui_state(PROJECTS_PANEL_COLLAPSED).await?.as_flag();
        self.store.update(|s| s.set_panel_collapsed(collapsed));
        Ok(collapsed)
    }

    /// Apply the current route to the state. Never pushes history.
    pub async fn restore(&self) -> ViewState {
        let params = self.router.current_params();
        tracing::debug!("Restoring view from {:?}", self.router.location());
        let before = self.store.snapshot();
        let mut next = before.clone();
        apply_route(&mut next, &params);
        self.switch_to(&before, next).await;
        self.store.snapshot()
    }

    /// Open a location as if following a link, then restore from it.
    pub async fn open(&self, location: &str) -> PlannerResult<ViewState> {
        self.router.navigate(location).await?;
        Ok(self.restore().await)
    }

    /// Step back in history; `None` when there is nothing to go back to.
    pub async fn back(&self) -> PlannerResult<Option<ViewState>> {
        match self.router.back().await? {
            Some(_) => Ok(Some(self.restore().await)),
            None => Ok(None),
        }
    }

    pub async fn forward(&self) -> PlannerResult<Option<ViewState>> {
        match self.router.forward().await? {
            Some(_) => Ok(Some(self.restore().await)),
            None => Ok(None),
        }
    }

    async fn load_editor(&self, target: Option<SaveTarget>) -> Panel<EditorView> {
        let Some(target) = target else {
            return Panel::Hidden;
        };
        let content = match target {
            SaveTarget::Task(id) => self.client.task_notes(id).await.map(|n| n.content),
            SaveTarget::Project(id) => self.client.project_notes(id).await.map(|n| n.content),
            SaveTarget::DailyNote(id) => self.client.daily_note(id).await.map(|n| n.content),
        };
        if let Ok(content) = &content {
            if !self.autosave.is_pending(target) {
                self.autosave.buffer().set(content.clone());
            }
        }
        Panel::from_result("notes", content.map(|content| EditorView { target, content }))
    }

    /// Fetch every panel the current state shows, concurrently.
    pub async fn load_view(&self) -> ViewSnapshot {
        let state = self.store.snapshot();
        let project = state.project();
        let query = self.search_query();
        let lists_tasks = matches!(
            project,
            ProjectSelection::AllTasks | ProjectSelection::Project(_)
        ) && !state.is_search_mode()
            && !state.is_password_mode();

        let projects = async {
            Panel::from_result("projects", self.client.list_projects().await)
        };
        let tasks = async {
            if !lists_tasks {
                return Panel::Hidden;
            }
            Panel::from_result(
                "tasks",
                self.client.list_tasks(project, state.show_completed()).await,
            )
        };
        let search_results = async {
            if !state.is_search_mode() {
                return Panel::Hidden;
            }
            Panel::from_result("search results", self.client.search_tasks(&query).await)
        };
        let passwords = async {
            if !state.is_password_mode() || !project.is_selected() {
                return Panel::Hidden;
            }
            Panel::from_result("passwords", self.client.list_passwords(project).await)
        };
        let daily_notes = async {
            if !project.is_journal() || state.calendar().is_open() {
                return Panel::Hidden;
            }
            Panel::from_result("daily notes", self.client.list_daily_notes().await)
        };
        let calendar_events = async {
            if !project.is_journal() || !state.calendar().is_open() {
                return Panel::Hidden;
            }
            Panel::from_result(
                "calendar events",
                self.client.calendar_events(state.calendar().date()).await,
            )
        };
        let editor = self.load_editor(SaveTarget::resolve(&state));

        let (projects, tasks, search_results, passwords, daily_notes, calendar_events, editor) = tokio::join!(
            projects,
            tasks,
            search_results,
            passwords,
            daily_notes,
            calendar_events,
            editor
        );

        ViewSnapshot {
            location: self.router.location(),
            save_status: self.autosave.current_status(),
            state,
            projects,
            tasks,
            search_results,
            passwords,
            daily_notes,
            calendar_events,
            editor,
        }
    }
}
