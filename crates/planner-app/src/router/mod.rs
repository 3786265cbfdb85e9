pub mod history;
pub mod query;

use planner_core::PlannerResult;
use planner_domain::{ProjectSelection, RouteParams, RouteUpdate, ViewState};
use std::sync::Arc;

pub use history::{History, MemoryHistory, PersistedHistory};
pub use query::{encode_query, parse_query, to_location};

/// Keeps the navigation history in step with the view.
///
/// Interactive changes go through [`Router::publish`], which merges a partial
/// update into the current route and pushes a new entry. Restoring from the
/// route is a pure function ([`apply_route`]) and never pushes, so no guard
/// flag is needed to stop a restore from re-publishing itself.
pub struct Router {
    history: Arc<dyn History>,
}

impl Router {
    pub fn new(history: Arc<dyn History>) -> Self {
        Self { history }
    }

    pub fn location(&self) -> String {
        self.history.current()
    }

    pub fn current_params(&self) -> RouteParams {
        parse_query(&self.history.current())
    }

    /// Merge `update` into the current route and push the result.
    ///
    /// Returns false when the merged route equals the current entry, in which
    /// case nothing is pushed.
    pub async fn publish(&self, update: RouteUpdate) -> PlannerResult<bool> {
        let mut params = self.current_params();
        update.apply_to(&mut params);
        let next = to_location(&params);
        if next == self.history.current() {
            tracing::debug!("Route unchanged at {:?}", next);
            return Ok(false);
        }
        tracing::debug!("Publishing route {:?}", next);
        self.history.push(next).await?;
        Ok(true)
    }

    /// Push a location as typed, like opening a link.
    pub async fn navigate(&self, location: &str) -> PlannerResult<()> {
        let trimmed = location.trim();
        let location = if trimmed.is_empty() || trimmed.starts_with('?') {
            trimmed.to_string()
        } else {
            format!("?{}", trimmed)
        };
        self.history.push(location).await
    }

    /// Step back; `None` when already at the oldest entry.
    pub async fn back(&self) -> PlannerResult<Option<RouteParams>> {
        Ok(if self.history.back().await? {
            Some(self.current_params())
        } else {
            None
        })
    }

    /// Step forward; `None` when already at the newest entry.
    pub async fn forward(&self) -> PlannerResult<Option<RouteParams>> {
        Ok(if self.history.forward().await? {
            Some(self.current_params())
        } else {
            None
        })
    }
}

/// Rebuild the routed part of `state` from `params`.
///
/// Steps run in a fixed order: project (all tasks when absent), calendar and
/// its date, task, password mode and password, then daily note (journal
/// only). Later steps win where selections conflict, so a route carrying both
/// a task and password mode restores to password mode. Fields the route does
/// not carry (panel, completed filter) are left as they are.
pub fn apply_route(state: &mut ViewState, params: &RouteParams) {
    let project = params.project.unwrap_or(ProjectSelection::AllTasks);
    state.select_project(project);
    state.set_password_mode(false);

    if params.calendar {
        if let Err(e) = state.open_calendar(params.date) {
            tracing::debug!("Ignoring calendar in route: {}", e);
        }
    } else {
        state.close_calendar();
    }

    if params.task.is_some() {
        state.select_task(params.task);
    }

    if params.password {
        state.set_password_mode(true);
        state.select_password(params.password_id);
    }

    if params.daily_note.is_some() && project.is_journal() {
        if let Err(e) = state.select_daily_note(params.daily_note) {
            tracing::debug!("Ignoring daily note in route: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn router() -> Router {
        Router::new(Arc::new(MemoryHistory::new()))
    }

    fn restored(params: &RouteParams) -> ViewState {
        let mut state = ViewState::new();
        apply_route(&mut state, params);
        state
    }

    #[tokio::test]
    async fn test_publish_merges_into_current_route() {
        let router = router();
        router
            .publish(RouteUpdate::new().project(ProjectSelection::Project(5)))
            .await
            .unwrap();
        router
            .publish(RouteUpdate::new().task(Some(42)))
            .await
            .unwrap();
        assert_eq!(router.location(), "?project=5&task=42");
    }

    #[tokio::test]
    async fn test_publish_skips_identical_entry() {
        let router = router();
        let update = RouteUpdate::new().project(ProjectSelection::AllTasks);
        assert!(router.publish(update.clone()).await.unwrap());
        assert!(!router.publish(update).await.unwrap());
    }

    #[tokio::test]
    async fn test_back_and_forward_return_params() {
        let router = router();
        router
            .publish(RouteUpdate::new().project(ProjectSelection::Project(1)))
            .await
            .unwrap();
        router
            .publish(RouteUpdate::new().project(ProjectSelection::Project(2)))
            .await
            .unwrap();

        let back = router.back().await.unwrap().unwrap();
        assert_eq!(back.project, Some(ProjectSelection::Project(1)));
        let forward = router.forward().await.unwrap().unwrap();
        assert_eq!(forward.project, Some(ProjectSelection::Project(2)));
        assert!(router.forward().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_navigate_adds_question_mark() {
        let router = router();
        router.navigate("project=5&task=42").await.unwrap();
        assert_eq!(router.location(), "?project=5&task=42");
    }

    #[test]
    fn test_missing_project_restores_all_tasks() {
        let state = restored(&RouteParams::default());
        assert_eq!(state.project(), ProjectSelection::AllTasks);
    }

    #[test]
    fn test_restore_project_and_task() {
        let state = restored(&parse_query("?project=5&task=42"));
        assert_eq!(state.project(), ProjectSelection::Project(5));
        assert_eq!(state.task(), Some(42));
    }

    #[test]
    fn test_restore_is_idempotent() {
        let params = parse_query("?project=-1&calendar=true&date=2026-10-16&dailyNote=3");
        let once = restored(&params);
        let mut twice = once.clone();
        apply_route(&mut twice, &params);
        assert_eq!(once, twice);
        assert_eq!(once.daily_note(), Some(3));
        assert_eq!(once.calendar().date(), NaiveDate::from_ymd_opt(2026, 10, 16));
    }

    #[test]
    fn test_daily_note_outside_journal_is_ignored() {
        let state = restored(&parse_query("?project=5&dailyNote=3"));
        assert_eq!(state.daily_note(), None);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_password_mode_wins_over_task() {
        let state = restored(&parse_query("?project=5&task=42&password=true&passwordId=8"));
        assert_eq!(state.task(), None);
        assert!(state.is_password_mode());
        assert_eq!(state.password(), Some(8));
    }

    #[test]
    fn test_restore_keeps_unrouted_fields() {
        let mut state = ViewState::new();
        state.set_panel_collapsed(true);
        state.set_show_completed(true);
        apply_route(&mut state, &parse_query("?project=2"));
        assert!(state.is_panel_collapsed());
        assert!(state.show_completed());
    }

    #[test]
    fn test_round_trip_through_location() {
        let mut state = ViewState::new();
        state.select_project(ProjectSelection::Journal);
        state
            .open_calendar(NaiveDate::from_ymd_opt(2026, 10, 16))
            .unwrap();
        state.select_daily_note(Some(4)).unwrap();

        let location = to_location(&state.route_params());
        let back = restored(&parse_query(&location));
        assert_eq!(back.route_params(), state.route_params());
    }
}
