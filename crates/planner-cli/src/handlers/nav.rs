use crate::cli::NavAction;
use crate::context::CliContext;
use crate::handlers::RouteView;
use crate::output;
use planner_domain::ProjectSelection;
use serde_json::json;

pub async fn handle(ctx: &CliContext, action: NavAction) -> anyhow::Result<()> {
    let controller = ctx.controller().await?;

    match action {
        NavAction::Project { id } => {
            let selection = ProjectSelection::from_raw(id).ok_or_else(|| {
                anyhow::anyhow!("project id must be positive, 0 (all tasks) or -1 (journal)")
            })?;
            controller.select_project(selection).await?;
        }
        NavAction::Task { id } => controller.select_task(id).await?,
        NavAction::CloseTask => controller.close_task().await?,
        NavAction::Passwords => {
            controller.toggle_password_mode().await?;
        }
        NavAction::Password { id } => controller.select_password(id).await?,
        NavAction::Calendar { close: true } => controller.close_calendar().await?,
        NavAction::Calendar { close: false } => controller.open_calendar(None).await?,
        NavAction::Date { date } => {
            controller.select_calendar_date(date).await?;
        }
        NavAction::DailyNote { id } => controller.select_daily_note(id).await?,
        NavAction::Search { query } => {
            controller.search(&query).await?;
            let results = controller.client().search_tasks(&query).await?;
            let view = RouteView::of(&controller);
            output::output_success(json!({
                "location": view.location,
                "state": view.state,
                "query": controller.search_query(),
                "results": results,
            }));
            return Ok(());
        }
        NavAction::Back => {
            let moved = controller.back().await?.is_some();
            return output_moved(&controller, moved);
        }
        NavAction::Forward => {
            let moved = controller.forward().await?.is_some();
            return output_moved(&controller, moved);
        }
        NavAction::Panel => {
            if let Err(e) = controller.load_panel_state().await {
                tracing::warn!("Could not read projects panel state: {}", e);
            }
            let collapsed = controller.toggle_panel().await;
            tracing::info!("Projects panel collapsed: {}", collapsed);
        }
    }

    output::output_success(RouteView::of(&controller));
    Ok(())
}

fn output_moved(controller: &planner_app::Controller, moved: bool) -> anyhow::Result<()> {
    let view = RouteView::of(controller);
    output::output_success(json!({
        "moved": moved,
        "location": view.location,
        "state": view.state,
    }));
    Ok(())
}
