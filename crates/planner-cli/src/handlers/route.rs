use crate::cli::{RouteAction, RouteEncodeArgs};
use crate::context::CliContext;
use crate::handlers::RouteView;
use crate::output;
use planner_app::{apply_route, parse_query, to_location};
use planner_domain::{ProjectSelection, RouteParams, ViewState};
use serde_json::json;

pub async fn handle(ctx: &CliContext, action: RouteAction) -> anyhow::Result<()> {
    match action {
        RouteAction::Show => {
            let controller = ctx.controller().await?;
            output::output_success(json!({
                "location": controller.router().location(),
                "params": controller.router().current_params(),
                "state": controller.state(),
            }));
        }
        RouteAction::Encode(args) => {
            let params = params_from_args(args)?;
            output::output_success(json!({
                "location": to_location(&params),
                "params": params,
            }));
        }
        RouteAction::Parse { query } => {
            let params = parse_query(&query);
            let mut state = ViewState::new();
            apply_route(&mut state, &params);
            output::output_success(json!({
                "location": to_location(&params),
                "params": params,
                "state": state,
            }));
        }
        RouteAction::Open { location } => {
            let controller = ctx.controller().await?;
            controller.open(&location).await?;
            output::output_success(RouteView::of(&controller));
        }
    }
    Ok(())
}

fn positive(name: &str, id: Option<i64>) -> anyhow::Result<Option<i64>> {
    match id {
        Some(id) if id <= 0 => anyhow::bail!("--{} must be a positive id, got {}", name, id),
        other => Ok(other),
    }
}

fn params_from_args(args: RouteEncodeArgs) -> anyhow::Result<RouteParams> {
    let project = match args.project {
        Some(raw) => Some(ProjectSelection::from_raw(raw).ok_or_else(|| {
            anyhow::anyhow!("--project must be positive, 0 (all tasks) or -1 (journal)")
        })?),
        None => None,
    };
    Ok(RouteParams {
        project,
        task: positive("task", args.task)?,
        calendar: args.calendar,
        date: args.date,
        password: args.password,
        password_id: positive("password-id", args.password_id)?,
        daily_note: positive("daily-note", args.daily_note)?,
    })
}
