use crate::cli::{PhaseArg, PomodoroAction, VersionAction};
use crate::context::CliContext;
use crate::output;
use chrono::Utc;
use planner_client::{accept_update, check_for_updates};
use planner_domain::pomodoro::WORK_SECONDS;
use planner_domain::{PomodoroPhase, PomodoroState};
use planner_persistence::{keys, LocalStoreExt};
use serde_json::json;

pub async fn handle_server_info(ctx: &CliContext) -> anyhow::Result<()> {
    let info = ctx.client.server_info().await?;
    output::output_success(info);
    Ok(())
}

pub async fn handle_version(ctx: &CliContext, action: VersionAction) -> anyhow::Result<()> {
    match action {
        VersionAction::Check => {
            let check =
                check_for_updates(&ctx.client, ctx.store.as_ref(), ctx.client_context()).await?;
            output::output_success(check);
        }
        VersionAction::Accept => {
            let version = accept_update(&ctx.client, ctx.store.as_ref()).await?;
            output::output_success(json!({ "version": version }));
        }
    }
    Ok(())
}

impl From<PhaseArg> for PomodoroPhase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Idle => PomodoroPhase::Idle,
            PhaseArg::Work => PomodoroPhase::Work,
            PhaseArg::Break => PomodoroPhase::Break,
            PhaseArg::Paused => PomodoroPhase::Paused,
        }
    }
}

pub async fn handle_pomodoro(ctx: &CliContext, action: PomodoroAction) -> anyhow::Result<()> {
    match action {
        PomodoroAction::Get => match ctx.client.pomodoro_state().await {
            Ok(state) => output::output_success(json!({ "source": "server", "state": state })),
            Err(e) if e.is_connectivity() => {
                tracing::warn!("Server unavailable, using local pomodoro state: {}", e);
                let state: PomodoroState = ctx
                    .store
                    .get_json(keys::POMODORO_STATE)
                    .await?
                    .unwrap_or_default();
                output::output_success(json!({ "source": "local", "state": state }));
            }
            Err(e) => return Err(e.into()),
        },
        PomodoroAction::Set {
            state,
            time_left,
            work_count,
        } => {
            let local = PomodoroState {
                time_left: time_left.unwrap_or(WORK_SECONDS),
                state: state.into(),
                work_count,
                start_time: Some(Utc::now().timestamp_millis()),
            };
            let saved = ctx.client.save_pomodoro_state(&local).await?;
            ctx.store.set_json(keys::POMODORO_STATE, &saved).await?;
            output::output_success(saved);
        }
    }
    Ok(())
}

pub async fn handle_statistics(
    ctx: &CliContext,
    kind: Option<String>,
    detailed: bool,
) -> anyhow::Result<()> {
    let stats = match kind {
        Some(kind) => ctx.client.statistics_by_type(&kind).await?,
        None if detailed => ctx.client.detailed_statistics().await?,
        None => ctx.client.statistics().await?,
    };
    output::output_success(stats);
    Ok(())
}
