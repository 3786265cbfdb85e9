use crate::cli::ConfigAction;
use crate::context::CliContext;
use crate::output;
use planner_client::ClientContext;
use planner_core::AppConfig;
use planner_persistence::keys;
use serde_json::json;

pub async fn handle(ctx: &CliContext, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let (context, origin) = match ctx.client_context() {
                ClientContext::Browser { origin } => ("browser", Some(origin.clone())),
                ClientContext::Shell => ("shell", None),
            };
            // An unresolvable base URL is part of what this command reports
            let api_base_url = ctx.resolver.resolve().await.ok();
            output::output_success(json!({
                "config_path": AppConfig::config_path(),
                "storage_path": ctx.storage_path,
                "context": context,
                "origin": origin,
                "server_override": ctx.store.get(keys::API_SERVER_URL).await?,
                "api_base_url": api_base_url,
                "autosave_delay_ms": ctx.config.autosave_delay().as_millis() as u64,
                "indicator_linger_ms": ctx.config.indicator_linger().as_millis() as u64,
                "request_timeout_secs": ctx.config.request_timeout().as_secs(),
            }));
        }
        ConfigAction::SetServer { url } => {
            let saved = ctx.resolver.set_server_url(&url).await?;
            output::output_success(json!({ "api_server_url": saved }));
        }
        ConfigAction::ClearServer => {
            ctx.resolver.clear_server_url().await?;
            output::output_success(json!({ "api_server_url": null }));
        }
    }
    Ok(())
}
