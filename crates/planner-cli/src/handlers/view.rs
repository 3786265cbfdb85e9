use crate::context::CliContext;
use crate::output;
use planner_app::SaveStatus;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn handle_show(ctx: &CliContext, completed: bool, reveal: bool) -> anyhow::Result<()> {
    let controller = ctx.controller().await?;
    if let Err(e) = controller.load_panel_state().await {
        tracing::warn!("Could not read projects panel state: {}", e);
    }
    if completed {
        controller.set_show_completed(true);
    }

    let mut snapshot = controller.load_view().await;
    if !reveal {
        snapshot.redact_secrets();
    }
    output::output_success(snapshot);
    Ok(())
}

/// Every stdin line extends the editor content and counts as one edit; the
/// debounce timer decides when it is saved.
pub async fn handle_edit(ctx: &CliContext) -> anyhow::Result<()> {
    let controller = ctx.controller().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut content = String::new();
    let mut edits = 0usize;
    let mut target = None;
    while let Some(line) = lines.next_line().await? {
        if edits > 0 {
            content.push('\n');
        }
        content.push_str(&line);
        edits += 1;

        target = controller.edit_notes(content.clone());
        if target.is_none() {
            anyhow::bail!(
                "Nothing in view has notes to edit; select a project, task or daily note first"
            );
        }
    }

    let Some(target) = target else {
        anyhow::bail!("No input on stdin");
    };

    match controller.autosave().settled().await {
        SaveStatus::Failed(message) => anyhow::bail!("Saving notes for {} failed: {}", target, message),
        status => {
            output::output_success(json!({
                "target": target,
                "edits": edits,
                "bytes": content.len(),
                "status": status,
            }));
        }
    }
    Ok(())
}
