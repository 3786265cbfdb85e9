use chrono::Utc;
use planner_core::PlannerResult;
use planner_domain::server::DEFAULT_APP_VERSION;
use planner_persistence::{keys, LocalStore};
use serde::Serialize;

use crate::api::PlannerClient;
use crate::base_url::ClientContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateCheck {
    /// Browser clients always load the current assets from the server.
    NotApplicable,
    UpToDate { version: String },
    UpdateAvailable { installed: String, available: String },
}

async fn installed_version(store: &dyn LocalStore) -> PlannerResult<String> {
    Ok(store
        .get(keys::APP_VERSION)
        .await?
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_APP_VERSION.to_string()))
}

async fn record_version(store: &dyn LocalStore, version: &str) -> PlannerResult<()> {
    store.set(keys::APP_VERSION, version).await?;
    store
        .set(
            keys::APP_VERSION_CHECK_TIME,
            &Utc::now().timestamp_millis().to_string(),
        )
        .await
}

fn served_version(raw: String) -> String {
    if raw.trim().is_empty() {
        DEFAULT_APP_VERSION.to_string()
    } else {
        raw
    }
}

/// Compare the server's app version with the one this shell last installed.
///
/// Only the check time moves forward when the versions match; a mismatch
/// leaves local storage alone until the update is accepted.
pub async fn check_for_updates(
    client: &PlannerClient,
    store: &dyn LocalStore,
    context: &ClientContext,
) -> PlannerResult<UpdateCheck> {
    if !context.is_shell() {
        return Ok(UpdateCheck::NotApplicable);
    }

    let available = served_version(client.app_version().await?.version);
    let installed = installed_version(store).await?;

    if available != installed {
        tracing::info!("App update available: {} -> {}", installed, available);
        return Ok(UpdateCheck::UpdateAvailable {
            installed,
            available,
        });
    }

    record_version(store, &available).await?;
    Ok(UpdateCheck::UpToDate { version: available })
}

/// Mark the server's current version as installed.
pub async fn accept_update(client: &PlannerClient, store: &dyn LocalStore) -> PlannerResult<String> {
    let version = served_version(client.app_version().await?.version);
    record_version(store, &version).await?;
    tracing::info!("App version recorded as {}", version);
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use planner_persistence::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn client_serving(version: &'static str) -> PlannerClient {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .returning(move |_| Ok(json!({ "version": version })));
        PlannerClient::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_browser_skips_check() {
        let mut mock = MockTransport::new();
        mock.expect_execute().never();
        let client = PlannerClient::new(Arc::new(mock));
        let store = MemoryStore::new();

        let result = check_for_updates(
            &client,
            &store,
            &ClientContext::Browser {
                origin: "http://localhost:5000".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(result, UpdateCheck::NotApplicable);
    }

    #[tokio::test]
    async fn test_same_version_records_check_time() {
        let client = client_serving("1.0.0");
        let store = MemoryStore::new();

        let result = check_for_updates(&client, &store, &ClientContext::Shell)
            .await
            .unwrap();
        assert_eq!(
            result,
            UpdateCheck::UpToDate {
                version: "1.0.0".to_string()
            }
        );
        assert_eq!(
            store.get(keys::APP_VERSION).await.unwrap().as_deref(),
            Some("1.0.0")
        );
        assert!(store
            .get(keys::APP_VERSION_CHECK_TIME)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_newer_version_is_reported_not_recorded() {
        let client = client_serving("1.2.0");
        let store = MemoryStore::with_entries(vec![(keys::APP_VERSION, "1.1.0")]);

        let result = check_for_updates(&client, &store, &ClientContext::Shell)
            .await
            .unwrap();
        assert_eq!(
            result,
            UpdateCheck::UpdateAvailable {
                installed: "1.1.0".to_string(),
                available: "1.2.0".to_string()
            }
        );
        assert_eq!(
            store.get(keys::APP_VERSION).await.unwrap().as_deref(),
            Some("1.1.0")
        );

        assert_eq!(accept_update(&client, &store).await.unwrap(), "1.2.0");
        assert_eq!(
            store.get(keys::APP_VERSION).await.unwrap().as_deref(),
            Some("1.2.0")
        );
    }
}
