use planner_app::{Controller, ControllerOptions, PersistedHistory};
use planner_client::{BaseUrlResolver, ClientContext, HttpTransport, PlannerClient};
use planner_core::AppConfig;
use planner_persistence::{JsonFileStore, LocalStore};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::Cli;

/// Everything a command needs: configuration, local storage and the API
/// client. Nothing here touches the network until a request is made.
pub struct CliContext {
    pub config: AppConfig,
    pub storage_path: PathBuf,
    pub store: Arc<dyn LocalStore>,
    pub resolver: Arc<BaseUrlResolver>,
    pub client: PlannerClient,
}

impl CliContext {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let config = match &cli.config {
            Some(path) => AppConfig::load_from(path),
            None => AppConfig::load(),
        };
        let storage_path = cli
            .storage
            .clone()
            .unwrap_or_else(|| config.effective_storage_path());

        let context = if cli.mobile_shell {
            ClientContext::Shell
        } else {
            ClientContext::from_origin(cli.origin.clone().or_else(|| config.origin.clone()))
        };
        tracing::debug!(
            "Storage at {}, client context {:?}",
            storage_path.display(),
            context
        );

        let store: Arc<dyn LocalStore> = Arc::new(JsonFileStore::new(&storage_path));
        let resolver = Arc::new(BaseUrlResolver::new(store.clone(), context));
        let transport = HttpTransport::new(resolver.clone(), config.request_timeout())?;

        Ok(Self {
            config,
            storage_path,
            store,
            resolver,
            client: PlannerClient::new(Arc::new(transport)),
        })
    }

    pub fn client_context(&self) -> &ClientContext {
        self.resolver.context()
    }

    /// Controller restored from the saved route, like a page reload.
    pub async fn controller(&self) -> anyhow::Result<Controller> {
        let history = PersistedHistory::load(self.store.clone()).await?;
        let controller = Controller::new(
            self.client.clone(),
            Arc::new(history),
            ControllerOptions {
                autosave_delay: self.config.autosave_delay(),
                indicator_linger: self.config.indicator_linger(),
            },
        );
        controller.restore().await;
        Ok(controller)
    }
}
