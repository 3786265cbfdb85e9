use parking_lot::Mutex;
use planner_core::{PlannerError, PlannerResult};
use planner_persistence::{keys, LocalStore};
use reqwest::Url;
use std::sync::Arc;

/// Where the client runs, which decides the fallback base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientContext {
    /// Served by the planner server itself; the page origin is the API host.
    Browser { origin: String },
    /// Wrapped mobile shell with no origin of its own.
    Shell,
}

impl ClientContext {
    pub fn from_origin(origin: Option<String>) -> Self {
        match origin {
            Some(origin) if !origin.trim().is_empty() => Self::Browser { origin },
            _ => Self::Shell,
        }
    }

    pub fn is_shell(&self) -> bool {
        matches!(self, Self::Shell)
    }
}

/// Validate a server address and return it without a trailing slash.
pub fn normalize_server_url(raw: &str) -> PlannerResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::InvalidUrl("server URL is empty".to_string()));
    }
    let url =
        Url::parse(trimmed).map_err(|e| PlannerError::InvalidUrl(format!("{}: {}", trimmed, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(PlannerError::InvalidUrl(format!(
            "{}: only http and https servers are supported",
            trimmed
        )));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Resolves the API base URL.
///
/// Order: the `api_server_url` local-storage override, then the page origin
/// in a browser context. A shell without an override has no base URL and
/// every request fails with `NotConfigured` before touching the network.
pub struct BaseUrlResolver {
    store: Arc<dyn LocalStore>,
    context: ClientContext,
    cached: Mutex<Option<String>>,
}

impl BaseUrlResolver {
    pub fn new(store: Arc<dyn LocalStore>, context: ClientContext) -> Self {
        Self {
            store,
            context,
            cached: Mutex::new(None),
        }
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    pub async fn resolve(&self) -> PlannerResult<String> {
        if let Some(base) = self.cached.lock().clone() {
            return Ok(base);
        }

        let base = if let Some(saved) = self.store.get(keys::API_SERVER_URL).await? {
            normalize_server_url(&saved)?
        } else {
            match &self.context {
                ClientContext::Browser { origin } => normalize_server_url(origin)?,
                ClientContext::Shell => {
                    tracing::info!("Server URL is not configured");
                    return Err(PlannerError::NotConfigured);
                }
            }
        };

        *self.cached.lock() = Some(base.clone());
        Ok(base)
    }

    /// Persist an explicit server address; it wins over the page origin.
    pub async fn set_server_url(&self, raw: &str) -> PlannerResult<String> {
        let url = normalize_server_url(raw)?;
        self.store.set(keys::API_SERVER_URL, &url).await?;
        *self.cached.lock() = Some(url.clone());
        tracing::info!("API server set to {}", url);
        Ok(url)
    }

    pub async fn clear_server_url(&self) -> PlannerResult<()> {
        self.store.remove(keys::API_SERVER_URL).await?;
        *self.cached.lock() = None;
        tracing::info!("API server override cleared");
        Ok(())
    }
}
