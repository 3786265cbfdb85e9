use async_trait::async_trait;
use planner_core::{PlannerError, PlannerResult};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::base_url::BaseUrlResolver;
use crate::request::ApiRequest;
use crate::transport::Transport;

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
    resolver: Arc<BaseUrlResolver>,
}

impl HttpTransport {
    pub fn new(resolver: Arc<BaseUrlResolver>, timeout: Duration) -> PlannerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlannerError::Internal(format!("failed building HTTP client: {}", e)))?;
        Ok(Self { client, resolver })
    }

    pub fn resolver(&self) -> &Arc<BaseUrlResolver> {
        &self.resolver
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> PlannerResult<Value> {
        // Fails with NotConfigured before any network I/O
        let base = self.resolver.resolve().await?;
        let url = request.url(&base)?;
        let path = request.clean_path().to_string();

        let mut builder = self
            .client
            .request(request.method.as_reqwest(), url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        tracing::debug!("{} {}", request.method, url);
        let response = match builder.send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(
                    url = %url,
                    error = %error,
                    "API request failed ({})",
                    path
                );
                if error.is_builder() {
                    return Err(PlannerError::InvalidUrl(format!("{}: {}", url, error)));
                }
                return Err(PlannerError::Unreachable {
                    url: url.to_string(),
                    source: Some(Box::new(error)),
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                url = %url,
                status = status.as_u16(),
                "API error ({})",
                path
            );
            return Err(PlannerError::Status {
                status: status.as_u16(),
                path,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|error| PlannerError::Unreachable {
                url: url.to_string(),
                source: Some(Box::new(error)),
            })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| PlannerError::Serialization(format!("{}: {}", path, e)))
    }
}
