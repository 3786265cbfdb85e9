use async_trait::async_trait;
use parking_lot::Mutex;
use planner_client::{ApiRequest, Method, PlannerClient, Transport};
use planner_core::{PlannerError, PlannerResult};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct FakeState {
    requests: Vec<ApiRequest>,
    responses: HashMap<(Method, String), Value>,
    failures: HashMap<String, u16>,
}

/// Transport that records every request and answers from canned responses.
///
/// Unconfigured reads answer an empty list (or empty notes for `/notes`
/// paths); unconfigured writes answer `{"success": true}`.
#[derive(Clone, Default)]
pub(crate) struct FakeServer {
    state: Arc<Mutex<FakeState>>,
}

impl FakeServer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn client(&self) -> PlannerClient {
        PlannerClient::new(Arc::new(self.clone()))
    }

    pub(crate) fn respond(&self, method: Method, path: &str, body: Value) {
        self.state
            .lock()
            .responses
            .insert((method, path.to_string()), body);
    }

    pub(crate) fn fail_path(&self, path: &str, status: u16) {
        self.state.lock().failures.insert(path.to_string(), status);
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().requests.clone()
    }

    pub(crate) fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.clean_path() == path)
            .collect()
    }

    pub(crate) fn writes(&self) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != Method::Get)
            .collect()
    }
}

#[async_trait]
impl Transport for FakeServer {
    async fn execute(&self, request: ApiRequest) -> PlannerResult<Value> {
        let path = request.clean_path().to_string();
        let mut state = self.state.lock();
        state.requests.push(request.clone());

        if let Some(status) = state.failures.get(&path) {
            return Err(PlannerError::Status {
                status: *status,
                path,
            });
        }
        if let Some(body) = state.responses.get(&(request.method, path.clone())) {
            return Ok(body.clone());
        }
        Ok(match request.method {
            Method::Get if path.ends_with("/notes") => json!({ "content": "" }),
            Method::Get => json!([]),
            _ => json!({ "success": true }),
        })
    }
}
