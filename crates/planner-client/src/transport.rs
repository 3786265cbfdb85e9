use async_trait::async_trait;
use planner_core::PlannerResult;
use serde_json::Value;

use crate::request::ApiRequest;

/// Executes a request and yields the decoded JSON body.
///
/// Implementations must turn non-2xx responses into `PlannerError::Status`
/// and network failures into `PlannerError::Unreachable`; an empty body
/// decodes to `Value::Null`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> PlannerResult<Value>;
}
