//! Well-known local-storage keys.

/// Explicit API server override, highest priority during base URL resolution.
pub const API_SERVER_URL: &str = "api_server_url";
pub const APP_VERSION: &str = "app_version";
pub const APP_VERSION_CHECK_TIME: &str = "app_version_check_time";
pub const POMODORO_STATE: &str = "pomodoroState";
/// Serialized navigation history, so a later run resumes like a page reload.
pub const ROUTE_HISTORY: &str = "route_history";
