pub mod api;
pub mod base_url;
pub mod http;
pub mod request;
pub mod transport;
pub mod version;

pub use api::{CreatedId, PlannerClient};
pub use base_url::{BaseUrlResolver, ClientContext};
pub use http::HttpTransport;
pub use request::{ApiRequest, Method};
pub use transport::Transport;
pub use version::{accept_update, check_for_updates, UpdateCheck};

/// Re-exported so callers can build and parse URLs without another dependency.
pub use reqwest::Url;
