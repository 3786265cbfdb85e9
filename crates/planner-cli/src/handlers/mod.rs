pub mod config;
pub mod nav;
pub mod route;
pub mod server;
pub mod view;

use planner_app::Controller;
use planner_domain::ViewState;
use serde::Serialize;

/// Where the view ended up after a command.
#[derive(Serialize)]
pub struct RouteView {
    pub location: String,
    pub state: ViewState,
}

impl RouteView {
    pub fn of(controller: &Controller) -> Self {
        Self {
            location: controller.router().location(),
            state: controller.state(),
        }
    }
}
