pub mod autosave;
pub mod controller;
pub mod debounce;
pub mod router;
pub mod state;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use autosave::{AutosavePipeline, EditorBuffer, SaveStatus, SaveTarget};
pub use controller::{Controller, ControllerOptions};
pub use debounce::{Debouncer, PendingKeys};
pub use router::{
    apply_route, encode_query, parse_query, to_location, History, MemoryHistory, PersistedHistory,
    Router,
};
pub use state::ViewStore;
pub use view::{EditorView, Panel, ViewSnapshot};
