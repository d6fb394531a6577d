pub mod handlers;
pub mod routes;
pub mod websocket;

use std::sync::Arc;

use crate::capture::engine::EngineHandle;
use crate::prefs::PreferenceStore;
use crate::status::service::StatusHandle;

/// State shared by all request handlers
#[derive(Clone)]
pub struct ApiState {
    /// Queue into the status event loop
    pub status: StatusHandle,

    /// Engine details announced through the API
    pub engine: Arc<EngineHandle>,

    /// Preferences edited directly from the API
    pub prefs: Arc<dyn PreferenceStore>,
}
