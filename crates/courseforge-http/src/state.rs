use courseforge_catalog::CatalogStore;
use courseforge_chat::{ChatOrchestrator, CourseGenerator};
use std::sync::Arc;

/// Shared handler state; everything is constructed once at startup and
/// injected, no process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ChatOrchestrator>,
    pub generator: Arc<CourseGenerator>,
    pub catalog: CatalogStore,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<ChatOrchestrator>,
        generator: Arc<CourseGenerator>,
        catalog: CatalogStore,
    ) -> Self {
        Self {
            orchestrator,
            generator,
            catalog,
        }
    }
}
