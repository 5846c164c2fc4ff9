use std::sync::Arc;

use services::GameService;

pub trait UiApp: Send + Sync {
    fn game(&self) -> Arc<GameService>;
}

#[derive(Clone)]
pub struct AppContext {
    game: Arc<GameService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self { game: app.game() }
    }

    #[must_use]
    pub fn game(&self) -> Arc<GameService> {
        Arc::clone(&self.game)
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
