// Application state that will be shared across all routes
#[derive(Clone, Default)]
pub struct AppState {
    pub pool: Option<sqlx::SqlitePool>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("pool", &self.pool.is_some())
            .finish()
    }
}
