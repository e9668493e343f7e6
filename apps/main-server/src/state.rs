//! Application state.

use std::sync::Arc;

use auth::{JwtConfig, JwtManager};
use task_store::TaskStore;

use crate::config::Config;
use crate::services::{CommentService, TaskService};

/// Shared application state.
pub struct AppState<S: TaskStore> {
    /// Server configuration.
    pub config: Config,
    /// Task store.
    pub store: Arc<S>,
    /// Session token validator.
    pub jwt_manager: JwtManager,
    /// Task adapter.
    pub tasks: TaskService<S>,
    /// Comment adapter.
    pub comments: CommentService<S>,
}

impl<S: TaskStore + 'static> AppState<S> {
    /// Creates new application state.
    pub fn new(config: Config, store: S) -> Self {
        let jwt_manager =
            JwtManager::new(JwtConfig::new(&config.jwt_secret).with_issuer(&config.jwt_issuer));
        let store = Arc::new(store);

        Self {
            tasks: TaskService::new(Arc::clone(&store)),
            comments: CommentService::new(Arc::clone(&store)),
            config,
            store,
            jwt_manager,
        }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from config and store.
pub fn create_shared_state<S: TaskStore + 'static>(config: Config, store: S) -> SharedState<S> {
    Arc::new(AppState::new(config, store))
}
