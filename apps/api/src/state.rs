use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::Config;
use crate::runner::ScriptExecutor;
use crate::upload::scratch::ScratchDir;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds configuration and handles only; no per-request data lives here.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub scratch: ScratchDir,
    /// Pluggable script backend. Default: `ProcessExecutor`.
    pub executor: Arc<dyn ScriptExecutor>,
    /// Present only when `MAX_CONCURRENT_SCRIPTS` is set.
    pub script_slots: Option<Arc<Semaphore>>,
}

impl AppState {
    pub fn new(config: Config, executor: Arc<dyn ScriptExecutor>) -> Self {
        Self {
            scratch: ScratchDir::new(config.upload_dir.clone()),
            script_slots: config
                .max_concurrent_scripts
                .map(|n| Arc::new(Semaphore::new(n))),
            executor,
            config,
        }
    }
}
