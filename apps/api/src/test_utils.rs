//! Shared fixtures for router tests: a temp workspace, stub scripts standing
//! in for the Python analysers, and an executor that counts spawns.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use crate::config::Config;
use crate::routes::build_router;
use crate::runner::{ProcessExecutor, ProcessOutput, ScriptCommand, ScriptExecutor};
use crate::state::AppState;

pub const TEST_API_KEY: &str = "sk-test-0000";

/// Wraps [`ProcessExecutor`] and records how many scripts were started.
#[derive(Default)]
pub struct CountingExecutor {
    runs: AtomicUsize,
}

impl CountingExecutor {
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScriptExecutor for CountingExecutor {
    async fn run(&self, command: &ScriptCommand) -> Result<ProcessOutput> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        ProcessExecutor.run(command).await
    }
}

/// A running test app backed by `sh` stub scripts in a temp directory.
pub struct TestApp {
    pub server: TestServer,
    /// The same router, for driving requests directly as a `tower::Service`.
    pub router: Router,
    pub executor: Arc<CountingExecutor>,
    pub dir: TempDir,
}

impl TestApp {
    /// Both flows use the same `script` body. `{dir}` in the body expands to
    /// the temp directory.
    pub fn with_script(script: &str) -> Self {
        Self::build(script, |_| {})
    }

    pub fn build(script: &str, tweak: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("stub.sh");
        let body = script.replace("{dir}", &dir.path().display().to_string());
        std::fs::write(&script_path, body).unwrap();

        let mut config = test_config(dir.path(), &script_path);
        tweak(&mut config);

        let executor = Arc::new(CountingExecutor::default());
        let state = AppState::new(config, executor.clone());
        let router = build_router(state);
        let server = TestServer::new(router.clone()).unwrap();

        Self {
            server,
            router,
            executor,
            dir,
        }
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// A file a stub wrote under `{dir}`.
    pub fn read_log(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).unwrap()
    }

    /// Files left in the scratch directory (zero if it was never created).
    pub fn scratch_files(&self) -> usize {
        std::fs::read_dir(self.upload_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

fn test_config(root: &Path, script: &Path) -> Config {
    Config {
        openai_api_key: TEST_API_KEY.to_string(),
        port: 0,
        upload_dir: root.join("uploads"),
        python_bin: "sh".to_string(),
        keyword_script: script.to_path_buf(),
        tailor_script: script.to_path_buf(),
        max_upload_bytes: 1024 * 1024,
        max_concurrent_scripts: None,
        rust_log: "debug".to_string(),
    }
}
