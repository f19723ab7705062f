//! Test helpers for the imager workspace
//!
//! Integration tests write their renders under `test_output/` at the
//! workspace root so the images can be inspected after a run.

use once_cell::sync::Lazy;
use std::env;
use std::path::{Path, PathBuf};

/// Error type for test helper operations
#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    #[error("Failed to find workspace root: {0}")]
    WorkspaceRootNotFound(String),
    #[error("Failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Walk up from the current directory to the `Cargo.toml` declaring `[workspace]`.
pub fn find_workspace_root() -> Result<PathBuf, TestHelperError> {
    let mut dir = env::current_dir().map_err(|e| {
        TestHelperError::WorkspaceRootNotFound(format!("no current directory: {e}"))
    })?;

    loop {
        let manifest = dir.join("Cargo.toml");
        if let Ok(content) = std::fs::read_to_string(&manifest) {
            if content.contains("[workspace]") {
                return Ok(dir);
            }
        }
        if !dir.pop() {
            return Err(TestHelperError::WorkspaceRootNotFound(
                "no Cargo.toml with [workspace] above the current directory".to_string(),
            ));
        }
    }
}

static WORKSPACE_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_workspace_root().expect("Failed to find workspace root"));

/// `test_output/` under the workspace root, created on first use.
pub fn get_output_dir() -> PathBuf {
    let output_dir = WORKSPACE_ROOT.join("test_output");
    std::fs::create_dir_all(&output_dir).expect("Failed to create test_output directory");
    output_dir
}

/// A fresh, empty subdirectory of the test output directory.
///
/// Anything left by a previous run of the same test is removed, so stale
/// renders never satisfy an existence check.
pub fn scratch_dir<P: AsRef<Path>>(name: P) -> Result<PathBuf, TestHelperError> {
    let dir = get_output_dir().join(name);
    if dir.exists() {
        std::fs::remove_dir_all(&dir).map_err(|source| TestHelperError::CreateDir {
            path: dir.clone(),
            source,
        })?;
    }
    std::fs::create_dir_all(&dir).map_err(|source| TestHelperError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
