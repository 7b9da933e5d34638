//! Shared helpers for integration tests.

use std::path::PathBuf;

use tempfile::TempDir;

/// A temp directory holding a database, export directory and config file.
#[allow(dead_code)]
pub struct TestEnv {
    /// Kept alive so the directory survives the test body.
    pub dir: TempDir,
    pub config_path: PathBuf,
    pub db_path: PathBuf,
    pub export_dir: PathBuf,
}

/// Create an isolated environment with a written config file.
pub fn test_env() -> TestEnv {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("picklock.db");
    let export_dir = dir.path().join("exports");
    let config_path = dir.path().join("picklock.toml");

    let config = format!(
        r#"
[database]
path = "{}"

[export]
dir = "{}"

[logging]
level = "warn"
"#,
        db_path.display(),
        export_dir.display(),
    );
    std::fs::write(&config_path, config).expect("Failed to write config");

    TestEnv {
        dir,
        config_path,
        db_path,
        export_dir,
    }
}
