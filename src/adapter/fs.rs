//! Filesystem artifact store.
//!
//! Stands in for object storage: artifacts land in an export directory
//! the web frontend (or a sync job) reads from. Writes are atomic via the
//! write-to-temp-then-rename pattern so a reader never sees a partial
//! document.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::port::artifact::ArtifactStore;

/// Writes JSON artifacts into a directory.
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn write_atomic(&self, name: &str, json: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(name);
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &path).map_err(cleanup_and_err)?;

        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn publish_json(&self, name: &str, body: &serde_json::Value) -> Result<()> {
        let json = serde_json::to_string_pretty(body)?;
        self.write_atomic(name, &json)
    }
}
