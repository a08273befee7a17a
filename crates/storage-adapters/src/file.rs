//! # Local file storage
//!
//! Directory-backed implementation of `KeyValueStore`: one JSON file per key,
//! replaced as a whole on every write.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use domains::KeyValueStore;
use tokio::fs;
use tracing::debug;

pub struct FileStore {
    /// Directory holding one file per key (e.g., "./data")
    root_path: PathBuf,
}

impl FileStore {
    /// Creates the directory if it does not exist yet.
    pub async fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root_path = root.into();
        fs::create_dir_all(&root_path)
            .await
            .with_context(|| format!("creating data directory {}", root_path.display()))?;
        debug!(path = %root_path.display(), "file store opened");
        Ok(Self { root_path })
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Maps a key to its file: "@forum/currentUser" -> "forum.currentUser.json"
    fn key_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .trim_start_matches('@')
            .chars()
            .map(|c| match c {
                '/' => '.',
                c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => c,
                _ => '_',
            })
            .collect();
        self.root_path.join(format!("{name}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    /// Writes to a sibling temp file and renames it over the target, so a
    /// reader sees either the old or the new snapshot.
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let path = self.key_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
        }
    }
}
