use std::{
    fs::remove_dir_all,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use itertools::{Either, Itertools};

use crate::store::{AssetStore, FailedRemoval, StoredAsset, SweepResult};

/// Filesystem backed asset store rooted at `<workdir>/audio`
#[derive(Debug)]
pub struct LocalAssetStore {
    root: PathBuf,
    purge_on_drop: bool,
}

impl LocalAssetStore {
    const FILE_PREFIX: &str = "blogcast-";

    /// Creates the audio directory under `workdir` if it does not exist
    pub fn init(workdir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = workdir.as_ref().join("audio");

        std::fs::create_dir_all(&root)
            .inspect_err(|e| tracing::error!(error = ?e, path = ?root, "Failed to create audio directory"))
            .with_context(|| format!("Failed to create audio directory {}", root.display()))?;

        Ok(LocalAssetStore {
            root,
            purge_on_drop: false,
        })
    }

    /// Remove the whole audio directory when the store is dropped
    pub fn purge_on_drop(mut self, purge: bool) -> Self {
        self.purge_on_drop = purge;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps an asset name back to its path. Only plain file names carrying
    /// the store prefix resolve; anything else could escape the directory.
    fn resolve(&self, name: &str) -> anyhow::Result<PathBuf> {
        let is_plain_name = !name.is_empty()
            && !name.contains(['/', '\\'])
            && !name.contains("..")
            && name.starts_with(Self::FILE_PREFIX);

        if !is_plain_name {
            anyhow::bail!("Invalid asset name: {name:?}");
        }

        Ok(self.root.join(name))
    }
}

impl AssetStore for LocalAssetStore {
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn persist(&self, bytes: Vec<u8>, extension: &str) -> anyhow::Result<StoredAsset> {
        let root = self.root.clone();
        let suffix = format!(".{extension}");

        let path = tokio::task::spawn_blocking(move || -> anyhow::Result<PathBuf> {
            let mut file = tempfile::Builder::new()
                .prefix(Self::FILE_PREFIX)
                .suffix(&suffix)
                .tempfile_in(&root)?;
            file.write_all(&bytes)?;
            let (_, path) = file.keep()?;
            Ok(path)
        })
        .await
        .context("Asset write task failed")?
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to write audio asset"))
        .context("Failed to write audio asset")?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("Asset path has no file name: {}", path.display()))?;

        tracing::debug!(%name, "Stored audio asset");

        Ok(StoredAsset { name, path })
    }

    async fn open(&self, name: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.resolve(name)?;

        tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read asset {name}"))
    }

    #[tracing::instrument(skip(self))]
    async fn sweep(&self, max_age: Duration) -> anyhow::Result<SweepResult> {
        let cutoff = Utc::now() - chrono::Duration::from_std(max_age)?;
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .with_context(|| format!("Failed to list {}", self.root.display()))?;

        let mut expired = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(Self::FILE_PREFIX) {
                continue;
            }

            let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(modified) => DateTime::<Utc>::from(modified),
                Err(e) => {
                    tracing::warn!(error = ?e, %name, "Could not read asset metadata");
                    continue;
                }
            };

            if modified <= cutoff {
                expired.push((name, entry.path()));
            }
        }

        let mut outcomes = Vec::with_capacity(expired.len());
        for (name, path) in expired {
            outcomes.push((name, tokio::fs::remove_file(&path).await));
        }

        let (removed, failed_removals): (Vec<_>, Vec<_>) =
            outcomes
                .into_iter()
                .partition_map(|(name, outcome)| match outcome {
                    Ok(()) => Either::Left(name),
                    Err(e) => Either::Right(FailedRemoval {
                        name,
                        reason: e.to_string(),
                    }),
                });

        Ok(SweepResult {
            removed,
            failed_removals,
        })
    }
}

impl Drop for LocalAssetStore {
    fn drop(&mut self) {
        if !self.purge_on_drop || !self.root.exists() {
            return;
        }

        if let Err(e) = remove_dir_all(&self.root) {
            tracing::warn!(error = ?e, path = ?self.root, "Failed to clean up audio directory");
        } else {
            tracing::info!(path = ?self.root, "Cleaned up audio directory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persist_creates_unique_files() {
        let workdir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::init(workdir.path()).unwrap();

        let first = store.persist(b"one".to_vec(), "mp3").await.unwrap();
        let second = store.persist(b"one".to_vec(), "mp3").await.unwrap();

        assert_ne!(first.name, second.name);
        assert!(first.name.starts_with("blogcast-"));
        assert!(first.name.ends_with(".mp3"));
        assert_eq!(first.path.parent(), Some(store.root()));
        assert_eq!(std::fs::read(&first.path).unwrap(), b"one");
        assert_eq!(
            second,
            StoredAsset {
                name: second.name.clone(),
                path: store.root().join(&second.name),
            }
        );
    }

    #[tokio::test]
    async fn test_open_round_trips_bytes() {
        let workdir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::init(workdir.path()).unwrap();

        let asset = store.persist(vec![1, 2, 3], "mp3").await.unwrap();
        let bytes = store.open(&asset.name).await.unwrap();

        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_open_rejects_names_outside_store() {
        let workdir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::init(workdir.path()).unwrap();

        for name in ["", "../secret", "blogcast-../x.mp3", "a/b.mp3", "other.mp3"] {
            assert!(store.open(name).await.is_err(), "{name:?} should not resolve");
        }
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired_assets() {
        let workdir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::init(workdir.path()).unwrap();

        let asset = store.persist(b"old".to_vec(), "mp3").await.unwrap();
        std::fs::write(store.root().join("keep.txt"), "not an asset").unwrap();

        let result = store.sweep(Duration::from_secs(3600)).await.unwrap();
        assert!(result.removed.is_empty());
        assert!(asset.path.exists());

        let result = store.sweep(Duration::ZERO).await.unwrap();
        assert_eq!(result.removed, vec![asset.name.clone()]);
        assert!(result.failed_removals.is_empty());
        assert!(!asset.path.exists());
        assert!(store.root().join("keep.txt").exists());
    }

    #[tokio::test]
    async fn test_drop_purges_directory_when_enabled() {
        let workdir = tempfile::tempdir().unwrap();

        let store = LocalAssetStore::init(workdir.path()).unwrap();
        let root = store.root().to_path_buf();
        drop(store);
        assert!(root.exists(), "Directory kept when purge is disabled");

        let store = LocalAssetStore::init(workdir.path())
            .unwrap()
            .purge_on_drop(true);
        store.persist(b"x".to_vec(), "mp3").await.unwrap();
        drop(store);
        assert!(!root.exists());
    }
}
