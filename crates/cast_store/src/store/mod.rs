use std::{future::Future, path::PathBuf, sync::Arc, time::Duration};

pub mod local;

pub trait AssetStore {
    /// Writes `bytes` to a fresh, uniquely named file with the given extension
    fn persist(
        &self,
        bytes: Vec<u8>,
        extension: &str,
    ) -> impl Future<Output = anyhow::Result<StoredAsset>> + Send;

    /// Reads back an asset previously returned by [`AssetStore::persist`]
    fn open(&self, name: &str) -> impl Future<Output = anyhow::Result<Vec<u8>>> + Send;

    /// Removes assets older than `max_age`
    fn sweep(&self, max_age: Duration) -> impl Future<Output = anyhow::Result<SweepResult>> + Send;
}

impl<T: AssetStore + Send + Sync> AssetStore for &T {
    async fn persist(&self, bytes: Vec<u8>, extension: &str) -> anyhow::Result<StoredAsset> {
        (**self).persist(bytes, extension).await
    }

    async fn open(&self, name: &str) -> anyhow::Result<Vec<u8>> {
        (**self).open(name).await
    }

    async fn sweep(&self, max_age: Duration) -> anyhow::Result<SweepResult> {
        (**self).sweep(max_age).await
    }
}

impl<T: AssetStore + Send + Sync> AssetStore for Arc<T> {
    async fn persist(&self, bytes: Vec<u8>, extension: &str) -> anyhow::Result<StoredAsset> {
        (**self).persist(bytes, extension).await
    }

    async fn open(&self, name: &str) -> anyhow::Result<Vec<u8>> {
        (**self).open(name).await
    }

    async fn sweep(&self, max_age: Duration) -> anyhow::Result<SweepResult> {
        (**self).sweep(max_age).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// File name, unique within the store
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct SweepResult {
    pub removed: Vec<String>,
    pub failed_removals: Vec<FailedRemoval>,
}

#[derive(Debug)]
pub struct FailedRemoval {
    pub name: String,
    pub reason: String,
}
