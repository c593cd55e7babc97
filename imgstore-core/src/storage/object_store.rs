use crate::error::Result;
use crate::fingerprint::ContentId;
use crate::storage::shard::ShardLayout;
use crate::storage::sharded_store::{RemoveOutcome, ShardedStore};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// ObjectStore persists immutable blobs keyed by their content id.
/// Layout: {base_dir}/{shard(hash64(id))}/{id}
pub struct ObjectStore {
    blobs: ShardedStore<Bytes>,
}

impl ObjectStore {
    pub fn new(base_dir: PathBuf, layout: ShardLayout) -> Result<Self> {
        Ok(Self {
            blobs: ShardedStore::new(base_dir, layout, "")?,
        })
    }

    /// Get the base directory for the store
    pub fn base_dir(&self) -> &Path {
        self.blobs.root()
    }

    /// Get the path to a blob
    pub fn blob_path(&self, id: &ContentId) -> PathBuf {
        self.blobs.path_for(id.as_str())
    }

    /// Store blob bytes verbatim.
    ///
    /// Callers check `exists` first; writing an id that is already present
    /// rewrites identical bytes and is harmless.
    pub async fn put(&self, id: &ContentId, data: Bytes) -> Result<()> {
        let path = self.blobs.write(id.as_str(), &data).await?;
        tracing::debug!("Stored blob {} ({} bytes) at {:?}", id, data.len(), path);
        Ok(())
    }

    /// Retrieve a blob, `None` when it is not stored
    pub async fn get(&self, id: &ContentId) -> Result<Option<Bytes>> {
        self.blobs.read(id.as_str()).await
    }

    pub async fn exists(&self, id: &ContentId) -> Result<bool> {
        self.blobs.contains(id.as_str()).await
    }

    pub async fn delete(&self, id: &ContentId) -> Result<RemoveOutcome> {
        let outcome = self.blobs.remove(id.as_str()).await?;
        if outcome == RemoveOutcome::Removed {
            tracing::debug!("Deleted blob {}", id);
        }
        Ok(outcome)
    }
}
