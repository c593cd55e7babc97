use crate::error::{ImgStoreError, Result};
use crate::fingerprint::ContentId;
use crate::storage::shard::ShardLayout;
use crate::storage::sharded_store::{RemoveOutcome, ShardedStore};
use std::path::{Path, PathBuf};

pub const NAMES_DIR: &str = "names";
pub const MAPPING_SUFFIX: &str = ".mapping";
/// Longest name whose `<name>.mapping` leaf still fits a 255-byte filename
pub const MAX_NAME_LEN: usize = 255 - MAPPING_SUFFIX.len();

/// Reject names that cannot be used verbatim as a leaf filename
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ImgStoreError::InvalidRequest(
            "name cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ImgStoreError::InvalidRequest(format!(
            "name exceeds {} bytes",
            MAX_NAME_LEN
        )));
    }

    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(ImgStoreError::InvalidRequest(format!(
            "invalid name: {}",
            name
        )));
    }

    Ok(())
}

/// NameIndex maps user-chosen names to content ids.
/// Layout: {base_dir}/names/{shard(hash64(name))}/{name}.mapping
///
/// Mappings are independent of the blobs they point at; nothing here checks
/// that the referenced blob exists.
pub struct NameIndex {
    mappings: ShardedStore<ContentId>,
}

impl NameIndex {
    pub fn new(base_dir: &Path, layout: ShardLayout) -> Result<Self> {
        Ok(Self {
            mappings: ShardedStore::new(base_dir.join(NAMES_DIR), layout, MAPPING_SUFFIX)?,
        })
    }

    pub fn mapping_path(&self, name: &str) -> PathBuf {
        self.mappings.path_for(name)
    }

    /// Create the mapping or repoint an existing one
    pub async fn set_mapping(&self, name: &str, id: &ContentId) -> Result<()> {
        validate_name(name)?;
        self.mappings.write(name, id).await?;
        tracing::debug!("Mapped name {} -> {}", name, id);
        Ok(())
    }

    pub async fn get_mapping(&self, name: &str) -> Result<Option<ContentId>> {
        validate_name(name)?;
        self.mappings.read(name).await
    }

    pub async fn delete_mapping(&self, name: &str) -> Result<RemoveOutcome> {
        validate_name(name)?;
        let outcome = self.mappings.remove(name).await?;
        if outcome == RemoveOutcome::Removed {
            tracing::debug!("Removed mapping for name {}", name);
        }
        Ok(outcome)
    }

    pub async fn mapping_exists(&self, name: &str) -> Result<bool> {
        validate_name(name)?;
        self.mappings.contains(name).await
    }

    /// Every registered name, in directory traversal order
    pub async fn list_names(&self) -> Result<Vec<String>> {
        self.mappings.keys().await
    }
}
