use crate::error::{ImgStoreError, Result};
use crate::fingerprint::ContentId;
use crate::storage::shard::ShardLayout;
use bytes::Bytes;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use ulid::Ulid;

/// Encoding of a value persisted as a single leaf file
pub trait ShardValue: Sized {
    fn encode(&self) -> Bytes;

    fn decode(key: &str, raw: Vec<u8>) -> Result<Self>;
}

impl ShardValue for Bytes {
    fn encode(&self) -> Bytes {
        self.clone()
    }

    fn decode(_key: &str, raw: Vec<u8>) -> Result<Self> {
        Ok(Bytes::from(raw))
    }
}

/// Mapping files hold the raw id string and nothing else. Only the first line
/// is considered so hand-edited files with a trailing newline still resolve.
impl ShardValue for ContentId {
    fn encode(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_str().as_bytes())
    }

    fn decode(key: &str, raw: Vec<u8>) -> Result<Self> {
        let corrupt = || ImgStoreError::CorruptMapping {
            name: key.to_string(),
        };

        let text = String::from_utf8(raw).map_err(|_| corrupt())?;
        let first_line = text.lines().next().unwrap_or_default().trim();
        ContentId::parse(first_line).map_err(|_| corrupt())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// Key-value store over a sharded directory tree.
///
/// Each key lives at `<root>/<shard(hash64(key))>/<key><suffix>`. There is no
/// in-process locking: concurrent writers to one key race and the last rename
/// wins, readers always observe a complete value.
pub struct ShardedStore<V> {
    root: PathBuf,
    layout: ShardLayout,
    suffix: &'static str,
    _value: PhantomData<fn() -> V>,
}

impl<V: ShardValue> ShardedStore<V> {
    pub fn new(root: PathBuf, layout: ShardLayout, suffix: &'static str) -> Result<Self> {
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            layout,
            suffix,
            _value: PhantomData,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> ShardLayout {
        self.layout
    }

    /// Full path of the leaf file for a key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(self.layout.relative_dir(key))
            .join(format!("{}{}", key, self.suffix))
    }

    /// Create or replace the value stored under `key`
    pub async fn write(&self, key: &str, value: &V) -> Result<PathBuf> {
        let path = self.path_for(key);

        if let Some(parent) = path.parent() {
            // create_dir_all treats a concurrently created directory as success
            fs::create_dir_all(parent).await?;
        }

        let temp_path = path.with_file_name(temp_leaf_name(Ulid::new()));

        let result = write_then_rename(&temp_path, &path, &value.encode()).await;
        if result.is_err() {
            let _ = fs::remove_file(&temp_path).await;
        }
        result?;

        Ok(path)
    }

    pub async fn read(&self, key: &str) -> Result<Option<V>> {
        match fs::read(self.path_for(key)).await {
            Ok(raw) => V::decode(key, raw).map(Some),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    pub async fn contains(&self, key: &str) -> Result<bool> {
        Ok(fs::try_exists(self.path_for(key)).await?)
    }

    pub async fn remove(&self, key: &str) -> Result<RemoveOutcome> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(RemoveOutcome::Removed),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(RemoveOutcome::NotFound),
            Err(error) => Err(error.into()),
        }
    }

    /// Walk the whole tree and return every stored key, in traversal order
    pub async fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                // shard directory vanished between listing and descending
                Err(error) if error.kind() == ErrorKind::NotFound => continue,
                Err(error) => return Err(error.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    let file_name = entry.file_name();
                    if let Some(key) = file_name.to_str().and_then(|n| self.key_from_leaf(n)) {
                        keys.push(key.to_string());
                    }
                }
            }
        }

        Ok(keys)
    }

    fn key_from_leaf<'a>(&self, leaf: &'a str) -> Option<&'a str> {
        if is_temp_leaf(leaf) {
            return None;
        }

        leaf.strip_suffix(self.suffix).filter(|key| !key.is_empty())
    }
}

/// In-flight writes use `.<ulid>.tmp`, independent of the key, so the leaf
/// name length is bounded regardless of how long the key is.
fn temp_leaf_name(ulid: Ulid) -> String {
    format!(".{}.tmp", ulid)
}

fn is_temp_leaf(leaf: &str) -> bool {
    leaf.strip_prefix('.')
        .and_then(|rest| rest.strip_suffix(".tmp"))
        .is_some_and(|ulid| Ulid::from_string(ulid).is_ok())
}

async fn write_then_rename(temp_path: &Path, path: &Path, data: &[u8]) -> Result<()> {
    let mut file = fs::File::create(temp_path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(temp_path, path).await?;
    Ok(())
}
