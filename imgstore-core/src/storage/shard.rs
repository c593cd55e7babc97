use crate::fingerprint::{hash64, to_hex};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SHARD_DEPTH: usize = 3;
pub const DEFAULT_SHARD_WIDTH: usize = 2;

/// Split the hex form of `hash` into at most `depth` directory segments of
/// `width` characters each.
///
/// Slicing stops once the hex string is exhausted, so the last segment may be
/// shorter than `width` and fewer than `depth` segments may be returned.
pub fn shard_path(hash: u64, depth: usize, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let hex = to_hex(hash);
    (0..depth)
        .map(|level| level.saturating_mul(width))
        .take_while(|&start| start < hex.len())
        .map(|start| hex[start..start.saturating_add(width).min(hex.len())].to_string())
        .collect()
}

/// Directory fan-out shared by the object store and the name index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardLayout {
    pub depth: usize,
    pub width: usize,
}

impl Default for ShardLayout {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SHARD_DEPTH,
            width: DEFAULT_SHARD_WIDTH,
        }
    }
}

impl ShardLayout {
    pub fn new(depth: usize, width: usize) -> Self {
        Self { depth, width }
    }

    /// Shard segments for a key, derived from the hash of the key itself
    pub fn segments(&self, key: &str) -> Vec<String> {
        shard_path(hash64(key.as_bytes()), self.depth, self.width)
    }

    /// Relative directory holding the leaf for `key`
    pub fn relative_dir(&self, key: &str) -> PathBuf {
        self.segments(key).into_iter().collect()
    }
}
