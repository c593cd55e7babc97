//! imgstore core - content-addressed blob storage with named aliases
//!
//! - XXH3-64 content ids, hex encoded
//! - Sharded directory layout bounding per-directory fan-out
//! - Name index layered over content ids, repointable

pub mod content_type;
pub mod error;
pub mod fingerprint;
pub mod operations;
pub mod storage;

pub use content_type::{OCTET_STREAM, detect_content_type};
pub use error::{ImgStoreError, Result};
pub use fingerprint::{ContentId, hash64, to_hex};
pub use operations::*;
pub use storage::{
    DEFAULT_SHARD_DEPTH, DEFAULT_SHARD_WIDTH, MAPPING_SUFFIX, MAX_NAME_LEN, NAMES_DIR, NameIndex,
    ObjectStore, RemoveOutcome, ShardLayout, ShardValue, ShardedStore, shard_path, validate_name,
};
