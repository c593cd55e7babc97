//! Storage modules for imgstore
//!
//! Both namespaces share one sharded key-value store: blobs keyed by content
//! id, name mappings keyed by user-chosen name.

pub mod name_index;
pub mod object_store;
pub mod shard;
pub mod sharded_store;

pub use name_index::{MAPPING_SUFFIX, MAX_NAME_LEN, NAMES_DIR, NameIndex, validate_name};
pub use object_store::ObjectStore;
pub use shard::{DEFAULT_SHARD_DEPTH, DEFAULT_SHARD_WIDTH, ShardLayout, shard_path};
pub use sharded_store::{RemoveOutcome, ShardValue, ShardedStore};
