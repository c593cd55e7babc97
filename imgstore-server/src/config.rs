use imgstore_core::{
    DEFAULT_SHARD_DEPTH, DEFAULT_SHARD_WIDTH, ImgStoreError, Result, ShardLayout,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Key required for uploads and deletes. Writes are refused when unset.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    #[serde(default = "default_shard_depth")]
    pub shard_depth: usize,
    #[serde(default = "default_shard_width")]
    pub shard_width: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            shard_depth: default_shard_depth(),
            shard_width: default_shard_width(),
        }
    }
}

impl StorageConfig {
    pub fn layout(&self) -> ShardLayout {
        ShardLayout::new(self.shard_depth, self.shard_width)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            storage: StorageConfig::default(),
            api_key: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("./storage")
}

fn default_shard_depth() -> usize {
    DEFAULT_SHARD_DEPTH
}

fn default_shard_width() -> usize {
    DEFAULT_SHARD_WIDTH
}

fn default_max_upload_bytes() -> usize {
    64 * 1024 * 1024
}

impl Config {
    /// Load from an optional config file, then apply `IMGSTORE_*` environment
    /// overrides (nested keys use `__`, e.g. `IMGSTORE_STORAGE__BASE_DIR`).
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::with_name(path));
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix("IMGSTORE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| ImgStoreError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ImgStoreError::Config(e.to_string()))?;

        config.normalized()
    }

    /// Replace the port of `bind_addr`, keeping its host
    pub fn with_port(mut self, port: u16) -> Self {
        let host = self
            .bind_addr
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("0.0.0.0");
        self.bind_addr = format!("{}:{}", host, port);
        self
    }

    pub fn with_base_dir(mut self, base_dir: PathBuf) -> Self {
        self.storage.base_dir = base_dir;
        self
    }

    fn normalized(mut self) -> Result<Self> {
        self.api_key = self
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if self.max_upload_bytes == 0 {
            return Err(ImgStoreError::Config(
                "max_upload_bytes must be greater than zero".to_string(),
            ));
        }

        if self.storage.base_dir.as_os_str().is_empty() {
            return Err(ImgStoreError::Config(
                "storage.base_dir cannot be empty".to_string(),
            ));
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.storage.base_dir, PathBuf::from("./storage"));
        assert_eq!(config.storage.layout(), ShardLayout::new(3, 2));
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("imgstore.toml");
        std::fs::write(
            &path,
            r#"
bind_addr = "127.0.0.1:9000"
api_key = "  secret  "
max_upload_bytes = 1024

[storage]
base_dir = "/var/lib/imgstore"
shard_depth = 2
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.storage.base_dir, PathBuf::from("/var/lib/imgstore"));
        assert_eq!(config.storage.layout(), ShardLayout::new(2, 2));
    }

    #[test]
    fn test_rejects_zero_upload_limit() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("imgstore.toml");
        std::fs::write(&path, "max_upload_bytes = 0\n").unwrap();

        assert!(matches!(
            Config::load(Some(path.to_str().unwrap())),
            Err(ImgStoreError::Config(_))
        ));
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default()
            .with_port(9999)
            .with_base_dir(PathBuf::from("/data"));
        assert_eq!(config.bind_addr, "0.0.0.0:9999");
        assert_eq!(config.storage.base_dir, PathBuf::from("/data"));

        let mut config = Config::default();
        config.bind_addr = "127.0.0.1:80".to_string();
        assert_eq!(config.with_port(8081).bind_addr, "127.0.0.1:8081");
    }
}
