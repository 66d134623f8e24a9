use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::debug;

use super::kv::KeyValueStore;

/// The main realization of [KeyValueStore]. Each key is saved into `<dir>/<key>.json`.
pub struct FileStore {
    store_dir: PathBuf,
}

impl FileStore {
    pub fn new(store_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&store_dir)?;

        Ok(Self { store_dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.store_dir.join(format!("{key}.json"))
    }

    async fn read_inner(path: &Path) -> Result<String, std::io::Error> {
        debug!("Reading {path:?}");
        let mut file = File::open(path).await?;
        file.lock_shared()?;
        let mut value = String::new();
        let result = file.read_to_string(&mut value).await;
        file.unlock_async().await?;
        result?;
        Ok(value)
    }

    async fn write_inner(path: &Path, value: &[u8]) -> Result<(), std::io::Error> {
        debug!("Writing {} bytes into {path:?}", value.len());
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .await?;

        // Semi-safe acquire-release for a file. Truncation happens only once the lock is held.
        file.lock_exclusive()?;
        let result = async {
            file.set_len(0).await?;
            file.write_all(value).await?;
            file.flush().await?;
            file.sync_data().await
        }
        .await;
        file.unlock_async().await?;
        result
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match Self::read_inner(&self.key_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)?,
        }
    }

    async fn set(&mut self, key: &str, value: String) -> Result<()> {
        Self::write_inner(&self.key_path(key), value.as_bytes()).await?;
        Ok(())
    }
}
