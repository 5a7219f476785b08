use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::{Error, Store};

/// Filesystem-based artifact store.
///
/// Each artifact is stored at `{base_path}/{key}`. Writes go to a sibling
/// `.tmp` file that is renamed into place, so an interrupted run never leaves
/// a truncated artifact behind.
pub struct FsStore {
  base_path: PathBuf,
}

impl FsStore {
  /// Create a new filesystem store with the given base path.
  pub fn new(base_path: impl Into<PathBuf>) -> Self {
    Self {
      base_path: base_path.into(),
    }
  }

  fn key_to_path(&self, key: &str) -> PathBuf {
    self.base_path.join(key)
  }
}

fn tmp_path(path: &Path) -> PathBuf {
  let mut tmp = path.to_path_buf().into_os_string();
  tmp.push(".tmp");
  PathBuf::from(tmp)
}

async fn write_and_rename(tmp: &Path, path: &Path, data: &[u8]) -> Result<(), std::io::Error> {
  let mut file = File::create(tmp).await?;
  file.write_all(data).await?;
  file.flush().await?;
  file.sync_all().await?;
  drop(file);
  fs::rename(tmp, path).await
}

#[async_trait]
impl Store for FsStore {
  async fn prepare(&self, dir: &str) -> Result<(), Error> {
    fs::create_dir_all(self.key_to_path(dir)).await?;
    Ok(())
  }

  async fn put(&self, key: &str, data: Bytes) -> Result<(), Error> {
    let path = self.key_to_path(key);

    if let Some(parent) = path.parent()
      && !fs::try_exists(parent).await?
    {
      return Err(Error::MissingDirectory(key.to_string()));
    }

    let tmp = tmp_path(&path);
    if let Err(e) = write_and_rename(&tmp, &path, &data).await {
      // Best effort; the write error is the one worth reporting.
      let _ = fs::remove_file(&tmp).await;
      return Err(Error::Io(e));
    }

    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<(), Error> {
    fs::remove_file(self.key_to_path(key))
      .await
      .map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
          Error::NotFound(key.to_string())
        } else {
          Error::Io(e)
        }
      })
  }
}
