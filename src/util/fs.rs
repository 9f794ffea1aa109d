use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::StreamExt;
use futures_core::Stream;
use tokio::fs::{OpenOptions, remove_file, rename};
use tokio::io::AsyncWriteExt;
use tracing::error;
use uuid::Uuid;

/// The file is written under a temporary name in the target directory and then renamed, so
///  readers never see a partially written file
pub async fn write_atomically(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let data = Bytes::copy_from_slice(data);
    write_stream_atomically(path, futures::stream::once(async move { Ok(data) })).await
}

pub async fn write_stream_atomically(
    path: &Path,
    data: impl Stream<Item=anyhow::Result<Bytes>> + Send,
) -> anyhow::Result<()> {
    let temp_path = temp_path_for(path);

    match do_write(&temp_path, data).await {
        Ok(_) => {
            rename(&temp_path, path).await?;
            Ok(())
        }
        Err(e) => {
            if let Err(cleanup_err) = remove_file(&temp_path).await {
                error!("error cleaning up {} after failed attempt to write: {}", temp_path.display(), cleanup_err);
            }
            Err(e)
        }
    }
}

async fn do_write(
    temp_path: &Path,
    data: impl Stream<Item=anyhow::Result<Bytes>> + Send,
) -> anyhow::Result<()> {
    let mut data = Box::pin(data);

    let mut file = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(temp_path)
        .await?;

    while let Some(bytes) = data.next().await {
        file.write_all(&bytes?).await?;
    }
    file.flush().await?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    // NB: uuids are unique, so there is no collision with leftovers of earlier failed writes
    path.with_file_name(format!(".{}.{}.writing", file_name, Uuid::new_v4().as_hyphenated()))
}
