use std::path::Path;

use async_trait::async_trait;
use tokio::fs::{create_dir_all, File};
use tracing::trace;

use crate::util::checksum::file_stream;
use crate::util::fs::write_stream_atomically;

/// Copies content into the target repository
#[async_trait]
pub trait FileCopier: Send + Sync {
    /// Copies `source` to `destination`, creating missing parent directories and replacing an
    ///  existing file
    async fn copy(&self, source: &Path, destination: &Path) -> anyhow::Result<()>;
}

pub struct FsFileCopier {
}

#[async_trait]
impl FileCopier for FsFileCopier {
    async fn copy(&self, source: &Path, destination: &Path) -> anyhow::Result<()> {
        trace!("copying {} to {}", source.display(), destination.display());

        let file = File::open(source).await?;
        if let Some(parent) = destination.parent() {
            create_dir_all(parent).await?;
        }
        write_stream_atomically(destination, file_stream(file)).await
    }
}
