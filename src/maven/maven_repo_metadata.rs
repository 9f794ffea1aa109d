use std::path::Path;

use async_trait::async_trait;
use tokio::fs::{create_dir_all, read_to_string, try_exists};
use tracing::trace;

use crate::maven::metadata_xml::{format_metadata, Metadata, parse_metadata};
use crate::util::fs::write_atomically;

/// Reading and writing of maven-metadata.xml documents.
///
/// NB: There is no locking - concurrent read-merge-write cycles for the same path can lose
///  versions. Callers must serialize writes per path.
#[async_trait]
pub trait MavenRepoMetadataStore: Send + Sync {
    /// `None` if there is no document at the path yet
    async fn read(&self, path: &Path) -> anyhow::Result<Option<Metadata>>;

    async fn write(&self, path: &Path, metadata: &Metadata) -> anyhow::Result<()>;
}

/// Stores metadata documents as XML files in the file system
pub struct FsMetadataStore {
}

#[async_trait]
impl MavenRepoMetadataStore for FsMetadataStore {
    async fn read(&self, path: &Path) -> anyhow::Result<Option<Metadata>> {
        if !try_exists(path).await? {
            trace!("no metadata at {}", path.display());
            return Ok(None);
        }

        trace!("reading metadata from {}", path.display());
        let xml = read_to_string(path).await?;
        Ok(Some(parse_metadata(&xml)?))
    }

    async fn write(&self, path: &Path, metadata: &Metadata) -> anyhow::Result<()> {
        trace!("writing metadata to {}", path.display());
        if let Some(parent) = path.parent() {
            create_dir_all(parent).await?;
        }
        let xml = format_metadata(metadata)?;
        write_atomically(path, xml.as_bytes()).await
    }
}
