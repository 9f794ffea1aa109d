use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs::try_exists;
use tracing::{debug, trace};

use crate::maven::coordinates::{MavenArtifactRef, ResolvedArtifact};
use crate::maven::paths::{as_file_path, RepoLayout};

/// Finds the content for an artifact reference.
///
/// An artifact that can not be found is not an error at this level - it is returned without a
///  file, and handled by whoever needs the content.
#[async_trait]
pub trait ArtifactResolver: Send + Sync {
    async fn resolve(&self, artifact_ref: &MavenArtifactRef) -> anyhow::Result<ResolvedArtifact>;
}

/// A maven repository in the local file system with the default layout, e.g. ~/.m2/repository.
///  Nothing is ever downloaded into it.
pub struct LocalMavenRepo {
    root: PathBuf,
}
impl LocalMavenRepo {
    pub fn new(root: PathBuf) -> LocalMavenRepo {
        LocalMavenRepo {
            root,
        }
    }
}

#[async_trait]
impl ArtifactResolver for LocalMavenRepo {
    async fn resolve(&self, artifact_ref: &MavenArtifactRef) -> anyhow::Result<ResolvedArtifact> {
        let path = as_file_path(&self.root, artifact_ref, RepoLayout::Default);
        trace!("looking up {} at {}", artifact_ref, path.display());

        let file = if try_exists(&path).await? {
            Some(path)
        }
        else {
            debug!("{} not found in local repository {}", artifact_ref, self.root.display());
            None
        };

        Ok(ResolvedArtifact {
            artifact_ref: artifact_ref.clone(),
            file,
        })
    }
}
