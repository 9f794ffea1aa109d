pub mod file_copier;

use std::path::{Path, PathBuf};

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::maven::coordinates::{MavenArtifactRef, ResolvedArtifact};
use crate::maven::maven_repo_metadata::MavenRepoMetadataStore;
use crate::maven::metadata_xml::{last_updated_now, Metadata, with_artifact_version, with_version_snapshot};
use crate::maven::paths::{artifact_metadata_path, as_file_path, RepoLayout, version_metadata_path};
use crate::repository::file_copier::FileCopier;
use crate::util::checksum::write_checksum_files;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("artifact {0} is not present in the local repository")]
    MissingContent(MavenArtifactRef),
}

/// What happened to a single item of a batch. Failures of one item never abort the batch.
#[derive(Debug)]
pub enum ArtifactOutcome {
    Copied {
        item: String,
        destination: PathBuf,
    },
    Skipped {
        item: String,
        reason: String,
    },
    Failed {
        item: String,
        error: anyhow::Error,
    },
}
impl ArtifactOutcome {
    pub fn item(&self) -> &str {
        match self {
            ArtifactOutcome::Copied { item, .. } => item,
            ArtifactOutcome::Skipped { item, .. } => item,
            ArtifactOutcome::Failed { item, .. } => item,
        }
    }

    pub fn is_copied(&self) -> bool {
        matches!(self, ArtifactOutcome::Copied { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ArtifactOutcome::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ArtifactOutcome::Skipped { .. })
    }

    /// logs failures as warnings, so that callers need not do it
    pub fn from_result(item: String, result: anyhow::Result<PathBuf>) -> ArtifactOutcome {
        match result {
            Ok(destination) => ArtifactOutcome::Copied { item, destination },
            Err(error) => {
                warn!("error copying artifact {}: {:#}", item, error);
                ArtifactOutcome::Failed { item, error }
            }
        }
    }
}

/// The repository directory that artifacts are materialized into
pub struct FeaturesRepository<C: FileCopier, M: MavenRepoMetadataStore> {
    root: PathBuf,
    layout: RepoLayout,
    generate_metadata: bool,
    copier: C,
    metadata_store: M,
}

impl <C: FileCopier, M: MavenRepoMetadataStore> FeaturesRepository<C, M> {
    pub fn new(root: PathBuf, layout: RepoLayout, generate_metadata: bool, copier: C, metadata_store: M) -> FeaturesRepository<C, M> {
        FeaturesRepository {
            root,
            layout,
            generate_metadata,
            copier,
            metadata_store,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn destination_for(&self, artifact_ref: &MavenArtifactRef) -> PathBuf {
        as_file_path(&self.root, artifact_ref, self.layout)
    }

    /// Copies a single artifact into the repository, followed by metadata and checksums if those
    ///  are enabled. Returns the path the artifact was copied to.
    pub async fn materialize(&self, artifact: &ResolvedArtifact) -> anyhow::Result<PathBuf> {
        info!("copying artifact: {}", artifact.artifact_ref);

        let destination = self.destination_for(&artifact.artifact_ref);

        let source = match &artifact.file {
            Some(f) => f,
            None => return Err(RepositoryError::MissingContent(artifact.artifact_ref.clone()).into()),
        };

        self.copier.copy(source, &destination)
            .await
            .with_context(|| format!("copying {} to {}", source.display(), destination.display()))?;

        if self.generate_metadata {
            self.write_metadata_and_checksums(&artifact.artifact_ref, &destination).await?;
        }

        Ok(destination)
    }

    async fn write_metadata_and_checksums(&self, artifact_ref: &MavenArtifactRef, destination: &Path) -> anyhow::Result<()> {
        let version_metadata = version_metadata_path(destination);
        let artifact_metadata = artifact_metadata_path(destination);
        debug!("updating {} and {}", version_metadata.display(), artifact_metadata.display());

        let last_updated = last_updated_now();
        self.update_metadata(&version_metadata, |m| with_version_snapshot(m, artifact_ref, &last_updated)).await?;
        self.update_metadata(&artifact_metadata, |m| with_artifact_version(m, artifact_ref)).await?;

        for file in [destination, version_metadata.as_path(), artifact_metadata.as_path()] {
            write_checksum_files(file)
                .await
                .with_context(|| format!("writing checksums for {}", file.display()))?;
        }
        Ok(())
    }

    /// load -> transform -> persist
    async fn update_metadata(&self, path: &Path, transform: impl FnOnce(Metadata) -> Metadata) -> anyhow::Result<()> {
        let existing = self.metadata_store.read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?
            .unwrap_or_default();

        self.metadata_store.write(path, &transform(existing))
            .await
            .with_context(|| format!("writing {}", path.display()))
    }

    /// Materializes artifacts one after the other, with one outcome per artifact in input order
    pub async fn materialize_all(&self, artifacts: &[ResolvedArtifact]) -> Vec<ArtifactOutcome> {
        let mut result = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let outcome = self.materialize(artifact).await;
            result.push(ArtifactOutcome::from_result(artifact.artifact_ref.to_string(), outcome));
        }
        result
    }

    /// Copies a file that is not a maven artifact to a path relative to the repository root. No
    ///  metadata or checksums are generated for it.
    pub async fn copy_file(&self, source: &Path, relative_destination: &Path) -> anyhow::Result<PathBuf> {
        let destination = self.root.join(relative_destination);
        info!("copying file {} to {}", source.display(), destination.display());

        self.copier.copy(source, &destination)
            .await
            .with_context(|| format!("copying {} to {}", source.display(), destination.display()))?;
        Ok(destination)
    }
}
