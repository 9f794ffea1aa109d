use std::path::{Path, PathBuf};

use crate::maven::coordinates::*;

pub const MAVEN_METADATA_FILE_NAME: &str = "maven-metadata.xml";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum RepoLayout {
    /// <group as path>/<artifactId>/<baseVersion>/<file name>
    #[default]
    Default,
    /// all files directly in the repository root
    Flat,
}
impl RepoLayout {
    pub fn from_flat_flag(flat: bool) -> RepoLayout {
        if flat { RepoLayout::Flat } else { RepoLayout::Default }
    }
}

/// The path of an artifact relative to the repository root, always with '/' as separator
pub fn as_maven_path(artifact_ref: &MavenArtifactRef, layout: RepoLayout) -> String {
    match layout {
        RepoLayout::Default => format!("{}/{}", maven_dir(artifact_ref), maven_file_name(artifact_ref)),
        RepoLayout::Flat => maven_file_name(artifact_ref),
    }
}

/// Resolves an artifact's relative path against a repository root directory
pub fn as_file_path(root: &Path, artifact_ref: &MavenArtifactRef, layout: RepoLayout) -> PathBuf {
    let mut result = root.to_path_buf();
    for segment in as_maven_path(artifact_ref, layout).split('/') {
        result.push(segment);
    }
    result
}

fn maven_dir(artifact_ref: &MavenArtifactRef) -> String {
    format!(
        "{}/{}/{}",
        artifact_ref.coordinates.group_id.0.replace('.', "/"),
        artifact_ref.coordinates.artifact_id.0,
        artifact_ref.base_version(),
    )
}

pub fn maven_file_name(artifact_ref: &MavenArtifactRef) -> String {
    let classifier_string = match &artifact_ref.classifier {
        MavenClassifier::Unclassified => "".to_string(),
        MavenClassifier::Classified(c) => format!("-{}", c),
    };

    format!("{}-{}{}.{}",
            artifact_ref.coordinates.artifact_id.0,
            artifact_ref.base_version(),
            classifier_string,
            artifact_ref.file_extension,
    )
}

/// maven-metadata.xml for a single version lives next to the artifact file
pub fn version_metadata_path(artifact_file: &Path) -> PathBuf {
    sibling_dir(artifact_file).join(MAVEN_METADATA_FILE_NAME)
}

/// maven-metadata.xml listing all versions lives one level above the version directory
pub fn artifact_metadata_path(artifact_file: &Path) -> PathBuf {
    let version_dir = sibling_dir(artifact_file);
    let artifact_dir = version_dir.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| version_dir.join(".."));
    artifact_dir.join(MAVEN_METADATA_FILE_NAME)
}

fn sibling_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(p) => p.to_path_buf(),
        None => PathBuf::new(),
    }
}
