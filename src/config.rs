use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Configuration of an add-to-repository run, read from a JSON file
#[derive(Debug, Clone, Deserialize)]
pub struct AddToRepositoryConfig {
    /// the directory the repository is created in
    #[serde(default = "default_repository")]
    pub repository: PathBuf,
    /// where descriptors and bundles are looked up
    #[serde(default = "default_local_repository")]
    pub local_repository: PathBuf,
    /// copy all files directly into the repository directory instead of the maven layout
    #[serde(default)]
    pub flat_repo_layout: bool,
    #[serde(default)]
    pub generate_maven_metadata: bool,
    /// features descriptor locations, either as mvn URLs or as group:artifact:extension:classifier:version
    #[serde(default)]
    pub descriptors: Vec<String>,
    /// 'name' or 'name/version'; all features of all descriptors if empty
    #[serde(default)]
    pub features: Vec<String>,
    /// also copy conditional bundles that are flagged as dependency
    #[serde(default)]
    pub ignore_dependency_flag: bool,
    /// skip bundle locations that are not mvn URLs rather than failing them
    #[serde(default = "default_true")]
    pub skip_non_maven_protocols: bool,
    #[serde(default)]
    pub copy_file_based_descriptors: Vec<CopyFileBasedDescriptor>,
}

/// A file that is copied into the repository as-is
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct CopyFileBasedDescriptor {
    pub source_file: PathBuf,
    /// relative to the repository
    #[serde(default)]
    pub target_directory: PathBuf,
    pub target_file_name: String,
}

fn default_repository() -> PathBuf {
    PathBuf::from("target").join("features-repo")
}

fn default_local_repository() -> PathBuf {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default();
    home.join(".m2").join("repository")
}

fn default_true() -> bool {
    true
}

impl AddToRepositoryConfig {
    pub fn parse(json: &str) -> anyhow::Result<AddToRepositoryConfig> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn load(path: &Path) -> anyhow::Result<AddToRepositoryConfig> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading configuration {}", path.display()))?;
        Self::parse(&json)
            .with_context(|| format!("parsing configuration {}", path.display()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AddToRepositoryConfig::parse("{}").unwrap();

        assert_eq!(config.repository, PathBuf::from("target/features-repo"));
        assert!(config.local_repository.ends_with(".m2/repository"));
        assert!(!config.flat_repo_layout);
        assert!(!config.generate_maven_metadata);
        assert!(!config.ignore_dependency_flag);
        assert!(config.skip_non_maven_protocols);
        assert!(config.descriptors.is_empty());
        assert!(config.features.is_empty());
        assert!(config.copy_file_based_descriptors.is_empty());
    }

    #[test]
    fn test_full() {
        let config = AddToRepositoryConfig::parse(r#"{
            "repository": "/tmp/repo",
            "local_repository": "/home/user/.m2/repository",
            "flat_repo_layout": true,
            "generate_maven_metadata": true,
            "descriptors": ["mvn:org.foo/features/1.0/xml/features"],
            "features": ["web/1.0"],
            "ignore_dependency_flag": true,
            "skip_non_maven_protocols": false,
            "copy_file_based_descriptors": [
                { "source_file": "src/main/custom.xml", "target_directory": "etc", "target_file_name": "custom.xml" }
            ]
        }"#).unwrap();

        assert_eq!(config.repository, PathBuf::from("/tmp/repo"));
        assert!(config.flat_repo_layout);
        assert!(config.generate_maven_metadata);
        assert!(!config.skip_non_maven_protocols);
        assert_eq!(config.features, vec!["web/1.0".to_string()]);
        assert_eq!(config.copy_file_based_descriptors, vec![CopyFileBasedDescriptor {
            source_file: PathBuf::from("src/main/custom.xml"),
            target_directory: PathBuf::from("etc"),
            target_file_name: "custom.xml".to_string(),
        }]);
    }

    #[test]
    fn test_invalid() {
        assert!(AddToRepositoryConfig::parse(r#"{ "flat_repo_layout": "yes" }"#).is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = AddToRepositoryConfig::load(&dir.path().join("config.json")).await.unwrap_err();
        assert!(error.to_string().starts_with("reading configuration"));
    }
}
