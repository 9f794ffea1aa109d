//! The maven-metadata.xml document, see
//!  https://maven.apache.org/ref/3.9.5/maven-repository-metadata/repository-metadata.html
//!
//! Only the parts that are relevant for a local repository are modelled: groupId, artifactId,
//!  version, and the versioning block with the version list, snapshot info and last update.

use serde::{Deserialize, Serialize};

use crate::maven::coordinates::MavenArtifactRef;

pub const MODEL_VERSION: &str = "1.1.0";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "@modelVersion", default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(rename = "groupId", default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(rename = "artifactId", default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub versioning: Versioning,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Versioning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Snapshot>,
    #[serde(default, skip_serializing_if = "Versions::is_empty")]
    pub versions: Versions,
    #[serde(rename = "lastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Versions {
    #[serde(default)]
    pub version: Vec<String>,
}
impl Versions {
    pub fn is_empty(&self) -> bool {
        self.version.is_empty()
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(rename = "buildNumber", default, skip_serializing_if = "Option::is_none")]
    pub build_number: Option<u32>,
    #[serde(rename = "localCopy", default, skip_serializing_if = "Option::is_none")]
    pub local_copy: Option<bool>,
}

impl Metadata {
    pub fn versions(&self) -> &[String] {
        &self.versioning.versions.version
    }

    /// Appends a version to the version list unless it is already there. Versions are kept in
    ///  the order they were first added.
    pub fn with_added_version(mut self, version: &str) -> Metadata {
        if !self.versioning.versions.version.iter().any(|v| v == version) {
            self.versioning.versions.version.push(version.to_string());
        }
        self
    }

    fn with_coordinates(mut self, artifact_ref: &MavenArtifactRef) -> Metadata {
        self.group_id = Some(artifact_ref.coordinates.group_id.0.clone());
        self.artifact_id = Some(artifact_ref.coordinates.artifact_id.0.clone());
        self.model_version = Some(MODEL_VERSION.to_string());
        self
    }
}

/// Merges an artifact into the metadata of its version directory: the version is pinned, and the
///  document is marked as a local copy updated at `last_updated` (yyyyMMddHHmmss).
pub fn with_version_snapshot(metadata: Metadata, artifact_ref: &MavenArtifactRef, last_updated: &str) -> Metadata {
    let mut metadata = metadata
        .with_coordinates(artifact_ref)
        .with_added_version(artifact_ref.base_version());

    metadata.version = Some(artifact_ref.base_version().to_string());

    let mut snapshot = metadata.versioning.snapshot.take().unwrap_or_default();
    snapshot.local_copy = Some(true);
    metadata.versioning.snapshot = Some(snapshot);
    metadata.versioning.last_updated = Some(last_updated.to_string());
    metadata
}

/// Merges an artifact into the metadata of its artifact directory, which lists all versions
pub fn with_artifact_version(metadata: Metadata, artifact_ref: &MavenArtifactRef) -> Metadata {
    metadata
        .with_coordinates(artifact_ref)
        .with_added_version(artifact_ref.base_version())
}

/// The current time in the format maven-metadata.xml uses for `lastUpdated`, in UTC
pub fn last_updated_now() -> String {
    jiff::Timestamp::now()
        .strftime("%Y%m%d%H%M%S")
        .to_string()
}

pub fn parse_metadata(xml: &str) -> anyhow::Result<Metadata> {
    Ok(quick_xml::de::from_str(xml)?)
}

pub fn format_metadata(metadata: &Metadata) -> anyhow::Result<String> {
    let mut xml = XML_DECLARATION.to_string();

    let mut serializer = quick_xml::se::Serializer::with_root(&mut xml, Some("metadata"))?;
    serializer.indent(' ', 2);
    metadata.serialize(serializer)?;

    xml.push('\n');
    Ok(xml)
}

#[cfg(test)]
mod test {
    use super::*;

    fn artifact(version: &str) -> MavenArtifactRef {
        MavenArtifactRef::new("org.foo", "bar", version)
    }

    #[test]
    fn test_artifact_version_is_not_duplicated() {
        let metadata = with_artifact_version(Metadata::default(), &artifact("1.0"));
        let metadata = with_artifact_version(metadata, &artifact("1.0"));

        assert_eq!(metadata.versions(), &["1.0".to_string()]);
        assert_eq!(metadata.group_id.as_deref(), Some("org.foo"));
        assert_eq!(metadata.artifact_id.as_deref(), Some("bar"));
        assert_eq!(metadata.version, None);
    }

    #[test]
    fn test_artifact_versions_keep_insertion_order() {
        let metadata = with_artifact_version(Metadata::default(), &artifact("2.0"));
        let metadata = with_artifact_version(metadata, &artifact("1.0"));

        assert_eq!(metadata.versions(), &["2.0".to_string(), "1.0".to_string()]);
    }

    #[test]
    fn test_version_snapshot() {
        let metadata = with_version_snapshot(Metadata::default(), &artifact("1.0-20240101.123456-3"), "20240102030405");

        assert_eq!(metadata.version.as_deref(), Some("1.0-SNAPSHOT"));
        assert_eq!(metadata.versions(), &["1.0-SNAPSHOT".to_string()]);
        assert_eq!(metadata.model_version.as_deref(), Some(MODEL_VERSION));
        assert_eq!(metadata.versioning.last_updated.as_deref(), Some("20240102030405"));
        assert_eq!(metadata.versioning.snapshot.as_ref().and_then(|s| s.local_copy), Some(true));
    }

    #[test]
    fn test_version_snapshot_merges_existing_document() {
        let existing = Metadata {
            versioning: Versioning {
                snapshot: Some(Snapshot { timestamp: Some("20200101.000000".to_string()), build_number: Some(1), local_copy: None }),
                versions: Versions { version: vec!["0.9".to_string()] },
                ..Default::default()
            },
            ..Default::default()
        };

        let metadata = with_version_snapshot(existing, &artifact("1.0"), "20240102030405");

        assert_eq!(metadata.versions(), &["0.9".to_string(), "1.0".to_string()]);
        let snapshot = metadata.versioning.snapshot.unwrap();
        assert_eq!(snapshot.build_number, Some(1));
        assert_eq!(snapshot.local_copy, Some(true));
    }

    #[test]
    fn test_format_and_parse() {
        let metadata = with_version_snapshot(Metadata::default(), &artifact("1.0"), "20240102030405");

        let xml = format_metadata(&metadata).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<metadata modelVersion=\"1.1.0\">"));
        assert!(xml.contains("<groupId>org.foo</groupId>"));
        assert!(xml.contains("<version>1.0</version>"));
        assert!(xml.contains("<localCopy>true</localCopy>"));
        assert!(xml.contains("<lastUpdated>20240102030405</lastUpdated>"));

        assert_eq!(parse_metadata(&xml).unwrap(), metadata);
    }

    #[test]
    fn test_parse_foreign_document() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>org.foo</groupId>
  <artifactId>bar</artifactId>
  <versioning>
    <latest>1.1</latest>
    <release>1.1</release>
    <versions>
      <version>1.0</version>
      <version>1.1</version>
    </versions>
    <lastUpdated>20231010101010</lastUpdated>
  </versioning>
</metadata>
"#;
        let metadata = parse_metadata(xml).unwrap();
        assert_eq!(metadata.model_version, None);
        assert_eq!(metadata.versioning.latest.as_deref(), Some("1.1"));
        assert_eq!(metadata.versions(), &["1.0".to_string(), "1.1".to_string()]);

        let metadata = with_artifact_version(metadata, &artifact("1.2"));
        assert_eq!(metadata.versions(), &["1.0".to_string(), "1.1".to_string(), "1.2".to_string()]);
        assert_eq!(metadata.versioning.latest.as_deref(), Some("1.1"));
    }

    #[test]
    fn test_parse_invalid_document() {
        assert!(parse_metadata("<metadata><groupId>x</metadata>").is_err());
    }

    #[test]
    fn test_last_updated_format() {
        let now = last_updated_now();
        assert_eq!(now.len(), 14);
        assert!(now.chars().all(|c| c.is_ascii_digit()));
    }
}
