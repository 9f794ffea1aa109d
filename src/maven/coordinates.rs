use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // <version>-<yyyyMMdd.HHmmss>-<buildNumber>, as found in deployed snapshot file names
    static ref TIMESTAMPED_SNAPSHOT_REGEX: Regex = Regex::new(r"^(.*)-(\d{8}\.\d{6})-(\d+)$").unwrap();
}

pub const DEFAULT_EXTENSION: &str = "jar";

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum MavenVersion {
    Release(String),
    Snapshot {
        version: String, // ending in '-SNAPSHOT'
        timestamp: String,
        build_number: Option<u32>,
    }
}
impl MavenVersion {
    /// Classifies a version string as it appears in a coordinate. Timestamped snapshot versions
    ///  (e.g. "1.0-20240101.123456-3") are recognized, everything else is taken literally.
    pub fn parse(version: &str) -> MavenVersion {
        if let Some(captures) = TIMESTAMPED_SNAPSHOT_REGEX.captures(version) {
            if let Ok(build_number) = captures[3].parse::<u32>() {
                return MavenVersion::Snapshot {
                    version: format!("{}-SNAPSHOT", &captures[1]),
                    timestamp: captures[2].to_string(),
                    build_number: Some(build_number),
                };
            }
        }
        MavenVersion::Release(version.to_string())
    }

    /// The version as it is used for directory names and metadata, i.e. with a snapshot's
    ///  timestamp normalized to '-SNAPSHOT'
    pub fn base_version(&self) -> &str {
        match self {
            MavenVersion::Release(s) => s,
            MavenVersion::Snapshot { version, .. } => version,
        }
    }

    pub fn is_snapshot(&self) -> bool {
        match self {
            MavenVersion::Release(s) => s.ends_with("-SNAPSHOT"),
            MavenVersion::Snapshot { .. } => true,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MavenArtifactId(pub String);

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MavenGroupId(pub String);

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MavenCoordinates {
    pub group_id: MavenGroupId,
    pub artifact_id: MavenArtifactId,
    pub version: MavenVersion,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum MavenClassifier {
    Unclassified,
    Classified(String),
}
impl MavenClassifier {
    pub fn from_option(classifier: Option<&str>) -> MavenClassifier {
        match classifier {
            Some(c) if !c.is_empty() => MavenClassifier::Classified(c.to_string()),
            _ => MavenClassifier::Unclassified,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MavenArtifactRef {
    pub coordinates: MavenCoordinates,
    pub classifier: MavenClassifier,
    pub file_extension: String, // without leading '.', e.g. "jar"
}
impl MavenArtifactRef {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> MavenArtifactRef {
        MavenArtifactRef {
            coordinates: MavenCoordinates {
                group_id: MavenGroupId(group_id.to_string()),
                artifact_id: MavenArtifactId(artifact_id.to_string()),
                version: MavenVersion::parse(version),
            },
            classifier: MavenClassifier::Unclassified,
            file_extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> MavenArtifactRef {
        self.file_extension = extension.to_string();
        self
    }

    pub fn with_classifier(mut self, classifier: &str) -> MavenArtifactRef {
        self.classifier = MavenClassifier::from_option(Some(classifier));
        self
    }

    pub fn base_version(&self) -> &str {
        self.coordinates.version.base_version()
    }
}

/// group:artifact:extension[:classifier]:version - the form used in log output
impl Display for MavenArtifactRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.coordinates.group_id.0, self.coordinates.artifact_id.0, self.file_extension)?;
        if let MavenClassifier::Classified(c) = &self.classifier {
            write!(f, ":{}", c)?;
        }
        match &self.coordinates.version {
            MavenVersion::Release(v) => write!(f, ":{}", v),
            MavenVersion::Snapshot { version, timestamp, build_number } => {
                let base = version.strip_suffix("-SNAPSHOT").unwrap_or(version);
                match build_number {
                    Some(n) => write!(f, ":{}-{}-{}", base, timestamp, n),
                    None => write!(f, ":{}-{}", base, timestamp),
                }
            }
        }
    }
}

/// An artifact reference after resolution against some repository. `file` is the handle to the
///  locally available content - `None` if the resolver could not find any.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ResolvedArtifact {
    pub artifact_ref: MavenArtifactRef,
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod test {
    use rstest::*;
    use super::*;

    #[rstest]
    #[case::release("1.0.0", "1.0.0", false)]
    #[case::plain_snapshot("1.0.0-SNAPSHOT", "1.0.0-SNAPSHOT", true)]
    #[case::timestamped_snapshot("1.0.0-20240101.123456-3", "1.0.0-SNAPSHOT", true)]
    #[case::not_quite_timestamped("1.0.0-20240101-3", "1.0.0-20240101-3", false)]
    #[case::empty("", "", false)]
    fn test_base_version(#[case] version: &str, #[case] expected_base: &str, #[case] expected_snapshot: bool) {
        let version = MavenVersion::parse(version);
        assert_eq!(version.base_version(), expected_base);
        assert_eq!(version.is_snapshot(), expected_snapshot);
    }

    #[test]
    fn test_parse_timestamped_snapshot() {
        assert_eq!(
            MavenVersion::parse("2.1-20231224.235959-12"),
            MavenVersion::Snapshot {
                version: "2.1-SNAPSHOT".to_string(),
                timestamp: "20231224.235959".to_string(),
                build_number: Some(12),
            }
        );
    }

    #[rstest]
    #[case::plain(MavenArtifactRef::new("g", "a", "1.0"), "g:a:jar:1.0")]
    #[case::classified(MavenArtifactRef::new("g", "a", "1.0").with_extension("xml").with_classifier("features"), "g:a:xml:features:1.0")]
    #[case::snapshot(MavenArtifactRef::new("g", "a", "1.0-20240101.123456-3"), "g:a:jar:1.0-20240101.123456-3")]
    fn test_display(#[case] artifact_ref: MavenArtifactRef, #[case] expected: &str) {
        assert_eq!(artifact_ref.to_string(), expected);
    }

    #[test]
    fn test_empty_classifier_is_unclassified() {
        assert_eq!(MavenClassifier::from_option(Some("")), MavenClassifier::Unclassified);
        assert_eq!(MavenClassifier::from_option(None), MavenClassifier::Unclassified);
    }
}
