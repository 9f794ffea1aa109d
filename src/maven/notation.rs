//! Conversion between the two notations artifacts are referenced by in features descriptors:
//!
//! * the PAX URL style: `[wrap:|blueprint:]mvn:<groupId>/<artifactId>/<version>[/<type>[/<classifier>]]`
//! * the colon separated coordinates: `<groupId>:<artifactId>[:<extension>[:<classifier>]]:<version>`
//!
//! Translation is advisory rather than validating: strings that do not match the source notation
//!  are returned unchanged, so mixed lists can be fed through the same function.
//!
//! NB: repository URLs inside mvn URLs (`mvn:http://repo!g/a/1.0`) are not supported.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::maven::coordinates::{DEFAULT_EXTENSION, MavenArtifactId, MavenArtifactRef, MavenClassifier, MavenCoordinates, MavenGroupId, MavenVersion};

lazy_static! {
    static ref AETHER_REGEX: Regex = Regex::new(r"^([^: ]+):([^: ]+)(:([^: ]*)(:([^: ]+))?)?:([^: ]+)$").unwrap();
    static ref MVN_REGEX: Regex = Regex::new(r"^(?:(?:wrap:)|(?:blueprint:))?mvn:([^/ ]+)/([^/ ]+)/([^/$ ]*)(/([^/$ ]+)(/([^/$ ]+))?)?(/\$.+)?$").unwrap();
}

// capture group indices
const MVN_GROUP_ID: usize = 1;
const MVN_ARTIFACT_ID: usize = 2;
const MVN_VERSION: usize = 3;
const MVN_TYPE: usize = 5;
const MVN_CLASSIFIER: usize = 7;

const AETHER_GROUP_ID: usize = 1;
const AETHER_ARTIFACT_ID: usize = 2;
const AETHER_EXTENSION: usize = 4;
const AETHER_CLASSIFIER: usize = 6;
const AETHER_VERSION: usize = 7;

/// an optional capture group counts as present only if it matched something non-empty
fn present<'a>(captures: &Captures<'a>, index: usize) -> Option<&'a str> {
    captures.get(index)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
}

fn group<'a>(captures: &Captures<'a>, index: usize) -> &'a str {
    captures.get(index)
        .map(|m| m.as_str())
        .unwrap_or("")
}

pub fn is_mvn_url(name: &str) -> bool {
    MVN_REGEX.is_match(name)
}

/// Converts an mvn URL to colon separated coordinates. A plain 'jar' type without classifier is
///  the default and therefore dropped, i.e. `mvn:g/a/1.0/jar` becomes `g:a:1.0`.
pub fn mvn_to_aether(name: &str) -> String {
    let captures = match MVN_REGEX.captures(name) {
        Some(c) => c,
        None => return name.to_string(),
    };

    let mut result = format!("{}:{}:", group(&captures, MVN_GROUP_ID), group(&captures, MVN_ARTIFACT_ID));

    let extension = present(&captures, MVN_TYPE);
    if let Some(classifier) = present(&captures, MVN_CLASSIFIER) {
        result.push_str(extension.unwrap_or(DEFAULT_EXTENSION));
        result.push(':');
        result.push_str(classifier);
        result.push(':');
    }
    else if let Some(extension) = extension.filter(|e| *e != DEFAULT_EXTENSION) {
        result.push_str(extension);
        result.push(':');
    }

    // NB: the version may be empty
    result.push_str(group(&captures, MVN_VERSION));
    result
}

/// Converts colon separated coordinates to an mvn URL. An explicit extension is always kept, even
///  if it is 'jar'. Protocol wrappers like 'wrap:' can not be reconstructed.
pub fn aether_to_mvn(name: &str) -> String {
    let captures = match AETHER_REGEX.captures(name) {
        Some(c) => c,
        None => return name.to_string(),
    };

    let mut result = format!(
        "mvn:{}/{}/{}",
        group(&captures, AETHER_GROUP_ID),
        group(&captures, AETHER_ARTIFACT_ID),
        group(&captures, AETHER_VERSION),
    );

    let extension = present(&captures, AETHER_EXTENSION);
    if let Some(classifier) = present(&captures, AETHER_CLASSIFIER) {
        result.push('/');
        result.push_str(extension.unwrap_or(DEFAULT_EXTENSION));
        result.push('/');
        result.push_str(classifier);
    }
    else if let Some(extension) = extension {
        result.push('/');
        result.push_str(extension);
    }
    result
}

/// Parses an mvn URL into a typed artifact reference. Returns `None` if the string is not an mvn
///  URL, or if it has no version - there is nothing to look up without one.
pub fn parse_mvn_url(name: &str) -> Option<MavenArtifactRef> {
    let captures = MVN_REGEX.captures(name)?;
    let version = present(&captures, MVN_VERSION)?;

    Some(MavenArtifactRef {
        coordinates: MavenCoordinates {
            group_id: MavenGroupId(group(&captures, MVN_GROUP_ID).to_string()),
            artifact_id: MavenArtifactId(group(&captures, MVN_ARTIFACT_ID).to_string()),
            version: MavenVersion::parse(version),
        },
        classifier: MavenClassifier::from_option(present(&captures, MVN_CLASSIFIER)),
        file_extension: present(&captures, MVN_TYPE)
            .unwrap_or(DEFAULT_EXTENSION)
            .to_string(),
    })
}

#[cfg(test)]
mod test {
    use rstest::*;
    use super::*;

    #[rstest]
    #[case::plain("mvn:g/a/1.0", "g:a:1.0")]
    #[case::jar_is_elided("mvn:g/a/1.0/jar", "g:a:1.0")]
    #[case::other_type("mvn:g/a/1.0/war", "g:a:war:1.0")]
    #[case::jar_with_classifier("mvn:g/a/1.0/jar/sources", "g:a:jar:sources:1.0")]
    #[case::type_with_classifier("mvn:g/a/1.0/war/sources", "g:a:war:sources:1.0")]
    #[case::dotted_group("mvn:org.apache.karaf/org.apache.karaf.main/4.4.0", "org.apache.karaf:org.apache.karaf.main:4.4.0")]
    #[case::wrap_prefix("wrap:mvn:g/a/1.0", "g:a:1.0")]
    #[case::blueprint_prefix("blueprint:mvn:g/a/1.0/xml/features", "g:a:xml:features:1.0")]
    #[case::query_suffix("wrap:mvn:g/a/1.0/$Bundle-SymbolicName=x", "g:a:1.0")]
    #[case::query_suffix_after_type("mvn:g/a/1.0/war/$x=y", "g:a:war:1.0")]
    #[case::empty_version("mvn:g/a/", "g:a:")]
    #[case::snapshot("mvn:g/a/1.0-SNAPSHOT/xml/features", "g:a:xml:features:1.0-SNAPSHOT")]
    fn test_mvn_to_aether(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(mvn_to_aether(input), expected);
    }

    #[rstest]
    #[case::plain("g:a:1.0", "mvn:g/a/1.0")]
    #[case::other_extension("g:a:war:1.0", "mvn:g/a/1.0/war")]
    #[case::explicit_jar_is_kept("g:a:jar:1.0", "mvn:g/a/1.0/jar")]
    #[case::extension_with_classifier("g:a:war:sources:1.0", "mvn:g/a/1.0/war/sources")]
    #[case::empty_extension_with_classifier("g:a::sources:1.0", "mvn:g/a/1.0/jar/sources")]
    #[case::empty_extension("g:a::1.0", "mvn:g/a/1.0")]
    fn test_aether_to_mvn(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(aether_to_mvn(input), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::no_separators("foo")]
    #[case::too_few_segments("mvn:g/a")]
    #[case::file_url("file:/tmp/bundle.jar")]
    #[case::http_url("http://example.com/bundle.jar")]
    #[case::blank_group("mvn: /a/1.0")]
    #[case::other_wrapper("war:mvn:g/a/1.0")]
    #[case::too_many_segments("mvn:g/a/1.0/jar/cls/extra")]
    fn test_mvn_to_aether_passes_through(#[case] input: &str) {
        assert_eq!(mvn_to_aether(input), input);
    }

    #[rstest]
    #[case::empty("")]
    #[case::no_separators("foo")]
    #[case::single_colon("g:a")]
    #[case::mvn_url("mvn:g/a/1.0")]
    #[case::too_many_segments("g:a:b:c:d:e")]
    #[case::blank_version("g:a: ")]
    fn test_aether_to_mvn_passes_through(#[case] input: &str) {
        assert_eq!(aether_to_mvn(input), input);
    }

    #[test]
    fn test_jar_elision_is_not_round_tripped() {
        let aether = mvn_to_aether("mvn:g/a/1.0/jar");
        assert_eq!(aether, "g:a:1.0");
        assert_eq!(aether_to_mvn(&aether), "mvn:g/a/1.0");
    }

    #[test]
    fn test_wrapper_is_lost_on_round_trip() {
        let aether = mvn_to_aether("wrap:mvn:g/a/1.0/war");
        assert_eq!(aether_to_mvn(&aether), "mvn:g/a/1.0/war");
    }

    #[rstest]
    #[case::plain("mvn:g/a/1.0", Some(MavenArtifactRef::new("g", "a", "1.0")))]
    #[case::typed("mvn:g/a/1.0/war", Some(MavenArtifactRef::new("g", "a", "1.0").with_extension("war")))]
    #[case::classified("mvn:g/a/1.0/xml/features", Some(MavenArtifactRef::new("g", "a", "1.0").with_extension("xml").with_classifier("features")))]
    #[case::wrapped("wrap:mvn:g/a/1.0/$x=y", Some(MavenArtifactRef::new("g", "a", "1.0")))]
    #[case::no_version("mvn:g/a/", None)]
    #[case::not_mvn("g:a:1.0", None)]
    fn test_parse_mvn_url(#[case] input: &str, #[case] expected: Option<MavenArtifactRef>) {
        assert_eq!(parse_mvn_url(input), expected);
    }

    #[test]
    fn test_is_mvn_url() {
        assert!(is_mvn_url("mvn:g/a/1.0"));
        assert!(is_mvn_url("blueprint:mvn:g/a/1.0/xml"));
        assert!(!is_mvn_url("file:/etc/config.cfg"));
    }
}
