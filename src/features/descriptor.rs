//! Model of a features descriptor (features.xml). Only what is needed to find the artifacts a
//!  feature consists of is modelled, everything else in the XML is ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
pub struct FeaturesDescriptor {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    /// locations of other descriptors this one refers to
    #[serde(rename = "repository", default)]
    pub repositories: Vec<String>,
    #[serde(rename = "feature", default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
pub struct Feature {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@version", default)]
    pub version: Option<String>,
    #[serde(rename = "feature", default)]
    pub dependencies: Vec<FeatureReference>,
    #[serde(rename = "bundle", default)]
    pub bundles: Vec<Bundle>,
    #[serde(rename = "conditional", default)]
    pub conditionals: Vec<Conditional>,
    #[serde(rename = "configfile", default)]
    pub config_files: Vec<ConfigFile>,
}
impl Feature {
    /// name/version, or just the name if there is no version
    pub fn id(&self) -> String {
        match &self.version {
            Some(v) => format!("{}/{}", self.name, v),
            None => self.name.clone(),
        }
    }
}

/// A feature's dependency on another feature
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
pub struct FeatureReference {
    #[serde(rename = "@version", default)]
    pub version: Option<String>,
    #[serde(rename = "$text")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
pub struct Bundle {
    /// bundles flagged as dependency are expected to be provided by something else
    #[serde(rename = "@dependency", default)]
    pub dependency: bool,
    #[serde(rename = "$text")]
    pub location: String,
}

/// Bundles that are only installed if all conditions (usually other features) are met
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
pub struct Conditional {
    #[serde(rename = "condition", default)]
    pub conditions: Vec<String>,
    #[serde(rename = "bundle", default)]
    pub bundles: Vec<Bundle>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
pub struct ConfigFile {
    #[serde(rename = "@finalname", default)]
    pub final_name: Option<String>,
    #[serde(rename = "$text")]
    pub location: String,
}

pub fn parse_features_descriptor(xml: &str) -> anyhow::Result<FeaturesDescriptor> {
    Ok(quick_xml::de::from_str(xml)?)
}
