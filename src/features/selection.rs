use std::collections::{HashSet, VecDeque};

use anyhow::anyhow;
use tracing::debug;

use crate::features::descriptor::{Feature, FeaturesDescriptor};

/// Selects the features to process: the requested ones (all features if none are requested)
///  plus everything they transitively depend on. Each feature is returned once, in the order it
///  was first reached.
///
/// Requested names can carry a version as 'name/version'. A dependency on a feature that is not
///  in any of the descriptors is an error.
pub fn select_features<'a>(descriptors: &'a [FeaturesDescriptor], requested: &[String]) -> anyhow::Result<Vec<&'a Feature>> {
    let all: Vec<&Feature> = descriptors.iter()
        .flat_map(|d| d.features.iter())
        .collect();

    let mut queue: VecDeque<usize> = VecDeque::new();
    if requested.is_empty() {
        queue.extend(0..all.len());
    }
    else {
        for name in requested {
            let (name, version) = match name.split_once('/') {
                Some((n, v)) => (n, Some(v)),
                None => (name.as_str(), None),
            };
            let index = find_feature(&all, name, version)
                .ok_or_else(|| anyhow!("feature {} not found in any descriptor", name))?;
            queue.push_back(index);
        }
    }

    let mut seen = HashSet::new();
    let mut result = Vec::new();
    while let Some(index) = queue.pop_front() {
        if !seen.insert(index) {
            continue;
        }
        let feature = all[index];
        result.push(feature);

        for dependency in &feature.dependencies {
            let dependency_index = find_feature(&all, &dependency.name, dependency.version.as_deref())
                .ok_or_else(|| anyhow!("feature {} depends on {}, which was not found in any descriptor", feature.id(), dependency.name))?;
            debug!("feature {} depends on {}", feature.id(), all[dependency_index].id());
            queue.push_back(dependency_index);
        }
    }
    Ok(result)
}

fn find_feature(all: &[&Feature], name: &str, version: Option<&str>) -> Option<usize> {
    // NB: version ranges are not evaluated, a range matches any version
    let exact_version = version.filter(|v| !is_version_range(v));

    all.iter().position(|f| {
        f.name == name && match exact_version {
            Some(v) => f.version.as_deref() == Some(v),
            None => true,
        }
    })
}

fn is_version_range(version: &str) -> bool {
    version.starts_with('[') || version.starts_with('(')
}
