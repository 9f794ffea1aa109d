use std::collections::{HashSet, VecDeque};

use anyhow::{anyhow, Context};
use tokio::fs::read_to_string;
use tracing::{debug, info};

use crate::config::AddToRepositoryConfig;
use crate::features::descriptor::{parse_features_descriptor, Bundle, Feature, FeaturesDescriptor};
use crate::features::selection::select_features;
use crate::maven::coordinates::ResolvedArtifact;
use crate::maven::local_repo::{ArtifactResolver, LocalMavenRepo};
use crate::maven::maven_repo_metadata::{FsMetadataStore, MavenRepoMetadataStore};
use crate::maven::notation::{aether_to_mvn, is_mvn_url, parse_mvn_url};
use crate::maven::paths::RepoLayout;
use crate::repository::file_copier::{FileCopier, FsFileCopier};
use crate::repository::{ArtifactOutcome, FeaturesRepository};

/// The outcome of every item processed by a run, in processing order
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<ArtifactOutcome>,
}
impl RunReport {
    pub fn copied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_copied()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

struct LoadedDescriptor {
    artifact: ResolvedArtifact,
    descriptor: FeaturesDescriptor,
}

/// Copies features descriptors and everything their features consist of into a repository
///  directory.
///
/// Problems with the descriptors themselves fail the whole run. Problems with individual bundles
///  or config files are recorded in the report, and the run continues.
pub struct AddToRepository<R: ArtifactResolver, C: FileCopier, M: MavenRepoMetadataStore> {
    config: AddToRepositoryConfig,
    resolver: R,
    repository: FeaturesRepository<C, M>,
}

impl AddToRepository<LocalMavenRepo, FsFileCopier, FsMetadataStore> {
    pub fn from_config(config: AddToRepositoryConfig) -> AddToRepository<LocalMavenRepo, FsFileCopier, FsMetadataStore> {
        let resolver = LocalMavenRepo::new(config.local_repository.clone());
        let repository = FeaturesRepository::new(
            config.repository.clone(),
            RepoLayout::from_flat_flag(config.flat_repo_layout),
            config.generate_maven_metadata,
            FsFileCopier {},
            FsMetadataStore {},
        );
        AddToRepository::new(config, resolver, repository)
    }
}

impl <R: ArtifactResolver, C: FileCopier, M: MavenRepoMetadataStore> AddToRepository<R, C, M> {
    pub fn new(config: AddToRepositoryConfig, resolver: R, repository: FeaturesRepository<C, M>) -> AddToRepository<R, C, M> {
        AddToRepository {
            config,
            resolver,
            repository,
        }
    }

    pub async fn run(&self) -> anyhow::Result<RunReport> {
        info!("adding features to repository {}", self.repository.root().display());

        let loaded = self.load_descriptors().await?;
        let descriptors: Vec<FeaturesDescriptor> = loaded.iter()
            .map(|l| l.descriptor.clone())
            .collect();
        let features = select_features(&descriptors, &self.config.features)?;

        let mut report = RunReport::default();

        for l in &loaded {
            let outcome = self.repository.materialize(&l.artifact).await;
            report.outcomes.push(ArtifactOutcome::from_result(l.artifact.artifact_ref.to_string(), outcome));
        }

        for feature in features {
            self.copy_feature(feature, &mut report).await;
        }

        for d in &self.config.copy_file_based_descriptors {
            let outcome = self.repository.copy_file(&d.source_file, &d.target_directory.join(&d.target_file_name)).await;
            report.outcomes.push(ArtifactOutcome::from_result(d.source_file.display().to_string(), outcome));
        }

        info!("done: {} copied, {} skipped, {} failed", report.copied(), report.skipped(), report.failed());
        Ok(report)
    }

    /// Loads the configured descriptors and, transitively, the descriptors they refer to
    async fn load_descriptors(&self) -> anyhow::Result<Vec<LoadedDescriptor>> {
        let mut queue: VecDeque<String> = self.config.descriptors.iter()
            .map(|d| aether_to_mvn(d))
            .collect();
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        while let Some(location) = queue.pop_front() {
            if !seen.insert(location.clone()) {
                continue;
            }

            let loaded = self.load_descriptor(&location)
                .await
                .with_context(|| format!("loading features descriptor {}", location))?;

            debug!("descriptor {} refers to {:?}", location, loaded.descriptor.repositories);
            queue.extend(loaded.descriptor.repositories.iter().map(|r| aether_to_mvn(r)));
            result.push(loaded);
        }
        Ok(result)
    }

    async fn load_descriptor(&self, location: &str) -> anyhow::Result<LoadedDescriptor> {
        let artifact_ref = parse_mvn_url(location)
            .ok_or_else(|| anyhow!("not a valid mvn URL"))?;
        let artifact = self.resolver.resolve(&artifact_ref).await?;

        let file = artifact.file.as_ref()
            .ok_or_else(|| anyhow!("{} is not present in the local repository", artifact_ref))?;
        let xml = read_to_string(file).await?;
        let descriptor = parse_features_descriptor(&xml)?;

        Ok(LoadedDescriptor {
            artifact,
            descriptor,
        })
    }

    async fn copy_feature(&self, feature: &Feature, report: &mut RunReport) {
        debug!("processing feature {}", feature.id());

        for bundle in &feature.bundles {
            report.outcomes.push(self.copy_location(&bundle.location).await);
        }

        for conditional in &feature.conditionals {
            for bundle in conditional.bundles.iter().filter(|b| self.includes_conditional(b)) {
                report.outcomes.push(self.copy_location(&bundle.location).await);
            }
        }

        for config_file in &feature.config_files {
            report.outcomes.push(self.copy_location(&config_file.location).await);
        }
    }

    fn includes_conditional(&self, bundle: &Bundle) -> bool {
        self.config.ignore_dependency_flag || !bundle.dependency
    }

    async fn copy_location(&self, location: &str) -> ArtifactOutcome {
        if !is_mvn_url(location) && self.config.skip_non_maven_protocols {
            debug!("skipping {} - not a maven location", location);
            return ArtifactOutcome::Skipped {
                item: location.to_string(),
                reason: "not a maven location".to_string(),
            };
        }

        let result = match parse_mvn_url(location) {
            Some(artifact_ref) => {
                match self.resolver.resolve(&artifact_ref).await {
                    Ok(artifact) => self.repository.materialize(&artifact).await,
                    Err(e) => Err(e),
                }
            }
            None => Err(anyhow!("not a valid mvn URL: {}", location)),
        };
        ArtifactOutcome::from_result(location.to_string(), result)
    }
}
