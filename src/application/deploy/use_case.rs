//! Deploy Use Case
//!
//! Orchestrates the deployment flow:
//! 1. Generate page files from the document
//! 2. Layer them over the project sources and run the production filter
//! 3. Commit the changed files, and delete stale generated ones, on the target branch
//! 4. Publish the branch through the hosting provider
//!
//! Dry runs, real deploys and bootstrap share steps 1 and 2 verbatim, so a
//! preview is exactly what a deploy would ship. This use case is pure
//! orchestration - all business logic lives in domain services.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::domain::entities::{CandidateFile, FileOrigin, WebsiteDocument};
use crate::domain::policies::{FilterBatch, ProductionFilter};
use crate::domain::ports::{
    BranchLocker, DeployEvent, DeployEventSink, DeploymentRequest, FileWrite, HostingProvider,
    NoopEventSink, ProjectSource, SourceControl,
};
use crate::domain::services::{CommitPlanner, PageGenerator, SeoOverrides};
use crate::domain::value_objects::{ContentHash, DeployPhase, DeployTarget, SitePath};

use super::error::{DeployError, DeployFailure};
use super::options::{BootstrapOptions, DeployOptions, DeploySettings, RepublishOptions};
use super::phase::PhaseTracker;
use super::result::{
    BootstrapResult, CommitInfo, DeployResult, DeploymentInfo, ExcludedFile, ProjectInfo,
    RepublishResult,
};

/// Generated and filtered files, before anything touches the remote.
struct FilteredSet {
    retained: Vec<CandidateFile>,
    excluded: Vec<ExcludedFile>,
    batch_stats: crate::domain::policies::FilterStats,
    fingerprint: ContentHash,
}

/// Deploy use case - orchestrates the deployment flow
///
/// This use case is parameterized by its dependencies (ports), allowing for
/// easy testing and different implementations. Clients are constructed once
/// and injected; nothing here is global.
pub struct DeployUseCase<SC, HP, PS, BL>
where
    SC: SourceControl,
    HP: HostingProvider,
    PS: ProjectSource,
    BL: BranchLocker,
{
    generator: PageGenerator,
    filter: ProductionFilter,
    source_control: SC,
    hosting: HP,
    project: PS,
    locker: BL,
    settings: DeploySettings,
}

impl<SC, HP, PS, BL> DeployUseCase<SC, HP, PS, BL>
where
    SC: SourceControl,
    HP: HostingProvider,
    PS: ProjectSource,
    BL: BranchLocker,
{
    pub fn new(
        generator: PageGenerator,
        filter: ProductionFilter,
        source_control: SC,
        hosting: HP,
        project: PS,
        locker: BL,
        settings: DeploySettings,
    ) -> Self {
        Self {
            generator,
            filter,
            source_control,
            hosting,
            project,
            locker,
            settings,
        }
    }

    pub fn settings(&self) -> &DeploySettings {
        &self.settings
    }

    /// Execute the deploy use case
    pub fn execute(
        &self,
        document: &WebsiteDocument,
        options: &DeployOptions,
    ) -> Result<DeployResult, DeployError> {
        self.execute_with_events(document, options, Arc::new(NoopEventSink))
    }

    /// Execute the deploy use case with event reporting
    #[instrument(
        skip(self, document, options, event_sink),
        fields(target = %options.target, dry_run = options.dry_run)
    )]
    pub fn execute_with_events(
        &self,
        document: &WebsiteDocument,
        options: &DeployOptions,
        event_sink: Arc<dyn DeployEventSink>,
    ) -> Result<DeployResult, DeployError> {
        let sink = event_sink.as_ref();
        let branch = self.resolve_branch(options.target, options.branch.as_deref());

        event_sink.on_event(DeployEvent::Started {
            target: options.target,
            branch: branch.clone(),
            dry_run: options.dry_run,
            page_count: document.pages.len(),
        });

        let mut tracker = PhaseTracker::start(DeployPhase::Generating, &branch, options.dry_run, sink);
        self.check_ownership(options.target, &branch)
            .map_err(|cause| tracker.fail(cause))?;

        let filtered = self.generate_and_filter(
            document,
            options.target,
            &options.seo_overrides,
            &mut tracker,
            sink,
        )?;

        let mut result = DeployResult {
            target: options.target,
            branch: branch.clone(),
            dry_run: options.dry_run,
            phase: DeployPhase::Filtering,
            files: filtered
                .retained
                .iter()
                .map(|f| f.path.to_string())
                .collect(),
            excluded: filtered.excluded,
            stats: filtered.batch_stats,
            fingerprint: filtered.fingerprint,
            written: Vec::new(),
            deleted: Vec::new(),
            unchanged: 0,
            no_changes: false,
            commit: None,
            deployment: None,
            version_number: document.current_version_number,
        };

        if options.dry_run {
            tracker.advance(DeployPhase::Succeeded);
            result.phase = DeployPhase::Succeeded;
            info!(
                files = result.files.len(),
                excluded = result.excluded.len(),
                "dry run complete"
            );
            event_sink.on_event(DeployEvent::Completed {
                commit_id: None,
                deployment_id: None,
                dry_run: true,
            });
            return Ok(result);
        }

        // Committing and publishing own the branch exclusively.
        tracker.advance(DeployPhase::Committing);
        let _guard = self
            .locker
            .lock(&branch)
            .map_err(|err| tracker.fail(err))?;

        let repo = &self.settings.repo;
        let snapshot = self
            .source_control
            .snapshot(repo, &branch)
            .map_err(|err| tracker.fail(err))?;
        let layout = self.generator.layout();
        let plan = CommitPlanner::plan(&filtered.retained, snapshot.as_ref(), |path| {
            layout.owns(path)
        });

        event_sink.on_event(DeployEvent::Planned {
            write_count: plan.write_count(),
            skip_count: plan.skip_count(),
            delete_count: plan.delete_count(),
        });
        result.unchanged = plan.skip_count();

        let publish_commit = if plan.is_noop() {
            info!(branch = %branch, "no changes against branch head; skipping commit");
            result.no_changes = true;
            event_sink.on_event(DeployEvent::CommitSkipped {
                head: plan.base.clone(),
            });
            plan.base.clone()
        } else {
            let next_version = document.current_version_number + 1;
            let message = options.message.clone().unwrap_or_else(|| {
                format!(
                    "Deploy v{} to {} ({} files)",
                    next_version,
                    options.target,
                    plan.change_count()
                )
            });
            let writes = plan.writes();
            let commit = self
                .source_control
                .write_files(repo, &branch, plan.base.as_deref(), &writes, &message)
                .map_err(|err| tracker.fail(err))?;

            info!(commit = %commit.commit_id, files = writes.len(), "committed");
            tracker.record_commit(&commit.commit_id);
            event_sink.on_event(DeployEvent::Committed {
                commit_id: commit.commit_id.clone(),
                file_count: writes.len(),
            });

            let (deleted, written): (Vec<&FileWrite>, Vec<&FileWrite>) =
                writes.iter().partition(|w| w.is_delete());
            result.written = written.iter().map(|w| w.path.to_string()).collect();
            result.deleted = deleted.iter().map(|w| w.path.to_string()).collect();
            result.version_number = next_version;
            result.commit = Some(CommitInfo {
                id: commit.commit_id.clone(),
                url: commit.url,
            });
            Some(commit.commit_id)
        };

        tracker.advance(DeployPhase::Publishing);
        let deployment = self.publish(
            options.target,
            &branch,
            publish_commit.as_deref(),
            &mut tracker,
            sink,
        )?;
        result.deployment = Some(deployment);

        tracker.advance(DeployPhase::Succeeded);
        result.phase = DeployPhase::Succeeded;
        event_sink.on_event(DeployEvent::Completed {
            commit_id: result.commit.as_ref().map(|c| c.id.clone()),
            deployment_id: result.deployment.as_ref().map(|d| d.id.clone()),
            dry_run: false,
        });

        Ok(result)
    }

    /// Publish the current head of a branch again, without regenerating.
    ///
    /// This is the retry path after a failed publish: the commit from the
    /// failed attempt is still on the branch.
    #[instrument(skip(self, options, event_sink), fields(target = %options.target))]
    pub fn republish(
        &self,
        options: &RepublishOptions,
        event_sink: Arc<dyn DeployEventSink>,
    ) -> Result<RepublishResult, DeployError> {
        let sink = event_sink.as_ref();
        let branch = self.resolve_branch(options.target, options.branch.as_deref());

        let mut tracker = PhaseTracker::start(DeployPhase::Publishing, &branch, false, sink);
        self.check_ownership(options.target, &branch)
            .map_err(|cause| tracker.fail(cause))?;

        let _guard = self
            .locker
            .lock(&branch)
            .map_err(|err| tracker.fail(err))?;
        let deployment = self.publish(options.target, &branch, None, &mut tracker, sink)?;

        tracker.advance(DeployPhase::Succeeded);
        event_sink.on_event(DeployEvent::Completed {
            commit_id: None,
            deployment_id: Some(deployment.id.clone()),
            dry_run: false,
        });

        Ok(RepublishResult {
            target: options.target,
            branch,
            deployment,
        })
    }

    /// Bootstrap a new editor instance: run the dry-run pipeline for the
    /// initial document, then provision a new hosting project.
    #[instrument(skip(self, document, options, event_sink))]
    pub fn bootstrap(
        &self,
        document: &WebsiteDocument,
        options: &BootstrapOptions,
        event_sink: Arc<dyn DeployEventSink>,
    ) -> Result<BootstrapResult, DeployError> {
        let deploy_options = DeployOptions::new(DeployTarget::Production)
            .with_dry_run(true)
            .with_seo_overrides(options.seo_overrides.clone());
        let preview = self.execute_with_events(document, &deploy_options, event_sink.clone())?;

        let mut tracker =
            PhaseTracker::start(DeployPhase::Publishing, &preview.branch, true, event_sink.as_ref());
        let project = self
            .hosting
            .provision_project(&self.settings.repo, options.custom_domain.as_deref())
            .map_err(|err| tracker.fail(err))?;
        tracker.advance(DeployPhase::Succeeded);

        info!(project = %project.id, url = %project.url, "hosting project provisioned");
        Ok(BootstrapResult {
            preview,
            project: ProjectInfo {
                id: project.id,
                url: project.url,
                domain: project.domain,
            },
        })
    }

    /// Branch for a request: the explicit one, else the target's configured branch.
    pub fn resolve_branch(&self, target: DeployTarget, explicit: Option<&str>) -> String {
        match explicit.map(str::trim).filter(|b| !b.is_empty()) {
            Some(branch) => branch.to_string(),
            None => match target {
                DeployTarget::Production => self.settings.production_branch.clone(),
                DeployTarget::Preview => self.settings.preview_branch.clone(),
            },
        }
    }

    fn check_ownership(&self, target: DeployTarget, branch: &str) -> Result<(), DeployFailure> {
        if target == DeployTarget::Preview && branch == self.settings.production_branch {
            return Err(DeployFailure::Ownership {
                branch: branch.to_string(),
            });
        }
        Ok(())
    }

    /// Generating and Filtering; shared by every entry point.
    fn generate_and_filter(
        &self,
        document: &WebsiteDocument,
        target: DeployTarget,
        overrides: &SeoOverrides,
        tracker: &mut PhaseTracker<'_>,
        sink: &dyn DeployEventSink,
    ) -> Result<FilteredSet, DeployError> {
        let generated = self
            .generator
            .generate(document, overrides)
            .map_err(|err| tracker.fail(err))?;
        info!(files = generated.len(), pages = document.pages.len(), "generated");
        sink.on_event(DeployEvent::Generated {
            file_count: generated.len(),
        });

        tracker.advance(DeployPhase::Filtering);
        let project_files = self.project.list_files().map_err(|err| tracker.fail(err))?;
        let candidates = merge_candidates(project_files, generated.into_iter().map(Into::into));

        let batch = self.filter.classify_batch(candidates);
        if target.applies_exclusions() {
            if let Some(dropped) = batch
                .excluded
                .iter()
                .find(|c| c.file.origin == FileOrigin::Generated)
            {
                warn!(path = %dropped.file.path, rule = %dropped.decision.rule, "generated file excluded");
                return Err(tracker.fail(DeployFailure::GeneratedFileExcluded {
                    path: dropped.file.path.to_string(),
                    rule: dropped.decision.rule,
                    reason: dropped.decision.reason.clone(),
                }));
            }
        }
        Ok(self.retain(batch, target, sink))
    }

    fn retain(
        &self,
        batch: FilterBatch<CandidateFile>,
        target: DeployTarget,
        sink: &dyn DeployEventSink,
    ) -> FilteredSet {
        let excluded: Vec<ExcludedFile> = batch
            .excluded
            .iter()
            .map(|c| ExcludedFile {
                path: c.file.path.to_string(),
                rule: c.decision.rule,
                reason: c.decision.reason.clone(),
            })
            .collect();

        if sink.wants_detailed_events() {
            for file in &excluded {
                sink.on_event(DeployEvent::FileExcluded {
                    path: file.path.clone(),
                    rule: file.rule,
                    reason: file.reason.clone(),
                });
            }
        }
        if batch.stats.config_errors > 0 {
            warn!(
                count = batch.stats.config_errors,
                "filter patterns contradict each other; affected files were excluded"
            );
        }

        let stats = batch.stats.clone();
        let mut retained: Vec<CandidateFile> = if target.applies_exclusions() {
            batch.into_included()
        } else {
            batch
                .included
                .into_iter()
                .chain(batch.excluded)
                .map(|c| c.file)
                .collect()
        };
        retained.sort_by(|a, b| a.path.cmp(&b.path));

        let fingerprint = ContentHash::of_entries(
            retained
                .iter()
                .map(|f| (f.path.as_str(), f.content.as_bytes())),
        );
        sink.on_event(DeployEvent::Filtered {
            included: stats.included,
            excluded: stats.excluded,
            fingerprint: fingerprint.to_string(),
        });

        FilteredSet {
            retained,
            excluded,
            batch_stats: stats,
            fingerprint,
        }
    }

    fn publish(
        &self,
        target: DeployTarget,
        branch: &str,
        commit: Option<&str>,
        tracker: &mut PhaseTracker<'_>,
        sink: &dyn DeployEventSink,
    ) -> Result<DeploymentInfo, DeployError> {
        let project = match self.settings.hosting_project.as_deref() {
            Some(project) => project,
            None => {
                return Err(tracker.fail(DeployFailure::Configuration(
                    "no hosting project configured; run bootstrap first".to_string(),
                )))
            }
        };

        let request = DeploymentRequest {
            project,
            repo: &self.settings.repo,
            branch,
            commit,
            target,
        };
        let deployment = self
            .hosting
            .create_or_update_deployment(&request)
            .map_err(|err| tracker.fail(err))?;

        info!(deployment = %deployment.id, url = %deployment.url, phase = %tracker.phase(), "published");
        sink.on_event(DeployEvent::Published {
            deployment_id: deployment.id.clone(),
            url: deployment.url.clone(),
        });
        Ok(DeploymentInfo {
            id: deployment.id,
            url: deployment.url,
        })
    }
}

/// Layer generated files over project files. Generated files win on equal
/// paths; the result is sorted by path.
pub fn merge_candidates(
    project: Vec<CandidateFile>,
    generated: impl IntoIterator<Item = CandidateFile>,
) -> Vec<CandidateFile> {
    let mut merged: BTreeMap<SitePath, CandidateFile> = project
        .into_iter()
        .map(|file| (file.path.clone(), file))
        .collect();
    for file in generated {
        merged.insert(file.path.clone(), file);
    }
    merged.into_values().collect()
}
