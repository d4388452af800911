//! Command handlers
//!
//! Each handler resolves configuration, builds its use case through the
//! factory and returns a `CommandOutput`; rendering is left to the caller.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::application::{BootstrapOptions, DeployOptions, RepublishOptions};
use crate::config::Config;
use crate::domain::entities::WebsiteDocument;
use crate::domain::policies::FileInput;
use crate::domain::ports::DocumentRepository;
use crate::domain::services::SeoOverrides;
use crate::error::{SiteforgeError, SiteforgeResult};
use crate::infrastructure::JsonDocumentRepository;

use super::cli::{Cli, Commands, DocumentArgs};
use super::factory::{self, Backend};
use super::output::{CommandOutput, VersionsPage};

/// Run the parsed command line.
pub fn run(cli: &Cli) -> SiteforgeResult<CommandOutput> {
    let config = load_config(cli)?;
    let base = base_dir(cli);
    let base = base.as_deref();
    let events = factory::create_event_sink(cli.events, cli.json, cli.verbose);

    match &cli.command {
        Commands::Preview {
            input,
            target,
            branch,
        } => {
            let (document, overrides) = load_input(input)?;
            let mut options = DeployOptions::new((*target).into())
                .with_dry_run(true)
                .with_seo_overrides(overrides);
            if let Some(branch) = branch {
                options = options.with_branch(branch.clone());
            }

            let use_case = factory::create_deploy_use_case(&config, Backend::Offline, base)?;
            let result = use_case.execute_with_events(&document, &options, events)?;
            Ok(CommandOutput::Deploy(result))
        }

        Commands::Deploy {
            input,
            target,
            branch,
            dry_run,
            message,
            no_save,
        } => {
            let (mut document, overrides) = load_input(input)?;
            let mut options = DeployOptions::new((*target).into())
                .with_dry_run(*dry_run)
                .with_seo_overrides(overrides);
            if let Some(branch) = branch {
                options = options.with_branch(branch.clone());
            }
            if let Some(message) = message {
                options = options.with_message(message.clone());
            }

            let backend = if *dry_run {
                Backend::Offline
            } else {
                Backend::Live
            };
            let use_case = factory::create_deploy_use_case(&config, backend, base)?;
            let result = use_case.execute_with_events(&document, &options, events)?;

            if result.has_changes() && !*no_save {
                document.advance_version(result.version_number);
                JsonDocumentRepository::new().save(&document, &input.document)?;
                info!(
                    version = result.version_number,
                    path = %input.document.display(),
                    "document version advanced"
                );
            }
            Ok(CommandOutput::Deploy(result))
        }

        Commands::Republish { target, branch } => {
            let mut options = RepublishOptions::new((*target).into());
            if let Some(branch) = branch {
                options = options.with_branch(branch.clone());
            }

            let use_case = factory::create_deploy_use_case(&config, Backend::Live, base)?;
            let result = use_case.republish(&options, events)?;
            Ok(CommandOutput::Republish(result))
        }

        Commands::Bootstrap {
            input,
            custom_domain,
        } => {
            let (document, overrides) = load_input(input)?;
            let mut options = BootstrapOptions::new();
            options.seo_overrides = overrides;
            if let Some(domain) = custom_domain.as_ref().or(config.hosting.custom_domain.as_ref())
            {
                options = options.with_custom_domain(domain.clone());
            }

            let use_case = factory::create_deploy_use_case(&config, Backend::Provisioning, base)?;
            let result = use_case.bootstrap(&document, &options, events)?;
            Ok(CommandOutput::Bootstrap(result))
        }

        Commands::Versions { branch, per_page } => {
            let branch = branch
                .clone()
                .unwrap_or_else(|| config.source_control.production_branch.clone());
            let per_page = per_page.unwrap_or(config.versions.per_page);

            let history = factory::create_version_history(&config)?;
            let versions = history.list_versions(&branch, per_page)?;
            Ok(CommandOutput::Versions(VersionsPage { branch, versions }))
        }

        Commands::Classify {
            paths,
            from,
            strict,
        } => {
            let files = match from {
                Some(path) => read_file_inputs(path)?,
                None => paths.iter().map(FileInput::new).collect(),
            };
            if files.is_empty() {
                return Err(SiteforgeError::Input("no paths to classify".to_string()));
            }

            let report = config.production_filter()?.classify_batch(files);
            if *strict {
                let conflict = report
                    .included
                    .iter()
                    .chain(report.excluded.iter())
                    .find_map(|c| c.decision.config_error.clone());
                if let Some(err) = conflict {
                    return Err(err.into());
                }
            }
            Ok(CommandOutput::Classify(report))
        }
    }
}

/// Explicit `--config`, else discovery from the project directory.
fn load_config(cli: &Cli) -> SiteforgeResult<Config> {
    let (config, warnings) = match &cli.config {
        Some(path) => {
            let (config, warnings) = Config::load_with_warnings(path)?;
            (config.with_env_overrides(), warnings)
        }
        None => {
            let dir = cli
                .project_dir
                .clone()
                .or_else(|| std::env::current_dir().ok());
            Config::discover(dir.as_deref())?
        }
    };

    for warning in &warnings {
        warn!("{}", warning);
    }
    Ok(config)
}

/// Directory relative config paths resolve against.
fn base_dir(cli: &Cli) -> Option<PathBuf> {
    cli.project_dir.clone().or_else(|| {
        cli.config
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
    })
}

fn load_input(input: &DocumentArgs) -> SiteforgeResult<(WebsiteDocument, SeoOverrides)> {
    let document = JsonDocumentRepository::new().load(&input.document)?;
    let overrides = match &input.seo {
        Some(path) => read_json(path, "SEO overrides")?,
        None => SeoOverrides::new(),
    };
    Ok((document, overrides))
}

fn read_file_inputs(path: &Path) -> SiteforgeResult<Vec<FileInput>> {
    read_json(path, "file list")
}

/// Read a JSON request file; anything unreadable or malformed is bad input.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> SiteforgeResult<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        SiteforgeError::Input(format!("cannot read {} {}: {}", what, path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        SiteforgeError::Input(format!("invalid {} {}: {}", what, path.display(), e))
    })
}
