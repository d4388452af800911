//! Output Rendering
//!
//! Every command produces one `CommandOutput`. With `--json` it is wrapped in
//! the envelope `{"success": true, "data": ...}`; failures become
//! `{"success": false, "error", "reason", "status"}` where `status` is the
//! HTTP code of the error kind.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::{json, Value};

use crate::application::{BootstrapResult, DeployResult, RepublishResult};
use crate::domain::entities::VersionRecord;
use crate::domain::policies::{FileInput, FilterBatch};
use crate::error::SiteforgeError;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON envelope for scripting
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// A page of version history
#[derive(Debug, Clone, Serialize)]
pub struct VersionsPage {
    pub branch: String,
    pub versions: Vec<VersionRecord>,
}

/// Filter decisions for a batch of paths
pub type ClassifyReport = FilterBatch<FileInput>;

/// The result of one command
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    Deploy(DeployResult),
    Republish(RepublishResult),
    Bootstrap(BootstrapResult),
    Versions(VersionsPage),
    Classify(ClassifyReport),
}

/// `{"success": true, "data": ...}`
pub fn success_envelope(output: &CommandOutput) -> Value {
    json!({
        "success": true,
        "data": output,
    })
}

/// `{"success": false, "error", "reason", "status"}`, plus the deploy state
/// for deploy failures.
pub fn error_envelope(err: &SiteforgeError) -> Value {
    let kind = err.kind();
    let mut envelope = json!({
        "success": false,
        "error": err.to_string(),
        "reason": kind.as_str(),
        "status": kind.http_status(),
    });

    if let SiteforgeError::Deploy(deploy) = err {
        envelope["phase"] = json!(deploy.phase);
        envelope["branch"] = json!(deploy.branch);
        envelope["dryRun"] = json!(deploy.dry_run);
        if let Some(commit) = &deploy.commit_id {
            envelope["commitId"] = json!(commit);
        }
    }
    envelope
}

/// Renders command results and failures
pub trait Renderer {
    fn render(&self, output: &CommandOutput, out: &mut dyn Write) -> io::Result<()>;
    fn render_error(&self, err: &SiteforgeError, out: &mut dyn Write) -> io::Result<()>;
}

/// JSON envelope renderer
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, output: &CommandOutput, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", success_envelope(output))
    }

    fn render_error(&self, err: &SiteforgeError, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", error_envelope(err))
    }
}

/// Text renderer
#[derive(Debug, Default)]
pub struct TextRenderer {
    /// Verbosity level; lists every shipped file when > 0
    pub verbose: u8,
}

impl TextRenderer {
    fn render_deploy(&self, result: &DeployResult, out: &mut dyn Write) -> io::Result<()> {
        if result.dry_run {
            writeln!(
                out,
                "Preview ({}) of '{}': {} files would ship",
                result.target,
                result.branch,
                result.files.len()
            )?;
        } else if result.no_changes {
            writeln!(out, "Already up to date on '{}'", result.branch)?;
        } else {
            writeln!(out, "Deployed to '{}'", result.branch)?;
        }

        writeln!(out, "  fingerprint: {}", result.fingerprint)?;
        if self.verbose > 0 {
            for path in &result.files {
                writeln!(out, "    + {}", path)?;
            }
        }

        if !result.excluded.is_empty() {
            let verb = if result.target.applies_exclusions() {
                "Excluded"
            } else {
                "Would exclude"
            };
            writeln!(out, "  {} ({}):", verb, result.excluded.len())?;
            for file in &result.excluded {
                writeln!(out, "    - {} [{}] {}", file.path, file.rule, file.reason)?;
            }
        }

        if let Some(commit) = &result.commit {
            writeln!(
                out,
                "  commit: {} ({} written, {} deleted, {} unchanged)",
                commit.id,
                result.written.len(),
                result.deleted.len(),
                result.unchanged
            )?;
            if self.verbose > 0 {
                for path in &result.deleted {
                    writeln!(out, "    x {}", path)?;
                }
            }
        }
        if let Some(deployment) = &result.deployment {
            writeln!(out, "  deployment: {} {}", deployment.id, deployment.url)?;
        }
        if !result.dry_run {
            writeln!(out, "  version: {}", result.version_number)?;
        }
        Ok(())
    }

    fn render_versions(&self, page: &VersionsPage, out: &mut dyn Write) -> io::Result<()> {
        if page.versions.is_empty() {
            return writeln!(out, "No versions on '{}'", page.branch);
        }
        for version in &page.versions {
            let when = version
                .timestamp
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            writeln!(
                out,
                "v{:<4} {} {:<16} {} {}",
                version.version_number,
                version.short_identifier,
                when,
                version.author,
                version.title()
            )?;
        }
        Ok(())
    }

    fn render_classify(&self, report: &ClassifyReport, out: &mut dyn Write) -> io::Result<()> {
        let rows = report
            .included
            .iter()
            .map(|c| ("include", c))
            .chain(report.excluded.iter().map(|c| ("exclude", c)));
        for (verdict, classified) in rows {
            writeln!(
                out,
                "{:<8} {:<15} {}",
                verdict,
                classified.decision.rule.as_str(),
                classified.file.path
            )?;
        }
        writeln!(
            out,
            "{} files: {} included, {} excluded",
            report.stats.total, report.stats.included, report.stats.excluded
        )
    }
}

impl Renderer for TextRenderer {
    fn render(&self, output: &CommandOutput, out: &mut dyn Write) -> io::Result<()> {
        match output {
            CommandOutput::Deploy(result) => self.render_deploy(result, out),
            CommandOutput::Republish(result) => writeln!(
                out,
                "Republished '{}': {} {}",
                result.branch, result.deployment.id, result.deployment.url
            ),
            CommandOutput::Bootstrap(result) => {
                self.render_deploy(&result.preview, out)?;
                writeln!(out, "Provisioned {} at {}", result.project.id, result.project.url)?;
                if let Some(domain) = &result.project.domain {
                    writeln!(out, "  domain: {}", domain)?;
                }
                Ok(())
            }
            CommandOutput::Versions(page) => self.render_versions(page, out),
            CommandOutput::Classify(report) => self.render_classify(report, out),
        }
    }

    fn render_error(&self, err: &SiteforgeError, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "error: {}", err)?;
        if let SiteforgeError::Deploy(deploy) = err {
            if let Some(commit) = &deploy.commit_id {
                writeln!(
                    out,
                    "  commit {} is on '{}'; run `siteforge republish` to retry publishing",
                    commit, deploy.branch
                )?;
            }
        }
        Ok(())
    }
}

/// Create a renderer based on format
pub fn create_renderer(format: OutputFormat, verbose: u8) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer { verbose }),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}
