//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! Global flags (`--json`, `--verbose`, `--config`, `--project-dir`,
//! `--events`) are inherited by all subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::value_objects::DeployTarget;

/// Deployment environment as accepted on the command line
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetArg {
    Preview,
    Production,
}

impl From<TargetArg> for DeployTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Preview => DeployTarget::Preview,
            TargetArg::Production => DeployTarget::Production,
        }
    }
}

/// Siteforge - compile editor documents into a site and ship it
#[derive(Parser, Debug)]
#[command(name = "siteforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print a JSON envelope on stdout instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to siteforge.toml in the project directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Editor project directory
    #[arg(long, global = true, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Stream deploy progress events to stderr (NDJSON with --json)
    #[arg(long, global = true)]
    pub events: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Input shared by the commands that compile a document
#[derive(clap::Args, Debug, Clone)]
pub struct DocumentArgs {
    /// Website document (JSON)
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Per-page SEO overrides (JSON object keyed by page)
    #[arg(long, value_name = "FILE")]
    pub seo: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show what a deploy would ship, without touching any remote
    Preview {
        #[command(flatten)]
        input: DocumentArgs,

        /// Environment to evaluate
        #[arg(short, long, value_enum, default_value = "production")]
        target: TargetArg,

        /// Branch to evaluate against (defaults to the target's branch)
        #[arg(short, long)]
        branch: Option<String>,
    },

    /// Generate, filter, commit and publish a document
    Deploy {
        #[command(flatten)]
        input: DocumentArgs,

        /// Environment to deploy
        #[arg(short, long, value_enum, default_value = "preview")]
        target: TargetArg,

        /// Branch to commit to (defaults to the target's branch)
        #[arg(short, long)]
        branch: Option<String>,

        /// Stop after filtering; nothing is committed or published
        #[arg(long)]
        dry_run: bool,

        /// Commit message
        #[arg(short, long)]
        message: Option<String>,

        /// Do not write the new version number back into the document
        #[arg(long)]
        no_save: bool,
    },

    /// Publish the current head of a branch again
    Republish {
        #[arg(short, long, value_enum, default_value = "preview")]
        target: TargetArg,

        #[arg(short, long)]
        branch: Option<String>,
    },

    /// Preview a document and provision a new hosting project for it
    Bootstrap {
        #[command(flatten)]
        input: DocumentArgs,

        /// Custom domain to bind to the new project
        #[arg(long)]
        custom_domain: Option<String>,
    },

    /// List the version history of a branch
    Versions {
        /// Branch to read (defaults to the production branch)
        #[arg(short, long)]
        branch: Option<String>,

        /// Commits per page (1-100)
        #[arg(long)]
        per_page: Option<u32>,
    },

    /// Run the production filter over file paths
    Classify {
        /// Paths to classify
        #[arg(value_name = "PATH")]
        paths: Vec<String>,

        /// JSON array of {"path", "content"?} objects to classify
        #[arg(long, value_name = "FILE", conflicts_with = "paths")]
        from: Option<PathBuf>,

        /// Fail when a path matches both an include and an exclude pattern
        #[arg(long)]
        strict: bool,
    },
}
