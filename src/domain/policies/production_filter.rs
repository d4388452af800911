//! Production filter
//!
//! Decides, file by file, whether a candidate belongs in the customer-facing
//! production deployment. Rules live in one ordered table and the first match
//! wins. The filter is pure: the same path and content always classify the same
//! way, for previews and real deploys alike.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::CandidateFile;
use crate::domain::value_objects::{PathError, PatternError, PatternSet, SitePath};

/// API namespaces served only to the editor.
pub const EDITOR_API_NAMESPACES: &[&str] = &[
    "assistant",
    "chat",
    "knowledge",
    "search",
    "vector-search",
    "production",
    "deploy",
    "versions",
    "github",
    "vercel",
    "images",
];

/// Directories holding the visual editor itself.
pub const EDITOR_UI_DIRS: &[&str] = &[
    "app/editor",
    "app/(editor)",
    "components/editor",
    "components/builder",
    "store",
    "stores",
    "contexts/editor",
];

/// Directories holding deployment plumbing.
pub const DEPLOY_INFRA_DIRS: &[&str] = &[
    "lib/deploy",
    "lib/git",
    "lib/github",
    "lib/vercel",
    "lib/hosting",
];

/// File stems of deployment plumbing wherever it lives.
pub const DEPLOY_INFRA_STEMS: &[&str] = &["git-operations", "vercel-client"];

/// Top-level directories of a generated project.
pub const SOURCE_ROOTS: &[&str] = &["src", "public", "app", "components", "lib", "styles"];

/// Root files every project build needs.
pub const ROOT_CONFIG_FILES: &[&str] = &[
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "tsconfig.json",
    "next-env.d.ts",
    "middleware.ts",
    "vercel.json",
    ".gitignore",
    ".npmrc",
    ".nvmrc",
    "components.json",
];

/// Root file name prefixes for tool configs with several accepted extensions.
pub const ROOT_CONFIG_PREFIXES: &[&str] = &[
    "next.config.",
    "postcss.config.",
    "tailwind.config.",
    ".eslintrc",
    "eslint.config.",
];

/// Marker that pins a file to the editor environment.
pub const EDITOR_MARKER: &str = "@editor-only";

/// How many leading lines are searched for [`EDITOR_MARKER`].
pub const MARKER_SCAN_LINES: usize = 5;

/// Rule identifiers, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterRule {
    PathEscape,
    EditorApi,
    EditorUi,
    DeployInfra,
    ConfigPattern,
    NonProject,
    EditorMarker,
    SiteContent,
}

impl FilterRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterRule::PathEscape => "path-escape",
            FilterRule::EditorApi => "editor-api",
            FilterRule::EditorUi => "editor-ui",
            FilterRule::DeployInfra => "deploy-infra",
            FilterRule::ConfigPattern => "config-pattern",
            FilterRule::NonProject => "non-project",
            FilterRule::EditorMarker => "editor-marker",
            FilterRule::SiteContent => "site-content",
        }
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path matched both an include and an exclude pattern.
///
/// First-match ordering should make this unreachable; when it happens anyway
/// the file is excluded.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("'{path}' matches include pattern '{include}' and exclude pattern '{exclude}'")]
pub struct FilterConfigError {
    pub path: String,
    pub include: String,
    pub exclude: String,
}

/// Outcome of classifying one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterDecision {
    pub include: bool,
    pub reason: String,
    pub rule: FilterRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_error: Option<FilterConfigError>,
}

impl FilterDecision {
    fn include(rule: FilterRule, reason: impl Into<String>) -> Self {
        Self {
            include: true,
            reason: reason.into(),
            rule,
            config_error: None,
        }
    }

    fn exclude(rule: FilterRule, reason: impl Into<String>) -> Self {
        Self {
            include: false,
            reason: reason.into(),
            rule,
            config_error: None,
        }
    }
}

/// Anything the filter can classify.
pub trait FilterSubject {
    fn subject_path(&self) -> &str;
    /// Text content, when available, for the marker sniff.
    fn subject_text(&self) -> Option<&str>;
}

impl FilterSubject for CandidateFile {
    fn subject_path(&self) -> &str {
        self.path.as_str()
    }

    fn subject_text(&self) -> Option<&str> {
        self.content.as_text()
    }
}

/// A bare path with optional content, as received at the outer surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct FileInput {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl FileInput {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

impl FilterSubject for FileInput {
    fn subject_path(&self) -> &str {
        &self.path
    }

    fn subject_text(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// A subject together with its decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classified<T> {
    pub file: T,
    pub decision: FilterDecision,
}

/// Aggregate counts of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub total: usize,
    pub included: usize,
    pub excluded: usize,
    pub by_rule: BTreeMap<FilterRule, usize>,
    pub config_errors: usize,
}

/// Result of [`ProductionFilter::classify_batch`]. Input order is preserved
/// within each bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterBatch<T> {
    pub included: Vec<Classified<T>>,
    pub excluded: Vec<Classified<T>>,
    pub stats: FilterStats,
}

impl<T> FilterBatch<T> {
    /// Every decision that excluded a file.
    pub fn exclusions(&self) -> impl Iterator<Item = &Classified<T>> {
        self.excluded.iter()
    }

    pub fn into_included(self) -> Vec<T> {
        self.included.into_iter().map(|c| c.file).collect()
    }
}

struct Subject<'a> {
    path: &'a SitePath,
    content: Option<&'a str>,
}

type Matcher = fn(&ProductionFilter, &Subject<'_>) -> Option<FilterDecision>;

/// The rule table, in evaluation order. Path escapes are handled before the
/// table since they have no normalized path to match on.
const RULES: &[(FilterRule, Matcher)] = &[
    (FilterRule::EditorApi, match_editor_api),
    (FilterRule::EditorUi, match_editor_ui),
    (FilterRule::DeployInfra, match_deploy_infra),
    (FilterRule::ConfigPattern, match_config_patterns),
    (FilterRule::NonProject, match_non_project),
    (FilterRule::EditorMarker, match_editor_marker),
];

/// The production filter.
#[derive(Debug, Clone, Default)]
pub struct ProductionFilter {
    include: PatternSet,
    exclude: PatternSet,
}

impl ProductionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add user-configured gitignore-style patterns.
    pub fn with_patterns<S: AsRef<str>>(
        include: &[S],
        exclude: &[S],
    ) -> Result<Self, PatternError> {
        Ok(Self {
            include: PatternSet::new(include)?,
            exclude: PatternSet::new(exclude)?,
        })
    }

    /// The rules in evaluation order, ending with the default.
    pub fn rule_order() -> Vec<FilterRule> {
        let mut order = vec![FilterRule::PathEscape];
        order.extend(RULES.iter().map(|(rule, _)| *rule));
        order.push(FilterRule::SiteContent);
        order
    }

    /// Classify one file.
    pub fn classify(&self, path: &str, content: Option<&str>) -> FilterDecision {
        let path = match SitePath::new(path) {
            Ok(path) => path,
            Err(PathError::ContainsTraversal) => {
                return FilterDecision::exclude(
                    FilterRule::PathEscape,
                    "path escapes the project root",
                )
            }
            Err(PathError::Empty) => {
                return FilterDecision::exclude(FilterRule::PathEscape, "empty path")
            }
        };

        let subject = Subject {
            path: &path,
            content,
        };
        for (_, matcher) in RULES {
            if let Some(decision) = matcher(self, &subject) {
                return decision;
            }
        }
        FilterDecision::include(FilterRule::SiteContent, "site content")
    }

    /// Classify every file, keeping input order within each bucket.
    pub fn classify_batch<T: FilterSubject>(&self, files: Vec<T>) -> FilterBatch<T> {
        let mut batch = FilterBatch {
            included: Vec::new(),
            excluded: Vec::new(),
            stats: FilterStats::default(),
        };

        for file in files {
            let decision = self.classify(file.subject_path(), file.subject_text());

            batch.stats.total += 1;
            *batch.stats.by_rule.entry(decision.rule).or_insert(0) += 1;
            if decision.config_error.is_some() {
                batch.stats.config_errors += 1;
            }

            if decision.include {
                batch.stats.included += 1;
                batch.included.push(Classified { file, decision });
            } else {
                batch.stats.excluded += 1;
                batch.excluded.push(Classified { file, decision });
            }
        }

        batch
    }
}

/// Drop a leading `src/` so rules match both project layouts.
fn without_src(path: &SitePath) -> &str {
    path.as_str().strip_prefix("src/").unwrap_or(path.as_str())
}

fn under(path: &str, dir: &str) -> bool {
    path.starts_with(dir) && path.as_bytes().get(dir.len()) == Some(&b'/')
}

fn match_editor_api(_: &ProductionFilter, subject: &Subject<'_>) -> Option<FilterDecision> {
    let rest = without_src(subject.path).strip_prefix("app/api/")?;
    let namespace = EDITOR_API_NAMESPACES
        .iter()
        .find(|ns| under(rest, ns))?;
    Some(FilterDecision::exclude(
        FilterRule::EditorApi,
        format!("editor-only API route (app/api/{}/)", namespace),
    ))
}

fn match_editor_ui(_: &ProductionFilter, subject: &Subject<'_>) -> Option<FilterDecision> {
    let path = without_src(subject.path);
    let dir = EDITOR_UI_DIRS.iter().find(|dir| under(path, dir))?;
    Some(FilterDecision::exclude(
        FilterRule::EditorUi,
        format!("editor UI source ({}/)", dir),
    ))
}

fn match_deploy_infra(_: &ProductionFilter, subject: &Subject<'_>) -> Option<FilterDecision> {
    let path = without_src(subject.path);
    if let Some(dir) = DEPLOY_INFRA_DIRS.iter().find(|dir| under(path, dir)) {
        return Some(FilterDecision::exclude(
            FilterRule::DeployInfra,
            format!("deployment infrastructure ({}/)", dir),
        ));
    }
    let stem = subject.path.file_stem();
    if DEPLOY_INFRA_STEMS.contains(&stem) {
        return Some(FilterDecision::exclude(
            FilterRule::DeployInfra,
            format!("deployment infrastructure module ({})", stem),
        ));
    }
    None
}

fn match_config_patterns(filter: &ProductionFilter, subject: &Subject<'_>) -> Option<FilterDecision> {
    let path = subject.path.as_str();
    let include = filter.include.matching_pattern(path);
    let exclude = filter.exclude.matching_pattern(path);

    match (include, exclude) {
        (Some(include), Some(exclude)) => {
            let error = FilterConfigError {
                path: path.to_string(),
                include: include.to_string(),
                exclude: exclude.to_string(),
            };
            tracing::error!(%error, "contradictory filter patterns; excluding file");
            let mut decision = FilterDecision::exclude(
                FilterRule::ConfigPattern,
                format!("conflicting filter patterns ('{}' vs '{}'), excluded", include, exclude),
            );
            decision.config_error = Some(error);
            Some(decision)
        }
        (None, Some(exclude)) => Some(FilterDecision::exclude(
            FilterRule::ConfigPattern,
            format!("excluded by filter pattern '{}'", exclude),
        )),
        (Some(include), None) => Some(FilterDecision::include(
            FilterRule::ConfigPattern,
            format!("included by filter pattern '{}'", include),
        )),
        (None, None) => None,
    }
}

fn match_non_project(_: &ProductionFilter, subject: &Subject<'_>) -> Option<FilterDecision> {
    let path = subject.path;
    let ext = path.extension();
    let ext = ext.as_deref();

    if path.is_under("docs") {
        return Some(FilterDecision::exclude(FilterRule::NonProject, "documentation"));
    }
    if matches!(ext, Some("md") | Some("mdx"))
        && !path.is_under("src/app")
        && !path.is_under("app")
    {
        return Some(FilterDecision::exclude(FilterRule::NonProject, "documentation"));
    }
    if ext == Some("sh") || path.is_under("scripts") {
        return Some(FilterDecision::exclude(FilterRule::NonProject, "shell script"));
    }

    if path.is_root_file() {
        if is_root_config(path.file_name()) {
            return None;
        }
        return Some(FilterDecision::exclude(
            FilterRule::NonProject,
            "not a recognized project file",
        ));
    }

    let top = path.segments().next().unwrap_or_default();
    if !SOURCE_ROOTS.contains(&top) {
        return Some(FilterDecision::exclude(
            FilterRule::NonProject,
            format!("outside project source roots ({}/)", top),
        ));
    }
    None
}

fn is_root_config(name: &str) -> bool {
    ROOT_CONFIG_FILES.contains(&name) || ROOT_CONFIG_PREFIXES.iter().any(|p| name.starts_with(p))
}

fn match_editor_marker(_: &ProductionFilter, subject: &Subject<'_>) -> Option<FilterDecision> {
    let content = subject.content?;
    content
        .lines()
        .take(MARKER_SCAN_LINES)
        .any(|line| line.contains(EDITOR_MARKER))
        .then(|| FilterDecision::exclude(FilterRule::EditorMarker, "marked @editor-only"))
}
