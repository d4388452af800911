//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use super::types::{Config, ConfigError};
use super::ConfigWarning;

/// Project config file name, looked up in the project directory.
pub const PROJECT_CONFIG_FILE: &str = "siteforge.toml";

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.split('.').next_back().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                line: find_line_number(&content, &leaf),
                suggestion: suggest_key(&leaf),
                key,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from project config, user config, or defaults.
///
/// Unlike a missing file, an unreadable or malformed one is an error: a
/// deploy must not silently fall back to another repository.
pub fn discover(project_dir: Option<&Path>) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let candidates = project_dir
        .map(|dir| dir.join(PROJECT_CONFIG_FILE))
        .into_iter()
        .chain(user_config_path());

    for path in candidates {
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            let (config, warnings) = load_with_warnings(&path)?;
            return Ok((config.with_env_overrides(), warnings));
        }
    }

    tracing::debug!("no config file found; using defaults");
    Ok((Config::default().with_env_overrides(), Vec::new()))
}

/// Apply environment variable overrides (SITEFORGE_* prefix)
pub fn with_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    // SITEFORGE_REPO (owner/repo)
    if let Some(repo) = var("SITEFORGE_REPO") {
        match repo.split_once('/') {
            Some((owner, name)) => {
                config.source_control.owner = Some(owner.to_string());
                config.source_control.repo = Some(name.to_string());
            }
            None => tracing::warn!(value = %repo, "ignoring SITEFORGE_REPO; expected owner/repo"),
        }
    }
    if let Some(branch) = var("SITEFORGE_PRODUCTION_BRANCH") {
        config.source_control.production_branch = branch;
    }
    if let Some(branch) = var("SITEFORGE_PREVIEW_BRANCH") {
        config.source_control.preview_branch = branch;
    }
    if let Some(url) = var("SITEFORGE_GITHUB_API_URL") {
        config.source_control.api_url = url;
    }
    if let Some(project) = var("SITEFORGE_HOSTING_PROJECT") {
        config.hosting.project = Some(project);
    }
    if let Some(team) = var("SITEFORGE_HOSTING_TEAM_ID") {
        config.hosting.team_id = Some(team);
    }
    if let Some(url) = var("SITEFORGE_VERCEL_API_URL") {
        config.hosting.api_url = url;
    }
    if let Some(root) = var("SITEFORGE_PROJECT_ROOT") {
        config.project.root = Some(PathBuf::from(root));
    }
    if let Some(dir) = var("SITEFORGE_LOCK_DIR") {
        config.locks.dir = Some(PathBuf::from(dir));
    }
    if let Some(per_page) = var("SITEFORGE_VERSIONS_PER_PAGE") {
        match per_page.parse() {
            Ok(n) => config.versions.per_page = n,
            Err(_) => tracing::warn!(value = %per_page, "ignoring SITEFORGE_VERSIONS_PER_PAGE"),
        }
    }

    config
}

/// `$XDG_CONFIG_HOME/siteforge/config.toml`, else the platform config dir.
fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("siteforge").join("config.toml"))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "source_control",
        "owner",
        "repo",
        "production_branch",
        "preview_branch",
        "api_url",
        "token_env",
        "timeout_secs",
        "hosting",
        "project",
        "team_id",
        "custom_domain",
        "generator",
        "data_dir",
        "app_dir",
        "renderer_import",
        "component_modules",
        "registry",
        "filter",
        "exclude",
        "include",
        "root",
        "versions",
        "per_page",
        "locks",
        "dir",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 && dist < unknown.len() => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
