//! Route value object
//!
//! Maps a page key (`"index"`, `"About Us"`, `"blog/launch"`) to the URL route
//! the generated site serves it under.

use std::fmt;

use thiserror::Error;

/// Why a page key cannot be turned into a route.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("character '{ch}' is not allowed in a route")]
    InvalidCharacter { ch: char },

    #[error("route segment '{segment}' is not allowed")]
    InvalidSegment { segment: String },
}

/// A normalized route path, always starting with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Route(String);

impl Route {
    /// Page keys that denote the site root.
    pub const ROOT_KEYS: [&'static str; 2] = ["index", "home"];

    /// Normalize a page key into a route.
    ///
    /// Surrounding slashes and whitespace are trimmed, the key is lowercased and
    /// whitespace runs become `-`.
    pub fn from_page_key(key: &str) -> Result<Self, RouteError> {
        let trimmed = key.trim().trim_matches('/').trim();
        let lowered = trimmed.to_lowercase();
        if lowered.is_empty() || Self::ROOT_KEYS.contains(&lowered.as_str()) {
            return Ok(Self("/".to_string()));
        }

        let mut normalized = String::with_capacity(lowered.len());
        let mut pending_dash = false;
        for ch in lowered.chars() {
            if ch.is_whitespace() {
                pending_dash = true;
                continue;
            }
            if pending_dash {
                normalized.push('-');
                pending_dash = false;
            }
            match ch {
                'a'..='z' | '0'..='9' | '-' | '_' | '/' => normalized.push(ch),
                other => return Err(RouteError::InvalidCharacter { ch: other }),
            }
        }

        for segment in normalized.split('/') {
            if segment.is_empty() {
                return Err(RouteError::InvalidSegment {
                    segment: segment.to_string(),
                });
            }
        }

        Ok(Self(format!("/{}", normalized)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Route without the leading slash; empty for the root.
    pub fn relative(&self) -> &str {
        &self.0[1..]
    }

    /// Identifier used for generated file names: `index` for the root.
    pub fn file_stem(&self) -> &str {
        if self.is_root() {
            "index"
        } else {
            self.relative()
        }
    }

    /// Human title derived from the last segment (`/about-us` → `About Us`).
    pub fn humanized(&self) -> String {
        if self.is_root() {
            return "Home".to_string();
        }
        let last = self.relative().rsplit('/').next().unwrap_or_default();
        last.split(['-', '_'])
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
