//! Website document - the editable model of an entire site
//!
//! Pure data plus the route invariant. The generator reads it by reference and
//! never mutates it; the orchestrator only advances the version number.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::value_objects::{Route, RouteError};

/// The whole site as edited in the browser.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteDocument {
    /// Page key → page, in editor order.
    #[serde(default)]
    pub pages: IndexMap<String, Page>,

    /// Incremented once per deploy that created a commit; never decreases.
    #[serde(default, alias = "current_version_number")]
    pub current_version_number: u64,
}

/// One page: an ordered component list plus optional SEO metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Render order.
    #[serde(default)]
    pub components: Vec<ComponentInstance>,

    #[serde(
        default,
        alias = "seo_metadata",
        alias = "seo",
        skip_serializing_if = "Option::is_none"
    )]
    pub seo_metadata: Option<SeoMetadata>,
}

/// Per-page SEO fields. Every field is optional; defaults are applied at
/// generation time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, alias = "og_image", skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

impl SeoMetadata {
    /// Overlay `other` on top of `self`, field by field.
    pub fn overlay(&self, other: &SeoMetadata) -> SeoMetadata {
        SeoMetadata {
            title: other.title.clone().or_else(|| self.title.clone()),
            description: other.description.clone().or_else(|| self.description.clone()),
            keywords: other.keywords.clone().or_else(|| self.keywords.clone()),
            og_image: other.og_image.clone().or_else(|| self.og_image.clone()),
        }
    }
}

/// A placed component: which design it renders as, and its props.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInstance {
    #[serde(rename = "type")]
    pub component_type: String,

    /// Prop key (possibly dotted, e.g. `images.main`) → value.
    #[serde(default)]
    pub props: BTreeMap<String, Value>,
}

impl ComponentInstance {
    pub fn new(component_type: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            props: BTreeMap::new(),
        }
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }
}

/// Route invariant violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentRouteError {
    #[error("page '{page}' has an invalid route: {source}")]
    Invalid {
        page: String,
        #[source]
        source: RouteError,
    },

    #[error("pages '{first}' and '{second}' both map to route '{route}'")]
    Collision {
        route: String,
        first: String,
        second: String,
    },
}

impl WebsiteDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, key: impl Into<String>, page: Page) -> Self {
        self.pages.insert(key.into(), page);
        self
    }

    /// Resolve every page key to its route, in page order, enforcing that no
    /// two pages share a route.
    pub fn routes(&self) -> Result<Vec<(&str, Route)>, DocumentRouteError> {
        let mut seen: BTreeMap<Route, &str> = BTreeMap::new();
        let mut routes = Vec::with_capacity(self.pages.len());

        for key in self.pages.keys() {
            let route =
                Route::from_page_key(key).map_err(|source| DocumentRouteError::Invalid {
                    page: key.clone(),
                    source,
                })?;
            if let Some(first) = seen.get(&route) {
                return Err(DocumentRouteError::Collision {
                    route: route.to_string(),
                    first: (*first).to_string(),
                    second: key.clone(),
                });
            }
            seen.insert(route.clone(), key);
            routes.push((key.as_str(), route));
        }

        Ok(routes)
    }

    /// Record a newly deployed version. The number only ever moves forward.
    pub fn advance_version(&mut self, version: u64) {
        self.current_version_number = self.current_version_number.max(version);
    }

    pub fn component_count(&self) -> usize {
        self.pages.values().map(|p| p.components.len()).sum()
    }
}

impl Page {
    pub fn new(components: Vec<ComponentInstance>) -> Self {
        Self {
            components,
            seo_metadata: None,
        }
    }

    pub fn with_seo(mut self, seo: SeoMetadata) -> Self {
        self.seo_metadata = Some(seo);
        self
    }
}
