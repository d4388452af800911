//! Page file generator
//!
//! Compiles a [`WebsiteDocument`] into the TypeScript sources of a Next.js app
//! router project. Pure: the same document and overrides always produce the
//! same files, byte for byte, in the same order.
//!
//! Per page, in document order:
//! - `{data_dir}/{stem}.ts` - the page data as a statically importable literal
//! - `{app_dir}/{route}/page.tsx` - the route module rendering that data
//! - `{data_dir}/{stem}/components/{nn}-{type}.ts` - optional per-component modules
//!
//! followed by `{data_dir}/_index.ts`, the route-keyed index of every page.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::domain::entities::{
    ComponentRegistry, DocumentRouteError, GeneratedFile, Page, SeoMetadata, WebsiteDocument,
};
use crate::domain::services::props::{resolve_props, PropError};
use crate::domain::value_objects::{Route, RouteError, SitePath};

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Generated by siteforge from the website document. Do not edit.";

/// File name of the page index inside the data directory.
pub const INDEX_FILE: &str = "_index.ts";

/// File name of every route module inside the app directory.
pub const ROUTE_MODULE_FILE: &str = "page.tsx";

/// Per-page SEO overrides, keyed by page key.
pub type SeoOverrides = BTreeMap<String, SeoMetadata>;

/// Structurally invalid document input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("page '{page}' has an invalid route: {source}")]
    InvalidRoute {
        page: String,
        #[source]
        source: RouteError,
    },

    #[error("pages '{first}' and '{second}' both map to route '{route}'")]
    RouteCollision {
        route: String,
        first: String,
        second: String,
    },

    #[error("page '{page}', component {index}: unknown component type '{component_type}'")]
    UnknownComponent {
        page: String,
        index: usize,
        component_type: String,
    },

    #[error(
        "page '{page}', component {index} ({component_type}): prop '{key}' must be {expected}"
    )]
    InvalidProp {
        page: String,
        index: usize,
        component_type: String,
        key: String,
        expected: &'static str,
    },

    #[error(
        "page '{page}', component {index} ({component_type}): prop '{key}' conflicts with a value at '{blocked_at}'"
    )]
    PropPathConflict {
        page: String,
        index: usize,
        component_type: String,
        key: String,
        blocked_at: String,
    },

    #[error("generated path '{path}' is produced twice")]
    DuplicatePath { path: String },

    #[error("invalid output path '{path}'")]
    InvalidPath { path: String },
}

impl GenerationError {
    /// Page key the error is about, if any.
    pub fn page(&self) -> Option<&str> {
        match self {
            Self::InvalidRoute { page, .. }
            | Self::UnknownComponent { page, .. }
            | Self::InvalidProp { page, .. }
            | Self::PropPathConflict { page, .. } => Some(page),
            Self::RouteCollision { second, .. } => Some(second),
            Self::DuplicatePath { .. } | Self::InvalidPath { .. } => None,
        }
    }

    /// Zero-based component index the error is about, if any.
    pub fn component_index(&self) -> Option<usize> {
        match self {
            Self::UnknownComponent { index, .. }
            | Self::InvalidProp { index, .. }
            | Self::PropPathConflict { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl From<DocumentRouteError> for GenerationError {
    fn from(err: DocumentRouteError) -> Self {
        match err {
            DocumentRouteError::Invalid { page, source } => Self::InvalidRoute { page, source },
            DocumentRouteError::Collision {
                route,
                first,
                second,
            } => Self::RouteCollision {
                route,
                first,
                second,
            },
        }
    }
}

/// Where generated files land inside the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub data_dir: SitePath,
    pub app_dir: SitePath,
    /// Module the route files import the renderer from
    pub renderer_import: String,
    /// Also emit one module per component instance
    pub component_modules: bool,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            data_dir: SitePath::new("src/data/pages").expect("default data dir is a valid path"),
            app_dir: SitePath::new("src/app").expect("default app dir is a valid path"),
            renderer_import: "@/components/PageRenderer".to_string(),
            component_modules: false,
        }
    }
}

impl OutputLayout {
    /// Whether the generator writes to `path`: anything under the data
    /// directory, or a route module under the app directory. A deploy deletes
    /// such paths from the branch once no retained file claims them.
    pub fn owns(&self, path: &SitePath) -> bool {
        path.is_under(self.data_dir.as_str())
            || (path.is_under(self.app_dir.as_str()) && path.file_name() == ROUTE_MODULE_FILE)
    }
}

/// The page file generator.
#[derive(Debug, Clone, Default)]
pub struct PageGenerator {
    registry: ComponentRegistry,
    layout: OutputLayout,
}

impl PageGenerator {
    pub fn new(registry: ComponentRegistry, layout: OutputLayout) -> Self {
        Self { registry, layout }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Compile `document` into generated files.
    ///
    /// Overrides for page keys the document does not contain are ignored.
    /// On error nothing is returned; there is no partial output.
    pub fn generate(
        &self,
        document: &WebsiteDocument,
        overrides: &SeoOverrides,
    ) -> Result<Vec<GeneratedFile>, GenerationError> {
        let routes = document.routes()?;

        let mut files = Vec::with_capacity(routes.len() * 2 + 1);
        let mut index_entries = Vec::with_capacity(routes.len());

        for (key, route) in &routes {
            let page = &document.pages[*key];
            let seo = resolve_seo(page, overrides.get(*key), route);
            let components = self.resolve_components(key, route, page)?;

            let data_path = self.data_file_path(route)?;
            files.push(GeneratedFile::new(
                data_path.clone(),
                render_data_file(key, route, &seo, &components),
            ));

            let route_path = self.route_module_path(route)?;
            let data_import = relative_import(&route_path, &data_path);
            files.push(GeneratedFile::new(
                route_path,
                render_route_module(&seo, &self.layout.renderer_import, &data_import),
            ));

            if self.layout.component_modules {
                for (index, component) in components.iter().enumerate() {
                    let type_name = component["type"].as_str().unwrap_or_default();
                    let path = self.component_module_path(route, index, type_name)?;
                    files.push(GeneratedFile::new(path, render_component_module(component)));
                }
            }

            index_entries.push((route.clone(), data_path));
        }

        let index_path = self.join(self.layout.data_dir.as_str(), INDEX_FILE)?;
        let index = render_index(&index_path, &index_entries);
        files.push(GeneratedFile::new(index_path, index));

        ensure_unique_paths(&files)?;
        Ok(files)
    }

    fn resolve_components(
        &self,
        key: &str,
        route: &Route,
        page: &Page,
    ) -> Result<Vec<Value>, GenerationError> {
        let id_prefix = route.file_stem().replace('/', "-");

        page.components
            .iter()
            .enumerate()
            .map(|(index, instance)| {
                let design = self.registry.get(&instance.component_type).ok_or_else(|| {
                    GenerationError::UnknownComponent {
                        page: key.to_string(),
                        index,
                        component_type: instance.component_type.clone(),
                    }
                })?;

                let props = resolve_props(design, instance).map_err(|err| match err {
                    PropError::InvalidValue { key: prop, expected, .. } => {
                        GenerationError::InvalidProp {
                            page: key.to_string(),
                            index,
                            component_type: instance.component_type.clone(),
                            key: prop,
                            expected,
                        }
                    }
                    PropError::PathConflict {
                        key: prop,
                        blocked_at,
                    } => GenerationError::PropPathConflict {
                        page: key.to_string(),
                        index,
                        component_type: instance.component_type.clone(),
                        key: prop,
                        blocked_at,
                    },
                })?;

                Ok(json!({
                    "id": format!("{}-{}", id_prefix, index),
                    "type": instance.component_type,
                    "props": Value::Object(props),
                }))
            })
            .collect()
    }

    fn data_file_path(&self, route: &Route) -> Result<SitePath, GenerationError> {
        self.join(
            self.layout.data_dir.as_str(),
            &format!("{}.ts", route.file_stem()),
        )
    }

    fn route_module_path(&self, route: &Route) -> Result<SitePath, GenerationError> {
        if route.is_root() {
            self.join(self.layout.app_dir.as_str(), ROUTE_MODULE_FILE)
        } else {
            self.join(
                self.layout.app_dir.as_str(),
                &format!("{}/{}", route.relative(), ROUTE_MODULE_FILE),
            )
        }
    }

    fn component_module_path(
        &self,
        route: &Route,
        index: usize,
        component_type: &str,
    ) -> Result<SitePath, GenerationError> {
        self.join(
            self.layout.data_dir.as_str(),
            &format!(
                "{}/components/{:02}-{}.ts",
                route.file_stem(),
                index,
                kebab_case(component_type)
            ),
        )
    }

    fn join(&self, dir: &str, rest: &str) -> Result<SitePath, GenerationError> {
        let raw = format!("{}/{}", dir, rest);
        SitePath::new(&raw).map_err(|_| GenerationError::InvalidPath { path: raw })
    }
}

fn resolve_seo(page: &Page, overrides: Option<&SeoMetadata>, route: &Route) -> Value {
    let base = page.seo_metadata.clone().unwrap_or_default();
    let seo = match overrides {
        Some(o) => base.overlay(o),
        None => base,
    };

    let mut block = Map::new();
    block.insert(
        "title".to_string(),
        Value::String(seo.title.unwrap_or_else(|| route.humanized())),
    );
    block.insert(
        "description".to_string(),
        Value::String(seo.description.unwrap_or_default()),
    );
    block.insert(
        "keywords".to_string(),
        Value::from(seo.keywords.unwrap_or_default()),
    );
    if let Some(image) = seo.og_image {
        block.insert("ogImage".to_string(), Value::String(image));
    }
    Value::Object(block)
}

/// Render a JSON value as a TypeScript expression.
///
/// JSON is valid TypeScript; keys come out sorted, which keeps the output
/// stable.
fn literal(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

fn render_data_file(key: &str, route: &Route, seo: &Value, components: &[Value]) -> String {
    let data = json!({
        "key": key,
        "route": route.as_str(),
        "seo": seo,
        "components": components,
    });

    format!(
        "{header}\n\nexport const pageData = {data} as const;\n\nexport default pageData;\n",
        header = GENERATED_HEADER,
        data = literal(&data),
    )
}

fn render_route_module(seo: &Value, renderer_import: &str, data_import: &str) -> String {
    let mut metadata = Map::new();
    metadata.insert("title".to_string(), seo["title"].clone());
    metadata.insert("description".to_string(), seo["description"].clone());
    if seo["keywords"].as_array().is_some_and(|k| !k.is_empty()) {
        metadata.insert("keywords".to_string(), seo["keywords"].clone());
    }
    if let Some(image) = seo.get("ogImage") {
        metadata.insert("openGraph".to_string(), json!({ "images": [image] }));
    }

    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n");
    out.push_str("import type { Metadata } from \"next\";\n");
    out.push_str(&format!("import PageRenderer from \"{}\";\n", renderer_import));
    out.push_str(&format!("import pageData from \"{}\";\n\n", data_import));
    out.push_str(&format!(
        "export const metadata: Metadata = {};\n\n",
        literal(&Value::Object(metadata))
    ));
    out.push_str("export default function Page() {\n");
    out.push_str("  return <PageRenderer components={pageData.components} />;\n");
    out.push_str("}\n");
    out
}

fn render_component_module(component: &Value) -> String {
    format!(
        "{header}\n\nexport const component = {body} as const;\n\nexport default component;\n",
        header = GENERATED_HEADER,
        body = literal(component),
    )
}

fn render_index(index_path: &SitePath, entries: &[(Route, SitePath)]) -> String {
    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n");

    for (i, (_, data_path)) in entries.iter().enumerate() {
        out.push_str(&format!(
            "import page{} from \"{}\";\n",
            i,
            relative_import(index_path, data_path)
        ));
    }
    if !entries.is_empty() {
        out.push('\n');
    }

    out.push_str("export const pages = {\n");
    for (i, (route, _)) in entries.iter().enumerate() {
        out.push_str(&format!("  \"{}\": page{},\n", route, i));
    }
    out.push_str("} as const;\n\nexport default pages;\n");
    out
}

/// Module specifier that imports `to` (extension dropped) from the file `from`.
fn relative_import(from: &SitePath, to: &SitePath) -> String {
    let from_dir: Vec<&str> = {
        let segments: Vec<&str> = from.segments().collect();
        segments[..segments.len().saturating_sub(1)].to_vec()
    };
    let target: Vec<&str> = to.segments().collect();

    let common = from_dir
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from_dir.len() {
        parts.push("..".to_string());
    }
    for (i, segment) in target.iter().enumerate().skip(common) {
        if i + 1 == target.len() {
            let stem = segment
                .rsplit_once('.')
                .map(|(stem, _)| stem)
                .unwrap_or(*segment);
            parts.push(stem.to_string());
        } else {
            parts.push((*segment).to_string());
        }
    }

    let joined = parts.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{}", joined)
    }
}

/// `CallToAction` → `call-to-action`
fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower_or_digit = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if prev_lower_or_digit {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower_or_digit = false;
        } else if ch.is_ascii_alphanumeric() {
            out.push(ch);
            prev_lower_or_digit = true;
        } else {
            if !out.ends_with('-') && !out.is_empty() {
                out.push('-');
            }
            prev_lower_or_digit = false;
        }
    }
    out.trim_end_matches('-').to_string()
}

fn ensure_unique_paths(files: &[GeneratedFile]) -> Result<(), GenerationError> {
    let mut seen = BTreeSet::new();
    for file in files {
        if !seen.insert(file.path().as_str()) {
            return Err(GenerationError::DuplicatePath {
                path: file.path().to_string(),
            });
        }
    }
    Ok(())
}
