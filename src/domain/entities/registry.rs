//! Component registry - the closed set of designs a page may use
//!
//! Each design declares its editable fields: the prop key (possibly dotted),
//! the value shape the editor enforces, and the default rendered when the prop
//! is missing. The built-in set can be replaced by a TOML registry file.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Value shape of an editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    Color,
    Image,
    Gradient,
    /// Array of standard items (`{ title, description?, icon?, href? }`).
    Items,
    /// Array of testimonials (`{ quote, author, role?, avatar? }`).
    Testimonials,
}

impl FieldKind {
    /// Short description of the accepted shape, used in error messages.
    pub fn expectation(&self) -> &'static str {
        match self {
            FieldKind::Text => "a string",
            FieldKind::Color => "a color string (#rgb, #rgba, #rrggbb, #rrggbbaa or CSS color)",
            FieldKind::Image => "an image path/URL or an object with a string `src`",
            FieldKind::Gradient => {
                "a CSS gradient string or an object with string `from` and `to`"
            }
            FieldKind::Items => "an array of objects with a string `title`",
            FieldKind::Testimonials => "an array of objects with string `quote` and `author`",
        }
    }

    /// Check that `value` has this field's shape.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Color => value.as_str().is_some_and(is_valid_color),
            FieldKind::Image => match value {
                Value::String(_) => true,
                Value::Object(map) => map.get("src").is_some_and(Value::is_string),
                _ => false,
            },
            FieldKind::Gradient => match value {
                Value::String(s) => s.contains("gradient("),
                Value::Object(map) => {
                    map.get("from").is_some_and(Value::is_string)
                        && map.get("to").is_some_and(Value::is_string)
                }
                _ => false,
            },
            FieldKind::Items => every_object_has(value, &["title"]),
            FieldKind::Testimonials => every_object_has(value, &["quote", "author"]),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Color => "color",
            FieldKind::Image => "image",
            FieldKind::Gradient => "gradient",
            FieldKind::Items => "items",
            FieldKind::Testimonials => "testimonials",
        };
        f.write_str(name)
    }
}

fn is_valid_color(s: &str) -> bool {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    !s.is_empty()
}

fn every_object_has(value: &Value, keys: &[&str]) -> bool {
    match value {
        Value::Array(items) => items.iter().all(|item| {
            item.as_object()
                .is_some_and(|obj| keys.iter().all(|k| obj.get(*k).is_some_and(Value::is_string)))
        }),
        _ => false,
    }
}

/// One editable field of a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Prop key, possibly dotted (`images.main`).
    pub key: String,
    pub kind: FieldKind,
    /// Rendered when the prop is absent.
    #[serde(default)]
    pub default: Value,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, kind: FieldKind, default: Value) -> Self {
        Self {
            key: key.into(),
            kind,
            default,
        }
    }
}

/// A registered component design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDesign {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl ComponentDesign {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// Problems with a registry definition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("design '{0}' is registered twice")]
    DuplicateDesign(String),

    #[error("design '{design}' declares field '{field}' twice")]
    DuplicateField { design: String, field: String },

    #[error("design '{design}' field '{field}' has a default that is not {expected}")]
    InvalidDefault {
        design: String,
        field: String,
        expected: &'static str,
    },

    #[error("design '{design}' field '{field}' has an invalid key")]
    InvalidKey { design: String, field: String },
}

/// The closed set of designs generation accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRegistry {
    designs: BTreeMap<String, ComponentDesign>,
}

impl ComponentRegistry {
    /// Build a registry, validating names, keys and defaults.
    pub fn from_designs(designs: Vec<ComponentDesign>) -> Result<Self, RegistryError> {
        let mut map = BTreeMap::new();
        for design in designs {
            let mut seen = std::collections::BTreeSet::new();
            for field in &design.fields {
                if field.key.is_empty() || field.key.split('.').any(str::is_empty) {
                    return Err(RegistryError::InvalidKey {
                        design: design.name.clone(),
                        field: field.key.clone(),
                    });
                }
                if !seen.insert(field.key.as_str()) {
                    return Err(RegistryError::DuplicateField {
                        design: design.name.clone(),
                        field: field.key.clone(),
                    });
                }
                if !field.kind.accepts(&field.default) {
                    return Err(RegistryError::InvalidDefault {
                        design: design.name.clone(),
                        field: field.key.clone(),
                        expected: field.kind.expectation(),
                    });
                }
            }
            if map.contains_key(&design.name) {
                return Err(RegistryError::DuplicateDesign(design.name));
            }
            map.insert(design.name.clone(), design);
        }
        Ok(Self { designs: map })
    }

    /// The designs shipped with siteforge.
    pub fn builtin() -> Self {
        use FieldKind::*;

        let designs = vec![
            ComponentDesign::new(
                "Navbar",
                vec![
                    FieldSpec::new("brandName", Text, json!("My Site")),
                    FieldSpec::new("logo", Image, json!("")),
                    FieldSpec::new("links", Items, json!([{ "title": "Home", "href": "/" }])),
                    FieldSpec::new("backgroundColor", Color, json!("#ffffff")),
                    FieldSpec::new("textColor", Color, json!("#111827")),
                ],
            ),
            ComponentDesign::new(
                "Hero",
                vec![
                    FieldSpec::new("title", Text, json!("Welcome")),
                    FieldSpec::new("subtitle", Text, json!("")),
                    FieldSpec::new("ctaText", Text, json!("Get started")),
                    FieldSpec::new("ctaLink", Text, json!("#")),
                    FieldSpec::new("images.main", Image, json!("")),
                    FieldSpec::new(
                        "background",
                        Gradient,
                        json!("linear-gradient(135deg, #6366f1 0%, #8b5cf6 100%)"),
                    ),
                    FieldSpec::new("textColor", Color, json!("#ffffff")),
                ],
            ),
            ComponentDesign::new(
                "Features",
                vec![
                    FieldSpec::new("heading", Text, json!("Features")),
                    FieldSpec::new("subheading", Text, json!("")),
                    FieldSpec::new("items", Items, json!([])),
                    FieldSpec::new("backgroundColor", Color, json!("#ffffff")),
                ],
            ),
            ComponentDesign::new(
                "Testimonials",
                vec![
                    FieldSpec::new("heading", Text, json!("What our customers say")),
                    FieldSpec::new("testimonials", Testimonials, json!([])),
                    FieldSpec::new("backgroundColor", Color, json!("#f9fafb")),
                ],
            ),
            ComponentDesign::new(
                "Gallery",
                vec![
                    FieldSpec::new("heading", Text, json!("Gallery")),
                    FieldSpec::new("images", Items, json!([])),
                ],
            ),
            ComponentDesign::new(
                "CallToAction",
                vec![
                    FieldSpec::new("title", Text, json!("Ready to get started?")),
                    FieldSpec::new("buttonText", Text, json!("Contact us")),
                    FieldSpec::new("buttonLink", Text, json!("#contact")),
                    FieldSpec::new(
                        "background",
                        Gradient,
                        json!({ "from": "#0ea5e9", "to": "#6366f1" }),
                    ),
                ],
            ),
            ComponentDesign::new(
                "Footer",
                vec![
                    FieldSpec::new("copyright", Text, json!("")),
                    FieldSpec::new("links", Items, json!([])),
                    FieldSpec::new("backgroundColor", Color, json!("#111827")),
                    FieldSpec::new("textColor", Color, json!("#f9fafb")),
                ],
            ),
        ];

        Self::from_designs(designs).expect("built-in component registry should always be valid")
    }

    pub fn get(&self, name: &str) -> Option<&ComponentDesign> {
        self.designs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.designs.contains_key(name)
    }

    /// Registered design names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.designs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.designs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
