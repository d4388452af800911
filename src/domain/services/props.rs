//! Prop resolution
//!
//! Turns a component instance's flat, possibly dotted prop map into the nested
//! object the rendered site imports: declared defaults first, then the
//! instance's own values. Declared fields are shape-checked; unknown keys pass
//! through untouched.

use serde_json::{Map, Value};

use crate::domain::entities::{ComponentDesign, ComponentInstance, FieldKind};

/// Why a component's props could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropError {
    /// A declared field holds a value of the wrong shape
    InvalidValue {
        key: String,
        kind: FieldKind,
        expected: &'static str,
    },
    /// A dotted key needs an object where a scalar value already sits
    PathConflict { key: String, blocked_at: String },
}

/// Resolve `instance` against its design.
///
/// An explicit `null` counts as a missing prop and renders the default.
pub fn resolve_props(
    design: &ComponentDesign,
    instance: &ComponentInstance,
) -> Result<Map<String, Value>, PropError> {
    let mut resolved = Map::new();

    for field in &design.fields {
        if instance.props.get(&field.key).is_some_and(|v| !v.is_null()) {
            continue;
        }
        insert_dotted(&mut resolved, &field.key, field.default.clone())?;
    }

    for (key, value) in &instance.props {
        if value.is_null() {
            continue;
        }
        if let Some(field) = design.field(key) {
            if !field.kind.accepts(value) {
                return Err(PropError::InvalidValue {
                    key: key.clone(),
                    kind: field.kind,
                    expected: field.kind.expectation(),
                });
            }
        }
        insert_dotted(&mut resolved, key, value.clone())?;
    }

    Ok(resolved)
}

/// Insert `value` at the dotted `key`, creating intermediate objects.
///
/// An existing object at the leaf is merged with an incoming object so that
/// `images` and `images.main` can both be set. A scalar never replaces an
/// object built from dotted keys.
pub fn insert_dotted(target: &mut Map<String, Value>, key: &str, value: Value) -> Result<(), PropError> {
    let segments: Vec<&str> = key.split('.').collect();
    let (leaf, parents) = match segments.split_last() {
        Some(split) => split,
        None => return Ok(()),
    };

    let mut current = target;
    let mut walked = String::new();
    for segment in parents {
        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(segment);

        let slot = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match slot {
            Value::Object(map) => map,
            _ => {
                return Err(PropError::PathConflict {
                    key: key.to_string(),
                    blocked_at: walked,
                })
            }
        };
    }

    match (current.get_mut(*leaf), value) {
        (Some(Value::Object(existing)), Value::Object(incoming)) => {
            for (k, v) in incoming {
                existing.insert(k, v);
            }
        }
        (Some(Value::Object(_)), _) => {
            return Err(PropError::PathConflict {
                key: key.to_string(),
                blocked_at: key.to_string(),
            })
        }
        (_, value) => {
            current.insert((*leaf).to_string(), value);
        }
    }
    Ok(())
}
