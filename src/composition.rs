//! The widget instance model: one article's composed body.
//!
//! A composition is an ordered list of [`WidgetInstance`]s, owned by exactly
//! one article and persisted on it as a single opaque JSON blob. This module
//! defines the serialization contract and the pure editing operations used
//! by the composition editor.
//!
//! Every mutation returns a fresh list and re-establishes the position
//! invariant: sorted by `position`, positions are the contiguous sequence
//! `0..n` with no gaps or duplicates, and instance ids are unique.
//!
//! # Examples
//!
//! ```
//! use blockpress::composition::{self, WidgetInstance};
//!
//! let hero = WidgetInstance::new("hero-image");
//! let text = WidgetInstance::new("rich-text");
//! let list = composition::insert(&[], hero, 0).unwrap();
//! let list = composition::insert(&list, text, 1).unwrap();
//!
//! let blob = composition::serialize(&list).unwrap();
//! let restored = composition::deserialize(&blob).unwrap();
//! assert_eq!(restored, list);
//! ```

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::utils::json_ext::deep_merge;

/// Errors from composition serialization and editing operations.
#[derive(Debug, Error, Diagnostic)]
pub enum CompositionError {
    /// The stored blob is not an array of well-formed instance objects.
    ///
    /// Callers should treat the article as having no composition and fall
    /// back to default generation rather than failing the page.
    #[error("stored composition is structurally invalid")]
    #[diagnostic(
        code(blockpress::composition::parse),
        help("Regenerate the composition from article metadata via defaults::generate.")
    )]
    Parse(#[source] serde_json::Error),

    /// The instance list could not be encoded.
    #[error("composition could not be serialized")]
    #[diagnostic(code(blockpress::composition::serialize))]
    Serialize(#[source] serde_json::Error),

    /// An editing operation targeted an instance id not present in the list.
    #[error("no instance with id `{id}` in this composition")]
    #[diagnostic(code(blockpress::composition::unknown_instance))]
    UnknownInstance { id: String },

    /// An insert would duplicate an existing instance id.
    #[error("instance id `{id}` already exists in this composition")]
    #[diagnostic(code(blockpress::composition::duplicate_id))]
    DuplicateId { id: String },
}

/// One configured, ordered, enable-able occurrence of a widget type inside
/// an article's composition.
///
/// Unknown keys encountered on the wire are preserved in `extra` so that
/// compositions written by newer software round-trip losslessly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetInstance {
    /// Instance-local unique id (unique within the article, not globally).
    pub id: String,
    /// The bound widget type id. May dangle if the type was retired; the
    /// renderer treats that as a skip, not a crash.
    #[serde(rename = "type")]
    pub widget_type: String,
    /// Disabled instances are retained but not rendered.
    pub enabled: bool,
    /// Canonical render order is ascending position, stable on ties.
    pub position: i64,
    /// Config payload; keys should match the bound type's admin fields, but
    /// extra and missing keys are tolerated at render time.
    #[serde(default)]
    pub config: Map<String, Value>,
    /// Unknown wire keys, preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WidgetInstance {
    /// Create an enabled instance of the given type with a fresh id, empty
    /// config, and position 0 (renumbered on insert).
    #[must_use]
    pub fn new(widget_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            widget_type: widget_type.into(),
            enabled: true,
            position: 0,
            config: Map::new(),
            extra: Map::new(),
        }
    }

    /// Set one config value, builder-style.
    #[must_use]
    pub fn with_config_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    /// Replace the whole config, builder-style.
    #[must_use]
    pub fn with_config(mut self, config: Map<String, Value>) -> Self {
        self.config = config;
        self
    }
}

/// Encode a composition as its persisted JSON blob.
///
/// Writers must persist exactly this output; the field is opaque to every
/// other reader until [`deserialize`]d.
pub fn serialize(instances: &[WidgetInstance]) -> Result<String, CompositionError> {
    serde_json::to_string(instances).map_err(CompositionError::Serialize)
}

/// Decode a stored composition blob.
///
/// Tolerant of unknown extra keys per instance; fails with
/// [`CompositionError::Parse`] if the outer shape is not an array of
/// objects or a required field (`id`, `type`, `enabled`, `position`) is
/// absent.
pub fn deserialize(blob: &str) -> Result<Vec<WidgetInstance>, CompositionError> {
    serde_json::from_str(blob).map_err(CompositionError::Parse)
}

/// Renumber positions as the contiguous sequence `0..n` in current order.
///
/// Ordering is a stable sort on the existing positions, so ties keep their
/// original list order.
#[must_use]
pub fn normalize(instances: &[WidgetInstance]) -> Vec<WidgetInstance> {
    let mut ordered = instances.to_vec();
    ordered.sort_by_key(|instance| instance.position);
    for (index, instance) in ordered.iter_mut().enumerate() {
        instance.position = index as i64;
    }
    ordered
}

/// Insert a new instance at the given position (clamped to the list end).
pub fn insert(
    instances: &[WidgetInstance],
    new_instance: WidgetInstance,
    at_position: usize,
) -> Result<Vec<WidgetInstance>, CompositionError> {
    if instances.iter().any(|i| i.id == new_instance.id) {
        return Err(CompositionError::DuplicateId {
            id: new_instance.id,
        });
    }
    let mut ordered = normalize(instances);
    let index = at_position.min(ordered.len());
    ordered.insert(index, new_instance);
    Ok(renumber(ordered))
}

/// Remove the instance with the given id.
pub fn remove(
    instances: &[WidgetInstance],
    id: &str,
) -> Result<Vec<WidgetInstance>, CompositionError> {
    let mut ordered = normalize(instances);
    let index = position_of(&ordered, id)?;
    ordered.remove(index);
    Ok(renumber(ordered))
}

/// Move one instance to a new position (clamped), renumbering the rest.
pub fn reorder(
    instances: &[WidgetInstance],
    id: &str,
    new_position: usize,
) -> Result<Vec<WidgetInstance>, CompositionError> {
    let mut ordered = normalize(instances);
    let index = position_of(&ordered, id)?;
    let moved = ordered.remove(index);
    let target = new_position.min(ordered.len());
    ordered.insert(target, moved);
    Ok(renumber(ordered))
}

/// Toggle visibility of one instance without losing its configuration.
pub fn set_enabled(
    instances: &[WidgetInstance],
    id: &str,
    enabled: bool,
) -> Result<Vec<WidgetInstance>, CompositionError> {
    let mut ordered = normalize(instances);
    let index = position_of(&ordered, id)?;
    ordered[index].enabled = enabled;
    Ok(ordered)
}

/// Merge a config patch into one instance's config.
///
/// Object values merge recursively with the patch winning on conflicts;
/// scalar and array values are replaced outright.
pub fn upsert_config(
    instances: &[WidgetInstance],
    id: &str,
    patch: &Map<String, Value>,
) -> Result<Vec<WidgetInstance>, CompositionError> {
    let mut ordered = normalize(instances);
    let index = position_of(&ordered, id)?;

    let current = Value::Object(ordered[index].config.clone());
    let merged = deep_merge(&current, &Value::Object(patch.clone()));
    if let Value::Object(config) = merged {
        ordered[index].config = config;
    }
    Ok(ordered)
}

fn position_of(instances: &[WidgetInstance], id: &str) -> Result<usize, CompositionError> {
    instances
        .iter()
        .position(|instance| instance.id == id)
        .ok_or_else(|| CompositionError::UnknownInstance { id: id.to_string() })
}

fn renumber(mut instances: Vec<WidgetInstance>) -> Vec<WidgetInstance> {
    for (index, instance) in instances.iter_mut().enumerate() {
        instance.position = index as i64;
    }
    instances
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named(id: &str, position: i64) -> WidgetInstance {
        WidgetInstance {
            id: id.to_string(),
            widget_type: "rich-text".to_string(),
            enabled: true,
            position,
            config: Map::new(),
            extra: Map::new(),
        }
    }

    #[test]
    fn normalize_closes_gaps_and_keeps_tie_order() {
        let list = vec![named("a", 10), named("b", 3), named("c", 3)];
        let normalized = normalize(&list);
        let ids: Vec<&str> = normalized.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
        let positions: Vec<i64> = normalized.iter().map(|i| i.position).collect();
        assert_eq!(positions, [0, 1, 2]);
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let list = vec![named("a", 0)];
        let result = insert(&list, named("a", 0), 1);
        assert!(matches!(result, Err(CompositionError::DuplicateId { .. })));
    }

    #[test]
    fn upsert_config_merges_patch_over_current() {
        let mut instance = named("a", 0);
        instance.config = json!({"title": "old", "nested": {"keep": 1}})
            .as_object()
            .unwrap()
            .clone();
        let patch = json!({"title": "new", "nested": {"add": 2}})
            .as_object()
            .unwrap()
            .clone();

        let updated = upsert_config(&[instance], "a", &patch).unwrap();
        assert_eq!(
            Value::Object(updated[0].config.clone()),
            json!({"title": "new", "nested": {"keep": 1, "add": 2}})
        );
    }
}
