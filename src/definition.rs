//! Widget type definitions: template + admin-field schema pairs.
//!
//! A [`WidgetTypeDefinition`] describes one kind of renderable content
//! block: the template it renders with, the schema of admin-editable config
//! fields, grouping metadata for the composition editor, and lifecycle
//! flags. Definitions are installed into the
//! [`WidgetRegistry`](crate::registry::WidgetRegistry) at startup/seed time.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The closed set of admin-field kinds.
///
/// These drive the composition editor's input widgets. [`FieldKind::Json`]
/// is the escape hatch for structured values: arrays/objects serialized as
/// text in the config and parsed at use time by the template interpreter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line text input.
    Text,
    /// Multi-line text input.
    Textarea,
    /// Numeric input.
    Number,
    /// Boolean toggle.
    Checkbox,
    /// Raw JSON entered as text, parsed where the template consumes it.
    Json,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Textarea => write!(f, "textarea"),
            Self::Number => write!(f, "number"),
            Self::Checkbox => write!(f, "checkbox"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Schema entry describing one editable key of a widget instance's config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdminField {
    /// Config key this field edits. Must be a legal path segment:
    /// non-empty and dot-free (validated at registration).
    pub key: String,
    /// Label shown in the composition editor.
    pub label: String,
    /// Input kind.
    pub kind: FieldKind,
    /// Whether the editor requires a value before saving.
    #[serde(default)]
    pub required: bool,
    /// Default value, used by the editor and by default composition
    /// generation when metadata does not supply one.
    #[serde(default)]
    pub default_value: Option<Value>,
}

impl AdminField {
    /// Create a field with no default and `required = false`.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            required: false,
            default_value: None,
        }
    }

    /// Mark the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a default value.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// A named, versioned template + schema pair describing one kind of
/// renderable content block.
///
/// # Examples
///
/// ```
/// use blockpress::definition::{AdminField, FieldKind, WidgetTypeDefinition};
///
/// let definition = WidgetTypeDefinition::builder("hero-image")
///     .name("Hero image")
///     .description("Full-width lead image")
///     .category("media")
///     .template("<img src=\"{{image}}\" alt=\"{{alt}}\">")
///     .admin_field(AdminField::new("image", "Image URL", FieldKind::Text).required())
///     .admin_field(AdminField::new("alt", "Alt text", FieldKind::Text))
///     .build();
///
/// assert_eq!(definition.id, "hero-image");
/// assert!(definition.active);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetTypeDefinition {
    /// Stable unique key. Immutable forever; widget instances bind to it.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    #[serde(default)]
    pub description: String,
    /// Editor grouping. Drives listing, never rendering.
    #[serde(default)]
    pub category: String,
    /// Opaque version tag for the template/schema pair.
    #[serde(default)]
    pub version: String,
    /// Template-language source, rendered against an instance's config.
    pub template: String,
    /// Auxiliary stylesheet text, passed through verbatim.
    #[serde(default)]
    pub styles: String,
    /// Ordered schema of admin-editable config fields.
    #[serde(default)]
    pub admin_fields: Vec<AdminField>,
    /// Inactive types are hidden from new-instance pickers but existing
    /// instances keep rendering.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Whether the type is offered across all sites or scoped to one.
    /// Scoping enforcement lives outside the core.
    #[serde(default = "default_true")]
    pub global: bool,
}

fn default_true() -> bool {
    true
}

impl WidgetTypeDefinition {
    /// Start building a definition for the given type id.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> WidgetTypeDefinitionBuilder {
        WidgetTypeDefinitionBuilder::new(id)
    }

    /// Default value declared for a config key, if any.
    #[must_use]
    pub fn default_for(&self, key: &str) -> Option<&Value> {
        self.admin_fields
            .iter()
            .find(|f| f.key == key)
            .and_then(|f| f.default_value.as_ref())
    }
}

/// Fluent builder for [`WidgetTypeDefinition`].
#[derive(Debug)]
pub struct WidgetTypeDefinitionBuilder {
    definition: WidgetTypeDefinition,
}

impl WidgetTypeDefinitionBuilder {
    fn new(id: impl Into<String>) -> Self {
        Self {
            definition: WidgetTypeDefinition {
                id: id.into(),
                name: String::new(),
                description: String::new(),
                category: String::new(),
                version: String::new(),
                template: String::new(),
                styles: String::new(),
                admin_fields: Vec::new(),
                active: true,
                global: true,
            },
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.definition.name = name.into();
        self
    }

    /// Display description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.definition.description = description.into();
        self
    }

    /// Editor grouping category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.definition.category = category.into();
        self
    }

    /// Opaque version tag.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.definition.version = version.into();
        self
    }

    /// Template source. Validated when the definition is registered.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.definition.template = template.into();
        self
    }

    /// Auxiliary stylesheet text.
    #[must_use]
    pub fn styles(mut self, styles: impl Into<String>) -> Self {
        self.definition.styles = styles.into();
        self
    }

    /// Append one admin field to the schema.
    #[must_use]
    pub fn admin_field(mut self, field: AdminField) -> Self {
        self.definition.admin_fields.push(field);
        self
    }

    /// Set the activation flag.
    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.definition.active = active;
        self
    }

    /// Set site scoping.
    #[must_use]
    pub fn global(mut self, global: bool) -> Self {
        self.definition.global = global;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> WidgetTypeDefinition {
        self.definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_defaults() {
        let def = WidgetTypeDefinition::builder("x").template("{{y}}").build();
        assert!(def.active);
        assert!(def.global);
        assert!(def.admin_fields.is_empty());
    }

    #[test]
    fn default_for_returns_declared_default() {
        let def = WidgetTypeDefinition::builder("x")
            .admin_field(AdminField::new("alt", "Alt", FieldKind::Text).with_default(json!("")))
            .build();
        assert_eq!(def.default_for("alt"), Some(&json!("")));
        assert_eq!(def.default_for("missing"), None);
    }

    #[test]
    fn field_kind_wire_form_is_lowercase() {
        assert_eq!(serde_json::to_string(&FieldKind::Textarea).unwrap(), "\"textarea\"");
        let parsed: FieldKind = serde_json::from_str("\"checkbox\"").unwrap();
        assert_eq!(parsed, FieldKind::Checkbox);
    }
}
