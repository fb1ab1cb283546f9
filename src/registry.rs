//! Process-wide widget type registry.
//!
//! The registry is the catalog mapping a widget-type id to its definition
//! and pre-parsed template. It has exactly one writer path (explicit
//! registration, normally from the seed feed at startup) and many readers
//! (editor listings, renderer lookups).
//!
//! Registration is all-or-nothing: the definition's template must parse and
//! its admin-field schema must be well-formed before anything is installed.
//! Replacement installs a new [`Arc`] under the id in a single map insert,
//! so a concurrent reader observes either the old or the new definition,
//! never a partially-written one.
//!
//! # Examples
//!
//! ```
//! use blockpress::definition::{AdminField, FieldKind, WidgetTypeDefinition};
//! use blockpress::registry::WidgetRegistry;
//!
//! let registry = WidgetRegistry::new();
//! registry
//!     .register(
//!         WidgetTypeDefinition::builder("hero-image")
//!             .name("Hero image")
//!             .category("media")
//!             .template("<img src=\"{{image}}\" alt=\"{{alt}}\">")
//!             .admin_field(AdminField::new("image", "Image URL", FieldKind::Text).required())
//!             .build(),
//!     )
//!     .unwrap();
//!
//! let widget = registry.get("hero-image").unwrap();
//! assert_eq!(widget.definition.name, "Hero image");
//! ```

use miette::Diagnostic;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

use crate::definition::WidgetTypeDefinition;
use crate::template::{Template, TemplateParseError};

/// Errors raised at widget-type registration.
///
/// These never occur at render time: a definition that fails validation is
/// rejected before it can reach production rendering.
#[derive(Debug, Error, Diagnostic)]
pub enum RegistrationError {
    /// The definition's template source does not parse.
    #[error("widget type `{id}` has an invalid template")]
    #[diagnostic(
        code(blockpress::registry::invalid_template),
        help("Fix the template source; block tags must be balanced and helpers recognized.")
    )]
    InvalidTemplate {
        id: String,
        #[source]
        source: TemplateParseError,
    },

    /// The definition's admin-field schema is malformed.
    #[error("widget type `{id}` has an invalid field schema: {detail}")]
    #[diagnostic(code(blockpress::registry::invalid_field_schema))]
    InvalidFieldSchema { id: String, detail: String },

    /// A definition with this id already exists and replacement was
    /// disallowed by the caller.
    #[error("widget type `{id}` is already registered")]
    #[diagnostic(
        code(blockpress::registry::duplicate_id),
        help("Use `register` to replace an existing definition in place.")
    )]
    DuplicateId { id: String },
}

/// A registered widget type: the definition paired with its pre-parsed
/// template, so rendering never re-parses.
#[derive(Clone, Debug)]
pub struct RegisteredWidget {
    pub definition: WidgetTypeDefinition,
    pub template: Template,
}

/// Process-wide catalog of widget types, keyed by stable id.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    widgets: RwLock<FxHashMap<String, Arc<RegisteredWidget>>>,
}

impl WidgetRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a definition, replacing any prior definition with the same
    /// id atomically.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::InvalidTemplate`] or
    /// [`RegistrationError::InvalidFieldSchema`]; on failure the prior
    /// state for the id (if any) is untouched.
    #[instrument(skip(self, definition), fields(id = %definition.id), err)]
    pub fn register(&self, definition: WidgetTypeDefinition) -> Result<(), RegistrationError> {
        let widget = Arc::new(validate(definition)?);
        self.widgets
            .write()
            .insert(widget.definition.id.clone(), widget);
        Ok(())
    }

    /// Install a definition only if its id is not yet taken.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::DuplicateId`] when the id exists, plus the
    /// validation errors of [`register`](Self::register).
    #[instrument(skip(self, definition), fields(id = %definition.id), err)]
    pub fn register_new(&self, definition: WidgetTypeDefinition) -> Result<(), RegistrationError> {
        let widget = Arc::new(validate(definition)?);
        let mut widgets = self.widgets.write();
        if widgets.contains_key(&widget.definition.id) {
            return Err(RegistrationError::DuplicateId {
                id: widget.definition.id.clone(),
            });
        }
        widgets.insert(widget.definition.id.clone(), widget);
        Ok(())
    }

    /// Look up a widget type by id.
    ///
    /// Returns the whole registered entry; the returned [`Arc`] stays
    /// consistent even if the id is replaced concurrently.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<RegisteredWidget>> {
        self.widgets.read().get(id).cloned()
    }

    /// Whether a widget type id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.widgets.read().contains_key(id)
    }

    /// Number of registered widget types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.read().len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.read().is_empty()
    }

    /// All widget types grouped by category, each group sorted by display
    /// name. Inactive types are included; the editor uses the `active` and
    /// `global` flags on the definitions to decide presentation.
    #[must_use]
    pub fn list_by_category(&self) -> FxHashMap<String, Vec<Arc<RegisteredWidget>>> {
        let widgets = self.widgets.read();
        let mut grouped: FxHashMap<String, Vec<Arc<RegisteredWidget>>> = FxHashMap::default();
        for widget in widgets.values() {
            grouped
                .entry(widget.definition.category.clone())
                .or_default()
                .push(Arc::clone(widget));
        }
        for group in grouped.values_mut() {
            group.sort_by(|a, b| a.definition.name.cmp(&b.definition.name));
        }
        grouped
    }

    /// Active widget types, sorted by id. This is the set offered for new
    /// instances; retired types keep rendering existing instances but are
    /// not listed here.
    #[must_use]
    pub fn list_active(&self) -> Vec<Arc<RegisteredWidget>> {
        let widgets = self.widgets.read();
        let mut active: Vec<Arc<RegisteredWidget>> = widgets
            .values()
            .filter(|w| w.definition.active)
            .map(Arc::clone)
            .collect();
        active.sort_by(|a, b| a.definition.id.cmp(&b.definition.id));
        active
    }
}

/// Validate a definition and parse its template.
///
/// Performed entirely before any lock is taken, so a failed registration
/// leaves the registry untouched.
fn validate(definition: WidgetTypeDefinition) -> Result<RegisteredWidget, RegistrationError> {
    let mut seen_keys: Vec<&str> = Vec::with_capacity(definition.admin_fields.len());
    for field in &definition.admin_fields {
        if field.key.is_empty() {
            return Err(RegistrationError::InvalidFieldSchema {
                id: definition.id.clone(),
                detail: "field key must be non-empty".to_string(),
            });
        }
        if field.key.contains('.') {
            return Err(RegistrationError::InvalidFieldSchema {
                id: definition.id.clone(),
                detail: format!("field key `{}` must not contain dots", field.key),
            });
        }
        if seen_keys.contains(&field.key.as_str()) {
            return Err(RegistrationError::InvalidFieldSchema {
                id: definition.id.clone(),
                detail: format!("field key `{}` appears more than once", field.key),
            });
        }
        seen_keys.push(&field.key);
    }

    let template =
        Template::parse(&definition.template).map_err(|source| RegistrationError::InvalidTemplate {
            id: definition.id.clone(),
            source,
        })?;

    Ok(RegisteredWidget {
        definition,
        template,
    })
}
