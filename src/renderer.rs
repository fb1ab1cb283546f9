//! Composition rendering: instances plus registry in, markup out.
//!
//! Rendering filters a composition to its enabled instances, orders them by
//! position (stable on ties), resolves each instance's widget type in the
//! registry, and evaluates that type's template against the instance
//! config. Per-instance output is concatenated in final order.
//!
//! Failure containment is the defining property: an instance whose type is
//! missing from the registry is skipped with a [`RenderWarning`], and
//! interpreter resolution misses render as empty output. One broken block
//! costs at most a visually missing block, never the page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::composition::{self, CompositionError, WidgetInstance};
use crate::registry::WidgetRegistry;

/// Soft, non-fatal diagnostic recorded when an instance references a widget
/// type not currently in the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderWarning {
    /// When the warning was recorded.
    pub when: DateTime<Utc>,
    /// Id of the skipped instance.
    pub instance_id: String,
    /// The dangling widget type id.
    pub widget_type: String,
}

impl RenderWarning {
    /// Record a missing-type warning for one instance.
    #[must_use]
    pub fn missing_type(instance_id: impl Into<String>, widget_type: impl Into<String>) -> Self {
        Self {
            when: Utc::now(),
            instance_id: instance_id.into(),
            widget_type: widget_type.into(),
        }
    }
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "instance `{}` skipped: widget type `{}` is not registered",
            self.instance_id, self.widget_type
        )
    }
}

/// The result of rendering a composition.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderOutput {
    /// Concatenated per-instance markup in final order.
    pub html: String,
    /// Verbatim stylesheet text of every referenced widget type, each
    /// included once in first-use order.
    pub styles: String,
    /// Missing-type warnings recorded during this render.
    pub warnings: Vec<RenderWarning>,
}

impl RenderOutput {
    /// Whether every enabled instance rendered.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Render a composition against a registry.
///
/// Never fails: missing types are skipped and recorded, and template
/// evaluation is total. Disabled instances are ignored but retained by the
/// caller's list.
#[must_use]
pub fn render(instances: &[WidgetInstance], registry: &WidgetRegistry) -> RenderOutput {
    let mut ordered: Vec<&WidgetInstance> =
        instances.iter().filter(|i| i.enabled).collect();
    ordered.sort_by_key(|instance| instance.position);

    let mut output = RenderOutput::default();
    let mut styled_types: Vec<&str> = Vec::new();

    for instance in ordered {
        let Some(widget) = registry.get(&instance.widget_type) else {
            tracing::warn!(
                instance_id = %instance.id,
                widget_type = %instance.widget_type,
                "skipping instance: widget type not registered"
            );
            output
                .warnings
                .push(RenderWarning::missing_type(&instance.id, &instance.widget_type));
            continue;
        };

        let context = Value::Object(instance.config.clone());
        output.html.push_str(&widget.template.render(&context));

        if !widget.definition.styles.is_empty()
            && !styled_types.contains(&instance.widget_type.as_str())
        {
            styled_types.push(&instance.widget_type);
            if !output.styles.is_empty() {
                output.styles.push('\n');
            }
            output.styles.push_str(&widget.definition.styles);
        }
    }

    output
}

/// Deserialize a stored composition blob and render it.
///
/// # Errors
///
/// [`CompositionError::Parse`] when the blob is structurally invalid; the
/// caller should fall back to default generation rather than failing the
/// page.
pub fn render_serialized(
    blob: &str,
    registry: &WidgetRegistry,
) -> Result<RenderOutput, CompositionError> {
    let instances = composition::deserialize(blob)?;
    Ok(render(&instances, registry))
}
