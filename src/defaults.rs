//! Default composition generation from raw article metadata.
//!
//! The first time an article with no stored composition is opened for
//! editing or rendering, the surrounding layer calls [`generate`] to
//! synthesize a reasonable starting point: a hero image (when the article
//! has one), an opening hook seeded from the excerpt, and a closing
//! call-to-action. The caller decides whether and when to persist the
//! result; this module never mutates anything.
//!
//! Generation degrades gracefully: a block whose widget type is not
//! registered and active is simply omitted, never an error.

use serde_json::{Map, Value, json};
use std::sync::Arc;

use crate::composition::WidgetInstance;
use crate::registry::{RegisteredWidget, WidgetRegistry};
use crate::seed;

/// Raw article metadata supplied by the article-management layer.
///
/// All fields are optional; generation uses whatever is present.
///
/// # Examples
///
/// ```
/// use blockpress::defaults::ArticleMetadata;
///
/// let metadata = ArticleMetadata::default()
///     .with_title("Autumn lookbook")
///     .with_excerpt("Our favourite layers for the season.")
///     .with_image("https://cdn.example.com/lookbook.jpg")
///     .with_site_brand_name("Northway");
/// assert_eq!(metadata.title.as_deref(), Some("Autumn lookbook"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArticleMetadata {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub site_id: Option<String>,
    pub site_brand_name: Option<String>,
}

impl ArticleMetadata {
    /// Article title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Short teaser text.
    #[must_use]
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Full body text.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Article category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Hero image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Owning site id.
    #[must_use]
    pub fn with_site_id(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    /// Brand name of the owning site.
    #[must_use]
    pub fn with_site_brand_name(mut self, brand: impl Into<String>) -> Self {
        self.site_brand_name = Some(brand.into());
        self
    }
}

/// Synthesize a starter composition from article metadata.
///
/// Pure: same metadata and registry contents produce an equivalent list
/// (same length, types, and config content, in the same order). Instance
/// ids are freshly generated per call and carry no stability guarantee.
#[must_use]
pub fn generate(metadata: &ArticleMetadata, registry: &WidgetRegistry) -> Vec<WidgetInstance> {
    let mut instances: Vec<WidgetInstance> = Vec::new();

    if let Some(image) = present(&metadata.image)
        && let Some(widget) = active_widget(registry, seed::HERO_IMAGE)
    {
        let mut config = Map::new();
        config.insert("image".to_string(), json!(image));
        if let Some(title) = present(&metadata.title) {
            config.insert("alt".to_string(), json!(title));
        }
        instances.push(build_instance(&widget, config));
    }

    let hook = present(&metadata.excerpt).or_else(|| opening_of(&metadata.content));
    if let Some(text) = hook
        && let Some(widget) = active_widget(registry, seed::RICH_TEXT)
    {
        let mut config = Map::new();
        config.insert("body".to_string(), json!(format!("<p>{text}</p>")));
        instances.push(build_instance(&widget, config));
    }

    if let Some(widget) = active_widget(registry, seed::CALL_TO_ACTION) {
        let mut config = Map::new();
        if let Some(brand) = present(&metadata.site_brand_name) {
            config.insert("heading".to_string(), json!(format!("More from {brand}")));
        }
        instances.push(build_instance(&widget, config));
    }

    for (index, instance) in instances.iter_mut().enumerate() {
        instance.position = index as i64;
    }
    instances
}

/// Look up a widget type that is both registered and active.
fn active_widget(registry: &WidgetRegistry, id: &str) -> Option<Arc<RegisteredWidget>> {
    match registry.get(id) {
        Some(widget) if widget.definition.active => Some(widget),
        Some(_) => {
            tracing::debug!(widget_type = id, "default block omitted; type inactive");
            None
        }
        None => {
            tracing::debug!(widget_type = id, "default block omitted; type not registered");
            None
        }
    }
}

/// Create an instance of the widget, filling config gaps from the
/// definition's declared field defaults.
fn build_instance(widget: &RegisteredWidget, mut config: Map<String, Value>) -> WidgetInstance {
    for field in &widget.definition.admin_fields {
        if let Some(default) = &field.default_value
            && !config.contains_key(&field.key)
        {
            config.insert(field.key.clone(), default.clone());
        }
    }
    WidgetInstance::new(&widget.definition.id).with_config(config)
}

/// Non-empty trimmed view of an optional metadata field.
fn present(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Opening hook fallback: the first paragraph of the body text.
fn opening_of(content: &Option<String>) -> Option<&str> {
    let text = present(content)?;
    let paragraph = match text.split_once("\n\n") {
        Some((first, _)) => first.trim(),
        None => text,
    };
    (!paragraph.is_empty()).then_some(paragraph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_of_takes_first_paragraph() {
        let content = Some("First paragraph.\n\nSecond paragraph.".to_string());
        assert_eq!(opening_of(&content), Some("First paragraph."));
        assert_eq!(opening_of(&Some("   ".to_string())), None);
        assert_eq!(opening_of(&None), None);
    }

    #[test]
    fn blank_fields_count_as_absent() {
        assert_eq!(present(&Some(String::new())), None);
        assert_eq!(present(&Some("  x ".to_string())), Some("x"));
    }
}
