//! Built-in widget type definitions and the startup registration feed.
//!
//! At process initialization the surrounding platform installs a fixed
//! sequence of widget types into the registry. This module carries the
//! stock set every site starts from: the blocks the default composition
//! generator expects, plus the review grid used by product articles.
//! Operators extend the catalog with site-specific types through the same
//! [`WidgetRegistry::register`](crate::registry::WidgetRegistry::register)
//! path.

use serde_json::json;

use crate::definition::{AdminField, FieldKind, WidgetTypeDefinition};
use crate::registry::{RegistrationError, WidgetRegistry};

/// Type id of the full-width lead image block.
pub const HERO_IMAGE: &str = "hero-image";
/// Type id of the free-form rich text block.
pub const RICH_TEXT: &str = "rich-text";
/// Type id of the closing call-to-action block.
pub const CALL_TO_ACTION: &str = "call-to-action";
/// Type id of the review grid block.
pub const REVIEW_GRID: &str = "review-grid";

/// The stock widget type definitions, in registration order.
#[must_use]
pub fn builtin_definitions() -> Vec<WidgetTypeDefinition> {
    vec![
        WidgetTypeDefinition::builder(HERO_IMAGE)
            .name("Hero image")
            .description("Full-width lead image at the top of an article")
            .category("media")
            .version("1")
            .template(r#"<figure class="hero"><img src="{{image}}" alt="{{alt}}">{{#if caption}}<figcaption>{{caption}}</figcaption>{{/if}}</figure>"#)
            .styles(".hero img { width: 100%; height: auto; }")
            .admin_field(AdminField::new("image", "Image URL", FieldKind::Text).required())
            .admin_field(AdminField::new("alt", "Alt text", FieldKind::Text).with_default(json!("")))
            .admin_field(AdminField::new("caption", "Caption", FieldKind::Text))
            .build(),
        WidgetTypeDefinition::builder(RICH_TEXT)
            .name("Rich text")
            .description("Free-form HTML body copy")
            .category("content")
            .version("1")
            .template(r#"<div class="rich-text">{{body}}</div>"#)
            .admin_field(
                AdminField::new("body", "Body", FieldKind::Textarea).with_default(json!("")),
            )
            .build(),
        WidgetTypeDefinition::builder(CALL_TO_ACTION)
            .name("Call to action")
            .description("Closing banner with a headline and button")
            .category("engagement")
            .version("1")
            .template(r#"<aside class="cta"><h3>{{heading}}</h3>{{#if url}}<a href="{{url}}">{{label}}</a>{{/if}}</aside>"#)
            .styles(".cta { text-align: center; padding: 2rem; }")
            .admin_field(
                AdminField::new("heading", "Heading", FieldKind::Text)
                    .with_default(json!("Thanks for reading")),
            )
            .admin_field(AdminField::new("url", "Button URL", FieldKind::Text))
            .admin_field(
                AdminField::new("label", "Button label", FieldKind::Text)
                    .with_default(json!("Read more")),
            )
            .build(),
        WidgetTypeDefinition::builder(REVIEW_GRID)
            .name("Review grid")
            .description("Grid of reader reviews")
            .category("engagement")
            .version("1")
            .template(
                r#"<section class="reviews">{{#each reviews}}<p>{{this.name}}: {{this.rating}}</p>{{/each}}</section>"#,
            )
            .admin_field(
                AdminField::new("reviews", "Reviews (JSON array)", FieldKind::Json)
                    .with_default(json!([])),
            )
            .build(),
    ]
}

/// Install the stock definitions into a registry.
///
/// # Errors
///
/// Propagates the first [`RegistrationError`]; the stock templates are
/// fixed, so in practice this only fails if a caller pre-registered a
/// conflicting id via a uniqueness-enforcing path.
pub fn install(registry: &WidgetRegistry) -> Result<(), RegistrationError> {
    for definition in builtin_definitions() {
        registry.register(definition)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_definitions_all_register() {
        let registry = WidgetRegistry::new();
        install(&registry).unwrap();
        for id in [HERO_IMAGE, RICH_TEXT, CALL_TO_ACTION, REVIEW_GRID] {
            assert!(registry.contains(id), "missing builtin `{id}`");
        }
    }
}
