//! The widget template language: parsing and evaluation.
//!
//! Widget types carry a template in a small logic-less-plus-helpers
//! language. A template is parsed once, at registration time, into a
//! [`Template`]; rendering evaluates the parsed tree against a JSON-shaped
//! config and is guaranteed total: it returns a string for any context and
//! never fails.
//!
//! # Supported constructs
//!
//! - `{{path}}`: variable interpolation; a miss renders as empty output
//! - `{{#if path}}...{{/if}}`: conditional on truthiness
//! - `{{#each path}}...{{/each}}`: iteration with `this` bound per element
//! - `{{#with path}}...{{/with}}`: context narrowing
//! - `{{lookup collection index}}`: indexed element access
//! - literal text outside tags passes through unchanged (no HTML escaping)
//!
//! # Examples
//!
//! ```
//! use blockpress::template::Template;
//! use serde_json::json;
//!
//! let template = Template::parse("<img src=\"{{image}}\" alt=\"{{alt}}\">").unwrap();
//! let html = template.render(&json!({"image": "https://x/y.jpg"}));
//! assert_eq!(html, "<img src=\"https://x/y.jpg\" alt=\"\">");
//! ```
//!
//! ```
//! use blockpress::template::Template;
//! use serde_json::json;
//!
//! let template =
//!     Template::parse("{{#each reviews}}<p>{{this.name}}: {{this.rating}}</p>{{/each}}").unwrap();
//! let html = template.render(&json!({
//!     "reviews": [{"name": "A", "rating": 5}, {"name": "B", "rating": 4}]
//! }));
//! assert_eq!(html, "<p>A: 5</p><p>B: 4</p>");
//! ```

mod ast;
mod eval;
mod parser;

pub use ast::{PathExpr, TemplateNode};
pub use parser::TemplateParseError;

/// A parsed, render-ready template.
///
/// Construction via [`Template::parse`] validates the source; a constructed
/// `Template` renders successfully against any JSON context.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    source: String,
    nodes: Vec<TemplateNode>,
}

impl Template {
    /// Parse template source.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateParseError`] for unbalanced or malformed tags.
    /// This is the only point at which template errors surface; rendering
    /// cannot fail.
    pub fn parse(source: &str) -> Result<Self, TemplateParseError> {
        let nodes = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            nodes,
        })
    }

    /// Render the template against a JSON-shaped context.
    ///
    /// Total: resolution misses and shape mismatches degrade to empty
    /// output rather than erroring.
    #[must_use]
    pub fn render(&self, context: &serde_json::Value) -> String {
        eval::evaluate(&self.nodes, context)
    }

    /// The original template source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed node tree.
    #[must_use]
    pub fn nodes(&self) -> &[TemplateNode] {
        &self.nodes
    }
}
