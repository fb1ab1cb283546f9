//! Syntax tree for the widget template language.
//!
//! Templates parse into a small tagged-union tree. Keeping the node set
//! closed is what lets evaluation be a total function: every construct has
//! a defined rendering for every possible context value.

/// A parsed variable reference inside a template tag.
///
/// Covers plain dotted paths (`image`, `author.name`), the current-scope
/// reference (`this`, `this.rating`), and parent-scope reach-through
/// (`../siteName`) used inside `#each`/`#with` blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathExpr {
    /// Number of leading `../` hops toward outer scopes.
    pub parent_hops: usize,
    /// Dotted path evaluated after the hops; empty means the scope value
    /// itself (`this`).
    pub path: String,
    /// Whether resolution is pinned to a single scope frame.
    ///
    /// References written as `this.x` or `../x` resolve only against the
    /// addressed frame. Bare names fall through to enclosing scopes when
    /// the innermost scope does not resolve them.
    pub anchored: bool,
}

impl PathExpr {
    /// Parse the textual form of a variable reference.
    ///
    /// Never fails: any token is a valid reference, it may simply never
    /// resolve at evaluation time.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut rest = raw;
        let mut parent_hops = 0;
        while let Some(stripped) = rest.strip_prefix("../") {
            parent_hops += 1;
            rest = stripped;
        }

        let mut anchored = parent_hops > 0;
        let path = if rest == "this" {
            anchored = true;
            String::new()
        } else if let Some(stripped) = rest.strip_prefix("this.") {
            anchored = true;
            stripped.to_string()
        } else {
            rest.to_string()
        };

        Self {
            parent_hops,
            path,
            anchored,
        }
    }
}

/// One node of a parsed template.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateNode {
    /// Literal markup passed through unchanged.
    Text(String),
    /// `{{path}}`: emit the resolved value, or nothing on a miss.
    Interpolation(PathExpr),
    /// `{{#if path}}body{{/if}}`: emit the body iff the value is truthy.
    If {
        path: PathExpr,
        body: Vec<TemplateNode>,
    },
    /// `{{#each path}}body{{/each}}`: emit the body once per array element
    /// with `this` bound to the element.
    Each {
        path: PathExpr,
        body: Vec<TemplateNode>,
    },
    /// `{{#with path}}body{{/with}}`: emit the body once with `this`
    /// rebound to the value, or nothing if the value is falsy.
    With {
        path: PathExpr,
        body: Vec<TemplateNode>,
    },
    /// `{{lookup collection index}}`: emit the element of the collection
    /// addressed by the resolved index, or nothing on any miss.
    Lookup {
        collection: PathExpr,
        index: PathExpr,
    },
}
