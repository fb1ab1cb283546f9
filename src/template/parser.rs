//! Recursive-descent parser for the widget template language.
//!
//! Malformed template source is rejected here, at widget-type registration
//! time, so that rendering never has to cope with structural errors. The
//! grammar is intentionally small: `{{path}}`, `{{#if}}`, `{{#each}}`,
//! `{{#with}}` blocks with matching closers, and the `{{lookup a b}}`
//! helper.

use miette::Diagnostic;
use thiserror::Error;

use super::ast::{PathExpr, TemplateNode};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Errors raised while parsing template source.
///
/// These surface to callers through
/// [`RegistrationError::InvalidTemplate`](crate::registry::RegistrationError);
/// a template that parses successfully can always be rendered.
#[derive(Debug, Error, Diagnostic)]
pub enum TemplateParseError {
    /// A `{{` without a matching `}}` before end of input.
    #[error("unterminated tag starting at byte {offset}")]
    #[diagnostic(
        code(blockpress::template::unterminated_tag),
        help("Every `{{{{` must be closed with `}}}}` on the same tag.")
    )]
    UnterminatedTag { offset: usize },

    /// A `{{}}` tag with no content.
    #[error("empty tag at byte {offset}")]
    #[diagnostic(code(blockpress::template::empty_tag))]
    EmptyTag { offset: usize },

    /// `{{#name ...}}` where `name` is not a recognized block.
    #[error("unknown block `#{name}` at byte {offset}")]
    #[diagnostic(
        code(blockpress::template::unknown_block),
        help("Supported blocks are #if, #each and #with.")
    )]
    UnknownBlock { name: String, offset: usize },

    /// A block opener with the wrong number of arguments, or an inline tag
    /// that is neither a path nor a recognized helper.
    #[error("malformed tag `{tag}` at byte {offset}: {detail}")]
    #[diagnostic(code(blockpress::template::malformed_tag))]
    MalformedTag {
        tag: String,
        detail: String,
        offset: usize,
    },

    /// `{{/name}}` that does not close the innermost open block.
    #[error("mismatched closing tag `/{found}` at byte {offset}{}", .expected.as_ref().map(|e| format!(" (expected `/{e}`)")).unwrap_or_default())]
    #[diagnostic(
        code(blockpress::template::mismatched_close),
        help("Block tags must be strictly nested.")
    )]
    MismatchedClose {
        expected: Option<String>,
        found: String,
        offset: usize,
    },

    /// A block opener left open at end of input.
    #[error("unclosed block `#{name}`")]
    #[diagnostic(code(blockpress::template::unclosed_block))]
    UnclosedBlock { name: String },
}

/// Kinds of block constructs, used while tracking open blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BlockKind {
    If,
    Each,
    With,
}

impl BlockKind {
    fn name(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Each => "each",
            Self::With => "with",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "if" => Some(Self::If),
            "each" => Some(Self::Each),
            "with" => Some(Self::With),
            _ => None,
        }
    }

    fn into_node(self, path: PathExpr, body: Vec<TemplateNode>) -> TemplateNode {
        match self {
            Self::If => TemplateNode::If { path, body },
            Self::Each => TemplateNode::Each { path, body },
            Self::With => TemplateNode::With { path, body },
        }
    }
}

/// An open block frame on the parse stack.
struct Frame {
    kind: BlockKind,
    path: PathExpr,
    body: Vec<TemplateNode>,
}

/// Parse template source into a node list.
pub fn parse(source: &str) -> Result<Vec<TemplateNode>, TemplateParseError> {
    let mut root: Vec<TemplateNode> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut cursor = 0;

    while let Some(open_rel) = source[cursor..].find(OPEN) {
        let open_at = cursor + open_rel;
        if open_at > cursor {
            push_node(
                &mut root,
                &mut stack,
                TemplateNode::Text(source[cursor..open_at].to_string()),
            );
        }

        let tag_start = open_at + OPEN.len();
        let close_rel = source[tag_start..]
            .find(CLOSE)
            .ok_or(TemplateParseError::UnterminatedTag { offset: open_at })?;
        let close_at = tag_start + close_rel;
        let raw = source[tag_start..close_at].trim();
        cursor = close_at + CLOSE.len();

        if raw.is_empty() {
            return Err(TemplateParseError::EmptyTag { offset: open_at });
        }

        if let Some(opener) = raw.strip_prefix('#') {
            let mut parts = opener.split_whitespace();
            let name = parts.next().unwrap_or_default();
            let kind = BlockKind::from_name(name).ok_or_else(|| {
                TemplateParseError::UnknownBlock {
                    name: name.to_string(),
                    offset: open_at,
                }
            })?;
            let args: Vec<&str> = parts.collect();
            if args.len() != 1 {
                return Err(TemplateParseError::MalformedTag {
                    tag: raw.to_string(),
                    detail: format!("#{name} takes exactly one path argument"),
                    offset: open_at,
                });
            }
            stack.push(Frame {
                kind,
                path: PathExpr::parse(args[0]),
                body: Vec::new(),
            });
        } else if let Some(closer) = raw.strip_prefix('/') {
            let closer = closer.trim();
            match stack.pop() {
                Some(frame) if frame.kind.name() == closer => {
                    let node = frame.kind.into_node(frame.path, frame.body);
                    push_node(&mut root, &mut stack, node);
                }
                Some(frame) => {
                    return Err(TemplateParseError::MismatchedClose {
                        expected: Some(frame.kind.name().to_string()),
                        found: closer.to_string(),
                        offset: open_at,
                    });
                }
                None => {
                    return Err(TemplateParseError::MismatchedClose {
                        expected: None,
                        found: closer.to_string(),
                        offset: open_at,
                    });
                }
            }
        } else {
            let node = parse_inline(raw, open_at)?;
            push_node(&mut root, &mut stack, node);
        }
    }

    if let Some(frame) = stack.pop() {
        return Err(TemplateParseError::UnclosedBlock {
            name: frame.kind.name().to_string(),
        });
    }

    if cursor < source.len() {
        root.push(TemplateNode::Text(source[cursor..].to_string()));
    }

    Ok(root)
}

/// Parse a non-block tag: an interpolation or the `lookup` helper.
fn parse_inline(raw: &str, offset: usize) -> Result<TemplateNode, TemplateParseError> {
    let mut parts = raw.split_whitespace();
    let head = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    if head == "lookup" {
        if args.len() != 2 {
            return Err(TemplateParseError::MalformedTag {
                tag: raw.to_string(),
                detail: "lookup takes exactly two arguments: collection and index".to_string(),
                offset,
            });
        }
        return Ok(TemplateNode::Lookup {
            collection: PathExpr::parse(args[0]),
            index: PathExpr::parse(args[1]),
        });
    }

    if !args.is_empty() {
        return Err(TemplateParseError::MalformedTag {
            tag: raw.to_string(),
            detail: format!("`{head}` is not a recognized helper"),
            offset,
        });
    }

    Ok(TemplateNode::Interpolation(PathExpr::parse(head)))
}

/// Append a node to the innermost open block, or the root when none is open.
fn push_node(root: &mut Vec<TemplateNode>, stack: &mut [Frame], node: TemplateNode) {
    match stack.last_mut() {
        Some(frame) => frame.body.push(node),
        None => root.push(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_node() {
        let nodes = parse("<p>hello</p>").unwrap();
        assert_eq!(nodes, vec![TemplateNode::Text("<p>hello</p>".to_string())]);
    }

    #[test]
    fn interpolation_between_text() {
        let nodes = parse("a {{x}} b").unwrap();
        assert_eq!(nodes.len(), 3);
        assert!(matches!(nodes[1], TemplateNode::Interpolation(_)));
    }

    #[test]
    fn nested_blocks_parse() {
        let nodes = parse("{{#each items}}{{#if this.on}}x{{/if}}{{/each}}").unwrap();
        let TemplateNode::Each { body, .. } = &nodes[0] else {
            panic!("expected each");
        };
        assert!(matches!(body[0], TemplateNode::If { .. }));
    }

    #[test]
    fn unbalanced_blocks_rejected() {
        assert!(matches!(
            parse("{{#if a}}x"),
            Err(TemplateParseError::UnclosedBlock { .. })
        ));
        assert!(matches!(
            parse("{{#if a}}x{{/each}}"),
            Err(TemplateParseError::MismatchedClose { .. })
        ));
        assert!(matches!(
            parse("x{{/if}}"),
            Err(TemplateParseError::MismatchedClose { expected: None, .. })
        ));
    }

    #[test]
    fn unterminated_and_empty_tags_rejected() {
        assert!(matches!(
            parse("a {{title"),
            Err(TemplateParseError::UnterminatedTag { .. })
        ));
        assert!(matches!(
            parse("a {{}} b"),
            Err(TemplateParseError::EmptyTag { .. })
        ));
    }

    #[test]
    fn unknown_block_and_helper_rejected() {
        assert!(matches!(
            parse("{{#unless a}}x{{/unless}}"),
            Err(TemplateParseError::UnknownBlock { .. })
        ));
        assert!(matches!(
            parse("{{upper title}}"),
            Err(TemplateParseError::MalformedTag { .. })
        ));
        assert!(matches!(
            parse("{{lookup items}}"),
            Err(TemplateParseError::MalformedTag { .. })
        ));
    }
}
