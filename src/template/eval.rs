//! Evaluation pass for parsed templates.
//!
//! Evaluation threads a stack of scopes: the instance config at the bottom,
//! with `#each`/`#with` pushing narrowed scopes on top. Bare names resolve
//! against the innermost scope first and fall through to enclosing scopes;
//! `this`-prefixed and `../`-prefixed references are pinned to a single
//! frame.
//!
//! Evaluation is total: any resolution miss or shape mismatch renders as
//! empty output. A single missing config field must never blank out an
//! entire article.

use serde_json::Value;

use super::ast::{PathExpr, TemplateNode};
use crate::utils::json_ext::{get_by_path, is_truthy};

/// Evaluate a node list against a context, producing the output markup.
pub(super) fn evaluate(nodes: &[TemplateNode], context: &Value) -> String {
    let mut scopes = vec![context.clone()];
    let mut out = String::new();
    eval_nodes(nodes, &mut scopes, &mut out);
    out
}

fn eval_nodes(nodes: &[TemplateNode], scopes: &mut Vec<Value>, out: &mut String) {
    for node in nodes {
        match node {
            TemplateNode::Text(text) => out.push_str(text),
            TemplateNode::Interpolation(expr) => {
                if let Some(value) = resolve(scopes, expr) {
                    push_display(&value, out);
                }
            }
            TemplateNode::If { path, body } => {
                let truthy = resolve(scopes, path).is_some_and(|v| is_truthy(&v));
                if truthy {
                    eval_nodes(body, scopes, out);
                }
            }
            TemplateNode::Each { path, body } => {
                let items = resolve(scopes, path).and_then(coerce_array);
                if let Some(items) = items {
                    for item in items {
                        scopes.push(item);
                        eval_nodes(body, scopes, out);
                        scopes.pop();
                    }
                }
            }
            TemplateNode::With { path, body } => {
                let value = resolve(scopes, path);
                if let Some(value) = value
                    && is_truthy(&value)
                {
                    scopes.push(value);
                    eval_nodes(body, scopes, out);
                    scopes.pop();
                }
            }
            TemplateNode::Lookup { collection, index } => {
                let element = resolve(scopes, collection)
                    .zip(resolve(scopes, index))
                    .and_then(|(coll, idx)| lookup_element(coll, &idx));
                if let Some(element) = element {
                    push_display(&element, out);
                }
            }
        }
    }
}

/// Resolve a path expression against the scope stack.
///
/// Anchored expressions (`this.x`, `../x`) address exactly one frame;
/// bare names walk from the innermost frame outward and take the first hit.
fn resolve(scopes: &[Value], expr: &PathExpr) -> Option<Value> {
    let start = scopes.len().checked_sub(1 + expr.parent_hops)?;

    if expr.anchored {
        return get_by_path(&scopes[start], &expr.path).cloned();
    }

    for frame in scopes[..=start].iter().rev() {
        if let Some(value) = get_by_path(frame, &expr.path) {
            return Some(value.clone());
        }
    }
    None
}

/// Coerce a value into an iterable array.
///
/// Accepts a JSON array directly, or a string containing a serialized JSON
/// array (the raw-JSON admin-field escape hatch, parsed at use time).
fn coerce_array(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// Index into an array or object with a resolved index value.
fn lookup_element(collection: Value, index: &Value) -> Option<Value> {
    // Strings holding serialized JSON containers are parsed at use time.
    let collection = match collection {
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(parsed @ (Value::Array(_) | Value::Object(_))) => parsed,
            _ => return None,
        },
        other => other,
    };

    match collection {
        Value::Array(items) => {
            let idx = match index {
                Value::Number(n) => n.as_u64().map(|n| n as usize),
                Value::String(s) => s.parse::<usize>().ok(),
                _ => None,
            }?;
            items.into_iter().nth(idx)
        }
        Value::Object(mut map) => {
            let key = match index {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            map.remove(&key)
        }
        _ => None,
    }
}

/// Append the display form of a value to the output.
///
/// Strings are emitted verbatim (no HTML escaping; templates intentionally
/// carry rich markup), numbers and booleans in their canonical form, null as
/// nothing, and containers as compact JSON so structured escape-hatch
/// values stay inspectable.
fn push_display(value: &Value, out: &mut String) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(s),
        Value::Array(_) | Value::Object(_) => {
            out.push_str(&serde_json::to_string(value).unwrap_or_default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::parser::parse;
    use serde_json::json;

    fn render(source: &str, ctx: &Value) -> String {
        evaluate(&parse(source).unwrap(), ctx)
    }

    #[test]
    fn fallback_resolution_reaches_outer_scope() {
        let ctx = json!({"site": "Acme", "items": [{"n": 1}, {"n": 2}]});
        let out = render("{{#each items}}{{n}}-{{site}};{{/each}}", &ctx);
        assert_eq!(out, "1-Acme;2-Acme;");
    }

    #[test]
    fn anchored_this_does_not_fall_through() {
        let ctx = json!({"site": "Acme", "items": [{}]});
        let out = render("{{#each items}}[{{this.site}}]{{/each}}", &ctx);
        assert_eq!(out, "[]");
    }

    #[test]
    fn parent_hop_reaches_enclosing_scope() {
        let ctx = json!({"label": "outer", "items": [{"label": "inner"}]});
        let out = render("{{#each items}}{{label}}/{{../label}}{{/each}}", &ctx);
        assert_eq!(out, "inner/outer");
    }

    #[test]
    fn each_over_serialized_json_string() {
        let ctx = json!({"tags": "[\"a\",\"b\"]"});
        let out = render("{{#each tags}}<li>{{this}}</li>{{/each}}", &ctx);
        assert_eq!(out, "<li>a</li><li>b</li>");
    }

    #[test]
    fn lookup_array_and_object() {
        let ctx = json!({"items": ["x", "y"], "idx": 1, "map": {"k": "v"}, "key": "k"});
        assert_eq!(render("{{lookup items idx}}", &ctx), "y");
        assert_eq!(render("{{lookup map key}}", &ctx), "v");
        assert_eq!(render("{{lookup items missing}}", &ctx), "");
    }
}
