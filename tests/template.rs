use blockpress::template::{Template, TemplateParseError};
use serde_json::json;

fn render(source: &str, ctx: serde_json::Value) -> String {
    Template::parse(source).expect("template should parse").render(&ctx)
}

#[test]
fn literal_text_passes_through_unchanged() {
    let html = "<article class=\"post\"><h1>Static</h1></article>";
    assert_eq!(render(html, json!({})), html);
}

#[test]
fn interpolation_resolves_dotted_paths() {
    let ctx = json!({"author": {"name": "Alice", "links": ["https://a.example"]}});
    assert_eq!(render("{{author.name}}", ctx.clone()), "Alice");
    assert_eq!(render("{{author.links.0}}", ctx), "https://a.example");
}

#[test]
fn missing_paths_render_empty_never_error() {
    let ctx = json!({"present": "x"});
    assert_eq!(render("[{{missing}}]", ctx.clone()), "[]");
    assert_eq!(render("[{{present.too.deep}}]", ctx.clone()), "[]");
    assert_eq!(render("[{{missing.nested}}]", ctx), "[]");
}

#[test]
fn interpolation_formats_scalars() {
    let ctx = json!({"n": 5, "f": 2.5, "t": true, "z": null});
    assert_eq!(render("{{n}}|{{f}}|{{t}}|{{z}}", ctx), "5|2.5|true|");
}

#[test]
fn no_html_escaping_is_applied() {
    let ctx = json!({"body": "<em>rich & ready</em>"});
    assert_eq!(render("{{body}}", ctx), "<em>rich & ready</em>");
}

#[test]
fn if_block_follows_truthiness() {
    let template = "{{#if flag}}yes{{/if}}";
    assert_eq!(render(template, json!({"flag": true})), "yes");
    assert_eq!(render(template, json!({"flag": "text"})), "yes");
    assert_eq!(render(template, json!({"flag": [1]})), "yes");
    assert_eq!(render(template, json!({"flag": false})), "");
    assert_eq!(render(template, json!({"flag": 0})), "");
    assert_eq!(render(template, json!({"flag": ""})), "");
    assert_eq!(render(template, json!({"flag": []})), "");
    assert_eq!(render(template, json!({"flag": null})), "");
    assert_eq!(render(template, json!({})), "");
}

#[test]
fn each_renders_in_input_order() {
    let template = "{{#each reviews}}<p>{{this.name}}: {{this.rating}}</p>{{/each}}";
    let ctx = json!({"reviews": [{"name": "A", "rating": 5}, {"name": "B", "rating": 4}]});
    assert_eq!(render(template, ctx), "<p>A: 5</p><p>B: 4</p>");
}

#[test]
fn each_over_empty_or_wrong_shape_is_empty() {
    let template = "{{#each reviews}}x{{/each}}";
    assert_eq!(render(template, json!({"reviews": []})), "");
    assert_eq!(render(template, json!({"reviews": "not json"})), "");
    assert_eq!(render(template, json!({"reviews": 7})), "");
    assert_eq!(render(template, json!({})), "");
}

#[test]
fn with_narrows_scope_and_skips_falsy() {
    let template = "{{#with author}}{{name}}{{/with}}";
    assert_eq!(render(template, json!({"author": {"name": "Alice"}})), "Alice");
    assert_eq!(render(template, json!({"author": null})), "");
    assert_eq!(render(template, json!({})), "");
}

#[test]
fn loop_body_falls_through_to_outer_context() {
    let template = "{{#each items}}{{this.label}} of {{siteName}};{{/each}}";
    let ctx = json!({"siteName": "Northway", "items": [{"label": "a"}, {"label": "b"}]});
    assert_eq!(render(template, ctx), "a of Northway;b of Northway;");
}

#[test]
fn parent_reference_reaches_enclosing_scope() {
    let template = "{{#with inner}}{{../outerField}}{{/with}}";
    let ctx = json!({"outerField": "seen", "inner": {"outerField": "shadowed"}});
    assert_eq!(render(template, ctx), "seen");
}

#[test]
fn double_parent_hop_reaches_root_from_nested_loop() {
    // Inside the inner loop the stack is root > section > item; one hop
    // lands on the section, two reach the root.
    let template = "{{#each sections}}{{#each this.items}}{{this}}:{{../label}}:{{../../label}};{{/each}}{{/each}}";
    let ctx = json!({
        "label": "root",
        "sections": [{"label": "section", "items": ["a"]}]
    });
    assert_eq!(render(template, ctx), "a:section:root;");

    // A hop past the outermost scope is a miss, not an error.
    assert_eq!(render("{{../nothing}}", json!({"nothing": "x"})), "");
}

#[test]
fn lookup_indexes_arrays_and_objects() {
    let ctx = json!({
        "colors": ["red", "green", "blue"],
        "chosen": 2,
        "labels": {"hero": "Hero"},
        "slot": "hero"
    });
    assert_eq!(render("{{lookup colors chosen}}", ctx.clone()), "blue");
    assert_eq!(render("{{lookup labels slot}}", ctx.clone()), "Hero");
    assert_eq!(render("{{lookup colors slot}}", ctx.clone()), "");
    assert_eq!(render("{{lookup nothing chosen}}", ctx), "");
}

#[test]
fn lookup_out_of_range_index_is_empty() {
    let ctx = json!({"colors": ["red", "green", "blue"], "big": 99, "negative": -1});
    assert_eq!(render("[{{lookup colors big}}]", ctx.clone()), "[]");
    assert_eq!(render("[{{lookup colors negative}}]", ctx), "[]");
}

#[test]
fn json_escape_hatch_parses_string_fields_at_use_time() {
    let ctx = json!({"reviews": "[{\"name\":\"A\",\"rating\":5}]"});
    let template = "{{#each reviews}}{{this.name}}:{{this.rating}}{{/each}}";
    assert_eq!(render(template, ctx), "A:5");
}

#[test]
fn deeply_nested_blocks_compose() {
    let template = concat!(
        "{{#each sections}}",
        "<h2>{{this.title}}</h2>",
        "{{#if this.items}}<ul>{{#each this.items}}<li>{{this}}</li>{{/each}}</ul>{{/if}}",
        "{{/each}}"
    );
    let ctx = json!({"sections": [
        {"title": "One", "items": ["a"]},
        {"title": "Two", "items": []}
    ]});
    assert_eq!(render(template, ctx), "<h2>One</h2><ul><li>a</li></ul><h2>Two</h2>");
}

#[test]
fn malformed_templates_rejected_at_parse() {
    assert!(matches!(
        Template::parse("{{#each a}}no close"),
        Err(TemplateParseError::UnclosedBlock { .. })
    ));
    assert!(matches!(
        Template::parse("{{#if a}}{{/each}}"),
        Err(TemplateParseError::MismatchedClose { .. })
    ));
    assert!(matches!(
        Template::parse("hello {{"),
        Err(TemplateParseError::UnterminatedTag { .. })
    ));
}

#[test]
fn parsed_template_exposes_source() {
    let template = Template::parse("<p>{{x}}</p>").unwrap();
    assert_eq!(template.source(), "<p>{{x}}</p>");
    assert_eq!(template.nodes().len(), 3);
}
