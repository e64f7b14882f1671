/*
 * integration_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end rendering tests for docweave-template.
 */

use std::collections::HashMap;

use docweave_dom::{Document, Element, MediaKind, Paragraph, ParagraphChild, RunChild};
use docweave_template::{BoxError, ImageInjector, Injector, RenderError, Renderer, Value};
use pretty_assertions::assert_eq;
use serde::Serialize;
use serde_json::json;

/// Helper to build a document with one paragraph per line.
fn doc_with_lines(lines: &[&str]) -> Document {
    let mut doc = Document::new();
    for line in lines {
        doc.add_paragraph().add_text(*line);
    }
    doc
}

/// Helper to collect the text of every body paragraph.
fn body_texts(doc: &Document) -> Vec<String> {
    doc.body
        .iter()
        .filter_map(|element| match element {
            Element::Paragraph(p) => Some(p.text()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_plain_interpolation() {
    let mut doc = Document::new();
    doc.add_paragraph().add_text("Hello, {{ .name }}!");

    let data = Value::from(json!({ "name": "World" }));
    Renderer::new().render(&mut doc, &data).unwrap();

    assert_eq!(doc.plain_text(), "Hello, World!\n");
}

#[test]
fn test_substitution_collapses_runs() {
    let mut doc = Document::new();
    let paragraph = doc.add_paragraph();
    paragraph.add_text("Hello, {{ .na");
    paragraph.add_text("me }}!");

    let data = Value::from(json!({ "name": "ada" }));
    Renderer::new().render(&mut doc, &data).unwrap();

    let Element::Paragraph(paragraph) = &doc.body[0] else {
        panic!("expected a paragraph at body[0]");
    };
    assert_eq!(paragraph.text(), "Hello, ada!");
    // The rendered string lands in the first run; later runs are blanked.
    let runs: Vec<String> = paragraph
        .children
        .iter()
        .filter_map(|child| match child {
            ParagraphChild::Run(run) => Some(run.text()),
            _ => None,
        })
        .collect();
    assert_eq!(runs, vec!["Hello, ada!".to_string(), String::new()]);
}

#[test]
fn test_report_with_loop_and_conditional() {
    let mut doc = doc_with_lines(&[
        "Scan report for {{ .target }}",
        "{{for v in .vulns}}",
        "{{ .v.name }} ({{ .v.severity }})",
        "{{if .v.exploitable}}",
        "Exploitable in the wild!",
        "{{endif}}",
        "{{endfor}}",
        "End of report.",
    ]);
    let data = Value::from(json!({
        "target": "api-gateway",
        "vulns": [
            { "name": "CVE-2024-0001", "severity": "high", "exploitable": true },
            { "name": "CVE-2024-0002", "severity": "low", "exploitable": false },
        ]
    }));

    Renderer::new().render(&mut doc, &data).unwrap();

    assert_eq!(
        body_texts(&doc),
        vec![
            "Scan report for api-gateway",
            "CVE-2024-0001 (high)",
            "Exploitable in the wild!",
            "CVE-2024-0002 (low)",
            "End of report.",
        ]
    );
}

#[test]
fn test_nested_loops_with_parent_access() {
    let mut doc = doc_with_lines(&[
        "{{for team in .teams}}",
        "Team {{ .team.name }} of {{ .__parent__.org }}",
        "{{for member in .team.members}}",
        "- {{ .member }} ({{ .__parent__.team.name }})",
        "{{endfor}}",
        "{{endfor}}",
    ]);
    let data = Value::from(json!({
        "org": "Acme",
        "teams": [
            { "name": "core", "members": ["ada", "bo"] },
            { "name": "infra", "members": ["cy"] },
        ]
    }));

    Renderer::new().render(&mut doc, &data).unwrap();

    assert_eq!(
        body_texts(&doc),
        vec![
            "Team core of Acme",
            "- ada (core)",
            "- bo (core)",
            "Team infra of Acme",
            "- cy (infra)",
        ]
    );
}

#[test]
fn test_for_inside_if_pairs_with_outer_endif() {
    let mut doc = doc_with_lines(&[
        "{{if .show}}",
        "{{for x in .xs}}",
        "item {{ .x }}",
        "{{endfor}}",
        "{{endif}}",
    ]);
    let data = Value::from(json!({ "show": true, "xs": ["a", "b"] }));

    Renderer::new().render(&mut doc, &data).unwrap();

    assert_eq!(body_texts(&doc), vec!["item a", "item b"]);
}

#[test]
fn test_table_row_range() {
    let mut doc = Document::new();
    doc.add_paragraph().add_text("Findings:");
    let table = doc.add_table(2, 2);
    table.rows[0].cells[0].paragraphs[0].add_text("Name");
    table.rows[0].cells[1].paragraphs[0].add_text("Severity");
    table.rows[1].cells[0].paragraphs[0].add_text("{{ range .findings }}{{ .name }}");
    table.rows[1].cells[1].paragraphs[0].add_text("{{ .severity }}");

    let data = Value::from(json!({
        "findings": [
            { "name": "CVE-2024-0001", "severity": "high" },
            { "name": "CVE-2024-0002", "severity": "low" },
            { "name": "CVE-2024-0003", "severity": "medium" },
        ]
    }));
    Renderer::new().render(&mut doc, &data).unwrap();

    let Element::Table(table) = &doc.body[1] else {
        panic!("expected a table at body[1]");
    };
    assert_eq!(table.rows.len(), 4);
    assert_eq!(table.rows[0].cells[0].text(), "Name");
    assert_eq!(table.rows[1].cells[0].text(), "CVE-2024-0001");
    assert_eq!(table.rows[1].cells[1].text(), "high");
    assert_eq!(table.rows[3].cells[1].text(), "medium");
}

#[test]
fn test_table_row_range_with_no_items_drops_row() {
    let mut doc = Document::new();
    let table = doc.add_table(2, 1);
    table.rows[0].cells[0].paragraphs[0].add_text("Header");
    table.rows[1].cells[0].paragraphs[0].add_text("{{ range .findings }}{{ .name }}");

    let data = Value::from(json!({ "findings": [] }));
    Renderer::new().render(&mut doc, &data).unwrap();

    let Element::Table(table) = &doc.body[0] else {
        panic!("expected a table at body[0]");
    };
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].cells[0].text(), "Header");
}

/// An injector that swaps its paragraph for a fixed pair of paragraphs.
struct Callout;

impl Injector for Callout {
    fn name(&self) -> &str {
        "callout"
    }

    fn inject(
        &self,
        _doc: &mut Document,
        _paragraph: &mut Paragraph,
    ) -> Result<Vec<Element>, BoxError> {
        Ok(vec![
            Element::Paragraph(Paragraph::with_text("NOTE")),
            Element::Paragraph(Paragraph::with_text("generated")),
        ])
    }
}

#[test]
fn test_injector_replaces_paragraph() {
    let mut doc = doc_with_lines(&["before", "{{ inject .callout }}", "after"]);
    let mut map = HashMap::new();
    map.insert("callout".to_string(), Value::injector(Callout));
    let data = Value::Map(map);

    Renderer::new().render(&mut doc, &data).unwrap();

    assert_eq!(body_texts(&doc), vec!["before", "NOTE", "generated", "after"]);
    assert!(!doc.plain_text().contains("__INJECT_"));
}

#[test]
fn test_image_injector_keeps_paragraph() {
    let mut doc = Document::new();
    doc.add_paragraph().add_text("Logo: {{ inject .logo }} end");
    let mut map = HashMap::new();
    map.insert(
        "logo".to_string(),
        Value::injector(ImageInjector::new(MediaKind::Png, vec![0x89, b'P'], 120, 40)),
    );
    let data = Value::Map(map);

    Renderer::new().render(&mut doc, &data).unwrap();

    assert_eq!(doc.media.len(), 1);
    assert_eq!(doc.media[0].kind, MediaKind::Png);
    let Element::Paragraph(paragraph) = &doc.body[0] else {
        panic!("expected a paragraph at body[0]");
    };
    assert_eq!(paragraph.text(), "Logo:  end");
    let has_drawing = paragraph.children.iter().any(|child| match child {
        ParagraphChild::Run(run) => {
            run.children.iter().any(|c| matches!(c, RunChild::Drawing(_)))
        }
        _ => false,
    });
    assert!(has_drawing, "image injector should append a drawing run");
}

#[test]
fn test_template_free_document_is_unchanged() {
    let mut doc = Document::new();
    doc.add_paragraph().add_text("No directives here.");
    let table = doc.add_table(1, 2);
    table.rows[0].cells[0].paragraphs[0].add_text("static");
    table.rows[0].cells[1].paragraphs[0].add_text("content");
    let pristine = doc.clone();

    Renderer::new().render(&mut doc, &Value::from(json!({}))).unwrap();

    assert_eq!(doc, pristine);
}

#[test]
fn test_render_elements_does_not_mutate_input() {
    let doc = doc_with_lines(&["{{for x in .xs}}", "{{ .x }}", "{{endfor}}"]);
    let elements = doc.body.clone();
    let pristine = elements.clone();
    let data = Value::from(json!({ "xs": [1, 2] }));

    let mut scratch = Document::new();
    let rendered = Renderer::new()
        .render_elements(&mut scratch, &elements, &data)
        .unwrap();

    assert_eq!(elements, pristine);
    assert_eq!(rendered.len(), 2);
}

#[test]
fn test_second_render_is_identity() {
    let mut doc = doc_with_lines(&["{{if .on}}", "kept", "{{endif}}", "tail {{ .n }}"]);
    let data = Value::from(json!({ "on": true, "n": 3 }));

    let renderer = Renderer::new();
    renderer.render(&mut doc, &data).unwrap();
    let first = doc.clone();
    renderer.render(&mut doc, &data).unwrap();

    assert_eq!(doc, first);
}

#[test]
fn test_if_truthiness() {
    let cases = [
        (json!({ "flag": true }), true),
        (json!({ "flag": false }), false),
        (json!({ "flag": 1 }), true),
        (json!({ "flag": 0 }), false),
        (json!({ "flag": "x" }), true),
        (json!({ "flag": "" }), false),
        (json!({ "flag": null }), false),
        (json!({ "flag": [] }), true),
    ];
    for (raw, expected) in cases {
        let mut doc = doc_with_lines(&["{{if .flag}}", "shown", "{{endif}}"]);
        Renderer::new().render(&mut doc, &Value::from(raw.clone())).unwrap();
        let shown = !body_texts(&doc).is_empty();
        assert_eq!(shown, expected, "truthiness mismatch for {raw}");
    }
}

#[test]
fn test_occupied_optional_is_truthy_even_when_false() {
    let mut doc = doc_with_lines(&["{{if .flag}}", "present", "{{endif}}"]);
    let mut map = HashMap::new();
    map.insert("flag".to_string(), Value::from(Some(false)));
    Renderer::new().render(&mut doc, &Value::Map(map)).unwrap();

    assert_eq!(body_texts(&doc), vec!["present"]);
}

#[test]
fn test_registered_function() {
    let mut renderer = Renderer::new();
    renderer.register_function("upper", |args: &[Value]| match args {
        [Value::Str(s)] => Ok(Value::Str(s.to_uppercase())),
        _ => Err("upper takes one string".to_string()),
    });

    let mut doc = doc_with_lines(&["{{ upper .name }}"]);
    renderer.render(&mut doc, &Value::from(json!({ "name": "ada" }))).unwrap();
    assert_eq!(body_texts(&doc), vec!["ADA"]);

    let mut doc = doc_with_lines(&["{{ upper .count }}"]);
    let err = renderer
        .render(&mut doc, &Value::from(json!({ "count": 3 })))
        .unwrap_err();
    assert!(err.to_string().contains("upper takes one string"));
}

#[test]
fn test_context_key_shadows_registered_function() {
    let mut renderer = Renderer::new();
    renderer.register_function("name", |_args: &[Value]| Ok(Value::from("from-function")));

    let mut doc = doc_with_lines(&["{{ name }}"]);
    renderer
        .render(&mut doc, &Value::from(json!({ "name": "from-data" })))
        .unwrap();

    assert_eq!(body_texts(&doc), vec!["from-data"]);
}

#[test]
fn test_bare_name_resolves_loop_variable() {
    let mut doc = doc_with_lines(&["{{for item in .xs}}", "{{ item }}", "{{endfor}}"]);
    let data = Value::from(json!({ "xs": ["a", "b"] }));

    Renderer::new().render(&mut doc, &data).unwrap();

    assert_eq!(body_texts(&doc), vec!["a", "b"]);
}

#[test]
fn test_whole_context_interpolation() {
    let mut doc = doc_with_lines(&["{{ . }}"]);
    Renderer::new().render(&mut doc, &Value::from("hi")).unwrap();
    assert_eq!(body_texts(&doc), vec!["hi"]);
}

#[test]
fn test_serialized_struct_as_context() {
    #[derive(Serialize)]
    struct Item {
        name: String,
        done: bool,
    }

    #[derive(Serialize)]
    struct Checklist {
        title: String,
        items: Vec<Item>,
    }

    let checklist = Checklist {
        title: "Release".to_string(),
        items: vec![
            Item { name: "tag".to_string(), done: true },
            Item { name: "publish".to_string(), done: false },
        ],
    };

    let mut doc = doc_with_lines(&[
        "{{ .title }}",
        "{{for item in .items}}",
        "{{ .item.name }}: {{ .item.done }}",
        "{{endfor}}",
    ]);
    let data = Value::from_serialize(&checklist).unwrap();
    Renderer::new().render(&mut doc, &data).unwrap();

    assert_eq!(body_texts(&doc), vec!["Release", "tag: true", "publish: false"]);
}

#[test]
fn test_missing_field_is_an_error() {
    let mut doc = doc_with_lines(&["{{ .user.missing }}"]);
    let data = Value::from(json!({ "user": { "present": 1 } }));

    let err = Renderer::new().render(&mut doc, &data).unwrap_err();

    match err {
        RenderError::FieldNotFound { path, segment } => {
            assert_eq!(path, ".user.missing");
            assert_eq!(segment, "missing");
        }
        other => panic!("expected FieldNotFound, got {other:?}"),
    }
}

#[test]
fn test_unterminated_block_is_an_error() {
    let mut doc = doc_with_lines(&["{{for x in .xs}}", "body"]);
    let data = Value::from(json!({ "xs": [1] }));

    let err = Renderer::new().render(&mut doc, &data).unwrap_err();

    match err {
        RenderError::UnterminatedBlock { tag } => assert_eq!(tag, "endfor"),
        other => panic!("expected UnterminatedBlock, got {other:?}"),
    }
}

#[test]
fn test_crossed_block_tags_are_an_error() {
    // for ... if ... endfor ... endif never pairs up.
    let mut doc = doc_with_lines(&[
        "{{for x in .xs}}",
        "{{if .flag}}",
        "body",
        "{{endfor}}",
        "{{endif}}",
    ]);
    let data = Value::from(json!({ "xs": [1], "flag": true }));

    let err = Renderer::new().render(&mut doc, &data).unwrap_err();
    assert!(matches!(err, RenderError::UnterminatedBlock { .. }));
}

#[test]
fn test_unterminated_interpolation_is_an_error() {
    let mut doc = doc_with_lines(&["Hello {{ .name"]);

    let err = Renderer::new()
        .render(&mut doc, &Value::from(json!({ "name": "x" })))
        .unwrap_err();

    assert!(matches!(err, RenderError::TemplateSyntaxError { .. }));
    assert!(err.to_string().contains("unterminated"));
}

#[test]
fn test_failed_render_restores_document_and_media() {
    let mut doc = doc_with_lines(&["{{ inject .logo }}", "{{ .missing }}"]);
    let mut map = HashMap::new();
    map.insert(
        "logo".to_string(),
        Value::injector(ImageInjector::new(MediaKind::Png, vec![1, 2], 10, 10)),
    );
    let data = Value::Map(map);
    let pristine = doc.clone();

    let err = Renderer::new().render(&mut doc, &data).unwrap_err();

    assert!(matches!(err, RenderError::FieldNotFound { .. }));
    assert_eq!(doc, pristine);
    assert!(doc.media.is_empty());
}
