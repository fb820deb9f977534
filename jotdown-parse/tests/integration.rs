//! Integration tests that parse complete fixture files end-to-end.

use jotdown_parse::{BlockKind, IdNumbering, RenderOptions, Severity};

fn fixtures_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../tests/fixtures")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture '{}': {}", path.display(), e))
}

#[test]
fn basic_fixture_parses() {
    let content = read_fixture("basic.jd");
    let result = jotdown_parse::parse(&content);

    assert!(!result.has_errors(), "Unexpected errors: {:?}", result.diagnostics);

    let kinds: Vec<BlockKind> = result.elements.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            BlockKind::Header,
            BlockKind::Paragraph,
            BlockKind::Paragraph,
            BlockKind::Table,
            BlockKind::List,
            BlockKind::Header,
            BlockKind::Paragraph,
        ]
    );

    let ids: Vec<&str> = result.elements.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["tag_0", "tag_1", "tag_2", "tag_6", "tag_9", "tag_10", "tag_11"]
    );
}

#[test]
fn basic_fixture_body_and_style() {
    let content = read_fixture("basic.jd");
    let rendered = jotdown_parse::parse(&content).assemble();

    assert!(rendered.body.contains(r#"<h1 id="tag_0">Getting started</h1>"#));
    assert!(rendered.body.contains("<b>jotdown</b>"));
    assert!(rendered.body.contains("<i>tiny</i>"));
    assert!(rendered.body.contains("H<sub>2</sub>O"));
    assert!(rendered.body.contains("mc<sup>2 </sup>"));
    assert!(rendered.body.contains(
        "<thead><tr><th>Name</th><th>Role</th></tr></thead><tbody>\
         <tr><td>Ada</td><td>Engineer</td></tr><tr><td>Grace</td><td>Admiral</td></tr></tbody>"
    ));
    assert!(rendered
        .body
        .contains(r#"<ul id="tag_9"><li>first</li><li>second</li><li>third</li></ul>"#));
    assert!(rendered
        .body
        .contains(r#"<a href="https://example.com/docs">the docs</a>"#));
    assert!(rendered.body.contains("<cite>Dune</cite>"));

    assert!(rendered.style.contains("#tag_1 {color \"navy\"} \n"));
    assert!(rendered.style.contains("#tag_6 {\"col\"=>\"2\", \"width\"=>\"80\"} \n"));
    assert!(rendered.style.contains("#tag_10 {size \"20\"} \n"));
    // Six styled elements; the list has no rule.
    assert_eq!(rendered.style.matches("#tag_").count(), 6);
}

#[test]
fn start_numbering_uses_first_line() {
    let content = read_fixture("basic.jd");
    let result = jotdown_parse::parse_with(&content, IdNumbering::Start);
    let table = result
        .elements
        .iter()
        .find(|e| e.kind == BlockKind::Table)
        .unwrap();
    assert_eq!(table.id, "tag_4");
    let list = result
        .elements
        .iter()
        .find(|e| e.kind == BlockKind::List)
        .unwrap();
    assert_eq!(list.id, "tag_7");
}

#[test]
fn malformed_produces_diagnostics() {
    let content = read_fixture("malformed.jd");
    let result = jotdown_parse::parse(&content);

    let codes: Vec<&str> = result
        .diagnostics
        .iter()
        .filter_map(|d| d.code.as_deref())
        .collect();
    assert_eq!(codes, vec!["I001", "E002", "E001"]);
    assert!(result.has_errors());

    // Both tables still render with the rows that exist.
    assert_eq!(result.elements.len(), 2);
    assert!(result.elements[0].html.contains("<td>1</td><td>2</td>"));
    assert_eq!(result.elements[1].id, "tag_4");
    assert!(result.elements[1].html.contains("<td>only one row</td>"));
    assert_eq!(result.diagnostics[0].severity, Severity::Info);
}

#[test]
fn render_produces_full_page() {
    let options = RenderOptions {
        language: "de".into(),
        title: "Notizen".into(),
        ..Default::default()
    };
    let html = jotdown_parse::render("h1.Hallo", &options);
    assert!(html.contains(r#"<html lang="de">"#));
    assert!(html.contains("<title>Notizen</title>"));
    assert!(html.contains(r#"<h1 id="tag_0">Hallo</h1>"#));
    assert!(html.contains("#tag_0  \n"));
}

#[test]
fn table_consumes_exactly_col_rows() {
    let result = jotdown_parse::parse("table.{col \"2\"}A,B\n1,2\n3,4\np.after");
    assert_eq!(result.elements.len(), 2);
    let table = &result.elements[0];
    assert_eq!(table.html.matches("<th>").count(), 2);
    assert_eq!(table.html.matches("<tr>").count(), 3);
    assert_eq!(table.html.matches("<td>").count(), 4);
    assert_eq!(table.end_line - table.start_line, 2);
    assert_eq!(result.elements[1].id, "tag_3");
}
