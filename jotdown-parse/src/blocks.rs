//! Block handlers.
//!
//! Each handler turns one classified line (plus, for tables and lists, the
//! lines it consumes after it) into an [`Element`]. Handlers never move the
//! cursor themselves; they report how many extra lines they consumed.

use crate::attrs::parse_options;
use crate::error::{Diagnostic, OptionError};
use crate::inline::render_inline;
use crate::parse::{LineClass, list_item_text};
use crate::types::{BlockKind, Document, Element, IdNumbering, OptionMap};

/// An element plus the number of lines consumed beyond the current one.
pub(crate) struct Handled {
    pub element: Element,
    pub consumed: usize,
}

impl Handled {
    fn single(element: Element) -> Self {
        Self {
            element,
            consumed: 0,
        }
    }
}

/// `#tag_N <option> \n`. A missing option leaves two spaces.
fn style_rule(id: &str, option: &str) -> String {
    format!("#{id} {option} \n")
}

// ------------------------------------------------------------------
// Single-line blocks
// ------------------------------------------------------------------

pub(crate) fn header(class: &LineClass<'_>, line: usize) -> Handled {
    let id = format!("tag_{line}");
    let tag = class.tag;
    let html = format!("<{tag} id=\"{id}\">{}</{tag}>", class.text.trim());
    let style = style_rule(&id, class.option.unwrap_or(""));

    Handled::single(Element {
        kind: BlockKind::Header,
        id,
        start_line: line,
        end_line: line,
        option: class.option.map(str::to_string),
        html,
        style: Some(style),
    })
}

pub(crate) fn paragraph(class: &LineClass<'_>, line: usize) -> Handled {
    let id = format!("tag_{line}");
    let html = format!("<p id=\"{id}\">{}</p>", render_inline(class.text.trim()));
    let style = style_rule(&id, class.option.unwrap_or(""));

    Handled::single(Element {
        kind: BlockKind::Paragraph,
        id,
        start_line: line,
        end_line: line,
        option: class.option.map(str::to_string),
        html,
        style: Some(style),
    })
}

// ------------------------------------------------------------------
// Tables
// ------------------------------------------------------------------

pub(crate) fn table(
    class: &LineClass<'_>,
    doc: &Document,
    line: usize,
    numbering: IdNumbering,
    diagnostics: &mut Vec<Diagnostic>,
) -> Handled {
    let options = class
        .option
        .map(|raw| table_options(raw, line, diagnostics));
    let rows = row_count(options.as_ref(), line, diagnostics);

    let mut head = String::from("<tr>");
    for label in header_cells(class.text) {
        head.push_str(&format!("<th>{label}</th>"));
    }
    head.push_str("</tr>");

    let mut body = String::new();
    let mut consumed = 0;
    while consumed < rows {
        let Some(row) = doc.line(line + consumed + 1) else {
            diagnostics.push(Diagnostic::error(
                line,
                "E001",
                format!("Table expects {rows} rows but the document ends after {consumed}"),
            ));
            break;
        };
        body.push_str(&format!("<tr><td>{}</td></tr>", row.replace(',', "</td><td>")));
        consumed += 1;
    }

    let end_line = line + consumed;
    let id = numbering.anchor(line, end_line);
    let html = format!(
        "<table id=\"{id}\"><thead>{head}</thead><tbody>{body}</tbody></table>"
    );
    let option_text = options.as_ref().map(OptionMap::to_string).unwrap_or_default();
    let style = style_rule(&id, &option_text);

    Handled {
        element: Element {
            kind: BlockKind::Table,
            id,
            start_line: line,
            end_line,
            option: class.option.map(str::to_string),
            html,
            style: Some(style),
        },
        consumed,
    }
}

/// Parse a table's option block, keeping the complete pairs of a malformed one.
fn table_options(raw: &str, line: usize, diagnostics: &mut Vec<Diagnostic>) -> OptionMap {
    match parse_options(raw) {
        Ok(options) => options,
        Err(e) => {
            let OptionError::UnpairedKey { dangling, options } = e;
            diagnostics.push(Diagnostic::error(
                line,
                "E002",
                format!("Option block has an unpaired key '{dangling}'; it was ignored"),
            ));
            options
        }
    }
}

/// Number of body rows from the `col` option.
///
/// Leading digits are read (`"3px"` is 3); anything without them counts as 0.
fn row_count(
    options: Option<&OptionMap>,
    line: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> usize {
    let Some(col) = options.and_then(|o| o.get("col")) else {
        diagnostics.push(Diagnostic::warning(
            line,
            "W001",
            "Table has no `col` option; rendering the header row only",
        ));
        return 0;
    };

    let digits: String = col.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        let message =
            format!("Table `col` value '{col}' is not a number; rendering the header row only");
        diagnostics.push(Diagnostic::warning(line, "W001", message));
        return 0;
    }
    // Too large to represent: the document runs out first anyway.
    digits.parse().unwrap_or(usize::MAX)
}

/// Split the header line on `,`, dropping trailing empty cells.
fn header_cells(text: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = text.split(',').collect();
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

// ------------------------------------------------------------------
// Lists
// ------------------------------------------------------------------

pub(crate) fn list(
    class: &LineClass<'_>,
    doc: &Document,
    line: usize,
    numbering: IdNumbering,
) -> Handled {
    let mut items = vec![class.text];
    while let Some(item) = doc
        .line(line + items.len())
        .and_then(list_item_text)
    {
        items.push(item);
    }

    let consumed = items.len() - 1;
    let end_line = line + consumed;
    let id = numbering.anchor(line, end_line);

    let mut html = format!("<ul id=\"{id}\">");
    for item in &items {
        html.push_str(&format!("<li>{item}</li>"));
    }
    html.push_str("</ul>");

    Handled {
        element: Element {
            kind: BlockKind::List,
            id,
            start_line: line,
            end_line,
            option: None,
            html,
            style: None,
        },
        consumed,
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;
    use crate::parse::classify_line;
    use pretty_assertions::assert_eq;

    fn run(src: &str, numbering: IdNumbering) -> (Handled, Vec<Diagnostic>) {
        let doc = Document::new(src);
        let first = doc.line(0).unwrap().to_string();
        let class = classify_line(&first).unwrap();
        let mut diagnostics = Vec::new();
        let handled = match class.kind {
            BlockKind::Header => header(&class, 0),
            BlockKind::Paragraph => paragraph(&class, 0),
            BlockKind::Table => table(&class, &doc, 0, numbering, &mut diagnostics),
            BlockKind::List => list(&class, &doc, 0, numbering),
        };
        (handled, diagnostics)
    }

    #[test]
    fn header_is_verbatim() {
        let (h, _) = run("h1.  **Title**  ", IdNumbering::End);
        assert_eq!(h.element.html, r#"<h1 id="tag_0">**Title**</h1>"#);
        assert_eq!(h.element.style.as_deref(), Some("#tag_0  \n"));
    }

    #[test]
    fn header_keeps_raw_option() {
        let (h, _) = run(r#"h2.{size "20"} Big"#, IdNumbering::End);
        assert_eq!(h.element.html, r#"<h2 id="tag_0">Big</h2>"#);
        assert_eq!(h.element.style.as_deref(), Some("#tag_0 {size \"20\"} \n"));
    }

    #[test]
    fn paragraph_runs_inline_markup() {
        let (p, _) = run("p.**bold** and __italic__", IdNumbering::End);
        assert_eq!(
            p.element.html,
            r#"<p id="tag_0"><b>bold</b> and <i>italic</i></p>"#
        );
    }

    #[test]
    fn table_with_rows() {
        let (t, diags) = run("table.{col \"2\"}A,B\n1,2\n3,4\n5,6", IdNumbering::End);
        assert!(diags.is_empty());
        assert_eq!(t.consumed, 2);
        assert_eq!(
            t.element.html,
            "<table id=\"tag_2\"><thead><tr><th>A</th><th>B</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr><tr><td>3</td><td>4</td></tr></tbody></table>"
        );
        assert_eq!(t.element.style.as_deref(), Some("#tag_2 {\"col\"=>\"2\"} \n"));
    }

    #[test]
    fn table_start_numbering() {
        let (t, _) = run("table.{col \"1\"}A\nx", IdNumbering::Start);
        assert_eq!(t.element.id, "tag_0");
        assert_eq!(t.element.end_line, 1);
    }

    #[test]
    fn table_without_col_renders_header_only() {
        let (t, diags) = run("table.A,B\n1,2", IdNumbering::End);
        assert_eq!(t.consumed, 0);
        assert!(t.element.html.contains("<tbody></tbody>"));
        assert_eq!(t.element.style.as_deref(), Some("#tag_0  \n"));
        assert_eq!(diags[0].code.as_deref(), Some("W001"));
    }

    #[test]
    fn table_non_numeric_col() {
        let (t, diags) = run("table.{col \"many\"}A\n1", IdNumbering::End);
        assert_eq!(t.consumed, 0);
        assert_eq!(diags[0].severity, Severity::Warning);
    }

    #[test]
    fn table_col_reads_leading_digits() {
        let (t, diags) = run("table.{col \"1st\"}A\n1\n2", IdNumbering::End);
        assert!(diags.is_empty());
        assert_eq!(t.consumed, 1);
    }

    #[test]
    fn table_rows_past_end_stop_at_last_line() {
        let (t, diags) = run("table.{col \"5\"}A\n1\n2", IdNumbering::End);
        assert_eq!(t.consumed, 2);
        assert_eq!(t.element.id, "tag_2");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].code.as_deref(), Some("E001"));
    }

    #[test]
    fn table_unpaired_option_key() {
        let (t, diags) = run("table.{col \"1\" border}A\n1", IdNumbering::End);
        assert_eq!(t.consumed, 1);
        assert_eq!(diags[0].code.as_deref(), Some("E002"));
    }

    #[test]
    fn table_header_drops_trailing_empty_cells() {
        assert_eq!(header_cells("A,,B,,"), vec!["A", "", "B"]);
        assert!(header_cells("").is_empty());
    }

    #[test]
    fn list_collects_consecutive_items() {
        let (l, _) = run("* one\n*two\n*   three\nafter", IdNumbering::End);
        assert_eq!(l.consumed, 2);
        assert_eq!(
            l.element.html,
            r#"<ul id="tag_2"><li>one</li><li>two</li><li>three</li></ul>"#
        );
        assert_eq!(l.element.style, None);
    }

    #[test]
    fn list_items_are_not_inline_processed() {
        let (l, _) = run("* **x**", IdNumbering::Start);
        assert_eq!(l.element.html, r#"<ul id="tag_0"><li>**x**</li></ul>"#);
    }
}
