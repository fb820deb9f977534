use std::sync::LazyLock;

use regex::Regex;

use crate::blocks::{self, Handled};
use crate::error::Diagnostic;
use crate::render_html;
use crate::types::{BlockKind, Document, Element, IdNumbering, Rendered};

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([hH][0-9]+)\.").expect("valid header pattern"));
static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(table)\.").expect("valid table pattern"));
static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([pP])\.").expect("valid paragraph pattern"));
static LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\s*").expect("valid list pattern"));
static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{.*\}").expect("valid option pattern"));

/// Result of parsing a jotdown document.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Rendered elements in document order.
    pub elements: Vec<Element>,
    /// Non-fatal diagnostics collected during parsing.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// Join the element fragments into body HTML and a style sheet.
    pub fn assemble(&self) -> Rendered {
        render_html::assemble(&self.elements)
    }
}

/// A single source line split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClass<'a> {
    pub kind: BlockKind,
    /// Leading type marker as written (`h2`, `P`, `table`, `*`).
    pub tag: &'a str,
    /// `{...}` option block following the marker, braces included.
    pub option: Option<&'a str>,
    /// Text after the marker and option block, untrimmed.
    pub text: &'a str,
}

/// Classify one line by its leading marker.
///
/// Markers are tried in order: header, table, paragraph, list. Returns `None`
/// for a line that is none of these.
pub fn classify_line(line: &str) -> Option<LineClass<'_>> {
    let marked = [
        (&HEADER_RE, BlockKind::Header),
        (&TABLE_RE, BlockKind::Table),
        (&PARAGRAPH_RE, BlockKind::Paragraph),
    ];
    for (re, kind) in marked {
        if let Some(caps) = re.captures(line) {
            let tag = caps.get(1).map_or("", |m| m.as_str());
            // The whole match is the marker plus its dot.
            let after_dot = &line[caps.get(0).map_or(0, |m| m.end())..];
            let (option, text) = split_option(after_dot);
            return Some(LineClass {
                kind,
                tag,
                option,
                text,
            });
        }
    }

    LIST_RE.find(line).map(|m| LineClass {
        kind: BlockKind::List,
        tag: &line[..1],
        option: None,
        text: &line[m.end()..],
    })
}

/// Strip the text of a list line: the leading `*` and any whitespace after it.
pub(crate) fn list_item_text(line: &str) -> Option<&str> {
    LIST_RE.find(line).map(|m| &line[m.end()..])
}

/// Split a leading `{...}` block (greedy to the last `}`) off `text`.
fn split_option(text: &str) -> (Option<&str>, &str) {
    match OPTION_RE.find(text) {
        Some(m) => (Some(m.as_str()), &text[m.end()..]),
        None => (None, text),
    }
}

/// Parse a jotdown string with the default anchor numbering.
///
/// This function never panics. Unrecognised lines are skipped and malformed
/// option blocks produce diagnostics alongside best-effort output.
pub fn parse(input: &str) -> ParseResult {
    parse_with(input, IdNumbering::default())
}

/// Parse a jotdown string, numbering multi-line blocks as `numbering` says.
pub fn parse_with(input: &str, numbering: IdNumbering) -> ParseResult {
    let doc = Document::new(input);
    let mut elements = Vec::new();
    let mut diagnostics = Vec::new();

    // The cursor only moves forward: one step per iteration plus whatever
    // the handler consumed.
    let mut cursor = 0;
    while let Some(line) = doc.line(cursor) {
        let consumed = match classify_line(line) {
            Some(class) => {
                log::debug!("line {cursor}: {:?} `{}`", class.kind, class.tag);
                let Handled { element, consumed } = match class.kind {
                    BlockKind::Header => blocks::header(&class, cursor),
                    BlockKind::Paragraph => blocks::paragraph(&class, cursor),
                    BlockKind::Table => {
                        blocks::table(&class, &doc, cursor, numbering, &mut diagnostics)
                    }
                    BlockKind::List => blocks::list(&class, &doc, cursor, numbering),
                };
                elements.push(element);
                consumed
            }
            None => {
                if !line.trim().is_empty() {
                    log::debug!("line {cursor}: unrecognised, skipped");
                    diagnostics.push(Diagnostic::info(
                        cursor,
                        "I001",
                        "Line does not start with a block marker and was skipped",
                    ));
                }
                0
            }
        };
        cursor += 1 + consumed;
    }

    ParseResult {
        elements,
        diagnostics,
    }
}
