use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A jotdown source document: an immutable sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Split `source` into lines.
    ///
    /// CRLF is normalised to LF and trailing empty lines are dropped, so
    /// `"a\n\n"` has exactly one line.
    pub fn new(source: &str) -> Self {
        let normalised = source.replace("\r\n", "\n");
        let mut lines: Vec<String> = normalised.split('\n').map(str::to_string).collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        Self { lines }
    }

    /// The line at `idx`, or `None` once the cursor runs off the end.
    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The four block constructs the parser recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Header,
    Paragraph,
    Table,
    List,
}

/// One rendered block-level element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub kind: BlockKind,
    /// Anchor id shared by the HTML fragment and its style rule (`tag_<N>`).
    pub id: String,
    /// First source line the element was built from (0-based).
    pub start_line: usize,
    /// Last source line the element consumed (0-based, inclusive).
    pub end_line: usize,
    /// Raw `{...}` option text as written, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
    pub html: String,
    /// Style rule fragment. Lists never carry one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// Which source line a multi-line block takes its anchor number from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdNumbering {
    /// The line on which the block starts.
    Start,
    /// The last line the block consumed. Headers and paragraphs are single
    /// lines, so this only changes tables and lists.
    #[default]
    End,
}

impl IdNumbering {
    pub(crate) fn anchor(self, start_line: usize, end_line: usize) -> String {
        match self {
            IdNumbering::Start => format!("tag_{start_line}"),
            IdNumbering::End => format!("tag_{end_line}"),
        }
    }
}

/// Accepts `start` or `end`, ignoring ASCII case.
impl FromStr for IdNumbering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "start" => Ok(IdNumbering::Start),
            "end" => Ok(IdNumbering::End),
            other => Err(format!("unknown id numbering '{other}' (expected start or end)")),
        }
    }
}

/// Options for rendering a complete page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Value of the `<html lang>` attribute.
    pub language: String,
    /// Page `<title>`.
    pub title: String,
    pub id_numbering: IdNumbering,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            title: "index".to_string(),
            id_numbering: IdNumbering::default(),
        }
    }
}

/// Body HTML and aggregate style sheet, assembled in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendered {
    pub body: String,
    pub style: String,
}

/// Key/value pairs parsed from a `{key "value" ...}` option block.
///
/// Keys are kept sorted so the display form is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionMap(BTreeMap<String, String>);

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OptionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Renders as `{"key"=>"value", "key2"=>"value2"}`. Feeding this text back
/// through [`crate::attrs::parse_options`] yields the same map.
impl fmt::Display for OptionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "\"{key}\"=>\"{value}\"")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn document_drops_trailing_blank_lines() {
        let doc = Document::new("h1.A\n\np.B\n\n\n");
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.line(1), Some(""));
        assert_eq!(doc.line(3), None);
    }

    #[test]
    fn document_normalises_crlf() {
        let doc = Document::new("h1.A\r\np.B\r\n");
        assert_eq!(doc.line(0), Some("h1.A"));
        assert_eq!(doc.line(1), Some("p.B"));
    }

    #[test]
    fn empty_source_has_no_lines() {
        assert!(Document::new("").is_empty());
    }

    #[test]
    fn option_map_display_is_sorted() {
        let map: OptionMap = [("size", "20"), ("col", "2")].into_iter().collect();
        assert_eq!(map.to_string(), r#"{"col"=>"2", "size"=>"20"}"#);
    }

    #[test]
    fn empty_option_map_display() {
        assert_eq!(OptionMap::new().to_string(), "{}");
    }

    #[test]
    fn id_numbering_from_str() {
        assert_eq!("start".parse::<IdNumbering>(), Ok(IdNumbering::Start));
        assert_eq!("End".parse::<IdNumbering>(), Ok(IdNumbering::End));
        assert!("middle".parse::<IdNumbering>().is_err());
    }

    #[test]
    fn anchor_numbering() {
        assert_eq!(IdNumbering::End.anchor(2, 5), "tag_5");
        assert_eq!(IdNumbering::Start.anchor(2, 5), "tag_2");
    }
}
