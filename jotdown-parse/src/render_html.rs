//! Document assembly and the HTML page shell.
//!
//! Element fragments are joined as-is: jotdown passes block text through to
//! the output without escaping. Only the shell's own attributes (language and
//! title) are escaped.

use crate::types::{Element, RenderOptions, Rendered};

/// Join element fragments into body HTML and a style sheet.
///
/// HTML fragments are separated by a single space and style rules by a comma,
/// both in document order. Elements without a style rule (lists) add nothing
/// to the style sheet.
pub fn assemble(elements: &[Element]) -> Rendered {
    let body = elements
        .iter()
        .map(|e| e.html.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let style = elements
        .iter()
        .filter_map(|e| e.style.as_deref())
        .collect::<Vec<_>>()
        .join(",");

    Rendered { body, style }
}

/// Wrap assembled output in a complete HTML5 page.
pub fn to_html_page(rendered: &Rendered, options: &RenderOptions) -> String {
    let lang = escape_html(&options.language);
    let title = escape_html(&options.title);
    let Rendered { body, style } = rendered;

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
  <meta charset="utf-8">
  <meta http-equiv="x-ua-compatible" content="ie=edge">
  <meta name="viewport" content="width=device-width, initial-scale=1, shrink-to-fit=no">
  <title>{title}</title>
  <style>
  {style}
  </style>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
