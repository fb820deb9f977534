//! WASM bindings for `jotdown-parse`.
//!
//! Exposes the jotdown compiler to JavaScript via wasm-bindgen.
//! Call `parse()` with a string to get the elements as JSON, or use
//! `render_html_page()` / `render_body()` for rendered output.

use jotdown_parse::{IdNumbering, RenderOptions};
use wasm_bindgen::prelude::*;

/// Parse a jotdown string and return `{ elements, diagnostics }` as JSON.
#[wasm_bindgen]
pub fn parse(input: &str) -> String {
    let result = jotdown_parse::parse(input);
    serde_json::json!({
        "elements": result.elements,
        "diagnostics": result.diagnostics,
    })
    .to_string()
}

/// Parse a jotdown string and return the elements as a JS array of objects.
#[wasm_bindgen]
pub fn parse_elements(input: &str) -> Result<JsValue, JsValue> {
    let result = jotdown_parse::parse(input);
    serde_wasm_bindgen::to_value(&result.elements).map_err(Into::into)
}

/// Parse a jotdown string and return the body HTML fragment only.
#[wasm_bindgen]
pub fn render_body(input: &str) -> String {
    jotdown_parse::parse(input).assemble().body
}

/// Parse a jotdown string and return a complete HTML page.
///
/// `language` and `title` default to `"en"` and `"index"`. `id_numbering` is
/// `"start"` or `"end"` (default) and picks which line table and list anchors
/// are numbered from.
#[wasm_bindgen]
pub fn render_html_page(
    input: &str,
    language: Option<String>,
    title: Option<String>,
    id_numbering: Option<String>,
) -> Result<String, JsValue> {
    let defaults = RenderOptions::default();
    let id_numbering = match id_numbering {
        Some(raw) => raw.parse::<IdNumbering>().map_err(|e| JsValue::from_str(&e))?,
        None => defaults.id_numbering,
    };
    let options = RenderOptions {
        language: language.unwrap_or(defaults.language),
        title: title.unwrap_or(defaults.title),
        id_numbering,
    };
    Ok(jotdown_parse::render(input, &options))
}

/// Return the parse diagnostics as a JSON array.
///
/// Returns `[{ severity, message, line, code }, ...]`; an empty array means
/// the document is clean.
#[wasm_bindgen]
pub fn check(input: &str) -> String {
    let result = jotdown_parse::parse(input);
    serde_json::to_string(&result.diagnostics).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_page_honours_id_numbering() {
        let source = "* a\n* b\n";
        let start = render_html_page(source, None, None, Some("start".into())).unwrap();
        assert!(start.contains(r#"<ul id="tag_0">"#));

        let end = render_html_page(source, None, None, None).unwrap();
        assert!(end.contains(r#"<ul id="tag_1">"#));
    }
}
