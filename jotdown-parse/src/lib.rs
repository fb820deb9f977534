//! `jotdown-parse`: parser and HTML renderer for jotdown markup.
//!
//! jotdown is a line-oriented markup language. Each line starts with a block
//! marker (`h1.`, `p.`, `table.`, `*`) optionally followed by a `{key "value"}`
//! option block; option blocks become CSS rules keyed by the element's anchor
//! id. Paragraph text supports inline markup such as `**bold**` and
//! `[label](url)`.
//!
//! # Quick start
//!
//! ```
//! let result = jotdown_parse::parse("h1.Title\np.Some **bold** text\n");
//! assert!(result.diagnostics.is_empty());
//! let rendered = result.assemble();
//! assert_eq!(
//!     rendered.body,
//!     r#"<h1 id="tag_0">Title</h1> <p id="tag_1">Some <b>bold</b> text</p>"#
//! );
//! ```

pub mod attrs;
mod blocks;
pub mod compile;
pub mod error;
pub mod inline;
pub mod parse;
pub mod render_html;
pub mod types;

pub use error::*;
pub use parse::{ParseResult, parse, parse_with};
pub use types::*;

/// Parse `source` and render it as a complete HTML page.
pub fn render(source: &str, options: &RenderOptions) -> String {
    parse_with(source, options.id_numbering).to_html_page(options)
}

impl ParseResult {
    /// Render the parsed elements as a complete HTML page.
    pub fn to_html_page(&self, options: &RenderOptions) -> String {
        render_html::to_html_page(&self.assemble(), options)
    }

    /// True when any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}
