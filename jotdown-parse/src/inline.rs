//! Inline markup engine.
//!
//! Rewrites span-level markup inside paragraph text into HTML. The rules run
//! in a fixed order, each one over the output of the previous, and every rule
//! replaces all of its matches on the line.

use std::sync::LazyLock;

use regex::Regex;

/// `(pattern, replacement)` pairs in application order.
const RULES: [(&str, &str); 10] = [
    (r"\*\*([^*]+)\*\*", "<b>${1}</b>"),
    (r"__([^_]+)__", "<i>${1}</i>"),
    (r"\+([^+]+)\+", "<ins>${1}</ins>"),
    (r"\^([^^]+)\^", "<sup>${1} </sup>"),
    (r"\?\?([^?]+)\?\?", "<sub>${1}</sub>"),
    (r"~([^~]+)~", "<cite>${1}</cite>"),
    (r"%([^%]+)%", "<span>${1}</span>"),
    (r"@([^@]+)@", "<code>${1}</code>"),
    // Images and links are greedy: several bracket groups on one line are
    // swallowed into a single match.
    (r"!\[(.*)\]\((.*)\)", r#"<p><img src="${2}"/>${1}</p>"#),
    (r"\[(.*)\]\((.*)\)", r#"<a href="${2}">${1}</a>"#),
];

static COMPILED: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|&(pattern, replacement)| {
            let re = Regex::new(pattern).expect("inline markup pattern is valid");
            (re, replacement)
        })
        .collect()
});

/// Apply every inline rule to `text` and return the rewritten string.
///
/// Text is not HTML-escaped; markup characters outside a rule pass through.
pub fn render_inline(text: &str) -> String {
    COMPILED
        .iter()
        .fold(text.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
