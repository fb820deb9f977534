use crate::error::OptionError;
use crate::types::OptionMap;

/// Parse a jotdown option block into an [`OptionMap`].
///
/// Accepted formats:
///   - `{key "value" key2 "value2"}`
///   - `{key value}` (unquoted words)
///   - `key "value"` (without braces)
///
/// Every character other than an ASCII letter, digit, `_`, `'` or `"` acts as
/// a separator, so `{width: "10", color: 'red'}` parses too. Quotes are then
/// removed from each token and consecutive tokens are paired as key, value.
/// A later duplicate key overwrites an earlier one.
pub fn parse_options(input: &str) -> Result<OptionMap, OptionError> {
    let spaced: String = input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '"') {
                c
            } else {
                ' '
            }
        })
        .collect();

    let tokens: Vec<String> = spaced
        .split_whitespace()
        .map(|token| token.replace(['\'', '"'], ""))
        .collect();

    let mut options = OptionMap::new();
    let mut pairs = tokens.chunks_exact(2);
    for pair in pairs.by_ref() {
        options.insert(pair[0].as_str(), pair[1].as_str());
    }

    match pairs.remainder() {
        [dangling] => Err(OptionError::UnpairedKey {
            dangling: dangling.clone(),
            options,
        }),
        _ => Ok(options),
    }
}
