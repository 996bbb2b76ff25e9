//! SQL LIKE patterns for in-memory matching.

use regex::Regex;

use crate::error::Result;

/// Translates a LIKE pattern into an anchored regular expression.
///
/// `%` matches any run of characters (newlines included), `_` matches exactly
/// one character, and everything else is literal.
pub fn like_to_regex(pattern: &str) -> Result<Regex> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("(?s)^");

    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '%' | '_' => {
                source.push_str(&regex::escape(&literal));
                literal.clear();
                source.push_str(if c == '%' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    source.push_str(&regex::escape(&literal));
    source.push('$');

    Ok(Regex::new(&source)?)
}
