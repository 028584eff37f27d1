//! Docstring literal decoding and indentation cleanup.

/// Decode the text of a Python string literal used as a docstring.
///
/// Returns `None` for bytes and f-string literals, which are never docstrings.
/// Escape sequences are kept as written.
pub fn literal_value(raw: &str) -> Option<String> {
    let quote_at = raw.find(|c: char| c == '"' || c == '\'')?;
    let prefix = &raw[..quote_at];
    if prefix.len() > 2 || !prefix.chars().all(|c| "rRuUbBfF".contains(c)) {
        return None;
    }
    if prefix.chars().any(|c| "bBfF".contains(c)) {
        return None;
    }

    let body = &raw[quote_at..];
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if body.len() >= 2 * quote.len() && body.starts_with(quote) && body.ends_with(quote) {
            return Some(body[quote.len()..body.len() - quote.len()].to_string());
        }
    }
    None
}

/// Normalize docstring indentation the way `inspect.cleandoc` does:
/// the first line is left-stripped, the common indentation of the remaining
/// lines is removed, and leading/trailing blank lines are dropped.
pub fn clean(doc: &str) -> String {
    let expanded = doc.replace('\t', "        ");
    let lines: Vec<&str> = expanded.lines().collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| leading_whitespace(l))
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            cleaned.push(line.trim_start().to_string());
        } else if line.trim().is_empty() {
            cleaned.push(String::new());
        } else {
            let cut: usize = line.chars().take(margin).map(char::len_utf8).sum();
            cleaned.push(line[cut..].to_string());
        }
    }

    while cleaned.first().is_some_and(|l| l.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_triple_quoted() {
        assert_eq!(literal_value("\"hi\"").as_deref(), Some("hi"));
        assert_eq!(literal_value("'hi'").as_deref(), Some("hi"));
        assert_eq!(literal_value("\"\"\"hi\"\"\"").as_deref(), Some("hi"));
        assert_eq!(literal_value("'''hi'''").as_deref(), Some("hi"));
        assert_eq!(literal_value("r\"\\d+\"").as_deref(), Some("\\d+"));
    }

    #[test]
    fn bytes_and_fstrings_are_not_docstrings() {
        assert_eq!(literal_value("b\"raw\""), None);
        assert_eq!(literal_value("f\"{x}\""), None);
        assert_eq!(literal_value("rb'x'"), None);
    }

    #[test]
    fn empty_literal() {
        assert_eq!(literal_value("\"\"").as_deref(), Some(""));
        assert_eq!(literal_value("\"\"\"\"\"\"").as_deref(), Some(""));
    }

    #[test]
    fn cleandoc_removes_common_margin() {
        let doc = "Summary line.\n\n        Details here.\n          Indented more.\n    ";
        assert_eq!(clean(doc), "Summary line.\n\nDetails here.\n  Indented more.");
    }

    #[test]
    fn cleandoc_drops_leading_blank_lines() {
        assert_eq!(clean("\n    Body only.\n    "), "Body only.");
    }

    #[test]
    fn cleandoc_keeps_trailing_whitespace() {
        assert_eq!(clean("Summary. \n    keep  \n    end"), "Summary. \nkeep  \nend");
    }
}
