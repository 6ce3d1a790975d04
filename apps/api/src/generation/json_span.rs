//! Balanced-span scanning over untrusted model output.
//!
//! Model replies routinely wrap JSON in prose or markdown fences. Rather than
//! trusting the reply shape, callers pull out the first balanced `{...}` or
//! `[...]` span and attempt a typed decode on that alone.

/// Returns the first balanced span delimited by `open`/`close`, or `None` if
/// no such span closes before the end of the text.
///
/// The scan is string-aware: delimiters inside JSON string literals (and
/// escaped quotes within them) do not affect the depth count.
pub fn find_balanced_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Some(&text[start..start + offset + ch.len_utf8()]);
            }
        }
    }

    None
}

/// First balanced `{ ... }` span.
pub fn find_object_span(text: &str) -> Option<&str> {
    find_balanced_span(text, '{', '}')
}

/// First balanced `[ ... ]` span.
pub fn find_array_span(text: &str) -> Option<&str> {
    find_balanced_span(text, '[', ']')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_span_in_prose() {
        let text = "Sure! Here is the data: {\"a\": 1} Hope that helps.";
        assert_eq!(find_object_span(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_nested_object_span_is_balanced() {
        let text = "x {\"outer\": {\"inner\": 2}} y {\"second\": 3}";
        assert_eq!(find_object_span(text), Some("{\"outer\": {\"inner\": 2}}"));
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let text = r#"{"text": "use } and { freely", "n": 1}"#;
        assert_eq!(find_object_span(text), Some(text));
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let text = r#"{"text": "she said \"}\" loudly"}"#;
        assert_eq!(find_object_span(text), Some(text));
    }

    #[test]
    fn test_unclosed_span_returns_none() {
        assert_eq!(find_object_span("{\"a\": 1"), None);
        assert_eq!(find_array_span("[1, 2"), None);
    }

    #[test]
    fn test_no_delimiter_returns_none() {
        assert_eq!(find_object_span("no json here"), None);
    }

    #[test]
    fn test_array_span_in_markdown_fence() {
        let text = "```json\n[{\"q\": \"one\"}]\n```";
        assert_eq!(find_array_span(text), Some("[{\"q\": \"one\"}]"));
    }
}
