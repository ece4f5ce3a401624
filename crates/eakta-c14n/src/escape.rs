#![forbid(unsafe_code)]

//! Entity escaping for C14N output.
//!
//! - Text nodes: `&` → `&amp;`, `<` → `&lt;`, `>` → `&gt;`, `\r` → `&#xD;`
//! - Attribute values: additionally `"` → `&quot;`, `\t` → `&#x9;`, `\n` → `&#xA;`
//! - PI data: `\r` → `&#xD;`

/// Escape text node content.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape text node content after folding CRLF pairs and lone CRs to LF.
pub fn escape_text_normalized(s: &str) -> String {
    escape_text(&s.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Escape an attribute value, keeping whitespace characters as character
/// references.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape an attribute value after folding space, tab, CR and LF to a
/// single space each.
pub fn escape_attr_normalized(s: &str) -> String {
    let folded: String = s
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect();
    escape_attr(&folded)
}

/// Escape processing instruction data.
pub fn escape_pi(s: &str) -> String {
    s.replace('\r', "&#xD;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("hello"), "hello");
        assert_eq!(escape_text("a&b<c>d"), "a&amp;b&lt;c&gt;d");
        assert_eq!(escape_text("line\rend"), "line&#xD;end");
        assert_eq!(escape_text("\"quoted\""), "\"quoted\"");
    }

    #[test]
    fn test_escape_text_normalized() {
        assert_eq!(
            escape_text_normalized("one\r\ntwo\rthree\n"),
            "one\ntwo\nthree\n"
        );
        assert_eq!(escape_text_normalized("a&b"), "a&amp;b");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("hello"), "hello");
        assert_eq!(escape_attr("a&b\"c<d>"), "a&amp;b&quot;c&lt;d>");
        assert_eq!(escape_attr("a\tb\nc\rd"), "a&#x9;b&#xA;c&#xD;d");
    }

    #[test]
    fn test_escape_attr_normalized() {
        assert_eq!(escape_attr_normalized("a\tb\nc\rd e"), "a b c d e");
        assert_eq!(escape_attr_normalized("x&\"y"), "x&amp;&quot;y");
    }

    #[test]
    fn test_escape_pi() {
        assert_eq!(escape_pi("a\rb"), "a&#xD;b");
    }
}
