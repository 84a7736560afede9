//! Minimal XHTML rendering for feeds and mail: inline emphasis, headers and
//! one paragraph per line.

use crate::escape::escape_html;
use crate::formatter::{emphasis_as, headers};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*<h[1-6].*</h[1-6]>\s*$")
        .unwrap_or_else(|err| panic!("invalid built-in pattern: {err}"))
});

fn xhtml_element(tag: &str) -> &str {
    match tag {
        "b" => "strong",
        "i" => "em",
        other => other,
    }
}

/// Render `text` as XHTML. Every line becomes a `<p>` unless it is a header.
pub fn to_xhtml(text: &str) -> String {
    let text = escape_html(text);
    let text = emphasis_as(&text, xhtml_element);
    let text = headers(&text);

    let mut out = String::with_capacity(text.len() + 16);
    for line in text.lines() {
        if HEADER_LINE.is_match(line) {
            out.push_str(line);
        } else {
            out.push_str("<p>");
            out.push_str(line);
            out.push_str("</p>");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_and_emphasis() {
        assert_eq!(
            to_xhtml("[b]bold[/b] and [i]it[/i]\n[u]u[/u] < 2"),
            "<p><strong>bold</strong> and <em>it</em></p>\n<p><u>u</u> &lt; 2</p>\n"
        );
    }

    #[test]
    fn test_headers_are_not_wrapped() {
        assert_eq!(
            to_xhtml("[h1]Title[/h1]\nbody"),
            "<h1 class='formatter'>Title</h1>\n<p>body</p>\n"
        );
    }

    #[test]
    fn test_empty_lines_become_empty_paragraphs() {
        assert_eq!(to_xhtml("a\r\n\r\nb"), "<p>a</p>\n<p></p>\n<p>b</p>\n");
    }
}
