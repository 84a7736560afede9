//! Small adapters over `fancy_regex` used by every pass.
//!
//! The backtracking engine reports failures (step limit exceeded) per search
//! instead of panicking. A search that gives up leaves the current line as it
//! is and the scan resumes on the next one.

use fancy_regex::{Captures, Regex};
use log::warn;

/// Compile a pattern that is part of the formatter itself.
pub(crate) fn fixed(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid built-in pattern {pattern:?}: {err}"))
}

/// Replace every match using `rewrite` to render the replacement.
pub(crate) fn replace_all<F>(re: &Regex, text: &str, mut rewrite: F) -> String
where
    F: FnMut(&Captures<'_>) -> String,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut pos = 0;
    while pos <= text.len() {
        let caps = match re.captures_from_pos(text, pos) {
            Ok(Some(caps)) => caps,
            Ok(None) => break,
            Err(err) => {
                warn!("pattern {} gave up at byte {pos}: {err}", re.as_str());
                match text[pos..].find('\n') {
                    Some(newline) => {
                        pos += newline + 1;
                        continue;
                    }
                    None => break,
                }
            }
        };
        let Some(whole) = caps.get(0) else { break };
        out.push_str(&text[last..whole.start()]);
        out.push_str(&rewrite(&caps));
        last = whole.end();
        pos = if whole.start() == whole.end() {
            match text[last..].chars().next() {
                Some(c) => last + c.len_utf8(),
                None => break,
            }
        } else {
            last
        };
    }
    out.push_str(&text[last..]);
    out
}

/// Replace every match with a fixed string.
pub(crate) fn replace_with(re: &Regex, text: &str, replacement: &str) -> String {
    replace_all(re, text, |_| replacement.to_string())
}

/// Replace every match with `open` + group 1 + `close`.
pub(crate) fn wrap_group(re: &Regex, text: &str, open: &str, close: &str) -> String {
    replace_all(re, text, |caps| format!("{open}{}{close}", group(caps, 1)))
}

pub(crate) fn is_match(re: &Regex, text: &str) -> bool {
    re.is_match(text).unwrap_or_else(|err| {
        warn!("pattern {} gave up: {err}", re.as_str());
        false
    })
}

/// Text of a numbered group, empty when it did not participate.
pub(crate) fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

/// Text of a named group, empty when it did not participate.
pub(crate) fn named<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_all_keeps_unmatched_text() {
        let re = fixed(r"(?<!\[)\[b\](.*?)\[/b\]");
        let out = wrap_group(&re, "a [b]x[/b] [[b]y[/b]", "<b>", "</b>");
        assert_eq!(out, "a <b>x</b> [[b]y[/b]");
    }

    #[test]
    fn test_scan_resumes_after_a_line_that_gives_up() {
        let re = fancy_regex::RegexBuilder::new(r"(?s)\[(?P<tag>x)\](?P<body>.*?)\[/\k<tag>\]")
            .backtrack_limit(2_000)
            .build()
            .unwrap();
        let stuck = format!("[x]{}\n", "-".repeat(3_000));
        let out = replace_all(&re, &format!("{stuck}[x]ok[/x]"), |caps| {
            format!("<x>{}</x>", named(caps, "body"))
        });
        assert_eq!(out, format!("{stuck}<x>ok</x>"));
    }

    #[test]
    fn test_empty_matches_advance() {
        let re = fixed(r"(?=b)");
        assert_eq!(replace_with(&re, "abab", "|"), "a|ba|b");
    }

    #[test]
    fn test_named_missing_group_is_empty() {
        let re = fixed(r"(?<a>x)|(?<b>y)");
        let caps = re.captures("y").unwrap().unwrap();
        assert_eq!(named(&caps, "a"), "");
        assert_eq!(named(&caps, "b"), "y");
    }
}
