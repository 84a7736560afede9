//! Relaxed URI grammar used to find and validate links.
//!
//! The productions follow RFC 2396 loosely: opaque URIs are only accepted for
//! a handful of schemes, `ms-help:` and `mk:@` get special treatment, and
//! `www.` / `gzip.` host names are recognized without a scheme.
//!
//! The grammar runs on the `regex` crate, so matching stays linear in the
//! input length however the nested repetitions line up.

use once_cell::sync::Lazy;
use regex::{Captures, Regex, RegexBuilder};
use std::ops::Range;

// uric = reserved | unreserved | escaped
const URIC: &str = r"[;/\?:@&=\+\$,a-zA-Z0-9\-_\.!~\*'\(\)]|%[0-9A-Fa-f]{2}";
// uric plus backslash, for mk:@ links
const URIC_DIRECT_SLASH: &str = r"[;/\?:@&=\+\$,a-zA-Z0-9\-_\.!~\*'\(\)\\]|%[0-9A-Fa-f]{2}";
const URIC_NO_SLASH: &str = r"[a-zA-Z0-9\-_\.!~\*'\(\);\?:@&=\+\$,]|%[0-9A-Fa-f]{2}";
const PCHAR: &str = r"[a-zA-Z0-9\-_\.!~\*'\(\):@&=\+\$,]|%[0-9A-Fa-f]{2}";
const IPV4_ADDRESS: &str = r"[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+";
const TOP_LABEL: &str = r"[a-zA-Z][-a-zA-Z0-9]*[a-zA-Z0-9]|[a-zA-Z]";
const DOMAIN_LABEL: &str = r"[a-zA-Z0-9][-a-zA-Z0-9]*[a-zA-Z0-9]|[a-zA-Z0-9]";
const USER_INFO: &str = r"(?:[a-zA-Z0-9\-_\.!~\*'\(\);:&=\+\$,]|%[0-9A-Fa-f]{2})*";
const REG_NAME: &str = r"(?:[a-zA-Z0-9\-_\.!~\*'\(\)\$,;:@&=\+]|%[0-9A-Fa-f]{2})+";

/// Characters an implicit link never ends with.
const TRAILING_PUNCTUATION: &[u8] = b"'.,\"?>])";
/// Escaped brackets and quotes closing an implicit link.
const TRAILING_ENTITIES: &[&str] = &["&gt;", "&lt;", "&quot;"];

fn uri_reference() -> String {
    let fragment = format!("(?:{URIC})*");
    let query = format!("(?:{URIC})*");
    let param = format!("(?:{PCHAR})*");
    let segment = format!("(?:{PCHAR})*(?:;(?:{param}))*");
    let path_segments = format!("{segment}(?:/(?:{segment}))*");
    let host_name = format!(r"(?:(?:{DOMAIN_LABEL})\.)*(?:{TOP_LABEL})\.?");
    let host = format!("(?:{host_name})|(?:{IPV4_ADDRESS})");
    let host_port = format!("(?P<hostname>{host})(?::[0-9]*)?");
    let server = format!("(?:{USER_INFO}@)?(?:{host_port})?");
    let authority = format!("(?:{server})|(?:{REG_NAME})");
    let abs_path = format!("/(?:{path_segments})");
    let net_path = format!("//(?:{authority})(?:{abs_path})?");
    let opaque_part = format!("(?:{URIC_NO_SLASH})(?:{URIC})*");
    let hier_part = format!(r"(?:(?:{net_path})|(?:{abs_path}))(?:\?{query})?");
    let absolute_uri = format!(
        r"(?P<opaque_scheme>cid|mid|pop|news|urn|imap|mailto):(?:{opaque_part})|(?P<help_scheme>ms-help):(?:{URIC})+|(?P<mk_scheme>mk):@(?:{URIC_DIRECT_SLASH})+|(?P<scheme>[a-zA-Z][a-zA-Z0-9\+\-\.]*):(?:{hier_part})"
    );
    let www_host_port = format!(r"(?P<www_hostname>(?:www|gzip)\.(?:{host}))(?::[0-9]*)?");
    let www_path = format!("(?:{www_host_port})(?:{abs_path})?");
    let www_relative_uri = format!(r"(?:{www_path})(?:\?{query})?");
    format!("(?:(?:{absolute_uri})|(?:{www_relative_uri}))(?:#{fragment})?")
}

fn build(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .size_limit(1 << 26)
        .build()
        .unwrap_or_else(|err| panic!("invalid URI grammar: {err}"))
}

static URL_ONLY: Lazy<Regex> = Lazy::new(|| build(&format!("^(?:{})$", uri_reference())));
static IMPLICIT_URL: Lazy<Regex> = Lazy::new(|| build(&format!(r"\b(?:{})", uri_reference())));

const SCHEME_GROUPS: [&str; 4] = ["opaque_scheme", "help_scheme", "mk_scheme", "scheme"];
const HOSTNAME_GROUPS: [&str; 2] = ["hostname", "www_hostname"];

/// A string recognized by the URI grammar, with the positions of its scheme
/// and host name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriMatch {
    value: String,
    scheme: Option<Range<usize>>,
    hostname: Option<Range<usize>>,
}

impl UriMatch {
    fn from_captures(caps: &Captures<'_>) -> Self {
        let range = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| caps.name(name))
                .filter(|m| m.start() < m.end())
                .map(|m| m.range())
        };
        UriMatch {
            value: caps[0].to_string(),
            scheme: range(&SCHEME_GROUPS),
            hostname: range(&HOSTNAME_GROUPS),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.clone().map(|r| &self.value[r])
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.clone().map(|r| &self.value[r])
    }

    pub fn scheme_range(&self) -> Option<Range<usize>> {
        self.scheme.clone()
    }

    pub fn hostname_range(&self) -> Option<Range<usize>> {
        self.hostname.clone()
    }
}

/// Match the whole of `text` against the grammar.
pub fn match_url(text: &str) -> Option<UriMatch> {
    URL_ONLY.captures(text).map(|caps| UriMatch::from_captures(&caps))
}

/// Find links in running text.
///
/// A link starts on a word boundary and never ends with one of
/// `' . , " ? > ] )` or an escaped bracket or quote; those stay in the text.
pub fn find_urls(text: &str) -> Vec<(Range<usize>, UriMatch)> {
    let mut found = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let Some(m) = IMPLICIT_URL.find_at(text, pos) else {
            break;
        };
        let mut end = m.end();
        while end > m.start() {
            let slice = &text[m.start()..end];
            if TRAILING_PUNCTUATION.contains(&slice.as_bytes()[slice.len() - 1]) {
                end -= 1;
            } else if let Some(entity) = TRAILING_ENTITIES.iter().find(|e| slice.ends_with(*e)) {
                end -= entity.len();
            } else {
                break;
            }
        }
        if end > m.start() {
            if let Some(uri) = match_url(&text[m.start()..end]) {
                found.push((m.start()..end, uri));
            }
        }
        pos = m.end().max(m.start() + 1);
        while !text.is_char_boundary(pos) {
            pos += 1;
        }
    }
    found
}

/// Loose well-formedness check for an absolute or relative URL.
pub fn is_well_formed(text: &str) -> bool {
    if text.is_empty()
        || text
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || "<>\"{}|\\^`".contains(c))
    {
        return false;
    }
    let bytes = text.as_bytes();
    let hex_at = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_hexdigit);
    let escapes_valid = bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'%')
        .all(|(i, _)| hex_at(i + 1) && hex_at(i + 2));
    if !escapes_valid {
        return false;
    }
    match text.split_once(':') {
        Some((scheme, _))
            if scheme
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) =>
        {
            url::Url::parse(text).is_ok()
        }
        _ => true,
    }
}
