//! HTML escaping and URL encoding helpers.

use crate::rx;
use fancy_regex::Regex;
use once_cell::sync::Lazy;

/// An ampersand that does not already start a character or entity reference.
static BARE_AMPERSAND: Lazy<Regex> =
    Lazy::new(|| rx::fixed(r"(?i)&(?!#[0-9]+;|#x[0-9a-f]+;|[a-z][a-z0-9]*;)"));

/// Escape `&`, `<` and `>`. Existing entity references are left intact, so
/// escaping is idempotent. Quotes are not touched.
pub fn escape_html(text: &str) -> String {
    rx::replace_with(&BARE_AMPERSAND, text, "&amp;")
        .replace('>', "&gt;")
        .replace('<', "&lt;")
}

/// [`escape_html`] plus `"` → `&quot;`.
pub fn escape_html_quotes(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

/// Escape a value for a double-quoted attribute.
pub fn encode_attribute(value: &str) -> String {
    rx::replace_with(&BARE_AMPERSAND, value, "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

/// Percent-encode the characters that could break out of a quoted
/// attribute or split an URL.
pub fn encode_uri_against_xss(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '\t' => out.push_str("%09"),
            '\'' => out.push_str("%27"),
            '"' => out.push_str("%22"),
            _ => out.push(c),
        }
    }
    out
}

/// Form-encode a query value.
pub fn url_encode(text: &str) -> String {
    url::form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

/// Decode `%XX` escapes and `+` the way form data is decoded. Invalid
/// escapes are kept as they are.
pub fn url_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let decoded = match bytes[i] {
            b'+' => Some((b' ', 1)),
            b'%' => bytes
                .get(i + 1..i + 3)
                .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                .and_then(|hex| std::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .map(|byte| (byte, 3)),
            _ => None,
        };
        match decoded {
            Some((byte, width)) => {
                out.push(byte);
                i += width;
            }
            None => {
                out.push(bytes[i]);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Undo the `&` escaping applied to user text before it is parsed as an URL.
pub fn unescape_ampersands(text: &str) -> String {
    text.replace("&amp;", "&")
}

/// Schemes that run code when followed.
const SCRIPT_SCHEMES: &[&str] = &["javascript:", "vbscript:", "jscript:"];

/// Whether `url` would be followed as a script, once browsers decode numeric
/// character references and drop the whitespace they ignore in a scheme.
pub fn is_script_url(url: &str) -> bool {
    let decoded = decode_numeric_entities(url);
    let folded: String = decoded
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .flat_map(char::to_lowercase)
        .collect();
    SCRIPT_SCHEMES.iter().any(|scheme| folded.starts_with(scheme))
}

fn decode_numeric_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("&#") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let (digits, radix) = match after.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16),
            None => (after, 10),
        };
        let len = digits.chars().take_while(|c| c.is_digit(radix)).count();
        let decoded = u32::from_str_radix(&digits[..len], radix)
            .ok()
            .and_then(char::from_u32)
            .filter(|_| len > 0);
        match decoded {
            Some(c) => {
                out.push(c);
                let consumed = after.len() - digits.len() + len;
                let tail = &after[consumed..];
                rest = tail.strip_prefix(';').unwrap_or(tail);
            }
            None => {
                out.push_str("&#");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
