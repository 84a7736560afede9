//! Reply citations, `[q]` blocks and collapsible `[cut]` sections.

use crate::matcher::Matcher;
use crate::rx;
use fancy_regex::Regex;
use once_cell::sync::Lazy;

/// Start of a citation line: up to five initials followed by `>` markers.
pub const CITATION_START: &str = r"^\s*[-\w\.]{0,5}(?:&gt;)+";

/// Caption of a `[cut]` without one.
pub const DEFAULT_CUT_CAPTION: &str = "Скрытый текст";

static CITATION_LINE: Lazy<Regex> = Lazy::new(|| {
    rx::fixed(r"(?m)^(?P<lead>[ \t]*[-\w\.]{0,5})(?P<marker>(?:&gt;)+).*$")
});

static QUOTE: Lazy<Regex> = Lazy::new(|| {
    rx::fixed(&format!(
        r"(?is)(?<!\[)\[q\]\s*(?P<body>.*?)(?m:{CITATION_START}\s*)*\s*\[[\\/]q\]"
    ))
});

// Innermost first: a body never contains another opening `[cut`.
static CUT: Lazy<Regex> = Lazy::new(|| {
    rx::fixed(&format!(
        r"(?is)(?<!\[)\[cut(?:=(?P<caption>[^\]\n]*))?\]\s*(?P<body>(?:(?!\[cut[\]=]).)*?)(?m:{CITATION_START}\s*)*\s*\[[\\/]cut\]"
    ))
});

pub(crate) static CITATION_TEXT: Lazy<Regex> =
    Lazy::new(|| rx::fixed(&format!("(?m){CITATION_START}.*$")));

#[derive(Debug, Clone)]
pub(crate) struct CutSpan {
    caption: String,
    body: String,
}

/// Wrap each citation line in a span carrying its nesting level.
pub(crate) fn wrap_citations(text: &str) -> String {
    rx::replace_all(&CITATION_LINE, text, |caps| {
        let level = rx::named(caps, "marker").matches("&gt;").count();
        format!(
            "<span class='lineQuote level{level}'>{}</span>",
            rx::group(caps, 0)
        )
    })
}

pub(crate) fn extract_quotes(text: &str, quotes: &mut Matcher<String>) -> String {
    rx::replace_all(&QUOTE, text, |caps| {
        quotes.push(rx::named(caps, "body").trim_end().to_string())
    })
}

pub(crate) fn render_quote(body: &str) -> String {
    format!("<blockquote class='q'><p>{body}</p></blockquote>")
}

/// Pull out `[cut]` spans and wrap citations until no section is left.
///
/// Each round extracts the innermost sections, wraps the citation lines of
/// the remaining text, then splices the sections back with their own
/// citations wrapped. Restored markup starts every wrapped line with a tag,
/// so later rounds never wrap a line twice.
///
/// The caption becomes the text of the section's toggle link, so
/// `plain_caption` must turn any link placeholders in it back into text.
pub(crate) fn expand_cuts<F>(
    text: &str,
    template: &str,
    placeholder: &str,
    plain_caption: F,
) -> String
where
    F: Fn(&str) -> String,
{
    let mut text = text.to_string();
    loop {
        let mut cuts: Matcher<CutSpan> = Matcher::new(placeholder);
        text = rx::replace_all(&CUT, &text, |caps| {
            cuts.push(CutSpan {
                caption: plain_caption(rx::named(caps, "caption").trim()),
                body: rx::named(caps, "body").trim_end().to_string(),
            })
        });
        text = wrap_citations(&text);
        if cuts.is_empty() {
            return text;
        }
        text = cuts.restore(&text, |cut| render_cut(template, cut));
    }
}

fn render_cut(template: &str, cut: &CutSpan) -> String {
    let caption = if cut.caption.is_empty() {
        DEFAULT_CUT_CAPTION
    } else {
        cut.caption.as_str()
    };
    fill_template(template, &[("caption", caption), ("body", &wrap_citations(&cut.body))])
}

/// Substitute `{name}` slots in one pass, so values are never rescanned.
pub(crate) fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let slot = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match slot {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
