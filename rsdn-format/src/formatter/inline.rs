//! Inline tags and small link shorthands.

use crate::anchor::HtmlAnchor;
use crate::escape::{encode_uri_against_xss, escape_html_quotes, unescape_ampersands, url_encode};
use crate::links::DEFAULT_CLASS;
use crate::rx;
use fancy_regex::Regex;
use once_cell::sync::Lazy;

/// Emphasis tags and the HTML element each becomes.
pub const EMPHASIS_TAGS: &[&str] = &["b", "i", "s", "u", "sub", "sup", "tt"];

// Inside code blocks only these four are resolved.
const CODE_EMPHASIS_TAGS: &[&str] = &["b", "i", "s", "u"];

static EMPHASIS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    EMPHASIS_TAGS
        .iter()
        .map(|tag| {
            let pattern = format!(r"(?is)(?<!\[)\[{tag}\](.*?)\[[\\/]{tag}\]");
            (*tag, rx::fixed(&pattern))
        })
        .collect()
});

static CODE_EMPHASIS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    CODE_EMPHASIS_TAGS
        .iter()
        .map(|tag| {
            let pattern = format!(r"(?is)\[{tag}\](.*?)\[[\\/]{tag}\]");
            (*tag, rx::fixed(&pattern))
        })
        .collect()
});

static ESCAPED_TAG: Lazy<Regex> = Lazy::new(|| rx::fixed(r"\[(?=\[(?=[^\s\[]+?\]))"));
static ESCAPED_SMILE: Lazy<Regex> = Lazy::new(|| rx::fixed(r":(?=:-?[\)\(\\/])"));
static ESCAPED_WINK: Lazy<Regex> = Lazy::new(|| rx::fixed(r";(?=;[-oO]?\))"));

static DASH: Lazy<Regex> = Lazy::new(|| rx::fixed(r"(?<=\s)-(?=\s)"));

static MSDN: Lazy<Regex> = Lazy::new(|| rx::fixed(r"(?i)(?<!\[)\[msdn\](.*?)\[[\\/]msdn\]"));

static KB_ARTICLE: Lazy<Regex> =
    Lazy::new(|| rx::fixed(r#"(?m)(?:^|(?<=[\s">]))([Qq]\d{5,6})(?=$|\s|[,"\.!])"#));

pub(crate) static FORUM_INFO: Lazy<Regex> = Lazy::new(|| rx::fixed(r"(?<!\[)\[#(.+?)\]"));

pub(crate) static EMAIL: Lazy<Regex> = Lazy::new(|| {
    rx::fixed(r"(?i)(?<!\[)\[email\](?:mailto:)?(\S+?@\S+?)\[[\\/]email\]")
});

const MSDN_SEARCH: &str = "http://search.microsoft.com/search/results.aspx?View=msdn&amp;c=4&amp;qu=";
const KB_URL: &str = "http://support.microsoft.com/default.aspx?scid=kb;EN-US;";

fn resolve(text: &str, rules: &[(&'static str, Regex)], element: impl Fn(&str) -> &str) -> String {
    rules.iter().fold(text.to_string(), |text, (tag, regex)| {
        let element = element(tag);
        rx::wrap_group(regex, &text, &format!("<{element}>"), &format!("</{element}>"))
    })
}

/// `[b]` → `<b>` and friends, honouring `[[b]` escapes.
pub(crate) fn emphasis(text: &str) -> String {
    resolve(text, &EMPHASIS, |tag| tag)
}

/// [`emphasis`] with the element for each tag chosen by `element`.
pub(crate) fn emphasis_as(text: &str, element: impl Fn(&str) -> &str) -> String {
    resolve(text, &EMPHASIS, element)
}

/// `[b] [i] [s] [u]` inside a code block, where there are no escapes.
pub(crate) fn code_emphasis(text: &str) -> String {
    resolve(text, &CODE_EMPHASIS, |tag| tag)
}

/// Drop the extra character of `[[tag]`, `::-)` and `;;)` escapes.
pub(crate) fn cancel_escapes(text: &str) -> String {
    let text = rx::replace_with(&ESCAPED_TAG, text, "");
    let text = rx::replace_with(&ESCAPED_SMILE, &text, "");
    rx::replace_with(&ESCAPED_WINK, &text, "")
}

pub(crate) fn dashes(text: &str) -> String {
    rx::replace_with(&DASH, text, "&mdash;")
}

/// MSDN search URL for `keyword`.
pub fn msdn_search_url(keyword: &str) -> String {
    format!("{MSDN_SEARCH}{}", url_encode(&unescape_ampersands(keyword)))
}

pub(crate) fn msdn_links(text: &str) -> String {
    rx::replace_all(&MSDN, text, |caps| {
        let keyword = rx::group(caps, 1);
        format!(
            "<a target='_blank' class='{DEFAULT_CLASS}' href='{}'>{keyword}</a>",
            msdn_search_url(keyword)
        )
    })
}

pub(crate) fn kb_articles(text: &str) -> String {
    rx::replace_all(&KB_ARTICLE, text, |caps| {
        let article = rx::group(caps, 1);
        format!("<a target='_blank' class='{DEFAULT_CLASS}' href='{KB_URL}{article}'>{article}</a>")
    })
}

/// `[#id]` → link to the forum info page of `id`.
pub(crate) fn forum_info_link(path_to_root: &str, id: &str) -> String {
    let mut anchor = HtmlAnchor::new();
    anchor.set_target("_blank");
    anchor.set_href(format!("{path_to_root}/Forum/Info/{id}.aspx"));
    anchor.add_class(DEFAULT_CLASS);
    anchor.set_inner_text(id);
    anchor.render()
}

/// `mailto:` link for `email`.
pub fn email_link(email: &str) -> String {
    format!(
        "<a class='{DEFAULT_CLASS}' href='mailto:{}'>{}</a>",
        encode_uri_against_xss(email),
        escape_html_quotes(email)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis() {
        assert_eq!(
            emphasis("[b]x[/b] [i]y[\\i] [sub]2[/sub] [tt]t[/tt]"),
            "<b>x</b> <i>y</i> <sub>2</sub> <tt>t</tt>"
        );
    }

    #[test]
    fn test_escaped_emphasis_survives_until_cancel() {
        let text = emphasis("[[b]x[/b]");
        assert_eq!(text, "[[b]x[/b]");
        assert_eq!(cancel_escapes(&text), "[b]x[/b]");
    }

    #[test]
    fn test_emphasis_as() {
        let out = emphasis_as("[b]x[/b][i]y[/i]", |tag| match tag {
            "b" => "strong",
            "i" => "em",
            other => other,
        });
        assert_eq!(out, "<strong>x</strong><em>y</em>");
    }

    #[test]
    fn test_cancel_escaped_smiles() {
        assert_eq!(cancel_escapes("::-) ;;) [[tag] [[ x]"), ":-) ;) [tag] [[ x]");
    }

    #[test]
    fn test_dash_between_spaces_only() {
        assert_eq!(dashes("a - b a-b -c"), "a &mdash; b a-b -c");
    }

    #[test]
    fn test_msdn_link() {
        assert_eq!(
            msdn_links("[msdn]CreateFile A[/msdn]"),
            "<a target='_blank' class='m' href='http://search.microsoft.com/search/results.aspx?View=msdn&amp;c=4&amp;qu=CreateFile+A'>CreateFile A</a>"
        );
    }

    #[test]
    fn test_kb_article() {
        assert_eq!(
            kb_articles("see Q123456, or xQ12345"),
            "see <a target='_blank' class='m' href='http://support.microsoft.com/default.aspx?scid=kb;EN-US;Q123456'>Q123456</a>, or xQ12345"
        );
    }

    #[test]
    fn test_forum_info_link() {
        assert_eq!(
            forum_info_link("/root", "nick"),
            r#"<a target="_blank" href="/root/Forum/Info/nick.aspx" class="m">nick</a>"#
        );
    }

    #[test]
    fn test_email_link() {
        assert_eq!(
            email_link("a b@x.ru"),
            "<a class='m' href='mailto:a%20b@x.ru'>a b@x.ru</a>"
        );
    }
}
