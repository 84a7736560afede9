//! Spans pulled out of the text before the other passes run: `[img]`,
//! `[url]`/`[purl]` and bare links.

use crate::escape::is_script_url;
use crate::images::{parse_image_attributes, ImageDecorator, ImageTag};
use crate::links::uri;
use crate::links::UriMatch;
use crate::matcher::Matcher;
use crate::rx;
use fancy_regex::Regex;
use once_cell::sync::Lazy;

/// What a user-typed `$` turns into.
pub(crate) const DOLLAR: &str = "&#36;";

/// Kinds of placeholder the pipeline leaves in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Code,
    Image,
    Url,
    ImplicitUrl,
    Quote,
    Cut,
}

impl Slot {
    fn name(self) -> &'static str {
        match self {
            Slot::Code => "code",
            Slot::Image => "img",
            Slot::Url => "url",
            Slot::ImplicitUrl => "iurl",
            Slot::Quote => "quote",
            Slot::Cut => "cut",
        }
    }

    /// Placeholder template for this slot at nesting `depth`. Nested runs
    /// get their own namespace so they never fill an outer placeholder.
    ///
    /// Three dollars open a placeholder and two close it. With every typed
    /// `$` encoded, a closing run followed by text never reads as an opening.
    pub fn template(self, depth: usize) -> String {
        if depth == 0 {
            format!("$$${}{{0}}$$", self.name())
        } else {
            format!("$$${}.{depth}.{{0}}$$", self.name())
        }
    }
}

static PLACEHOLDER: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"\$\$\$(?:code|img|url|iurl|quote|cut)(?:\.\d+\.)?\d+\$\$")
        .unwrap_or_else(|err| panic!("invalid built-in pattern: {err}"))
});

fn url_alternative(tag: &str, prefix: &str) -> String {
    format!(
        r#"{tag}(?:=\s*(?:"\s*(?P<{prefix}quoted>[^"]*?)\s*"|(?P<{prefix}address>[^\]]*?))\s*)?\](?P<{prefix}label>(?s:.*?))\[/{tag}\]"#
    )
}

static URL_TAG: Lazy<Regex> = Lazy::new(|| {
    rx::fixed(&format!(
        r"(?i)(?<!\[)\[(?:{}|{})",
        url_alternative("purl", "p"),
        url_alternative("url", "u")
    ))
});

// The atomic group keeps leading blanks from being given back to the URL,
// which would let ` javascript:` slip past the scheme check.
static IMAGE_TAG: Lazy<Regex> = Lazy::new(|| {
    rx::fixed(concat!(
        r"(?i)(?<!\[)\[img(?:=(?P<decorator>\w+))?",
        r#"(?P<attrs>(?:\s+\w+\s*=\s*(?:\w+|"\w+"|'\w+'))*)\s*\]"#,
        r"(?>\s*)(?!(?:javascript|vbscript|jscript):)(?P<url>.*?)\s*\[[\\/]img\]",
    ))
});

/// An `[url]` or `[purl]` span as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UrlSpan {
    pub address: String,
    pub label: String,
}

impl UrlSpan {
    /// The span as bare text: its label, or the address when unlabeled.
    pub fn plain_text(&self) -> String {
        if self.label.trim().is_empty() {
            self.address.clone()
        } else {
            self.label.clone()
        }
    }
}

/// Whether `text` holds something shaped like a pipeline placeholder.
pub(crate) fn carries_placeholder(text: &str) -> bool {
    PLACEHOLDER.is_match(text)
}

/// Encode every `$` typed by the user as `&#36;`, so the only dollar signs
/// left in the text belong to placeholders. Browsers render both the same.
pub(crate) fn neutralize_placeholders(text: &str) -> String {
    text.replace('$', DOLLAR)
}

pub(crate) fn extract_images(text: &str, images: &mut Matcher<ImageTag>) -> String {
    rx::replace_all(&IMAGE_TAG, text, |caps| {
        let url = rx::named(caps, "url");
        if url.is_empty() || is_script_url(url) || carries_placeholder(url) {
            return rx::group(caps, 0).to_string();
        }
        images.push(ImageTag {
            url: url.to_string(),
            decorator: ImageDecorator::parse(rx::named(caps, "decorator")),
            attributes: parse_image_attributes(rx::named(caps, "attrs")),
        })
    })
}

pub(crate) fn extract_urls(text: &str, urls: &mut Matcher<UrlSpan>) -> String {
    rx::replace_all(&URL_TAG, text, |caps| {
        let prefix = if caps.name("plabel").is_some() { "p" } else { "u" };
        let quoted = rx::named(caps, &format!("{prefix}quoted"));
        let address = if quoted.is_empty() {
            rx::named(caps, &format!("{prefix}address"))
        } else {
            quoted
        };
        urls.push(UrlSpan {
            address: address.trim().to_string(),
            label: rx::named(caps, &format!("{prefix}label")).to_string(),
        })
    })
}

pub(crate) fn extract_implicit_urls(text: &str, links: &mut Matcher<UriMatch>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (range, found) in uri::find_urls(text) {
        // Placeholders hold the only dollar signs left, and a link stops
        // before them.
        let (range, found) = match found.as_str().find('$') {
            None => (range, found),
            Some(cut) => {
                let head = &text[range.start..range.start + cut];
                match uri::find_urls(head).into_iter().find(|(r, _)| r.start == 0) {
                    Some((r, found)) => (range.start..range.start + r.end, found),
                    None => continue,
                }
            }
        };
        out.push_str(&text[last..range.start]);
        out.push_str(&links.push(found));
        last = range.end;
    }
    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::ImageDecorator;

    #[test]
    fn test_templates() {
        assert_eq!(Slot::Code.template(0), "$$$code{0}$$");
        assert_eq!(Slot::ImplicitUrl.template(2), "$$$iurl.2.{0}$$");
        assert!(carries_placeholder("x $$$iurl.2.7$$ y"));
        assert!(!carries_placeholder("$$$code$$"));
        assert!(!carries_placeholder("$$code1$$"));
    }

    #[test]
    fn test_neutralize() {
        assert_eq!(
            neutralize_placeholders("a $$url3$$ b $5"),
            "a &#36;&#36;url3&#36;&#36; b &#36;5"
        );
    }

    #[test]
    fn test_url_forms() {
        let mut urls = Matcher::new("$$url{0}$$");
        let text = extract_urls(
            "[url=http://a.com]A[/url] [URL=\" http://b.com \"]B[/url] [purl]c.com[/purl]",
            &mut urls,
        );
        assert_eq!(text, "$$url0$$ $$url1$$ $$url2$$");
        assert_eq!(urls[0], UrlSpan { address: "http://a.com".into(), label: "A".into() });
        assert_eq!(urls[1], UrlSpan { address: "http://b.com".into(), label: "B".into() });
        assert_eq!(urls[2], UrlSpan { address: "".into(), label: "c.com".into() });
    }

    #[test]
    fn test_url_close_tag_must_match() {
        let mut urls = Matcher::new("$$url{0}$$");
        assert_eq!(extract_urls("[url]x[/purl]", &mut urls), "[url]x[/purl]");
    }

    #[test]
    fn test_image_with_decorator_and_size() {
        let mut images = Matcher::new("$$img{0}$$");
        let text = extract_images("[img=small width=10]  /a.png [/img]", &mut images);
        assert_eq!(text, "$$img0$$");
        assert_eq!(images[0].url, "/a.png");
        assert_eq!(images[0].decorator, Some(ImageDecorator::Small));
        assert_eq!(images[0].attributes, vec![("width".to_string(), "10".to_string())]);
    }

    #[test]
    fn test_script_images_stay_literal() {
        let mut images = Matcher::new("$$img{0}$$");
        for text in [
            "[img]javascript:alert(1)[/img]",
            "[img]  VBScript:x[/img]",
            "[img]&#106;avascript:x[/img]",
        ] {
            assert_eq!(extract_images(text, &mut images), text);
        }
        assert!(images.is_empty());
    }

    #[test]
    fn test_implicit_urls() {
        let mut links = Matcher::new("$$iurl{0}$$");
        let text = extract_implicit_urls("go to www.rsdn.ru, now", &mut links);
        assert_eq!(text, "go to $$iurl0$$, now");
        assert_eq!(links[0].as_str(), "www.rsdn.ru");
    }

    #[test]
    fn test_implicit_url_stops_at_placeholder() {
        let mut links = Matcher::new(Slot::ImplicitUrl.template(0));
        let text = extract_implicit_urls("http://x.com/$$$img0$$ and $$$code1$$", &mut links);
        assert_eq!(text, "$$$iurl0$$$$$img0$$ and $$$code1$$");
        assert_eq!(links[0].as_str(), "http://x.com/");
        assert_eq!(links.len(), 1);
    }
}
