//! ISBN detection.

use crate::rx;
use fancy_regex::Regex;
use once_cell::sync::Lazy;

const SEARCH_URL: &str = "http://findbook.ru/search/?isbn=";

// Partner ids of the book shops the search page forwards to.
const SEARCH_PARTNERS: &str =
    "&amp;ozon=rsdn&amp;bolero=rsdnru&amp;biblion=791&amp;booksru=rsdn&amp;zonex=248&amp;piter=3600&amp;myshop=00776";

// With an `ISBN` prefix the separators are optional. A bare number needs a
// separator between every group.
static ISBN: Lazy<Regex> = Lazy::new(|| {
    rx::fixed(concat!(
        r"(?i)ISBN(?:\s*:)?\s*(?:97[89][\s-]?)?",
        r"(?P<a1>\d{1,5})[\s-]?(?P<a2>\d{1,7})[\s-]?(?P<a3>\d{1,6})[\s-]?(?P<a4>\d|X)(?!\d)",
        r"|\b(?:97[89][\s-])?",
        r"(?P<b1>\d{1,5})[\s-](?P<b2>\d{1,7})[\s-](?P<b3>\d{1,6})[\s-](?P<b4>\d|X)(?!\d)",
    ))
});

/// Link to the book search for hyphenated `isbn`.
pub fn isbn_search_url(isbn: &str) -> String {
    format!("{SEARCH_URL}{isbn}{SEARCH_PARTNERS}")
}

pub(crate) fn link_isbns(text: &str) -> String {
    rx::replace_all(&ISBN, text, |caps| {
        let prefix = if caps.name("a1").is_some() { "a" } else { "b" };
        let isbn = (1..=4)
            .map(|i| rx::named(caps, &format!("{prefix}{i}")))
            .collect::<Vec<_>>()
            .join("-");
        format!(
            "<a target=\"_blank\" href=\"{}\">{}</a>",
            isbn_search_url(&isbn),
            rx::group(caps, 0)
        )
    })
}
