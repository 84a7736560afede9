//! Affiliate rewriting for shop links.

use crate::escape::{unescape_ampersands, url_decode, url_encode};
use once_cell::sync::Lazy;
use regex::Regex;
use url::form_urlencoded;
use url::Url;

/// Query parameter a partner host expects, and the value identifying us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartnerLinkRule {
    pub host: &'static str,
    pub query_parameter: &'static str,
    pub partner_id: &'static str,
}

const fn rule(
    host: &'static str,
    query_parameter: &'static str,
    partner_id: &'static str,
) -> PartnerLinkRule {
    PartnerLinkRule {
        host,
        query_parameter,
        partner_id,
    }
}

pub const PARTNERS: &[PartnerLinkRule] = &[
    rule("ozon.ru", "partner", "rsdn"),
    rule("www.ozon.ru", "partner", "rsdn"),
    rule("books.ru", "partner", "rsdn"),
    rule("www.books.ru", "partner", "rsdn"),
    rule("bolero.ru", "partner", "rsdnru"),
    rule("www.bolero.ru", "partner", "rsdnru"),
    rule("piter.com", "refer", "3600"),
    rule("www.piter.com", "refer", "3600"),
    rule("shop.piter.com", "refer", "3600"),
    rule("my-shop.ru", "partner", "00776"),
    rule("www.my-shop.ru", "partner", "00776"),
    rule("biblion.ru", "pid", "791"),
    rule("www.biblion.ru", "pid", "791"),
    rule("zone-x.ru", "Partner", "248"),
    rule("www.zone-x.ru", "Partner", "248"),
];

/// Hosts whose anonymous query value (`?123`) is really an `id`.
pub const ANONYMOUS_ID_HOSTS: &[&str] = &["piter.com", "www.piter.com", "shop.piter.com"];

const AMAZON_REDIRECT: &str = "http://www.amazon.com/exec/obidos/redirect?link_code=ur2&camp=1789&tag=russiansoftwa-20&creative=9325&path=";
const AMAZON_DIRECT: &str = "http://www.amazon.com/exec/obidos/redirect?link_code=as2&path=ASIN/{asin}&tag=russiansoftwa-20&camp=1789&creative=9325";
const AMAZON_PATH_PREFIX: &str = "/exec/obidos/";

static ASIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)gp/product/(?P<a>\d+)|detail/-/(?P<b>\d+)/|obidos/ASIN/(?P<c>\d+)")
        .unwrap_or_else(|err| panic!("invalid ASIN pattern: {err}"))
});

pub fn partner_for_host(host: &str) -> Option<&'static PartnerLinkRule> {
    PARTNERS.iter().find(|r| r.host.eq_ignore_ascii_case(host))
}

/// Set the partner parameter on `href`, replacing an existing value.
/// Returns `None` when `href` is not an absolute URL.
pub fn apply_partner(rule: &PartnerLinkRule, href: &str) -> Option<String> {
    let mut url = Url::parse(&unescape_ampersands(href)).ok()?;
    let mut replaced = false;
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            if key.eq_ignore_ascii_case(rule.query_parameter) {
                replaced = true;
                (key.into_owned(), rule.partner_id.to_string())
            } else {
                (key.into_owned(), value.into_owned())
            }
        })
        .collect();
    if !replaced {
        pairs.push((rule.query_parameter.to_string(), rule.partner_id.to_string()));
    }
    url.query_pairs_mut().clear().extend_pairs(pairs);
    Some(url.to_string())
}

/// Turn the first query segment without `=` into `name=value`.
pub fn promote_anonymous_parameter(href: &str, name: &str) -> Option<String> {
    let mut url = Url::parse(&unescape_ampersands(href)).ok()?;
    let query = url.query()?.to_string();

    let mut anonymous = None;
    let mut named = Vec::new();
    for segment in query.split('&').filter(|s| !s.is_empty()) {
        if anonymous.is_none() && !segment.contains('=') {
            anonymous = Some(url_decode(segment));
        } else {
            named.push(segment);
        }
    }
    let value = anonymous?;

    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(named.join("&").as_bytes())
        .into_owned()
        .collect();
    pairs.push((name.to_string(), value));
    url.query_pairs_mut().clear().extend_pairs(pairs);
    Some(url.to_string())
}

/// Route an Amazon link through the associate program.
pub fn amazon_link(href: &str) -> String {
    let raw = unescape_ampersands(href);
    if let Some(caps) = ASIN.captures(&url_decode(&raw)) {
        let asin = ["a", "b", "c"]
            .iter()
            .find_map(|name| caps.name(name))
            .map_or("", |m| m.as_str());
        return AMAZON_DIRECT.replace("{asin}", asin);
    }

    let path_and_query = Url::parse(&raw).ok().map(|url| match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    });
    match path_and_query
        .as_deref()
        .and_then(|p| p.strip_prefix(AMAZON_PATH_PREFIX))
    {
        Some(rest) => format!("{AMAZON_REDIRECT}{rest}"),
        None => format!("{AMAZON_REDIRECT}{}", url_encode(&raw)),
    }
}
