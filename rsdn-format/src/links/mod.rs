//! Link recognition and rewriting.
//!
//! [`uri`] finds and validates URLs; [`LinkClassifier`] decides how each one
//! is rendered. Dispatch runs over closed sets of rules: first by scheme
//! ([`SchemeRule`]), then by host ([`HostRule`]). A rule that fully handles
//! the link stops processing; otherwise the default treatment applies (CSS
//! class `m`, opened in a new browsing context).

pub mod partners;
pub mod uri;

use crate::anchor::HtmlAnchor;
use crate::escape::{encode_uri_against_xss, is_script_url};
use once_cell::sync::Lazy;
use partners::PartnerLinkRule;
use regex::Regex;
pub use uri::UriMatch;

/// Class added to every link the formatter renders.
pub const DEFAULT_CLASS: &str = "m";

/// Host names of the forum itself.
pub const FORUM_HOSTS: &[&str] = &[
    "rsdn.ru",
    "www.rsdn.ru",
    "rsdn.rsdn.ru",
    "rsdn3.rsdn.ru",
    "gzip.rsdn.ru",
];

const SVN_HOST: &str = "svn.rsdn.ru";

/// Domain suffixes of well-known sites and the class their links get.
pub const THIRD_PARTY_HOSTS: &[(&str, &str)] = &[
    ("wikipedia.org", "wiki"),
    ("github.com", "github"),
    ("stackoverflow.com", "so"),
    ("youtube.com", "youtube"),
];

static MSDN_GUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-fA-F\d]{8}-(?:[a-fA-F\d]{4}-){3}[a-fA-F\d]{12}")
        .unwrap_or_else(|err| panic!("invalid GUID pattern: {err}"))
});
static MSDN_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?P<before>.*)/(?P<section>\w+)/html/$")
        .unwrap_or_else(|err| panic!("invalid section pattern: {err}"))
});
static VS2005_COLLECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)MS.VisualStudio.v80.en$")
        .unwrap_or_else(|err| panic!("invalid collection pattern: {err}"))
});

/// Scheme-specific handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeRule {
    /// Local help collection links, resolved to online MSDN pages.
    MsHelp,
}

impl SchemeRule {
    pub fn for_scheme(scheme: &str) -> Option<Self> {
        if scheme.eq_ignore_ascii_case("ms-help") {
            Some(SchemeRule::MsHelp)
        } else {
            None
        }
    }
}

/// Host-specific handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRule {
    /// The forum's own hosts: rebased onto the canonical host.
    Forum,
    Amazon,
    /// Shop taking a partner query parameter.
    Partner(&'static PartnerLinkRule),
    /// Shop whose anonymous query value must become `id` first.
    PartnerWithAnonymousId(&'static PartnerLinkRule),
    /// Known site tagged with an extra class.
    ThirdParty(&'static str),
}

impl HostRule {
    pub fn for_host(host: &str) -> Option<Self> {
        if FORUM_HOSTS.iter().any(|h| h.eq_ignore_ascii_case(host)) {
            return Some(HostRule::Forum);
        }
        if host.eq_ignore_ascii_case("amazon.com") || host.eq_ignore_ascii_case("www.amazon.com") {
            return Some(HostRule::Amazon);
        }
        if let Some(rule) = partners::partner_for_host(host) {
            let anonymous = partners::ANONYMOUS_ID_HOSTS
                .iter()
                .any(|h| h.eq_ignore_ascii_case(host));
            return Some(if anonymous {
                HostRule::PartnerWithAnonymousId(rule)
            } else {
                HostRule::Partner(rule)
            });
        }
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        THIRD_PARTY_HOSTS
            .iter()
            .find(|&&(suffix, _)| {
                host == *suffix
                    || host
                        .strip_suffix(suffix)
                        .is_some_and(|rest| rest.ends_with('.'))
            })
            .map(|&(_, class)| HostRule::ThirdParty(class))
    }
}

/// Decides the final form of every rendered link.
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    canonical_host: String,
    open_forum_links_in_new_window: bool,
}

impl LinkClassifier {
    pub fn new(canonical_host: impl Into<String>, open_forum_links_in_new_window: bool) -> Self {
        LinkClassifier {
            canonical_host: canonical_host.into(),
            open_forum_links_in_new_window,
        }
    }

    pub fn canonical_host(&self) -> &str {
        &self.canonical_host
    }

    /// Apply scheme and host rules to `anchor`. Returns `true` when a rule
    /// handled the link completely and the default treatment must be skipped.
    pub fn classify(&self, uri: &UriMatch, anchor: &mut HtmlAnchor, secure: bool) -> bool {
        if let Some(rule) = uri.scheme().and_then(SchemeRule::for_scheme) {
            if self.apply_scheme_rule(rule, uri, anchor) {
                return true;
            }
        }
        match uri.hostname().and_then(HostRule::for_host) {
            Some(rule) => self.apply_host_rule(rule, uri, anchor, secure),
            None => false,
        }
    }

    /// Render an anchor for `address` labelled with `label_html`.
    ///
    /// `uri` is the grammar match for `address`, if it matched; unmatched
    /// addresses are only encoded. Script URLs render the label alone.
    pub fn render_link(
        &self,
        uri: Option<&UriMatch>,
        address: &str,
        label_html: &str,
        secure: bool,
    ) -> String {
        if is_script_url(address) {
            return label_html.to_string();
        }
        let mut anchor = HtmlAnchor::with_href(encode_uri_against_xss(address));
        anchor.set_inner_html(label_html);

        let mut handled = false;
        if let Some(uri) = uri {
            if uri.scheme().is_none() {
                let href = format!("http://{}", anchor.href());
                anchor.set_href(href);
            }
            handled = self.classify(uri, &mut anchor, secure);
        }
        if !handled {
            anchor.add_class(DEFAULT_CLASS);
            anchor.set_target("_blank");
        }
        anchor.render()
    }

    fn apply_scheme_rule(&self, rule: SchemeRule, uri: &UriMatch, anchor: &mut HtmlAnchor) -> bool {
        match rule {
            SchemeRule::MsHelp => {
                if let Some(href) = msdn_link(uri.as_str()) {
                    anchor.set_href(href);
                }
                false
            }
        }
    }

    fn apply_host_rule(
        &self,
        rule: HostRule,
        uri: &UriMatch,
        anchor: &mut HtmlAnchor,
        secure: bool,
    ) -> bool {
        match rule {
            HostRule::Forum => {
                self.rebase_forum_link(uri, anchor, secure);
                true
            }
            HostRule::Amazon => {
                let href = partners::amazon_link(anchor.href());
                anchor.set_href(href);
                false
            }
            HostRule::Partner(partner) => {
                if let Some(href) = partners::apply_partner(partner, anchor.href()) {
                    anchor.set_href(href);
                }
                false
            }
            HostRule::PartnerWithAnonymousId(partner) => {
                if let Some(href) = partners::promote_anonymous_parameter(anchor.href(), "id") {
                    anchor.set_href(href);
                }
                self.apply_host_rule(HostRule::Partner(partner), uri, anchor, secure)
            }
            HostRule::ThirdParty(class) => {
                anchor.add_class(class);
                false
            }
        }
    }

    fn rebase_forum_link(&self, uri: &UriMatch, anchor: &mut HtmlAnchor, secure: bool) {
        let original_scheme = uri.scheme().unwrap_or("http");
        let new_host = match original_scheme.to_ascii_lowercase().as_str() {
            "svn" => Some(SVN_HOST),
            "http" | "https" => Some(self.canonical_host.as_str()),
            _ => None,
        };

        if let (Some(host), Some(host_range)) = (new_host, uri.hostname_range()) {
            let value = uri.as_str();
            let scheme = if secure { "https" } else { original_scheme };
            let (separator, between) = match uri.scheme_range() {
                Some(scheme_range) => ("", &value[scheme_range.end..host_range.start]),
                None => ("://", &value[..host_range.start]),
            };
            anchor.set_href(encode_uri_against_xss(&format!(
                "{scheme}{separator}{between}{host}{}",
                &value[host_range.end..]
            )));
        }

        anchor.add_class(DEFAULT_CLASS);
        if self.open_forum_links_in_new_window {
            anchor.set_target("_blank");
        }
    }
}

/// Online MSDN page for a help-collection URL carrying a topic GUID.
fn msdn_link(value: &str) -> Option<String> {
    let guid = MSDN_GUID.find(value)?;
    let section = MSDN_SECTION
        .captures(&value[..guid.start()])
        .filter(|caps| !VS2005_COLLECTION.is_match(&caps["before"]))
        .map(|caps| caps["section"].to_string());
    Some(match section {
        Some(section) => format!(
            "http://msdn.microsoft.com/library/en-us/{section}/html/{}.asp",
            guid.as_str()
        ),
        None => format!("http://msdn2.microsoft.com/{}.aspx", guid.as_str()),
    })
}
