//! Render model for a single `<a>` element.

use crate::escape::{encode_attribute, escape_html};

/// An anchor under construction. Attributes render in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlAnchor {
    attributes: Vec<(String, String)>,
    inner_html: Option<String>,
    inner_text: Option<String>,
}

impl HtmlAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor with `href` as its first attribute.
    pub fn with_href(href: impl Into<String>) -> Self {
        let mut anchor = Self::new();
        anchor.set_href(href);
        anchor
    }

    /// Set an attribute, keeping its original position when it already exists.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn href(&self) -> &str {
        self.attribute("href").unwrap_or("")
    }

    pub fn set_href(&mut self, href: impl Into<String>) {
        self.set_attribute("href", href);
    }

    pub fn set_target(&mut self, target: &str) {
        self.set_attribute("target", target);
    }

    /// Append a class token; existing tokens are kept.
    pub fn add_class(&mut self, class: &str) {
        let merged = match self.attribute("class") {
            Some(existing) if existing.split_whitespace().any(|c| c == class) => return,
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attribute("class", merged);
    }

    /// Markup placed inside the element as is. Takes precedence over text.
    pub fn set_inner_html(&mut self, html: impl Into<String>) {
        self.inner_html = Some(html.into());
    }

    /// Text placed inside the element, HTML-escaped on render.
    pub fn set_inner_text(&mut self, text: impl Into<String>) {
        self.inner_text = Some(text.into());
    }

    pub fn render(&self) -> String {
        let mut out = String::from("<a");
        for (name, value) in &self.attributes {
            out.push_str(&format!(" {name}=\"{}\"", encode_attribute(value)));
        }
        out.push('>');
        match (&self.inner_html, &self.inner_text) {
            (Some(html), _) => out.push_str(html),
            (None, Some(text)) => out.push_str(&escape_html(text)),
            (None, None) => {}
        }
        out.push_str("</a>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_order_is_insertion_order() {
        let mut anchor = HtmlAnchor::new();
        anchor.set_target("_blank");
        anchor.set_href("http://x.com/");
        anchor.add_class("m");
        anchor.set_inner_text("x");
        assert_eq!(
            anchor.render(),
            r#"<a target="_blank" href="http://x.com/" class="m">x</a>"#
        );
    }

    #[test]
    fn test_add_class_is_additive() {
        let mut anchor = HtmlAnchor::with_href("/");
        anchor.add_class("wiki");
        anchor.add_class("m");
        anchor.add_class("m");
        assert_eq!(anchor.attribute("class"), Some("wiki m"));
    }

    #[test]
    fn test_inner_html_wins_over_text() {
        let mut anchor = HtmlAnchor::with_href("/a?b=1&c=2");
        anchor.set_inner_text("<text>");
        assert_eq!(anchor.render(), r#"<a href="/a?b=1&amp;c=2">&lt;text&gt;</a>"#);
        anchor.set_inner_html("<b>x</b>");
        assert_eq!(anchor.render(), r#"<a href="/a?b=1&amp;c=2"><b>x</b></a>"#);
    }

    #[test]
    fn test_set_attribute_keeps_position() {
        let mut anchor = HtmlAnchor::with_href("/a");
        anchor.set_target("_self");
        anchor.set_href("/b");
        assert_eq!(anchor.render(), r#"<a href="/b" target="_self"></a>"#);
    }
}
