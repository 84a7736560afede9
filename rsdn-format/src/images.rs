//! `[img]` tag model and rendering.

use crate::escape::encode_uri_against_xss;
use crate::rx;
use fancy_regex::Regex;
use once_cell::sync::Lazy;

static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| rx::fixed(r#"(?i)(?<name>\w+)\s*=\s*(?<value>\w+|"\w+"|'\w+')"#));

static DIMENSION: Lazy<Regex> =
    Lazy::new(|| rx::fixed(r"(?i)^\d+(px|pt|mm|cm|in|em|rem|vh|vw|%)?$"));

const ALLOWED_ATTRIBUTES: &[&str] = &["width", "height"];

/// Size keyword accepted after `[img=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDecorator {
    Large,
    Small,
}

impl ImageDecorator {
    /// Anything outside the allow-list yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "large" => Some(ImageDecorator::Large),
            "small" => Some(ImageDecorator::Small),
            _ => None,
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            ImageDecorator::Large => "large",
            ImageDecorator::Small => "small",
        }
    }
}

/// An extracted `[img]` span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag {
    pub url: String,
    pub decorator: Option<ImageDecorator>,
    /// Validated `(name, value)` pairs, in source order.
    pub attributes: Vec<(String, String)>,
}

impl ImageTag {
    pub fn new(url: impl Into<String>) -> Self {
        ImageTag {
            url: url.into(),
            decorator: None,
            attributes: Vec::new(),
        }
    }
}

/// Turns an image tag into HTML. Installed on the formatter to customize
/// how pictures are embedded.
pub trait ImageRenderer: Send + Sync {
    fn render(&self, image: &ImageTag) -> String;
}

/// `<img border='0' src='…' />` with the decorator class and size attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultImageRenderer;

impl ImageRenderer for DefaultImageRenderer {
    fn render(&self, image: &ImageTag) -> String {
        let mut html = format!("<img border='0' src='{}'", encode_uri_against_xss(&image.url));
        if let Some(decorator) = image.decorator {
            html.push_str(&format!(" class='{}'", decorator.class()));
        }
        for (name, value) in &image.attributes {
            html.push_str(&format!(" {name}='{value}'"));
        }
        html.push_str(" />");
        html
    }
}

/// Parse `name=value` pairs from the text between `img` and `]`.
///
/// Only `width` and `height` survive, and only with a plain number
/// optionally followed by a CSS unit. Later duplicates win.
pub fn parse_image_attributes(raw: &str) -> Vec<(String, String)> {
    let mut attributes: Vec<(String, String)> = Vec::new();
    for caps in ATTRIBUTE.captures_iter(raw) {
        let Ok(caps) = caps else { break };
        let name = rx::named(&caps, "name").to_ascii_lowercase();
        if !ALLOWED_ATTRIBUTES.contains(&name.as_str()) {
            continue;
        }
        let value = rx::named(&caps, "value").trim_matches(|c| c == '"' || c == '\'');
        if !rx::is_match(&DIMENSION, value) {
            continue;
        }
        match attributes.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => attributes.push((name, value.to_string())),
        }
    }
    attributes
}
