//! Static resources the formatter output depends on.
//!
//! The `[cut]` snippet is a template read from a [`ResourceProvider`], so a
//! host can swap the markup without touching the pipeline. The default
//! provider serves the files bundled into the crate.

use crate::error::ResourceError;
use std::borrow::Cow;
use std::path::Path;

/// Name of the collapsible section template. Holds `{caption}` and `{body}`.
pub const CUT_TEMPLATE: &str = "cut.html";

/// Name of the client script toggling collapsible sections.
pub const CLIENT_SCRIPT: &str = "formatter.js";

const BUNDLED: &[(&str, &str)] = &[
    (CUT_TEMPLATE, include_str!("../resources/cut.html")),
    (CLIENT_SCRIPT, include_str!("../resources/formatter.js")),
];

/// Content classification derived from the resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Unknown,
    Css,
    Html,
    JavaScript,
    VbScript,
    Gif,
    Jpeg,
    Png,
}

impl ResourceKind {
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "css" => ResourceKind::Css,
            "htm" | "html" => ResourceKind::Html,
            "js" => ResourceKind::JavaScript,
            "vbs" => ResourceKind::VbScript,
            "gif" => ResourceKind::Gif,
            "jpg" | "jpeg" => ResourceKind::Jpeg,
            "png" => ResourceKind::Png,
            _ => ResourceKind::Unknown,
        }
    }

    pub fn content_type(self) -> Option<&'static str> {
        match self {
            ResourceKind::Unknown => None,
            ResourceKind::Css => Some("text/css"),
            ResourceKind::Html => Some("text/html"),
            ResourceKind::JavaScript => Some("text/javascript"),
            ResourceKind::VbScript => Some("text/vbscript"),
            ResourceKind::Gif => Some("image/gif"),
            ResourceKind::Jpeg => Some("image/jpeg"),
            ResourceKind::Png => Some("image/png"),
        }
    }

    pub fn is_binary(self) -> bool {
        matches!(self, ResourceKind::Gif | ResourceKind::Jpeg | ResourceKind::Png)
    }
}

/// A named blob together with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    name: String,
    kind: ResourceKind,
    data: Cow<'static, [u8]>,
}

impl Resource {
    pub fn new(name: impl Into<String>, data: impl Into<Cow<'static, [u8]>>) -> Self {
        let name = name.into();
        Resource {
            kind: ResourceKind::from_name(&name),
            name,
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// The content as UTF-8. Binary kinds are rejected even when the bytes
    /// happen to decode.
    pub fn text(&self) -> Result<&str, ResourceError> {
        if self.kind.is_binary() {
            return Err(ResourceError::NotText(self.name.clone()));
        }
        std::str::from_utf8(&self.data).map_err(|_| ResourceError::NotText(self.name.clone()))
    }
}

/// Source of named resources. Lookups are case-insensitive.
pub trait ResourceProvider: Send + Sync {
    fn resource(&self, name: &str) -> Result<Resource, ResourceError>;

    fn text(&self, name: &str) -> Result<String, ResourceError> {
        self.resource(name)?.text().map(str::to_string)
    }
}

/// Resources compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedResources;

impl EmbeddedResources {
    /// The bundled `[cut]` template.
    pub fn cut_template() -> &'static str {
        BUNDLED[0].1
    }

    /// The bundled client script with the image base substituted.
    pub fn client_script(image_prefix: &str) -> String {
        BUNDLED[1].1.replace("%URL%", image_prefix)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        BUNDLED.iter().map(|(name, _)| *name)
    }
}

impl ResourceProvider for EmbeddedResources {
    fn resource(&self, name: &str) -> Result<Resource, ResourceError> {
        BUNDLED
            .iter()
            .find(|(bundled, _)| bundled.eq_ignore_ascii_case(name))
            .map(|(bundled, text)| Resource::new(*bundled, text.as_bytes()))
            .ok_or_else(|| ResourceError::NotFound(name.to_string()))
    }
}
