//! Forum markup to XHTML.
//!
//!     The formatter is an ordered list of text rewrites. Spans that later
//!     passes must not touch (code, images, links, quotes, cuts) are pulled
//!     out into numbered placeholders first, the remaining text is rewritten,
//!     and the placeholders are filled with rendered HTML at fixed points.
//!     The order is load-bearing: smileys must not see URLs, line breaks must
//!     come after every block element exists, code is restored last so no
//!     pass ever runs over it.
//!
//!     Placeholder stores are created per call, so one [`TextFormatter`] can
//!     be shared between threads. Link labels are formatted recursively with
//!     a deeper placeholder namespace (`$$$img.1.0$$`), which keeps the inner
//!     run from touching placeholders of the outer one.
//!
//! Pass order
//!
//!     escape, newlines, code, img, url, bare links, q, cut + citations,
//!     restore q, smileys, ISBN, restore url / bare links / img, [#id],
//!     [email], dashes, tagline, lists, hr, KB articles, moderator, tables,
//!     headers, line breaks, emphasis, msdn, escape cancelling, restore code.

mod blocks;
mod code;
mod inline;
mod isbn;
mod quotes;
mod smiles;
mod spans;

pub use inline::{email_link, msdn_search_url, EMPHASIS_TAGS};
pub use isbn::isbn_search_url;
pub use quotes::{CITATION_START, DEFAULT_CUT_CAPTION};
pub use smiles::{Smiley, SMILEYS};

pub(crate) use blocks::{headers, MODERATOR, TAGLINE};
pub(crate) use inline::emphasis_as;
pub(crate) use quotes::CITATION_TEXT;

use crate::error::{GrammarError, ResourceError};
use crate::escape::escape_html;
use crate::grammar::LanguageRegistry;
use crate::host::HostContext;
use crate::images::{DefaultImageRenderer, ImageRenderer, ImageTag};
use crate::links::{uri, LinkClassifier, UriMatch};
use crate::matcher::Matcher;
use crate::resources::{EmbeddedResources, ResourceProvider, CUT_TEMPLATE};
use crate::rx;
use code::{CodeBlock, CodeTagPattern};
use serde::{Deserialize, Serialize};
use spans::{Slot, UrlSpan};
use std::fmt;
use std::sync::Arc;

/// Characters trimmed from both ends of a message.
pub const TRIM_CHARS: &[char] = &[' ', '\r', '\n', '\t'];

/// Settings fixed for the lifetime of a formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterSettings {
    /// Prepended to smiley image file names.
    pub image_prefix: String,
    /// Prepended to site-relative links such as `[#id]`.
    pub path_to_root: String,
    /// Host that forum links are rebased to.
    pub canonical_host: String,
    pub open_forum_links_in_new_window: bool,
}

impl Default for FormatterSettings {
    fn default() -> Self {
        FormatterSettings {
            image_prefix: String::new(),
            path_to_root: String::new(),
            canonical_host: "rsdn.ru".to_string(),
            open_forum_links_in_new_window: true,
        }
    }
}

/// Switches for a single formatting call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Replace smiley glyphs with images.
    pub smiles: bool,
    /// The input is already HTML-escaped.
    pub raw: bool,
    /// Turn bare URLs into links.
    pub implicit_links: bool,
    /// The page is served over a secure transport.
    pub secure: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            smiles: true,
            raw: false,
            implicit_links: true,
            secure: false,
        }
    }
}

impl FormatOptions {
    /// Options for a link label: already escaped, no smileys, no nested links.
    pub fn for_label(self) -> Self {
        FormatOptions {
            smiles: false,
            raw: true,
            implicit_links: false,
            secure: self.secure,
        }
    }
}

/// Converts forum markup into an XHTML fragment.
pub struct TextFormatter {
    registry: Arc<LanguageRegistry>,
    settings: FormatterSettings,
    links: LinkClassifier,
    images: Arc<dyn ImageRenderer>,
    cut_template: String,
    code_tags: CodeTagPattern,
}

impl fmt::Debug for TextFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextFormatter")
            .field("settings", &self.settings)
            .field("languages", &self.registry.languages().len())
            .finish_non_exhaustive()
    }
}

impl TextFormatter {
    pub fn new(registry: Arc<LanguageRegistry>, settings: FormatterSettings) -> Self {
        let links = LinkClassifier::new(
            settings.canonical_host.clone(),
            settings.open_forum_links_in_new_window,
        );
        let code_tags = CodeTagPattern::new(&registry);
        TextFormatter {
            registry,
            settings,
            links,
            images: Arc::new(DefaultImageRenderer),
            cut_template: EmbeddedResources::cut_template().to_string(),
            code_tags,
        }
    }

    /// Formatter over the shared bundled grammars with default settings.
    pub fn with_defaults() -> Result<Self, GrammarError> {
        Ok(TextFormatter::new(
            LanguageRegistry::shared()?,
            FormatterSettings::default(),
        ))
    }

    pub fn with_image_renderer(mut self, renderer: impl ImageRenderer + 'static) -> Self {
        self.images = Arc::new(renderer);
        self
    }

    /// Take the `[cut]` template from `provider`.
    pub fn with_resources(mut self, provider: &dyn ResourceProvider) -> Result<Self, ResourceError> {
        self.cut_template = provider.text(CUT_TEMPLATE)?;
        Ok(self)
    }

    pub fn settings(&self) -> &FormatterSettings {
        &self.settings
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn link_classifier(&self) -> &LinkClassifier {
        &self.links
    }

    /// Format with the default options.
    pub fn format(&self, text: &str) -> String {
        self.format_with(text, FormatOptions::default())
    }

    pub fn format_with(&self, text: &str, options: FormatOptions) -> String {
        self.run(text, options, 0)
    }

    /// Format for a request, taking the transport from the host.
    pub fn format_for(&self, text: &str, options: FormatOptions, host: &dyn HostContext) -> String {
        let options = FormatOptions {
            secure: host.is_secure(),
            ..options
        };
        self.format_with(text, options)
    }

    fn run(&self, text: &str, options: FormatOptions, depth: usize) -> String {
        let text = text.trim_matches(TRIM_CHARS);
        if text.is_empty() {
            return String::new();
        }

        let mut text = if options.raw {
            text.to_string()
        } else {
            escape_html(text)
        };
        text = text.replace("\r\n", "\n").replace('\r', "\n");
        if depth == 0 {
            text = spans::neutralize_placeholders(&text);
        }

        let mut code: Matcher<CodeBlock> = Matcher::new(Slot::Code.template(depth));
        text = self.code_tags.extract(&text, &mut code);

        let mut images: Matcher<ImageTag> = Matcher::new(Slot::Image.template(depth));
        text = spans::extract_images(&text, &mut images);

        let mut urls: Matcher<UrlSpan> = Matcher::new(Slot::Url.template(depth));
        text = spans::extract_urls(&text, &mut urls);

        let mut bare_links: Matcher<UriMatch> = Matcher::new(Slot::ImplicitUrl.template(depth));
        if options.implicit_links {
            text = spans::extract_implicit_urls(&text, &mut bare_links);
        }

        let mut quoted: Matcher<String> = Matcher::new(Slot::Quote.template(depth));
        text = quotes::extract_quotes(&text, &mut quoted);

        let cut_slot = Slot::Cut.template(depth);
        text = quotes::expand_cuts(&text, &self.cut_template, &cut_slot, |caption| {
            let caption = bare_links.restore(caption, |found| found.as_str().to_string());
            urls.restore(&caption, UrlSpan::plain_text)
        });
        text = quoted.restore(&text, |body| quotes::render_quote(body));

        if options.smiles {
            text = smiles::replace_smileys(&text, &self.settings.image_prefix);
        }
        text = isbn::link_isbns(&text);

        text = urls.restore(&text, |span| self.render_url(span, options, depth));
        text = bare_links.restore(&text, |found| {
            self.links
                .render_link(Some(found), found.as_str(), found.as_str(), options.secure)
        });
        text = images.restore(&text, |image| self.images.render(image));

        text = self.forum_info_links(&text);
        text = self.email_links(&text);
        text = inline::dashes(&text);
        text = blocks::taglines(&text);
        text = blocks::lists(&text);
        text = blocks::rules(&text);
        text = inline::kb_articles(&text);
        text = blocks::moderator_notes(&text);
        text = blocks::tables(&text);
        text = blocks::headers(&text);
        text = blocks::line_breaks(&text);
        text = inline::emphasis(&text);
        text = inline::msdn_links(&text);
        text = inline::cancel_escapes(&text);

        code.restore(&text, |block| code::render_block(&self.registry, block))
    }

    fn render_url(&self, span: &UrlSpan, options: FormatOptions, depth: usize) -> String {
        let (mut address, mut label) = (span.address.as_str(), span.label.as_str());
        // Arguments given the wrong way round.
        if !uri::is_well_formed(address) && !label.is_empty() && uri::is_well_formed(label) {
            std::mem::swap(&mut address, &mut label);
        }
        if address.is_empty() {
            address = label.trim();
        }
        if label.trim().is_empty() {
            label = address;
        }
        if address.is_empty() {
            return String::new();
        }

        let label_html = self.run(label, options.for_label(), depth + 1);
        if spans::carries_placeholder(address) {
            return label_html;
        }
        let matched = uri::match_url(address);
        self.links
            .render_link(matched.as_ref(), address, &label_html, options.secure)
    }

    fn forum_info_links(&self, text: &str) -> String {
        rx::replace_all(&inline::FORUM_INFO, text, |caps| {
            let id = rx::group(caps, 1);
            if spans::carries_placeholder(id) {
                return rx::group(caps, 0).to_string();
            }
            inline::forum_info_link(&self.settings.path_to_root, id)
        })
    }

    fn email_links(&self, text: &str) -> String {
        rx::replace_all(&inline::EMAIL, text, |caps| {
            let email = rx::group(caps, 1);
            if spans::carries_placeholder(email) {
                return rx::group(caps, 0).to_string();
            }
            inline::email_link(email)
        })
    }
}
