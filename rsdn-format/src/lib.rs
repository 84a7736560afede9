//! Forum markup to XHTML, with grammar-driven code colorizing
//!
//!     This crate turns the bracketed markup used on the forum (`[b]`, `[q]`, `[code=cs]`,
//!     `[url=...]`, smileys, citation lines) into an XHTML fragment ready to be embedded in a
//!     page. Formatting never fails: markup that does not parse is left as literal text.
//!
//!     This is a pure lib: no I/O happens while formatting, and nothing here assumes a shell.
//!     The CLI (rsdn-cli) and the config loader (rsdn-config) sit on top of it.
//!
//! Architecture
//!
//!     The formatter (./formatter/mod.rs) is a fixed sequence of regex rewrites. Spans that later
//!     passes must not see are swapped for numbered placeholders by a [`matcher::Matcher`] and
//!     restored once the surrounding text is done. The pass order is what decides precedence
//!     between constructs, so it is kept in one place.
//!
//!     Code blocks are colorized by grammars: small XML documents listing regex fragments per
//!     lexical category (./grammar). Each grammar is compiled into one alternation with a named
//!     group per category (./colorizer.rs). The [`LanguageRegistry`] holds the compiled grammars
//!     and the code-block tag table; it is built once and shared read-only.
//!
//!     Links go through the classifier (./links), which knows the forum hosts, partner shops and
//!     a few well-known sites, and decides on rewriting, CSS classes and targets.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── escape.rs               # HTML escaping, URL encoding, script-URL detection
//!     ├── rx.rs                   # fancy-regex helpers shared by every pass
//!     ├── matcher.rs              # placeholder store
//!     ├── anchor.rs               # <a> element model
//!     ├── grammar
//!     │   ├── loader.rs           # XML grammar documents
//!     │   └── registry.rs         # languages and code-block tags
//!     ├── colorizer.rs            # compiled grammar, span rendering
//!     ├── links
//!     │   ├── uri.rs              # relaxed URI grammar
//!     │   ├── partners.rs         # affiliate parameters
//!     │   └── mod.rs              # LinkClassifier
//!     ├── formatter               # the pipeline and its passes
//!     ├── images.rs               # [img] rendering
//!     ├── resources.rs            # cut template, client script
//!     ├── host.rs                 # per-request context
//!     ├── dates.rs                # client time and date strings
//!     ├── forum.rs                # subjects, quoting, tag lists
//!     └── xhtml.rs                # reduced XHTML rendering
//!
//! Testing
//!
//!     Unit tests sit next to each pass. End to end behaviour is checked in tests/, which holds a
//!     single lib.rs including the per-area modules, plus proptest properties over random input.

pub mod anchor;
pub mod colorizer;
pub mod dates;
pub mod error;
pub mod escape;
pub mod formatter;
pub mod forum;
pub mod grammar;
pub mod host;
pub mod images;
pub mod links;
pub mod matcher;
pub mod resources;
pub mod xhtml;

pub(crate) mod rx;

pub use error::{GrammarError, ResourceError};
pub use formatter::{FormatOptions, FormatterSettings, TextFormatter};
pub use grammar::{LanguageInfo, LanguageRegistry};
pub use host::{HostContext, RequestContext};
pub use images::{DefaultImageRenderer, ImageRenderer, ImageTag};
pub use links::LinkClassifier;
pub use resources::{EmbeddedResources, ResourceProvider};

/// Format `text` with the shared bundled grammars and default settings.
pub fn format(text: &str) -> Result<String, GrammarError> {
    Ok(TextFormatter::with_defaults()?.format(text))
}
