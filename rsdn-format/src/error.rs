//! Error types for grammar loading and registry construction.
//!
//! All of these are startup-time failures. Formatting itself never fails:
//! anything that does not parse is left in the output as literal text.

use thiserror::Error;

/// Errors raised while loading language grammars or building the registry.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// The grammar document is not well-formed XML.
    #[error("grammar '{source_name}' is not valid XML: {source}")]
    Xml {
        source_name: String,
        #[source]
        source: roxmltree::Error,
    },

    /// The document root is not a `<language>` element.
    #[error("grammar '{source_name}' has root element <{found}>, expected <language>")]
    InvalidRoot { source_name: String, found: String },

    /// The `<language>` element has no `name` attribute.
    #[error("grammar '{source_name}' has no language name")]
    MissingLanguageName { source_name: String },

    /// A `<pattern>` element has no `name` attribute.
    #[error("grammar '{language}' has a pattern group without a name (group #{index})")]
    MissingGroupName { language: String, index: usize },

    /// A pattern group name cannot be used as a capture group identifier.
    #[error("grammar '{language}' has an invalid pattern group name '{group}'")]
    InvalidGroupName { language: String, group: String },

    /// Two pattern groups of one grammar share a name.
    #[error("grammar '{language}' declares pattern group '{group}' twice")]
    DuplicateGroup { language: String, group: String },

    /// Two grammars in one registry share a language name.
    #[error("language '{0}' is already registered")]
    DuplicateLanguage(String),

    /// A lookup or alias named a language the registry does not know.
    #[error("language '{0}' is not registered")]
    UnknownLanguage(String),

    /// The compiled recognizer is not a valid regular expression.
    #[error("grammar '{language}' does not compile: {source}")]
    Regex {
        language: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

/// Errors raised by resource providers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("resource '{0}' not found")]
    NotFound(String),

    #[error("resource '{0}' is not UTF-8 text")]
    NotText(String),
}
