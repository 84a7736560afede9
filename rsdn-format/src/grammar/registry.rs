//! Language registry for code blocks.
//!
//! Maps code-block tags (`cs`, `c#`, `csharp`, ...) to compiled grammars.
//! The registry is assembled once at startup and shared read-only afterwards;
//! any invalid grammar aborts construction.

use crate::colorizer::CompiledColorizer;
use crate::error::GrammarError;
use crate::grammar::{parse_grammar, PatternGrammar};
use log::debug;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Grammar documents shipped with the crate.
const BUNDLED: &[(&str, &str)] = &[
    ("csharp.xml", include_str!("../../grammars/csharp.xml")),
    ("c.xml", include_str!("../../grammars/c.xml")),
    ("java.xml", include_str!("../../grammars/java.xml")),
    ("sql.xml", include_str!("../../grammars/sql.xml")),
    ("python.xml", include_str!("../../grammars/python.xml")),
    ("ruby.xml", include_str!("../../grammars/ruby.xml")),
    ("pascal.xml", include_str!("../../grammars/pascal.xml")),
    ("vb.xml", include_str!("../../grammars/vb.xml")),
    ("xml.xml", include_str!("../../grammars/xml.xml")),
];

/// Code-block tags and the language they select. `None` means the block is
/// rendered without colorizing.
const DEFAULT_TAGS: &[(&str, Option<&str>)] = &[
    ("code", None),
    ("pre", None),
    ("csharp", Some("CSharp")),
    ("cs", Some("CSharp")),
    ("c#", Some("CSharp")),
    ("ccode", Some("C")),
    ("c", Some("C")),
    ("cpp", Some("C")),
    ("java", Some("Java")),
    ("sql", Some("SQL")),
    ("python", Some("Python")),
    ("py", Some("Python")),
    ("ruby", Some("Ruby")),
    ("rb", Some("Ruby")),
    ("pascal", Some("Pascal")),
    ("delphi", Some("Pascal")),
    ("vb", Some("VisualBasic")),
    ("xml", Some("XML")),
    ("xsl", Some("XML")),
];

static SHARED: OnceCell<Arc<LanguageRegistry>> = OnceCell::new();

/// A registered language: its grammar and the recognizer compiled from it.
#[derive(Debug)]
pub struct Language {
    grammar: PatternGrammar,
    colorizer: CompiledColorizer,
}

impl Language {
    pub fn name(&self) -> &str {
        &self.grammar.name
    }

    pub fn display_name(&self) -> &str {
        &self.grammar.display_name
    }

    pub fn grammar(&self) -> &PatternGrammar {
        &self.grammar
    }

    pub fn colorizer(&self) -> &CompiledColorizer {
        &self.colorizer
    }
}

/// Serializable description of a registered language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub name: String,
    pub display_name: String,
    pub tags: Vec<String>,
}

/// What a code-block tag resolves to.
#[derive(Debug, Clone, Copy)]
pub enum CodeLanguage<'a> {
    /// Plain preformatted block.
    Plain,
    Colored(&'a Language),
}

/// Registry of languages and code-block tags.
#[derive(Debug, Default)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
    by_name: HashMap<String, usize>,
    tags: Vec<(String, Option<usize>)>,
}

impl LanguageRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the bundled grammars and the default tag table.
    pub fn with_defaults() -> Result<Self, GrammarError> {
        let mut registry = LanguageRegistry::new();
        for (source_name, xml) in BUNDLED {
            registry.load(source_name, xml)?;
        }
        for (tag, language) in DEFAULT_TAGS {
            registry.alias(tag, *language)?;
        }
        Ok(registry)
    }

    /// Process-wide registry with the bundled grammars, built on first use.
    pub fn shared() -> Result<Arc<LanguageRegistry>, GrammarError> {
        SHARED
            .get_or_try_init(|| LanguageRegistry::with_defaults().map(Arc::new))
            .cloned()
    }

    /// Parse and register a grammar document.
    pub fn load(&mut self, source_name: &str, xml: &str) -> Result<&Language, GrammarError> {
        let grammar = parse_grammar(source_name, xml)?;
        self.register(grammar)
    }

    /// Compile and register a grammar. Language names are unique ignoring case.
    pub fn register(&mut self, grammar: PatternGrammar) -> Result<&Language, GrammarError> {
        let key = grammar.name.to_lowercase();
        if self.by_name.contains_key(&key) {
            return Err(GrammarError::DuplicateLanguage(grammar.name));
        }
        let colorizer = CompiledColorizer::compile(&grammar)?;
        debug!(
            "registered language {} with {} pattern groups",
            grammar.name,
            grammar.groups.len()
        );
        let index = self.languages.len();
        self.languages.push(Language { grammar, colorizer });
        self.by_name.insert(key, index);
        Ok(&self.languages[index])
    }

    /// Point a code-block tag at a language, or at plain rendering with `None`.
    /// Re-aliasing an existing tag replaces its target.
    pub fn alias(&mut self, tag: &str, language: Option<&str>) -> Result<(), GrammarError> {
        let target = match language {
            Some(name) => Some(
                *self
                    .by_name
                    .get(&name.to_lowercase())
                    .ok_or_else(|| GrammarError::UnknownLanguage(name.to_string()))?,
            ),
            None => None,
        };
        let tag = tag.to_lowercase();
        match self.tags.iter_mut().find(|(existing, _)| *existing == tag) {
            Some(entry) => entry.1 = target,
            None => self.tags.push((tag, target)),
        }
        Ok(())
    }

    /// Look up a language by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Language> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&index| &self.languages[index])
    }

    /// Resolve a code-block tag (case-insensitive).
    pub fn resolve_tag(&self, tag: &str) -> Option<CodeLanguage<'_>> {
        let tag = tag.to_lowercase();
        self.tags
            .iter()
            .find(|(existing, _)| *existing == tag)
            .map(|(_, target)| match target {
                Some(index) => CodeLanguage::Colored(&self.languages[*index]),
                None => CodeLanguage::Plain,
            })
    }

    /// All code-block tags in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|(tag, _)| tag.as_str())
    }

    /// Tags that select `language`.
    pub fn tags_for(&self, language: &str) -> Vec<&str> {
        let Some(&index) = self.by_name.get(&language.to_lowercase()) else {
            return Vec::new();
        };
        self.tags
            .iter()
            .filter(|(_, target)| *target == Some(index))
            .map(|(tag, _)| tag.as_str())
            .collect()
    }

    /// Registered languages sorted by name.
    pub fn languages(&self) -> Vec<&Language> {
        let mut languages: Vec<_> = self.languages.iter().collect();
        languages.sort_by(|a, b| a.name().cmp(b.name()));
        languages
    }

    /// Name, display name and tags of every language, sorted by name.
    pub fn summaries(&self) -> Vec<LanguageInfo> {
        self.languages()
            .into_iter()
            .map(|language| LanguageInfo {
                name: language.name().to_string(),
                display_name: language.display_name().to_string(),
                tags: self
                    .tags_for(language.name())
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect()
    }

    /// Colorize `code` with the named language and return span markup.
    pub fn markup_code(&self, language: &str, code: &str) -> Result<String, GrammarError> {
        self.get(language)
            .map(|lang| lang.colorizer().render(code))
            .ok_or_else(|| GrammarError::UnknownLanguage(language.to_string()))
    }
}
