//! Grammar-driven code colorizer.
//!
//! [`CompiledColorizer::compile`] joins every pattern group of a grammar into
//! one alternation with a named capture group per category:
//!
//! ```text
//! (?flags)(?P<com>(?:e1)|(?:e2))|(?P<str>...)|(?P<kw>\b(?:e1)\b|\b(?:e2)\b)
//! ```
//!
//! A single left-to-right scan then wraps each match in `<category>` markers.
//! The first listed group wins when several could match at one position.

use crate::error::GrammarError;
use crate::grammar::{PatternGrammar, PatternGroup};
use crate::rx;
use fancy_regex::Regex;

/// Recognizer compiled from one [`PatternGrammar`].
#[derive(Debug)]
pub struct CompiledColorizer {
    recognizer: Option<Regex>,
    /// Category name by capture index; unnamed groups from entries are `None`.
    group_names: Vec<Option<String>>,
    fonts: Option<FontRules>,
}

#[derive(Debug)]
struct FontRules {
    merge: Regex,
    spans: Regex,
}

impl CompiledColorizer {
    /// Build the recognizer. Grammars without entries compile to an identity
    /// transform.
    pub fn compile(grammar: &PatternGrammar) -> Result<Self, GrammarError> {
        let groups: Vec<&PatternGroup> = grammar
            .groups
            .iter()
            .filter(|g| !g.entries.is_empty())
            .collect();
        if groups.is_empty() {
            return Ok(CompiledColorizer {
                recognizer: None,
                group_names: Vec::new(),
                fonts: None,
            });
        }

        let mut pattern = String::new();
        if !grammar.flags.is_empty() {
            pattern.push_str(&format!("(?{})", grammar.flags.letters()));
        }
        let alternation = groups
            .iter()
            .map(|g| group_pattern(g))
            .collect::<Vec<_>>()
            .join("|");
        pattern.push_str(&alternation);

        let to_error = |source: fancy_regex::Error| GrammarError::Regex {
            language: grammar.name.clone(),
            source: Box::new(source),
        };
        let recognizer = Regex::new(&pattern).map_err(to_error)?;
        let group_names = recognizer
            .capture_names()
            .map(|name| name.map(str::to_string))
            .collect();

        let categories = groups
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join("|");
        let fonts = FontRules {
            merge: Regex::new(&format!(r"</(?P<tag>{categories})>(?P<gap>\s+)<\k<tag>>"))
                .map_err(to_error)?,
            spans: Regex::new(&format!(r"(?s)<(?P<tag>{categories})>(?P<body>.*?)</\k<tag>>"))
                .map_err(to_error)?,
        };

        Ok(CompiledColorizer {
            recognizer: Some(recognizer),
            group_names,
            fonts: Some(fonts),
        })
    }

    /// Category names in capture-index order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.group_names.iter().filter_map(|n| n.as_deref())
    }

    /// Wrap every recognized span as `<category>text</category>`.
    pub fn transform(&self, source: &str) -> String {
        let Some(recognizer) = &self.recognizer else {
            return source.to_string();
        };
        rx::replace_all(recognizer, source, |caps| {
            let text = rx::group(caps, 0);
            if text.is_empty() {
                return String::new();
            }
            let category = (1..caps.len()).find_map(|index| {
                caps.get(index)?;
                self.group_names.get(index)?.as_deref()
            });
            match category {
                Some(name) => format!("<{name}>{text}</{name}>"),
                None => text.to_string(),
            }
        })
    }

    /// Transform and turn the category markers into styled spans.
    ///
    /// Neighbouring spans of one category separated only by whitespace are
    /// merged first.
    pub fn render(&self, source: &str) -> String {
        let marked = self.transform(source);
        let Some(fonts) = &self.fonts else {
            return marked;
        };
        let merged = rx::replace_all(&fonts.merge, &marked, |caps| {
            rx::named(caps, "gap").to_string()
        });
        rx::replace_all(&fonts.spans, &merged, |caps| {
            format!(
                "<span class='{}'>{}</span>",
                rx::named(caps, "tag"),
                rx::named(caps, "body")
            )
        })
    }
}

fn group_pattern(group: &PatternGroup) -> String {
    let body = group
        .entries
        .iter()
        .map(|entry| format!("{}(?:{}){}", group.prefix, entry, group.postfix))
        .collect::<Vec<_>>()
        .join("|");
    if group.flags.is_empty() {
        format!("(?P<{}>{})", group.name, body)
    } else {
        format!("(?P<{}>(?{}:{}))", group.name, group.flags.letters(), body)
    }
}
