//! `[code]` blocks.
//!
//! A block is written either with a language tag (`[csharp]…[/csharp]`) or
//! as `[code=csharp]…[/code]`. Every registered tag gets its own
//! alternative in the recognizer, so open and close tags pair up without a
//! case-sensitive back reference.

use super::inline;
use super::spans::DOLLAR;
use crate::grammar::{CodeLanguage, LanguageRegistry};
use crate::matcher::Matcher;
use crate::rx;
use fancy_regex::Regex;
use log::debug;

const TAB: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CodeBlock {
    pub tag: String,
    pub body: String,
}

/// Recognizer for every code tag a registry knows.
#[derive(Debug)]
pub(crate) struct CodeTagPattern {
    regex: Regex,
    tags: Vec<String>,
}

impl CodeTagPattern {
    pub fn new(registry: &LanguageRegistry) -> Self {
        let mut tags: Vec<String> = registry.tags().map(str::to_string).collect();
        // Longest first, so `[code=csharp]` never settles for `c`.
        tags.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let escaped: Vec<String> = tags
            .iter()
            .map(|tag| fancy_regex::escape(tag).into_owned())
            .collect();
        let mut alternatives: Vec<String> = escaped
            .iter()
            .enumerate()
            .map(|(index, tag)| format!(r"{tag}\](?P<b{index}>.*?)\s*\[/{tag}"))
            .collect();
        if !escaped.is_empty() {
            alternatives.push(format!(
                r"code=(?P<ctag>{})\](?P<cbody>.*?)\s*\[/code",
                escaped.join("|")
            ));
        }

        let pattern = if alternatives.is_empty() {
            // Nothing registered: a pattern that never matches.
            r"\b\B".to_string()
        } else {
            format!(r"(?is)(?<!\[)\[(?:{})\]", alternatives.join("|"))
        };
        debug!("code recognizer built for {} tags", tags.len());
        CodeTagPattern {
            regex: rx::fixed(&pattern),
            tags,
        }
    }

    pub fn extract(&self, text: &str, blocks: &mut Matcher<CodeBlock>) -> String {
        rx::replace_all(&self.regex, text, |caps| {
            let block = match caps.name("ctag") {
                Some(tag) => Some(CodeBlock {
                    tag: tag.as_str().to_string(),
                    body: rx::named(caps, "cbody").to_string(),
                }),
                None => self.tags.iter().enumerate().find_map(|(index, tag)| {
                    caps.name(&format!("b{index}")).map(|body| CodeBlock {
                        tag: tag.clone(),
                        body: body.as_str().to_string(),
                    })
                }),
            };
            match block {
                Some(block) => blocks.push(block),
                None => rx::group(caps, 0).to_string(),
            }
        })
    }
}

/// Render a block as `<pre><code>`, colorized when its tag names a grammar.
// Grammars see the dollar signs the user typed; the output encodes them again
// so that no later restore can mistake block content for a placeholder.
pub(crate) fn render_block(registry: &LanguageRegistry, block: &CodeBlock) -> String {
    let text = block.body.replace(DOLLAR, "$").replace('\t', TAB);
    let text = text.strip_prefix('\n').unwrap_or(&text);
    let text = text.strip_suffix('\n').unwrap_or(text);
    let text = match registry.resolve_tag(&block.tag) {
        Some(CodeLanguage::Colored(language)) => language.colorizer().render(text),
        _ => text.to_string(),
    };
    inline::code_emphasis(&format!("<pre><code>{text}</code></pre>")).replace('$', DOLLAR)
}
