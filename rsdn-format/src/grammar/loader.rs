//! Reads grammar XML into a [`PatternGrammar`].
//!
//! Element names are matched on their local part, so documents with or
//! without the `http://rsdn.ru/coloring` namespace are accepted.

use super::{is_group_identifier, PatternGrammar, PatternGroup, RegexFlags};
use crate::error::GrammarError;
use roxmltree::Node;
use std::collections::HashSet;

/// Parse one grammar document. `source_name` is only used in error messages.
pub fn parse_grammar(source_name: &str, xml: &str) -> Result<PatternGrammar, GrammarError> {
    let doc = roxmltree::Document::parse(xml).map_err(|source| GrammarError::Xml {
        source_name: source_name.to_string(),
        source,
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "language" {
        return Err(GrammarError::InvalidRoot {
            source_name: source_name.to_string(),
            found: root.tag_name().name().to_string(),
        });
    }

    let name = match root.attribute("name").map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(GrammarError::MissingLanguageName {
                source_name: source_name.to_string(),
            })
        }
    };
    let display_name = root
        .attribute("display-name")
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(&name)
        .to_string();

    let mut seen = HashSet::new();
    let mut groups = Vec::new();
    for (index, node) in root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "pattern")
        .enumerate()
    {
        let group = parse_group(&name, index, node)?;
        if !seen.insert(group.name.clone()) {
            return Err(GrammarError::DuplicateGroup {
                language: name,
                group: group.name,
            });
        }
        groups.push(group);
    }

    Ok(PatternGrammar {
        flags: RegexFlags::parse(root.attribute("options").unwrap_or("")),
        name,
        display_name,
        groups,
    })
}

fn parse_group(language: &str, index: usize, node: Node) -> Result<PatternGroup, GrammarError> {
    let name = match node.attribute("name").map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(GrammarError::MissingGroupName {
                language: language.to_string(),
                index,
            })
        }
    };
    if !is_group_identifier(name) {
        return Err(GrammarError::InvalidGroupName {
            language: language.to_string(),
            group: name.to_string(),
        });
    }

    let entries = node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "entry")
        .map(entry_text)
        .filter(|text| !text.is_empty())
        .collect();

    Ok(PatternGroup {
        name: name.to_string(),
        prefix: node.attribute("prefix").unwrap_or("").to_string(),
        postfix: node.attribute("postfix").unwrap_or("").to_string(),
        flags: RegexFlags::parse(node.attribute("options").unwrap_or("")),
        entries,
    })
}

// Text and CDATA children concatenated.
fn entry_text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
