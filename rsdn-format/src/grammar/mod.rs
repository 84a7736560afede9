//! Declarative language grammars for the code colorizer.
//!
//! A grammar names a set of lexical categories (keywords, strings, comments,
//! ...) and lists the regex fragments that recognize each one. Grammars are
//! read from small XML documents (see [`loader`]), compiled into a single
//! alternation by [`crate::colorizer`], and kept for the life of the process in
//! a [`LanguageRegistry`].
//!
//! Document shape:
//!
//! ```text
//! <language xmlns="http://rsdn.ru/coloring" name="CSharp" display-name="C#" options="">
//!   <pattern name="com" prefix="" postfix="" options="ms">
//!     <entry>//.*?$</entry>
//!   </pattern>
//! </language>
//! ```

pub mod loader;
pub mod registry;

pub use loader::parse_grammar;
pub use registry::{CodeLanguage, Language, LanguageInfo, LanguageRegistry};

/// Inline regex flags attached to a grammar or to one of its pattern groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegexFlags {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub ignore_whitespace: bool,
}

impl RegexFlags {
    /// Parse an `options` attribute.
    ///
    /// Accepts flag letters (`im`, `(?im)`) as well as the long names
    /// `IgnoreCase`, `Multiline`, `Singleline` and `IgnorePatternWhitespace`,
    /// separated by anything that is not alphanumeric. Unknown flags are
    /// ignored.
    pub fn parse(raw: &str) -> Self {
        let mut flags = RegexFlags::default();
        for token in raw
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            match token.to_ascii_lowercase().as_str() {
                "ignorecase" => flags.case_insensitive = true,
                "multiline" => flags.multi_line = true,
                "singleline" => flags.dot_matches_new_line = true,
                "ignorepatternwhitespace" => flags.ignore_whitespace = true,
                "none" | "compiled" | "explicitcapture" | "cultureinvariant" => {}
                letters => {
                    for letter in letters.chars() {
                        match letter {
                            'i' => flags.case_insensitive = true,
                            'm' => flags.multi_line = true,
                            's' => flags.dot_matches_new_line = true,
                            'x' => flags.ignore_whitespace = true,
                            _ => {}
                        }
                    }
                }
            }
        }
        flags
    }

    pub fn is_empty(&self) -> bool {
        *self == RegexFlags::default()
    }

    /// Flag letters in inline-group form, e.g. `"im"`.
    pub fn letters(&self) -> String {
        let mut out = String::new();
        for (set, letter) in [
            (self.case_insensitive, 'i'),
            (self.multi_line, 'm'),
            (self.dot_matches_new_line, 's'),
            (self.ignore_whitespace, 'x'),
        ] {
            if set {
                out.push(letter);
            }
        }
        out
    }
}

/// One lexical category of a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternGroup {
    /// Category name; doubles as capture group name and CSS class.
    pub name: String,
    pub prefix: String,
    pub postfix: String,
    pub flags: RegexFlags,
    /// Regex fragments, tried in order.
    pub entries: Vec<String>,
}

/// Grammar of one highlighted language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternGrammar {
    pub name: String,
    pub display_name: String,
    pub flags: RegexFlags,
    pub groups: Vec<PatternGroup>,
}

/// Whether `name` can be used as a capture group name.
pub fn is_group_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_from_letters() {
        let flags = RegexFlags::parse("(?im)");
        assert!(flags.case_insensitive);
        assert!(flags.multi_line);
        assert!(!flags.dot_matches_new_line);
        assert_eq!(flags.letters(), "im");
    }

    #[test]
    fn test_flags_from_long_names() {
        let flags = RegexFlags::parse("IgnoreCase, Singleline");
        assert_eq!(flags.letters(), "is");
    }

    #[test]
    fn test_flags_empty() {
        assert!(RegexFlags::parse("").is_empty());
        assert!(RegexFlags::parse("None").is_empty());
    }

    #[test]
    fn test_group_identifier() {
        assert!(is_group_identifier("kw"));
        assert!(is_group_identifier("_x1"));
        assert!(!is_group_identifier("1x"));
        assert!(!is_group_identifier("key word"));
        assert!(!is_group_identifier(""));
    }
}
