//! Placeholder store for span extraction.
//!
//! A pass pulls matched spans out of the text, leaving numbered placeholders
//! such as `$$$code0$$` behind, so that later passes cannot touch them. The
//! restoring pass then swaps every placeholder for the rendered HTML.
//!
//! Restoration walks the indices in order and replaces the exact placeholder
//! string; restored HTML is never scanned again by a pattern.

use std::ops::Index;

/// Indexed capture store producing placeholders from a `{0}` template.
#[derive(Debug, Clone)]
pub struct Matcher<T> {
    pattern: String,
    captures: Vec<T>,
}

impl<T> Matcher<T> {
    /// Create a store whose placeholders are `pattern` with `{0}` replaced by
    /// the capture index.
    pub fn new(pattern: impl Into<String>) -> Self {
        Matcher {
            pattern: pattern.into(),
            captures: Vec::new(),
        }
    }

    /// Record `capture` and return the placeholder to put in its place.
    pub fn push(&mut self, capture: T) -> String {
        let placeholder = self.placeholder(self.captures.len());
        self.captures.push(capture);
        placeholder
    }

    /// Placeholder text for `index`.
    pub fn placeholder(&self, index: usize) -> String {
        self.pattern.replacen("{0}", &index.to_string(), 1)
    }

    pub fn reset(&mut self) {
        self.captures.clear();
    }

    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.captures.iter()
    }

    /// Replace each placeholder in `text` with `render(capture)`, index 0 first.
    pub fn restore<F>(&self, text: &str, mut render: F) -> String
    where
        F: FnMut(&T) -> String,
    {
        let mut text = text.to_string();
        for (index, capture) in self.captures.iter().enumerate() {
            let placeholder = self.placeholder(index);
            if text.contains(&placeholder) {
                text = text.replace(&placeholder, &render(capture));
            }
        }
        text
    }
}

impl<T> Index<usize> for Matcher<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.captures[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_sequential() {
        let mut matcher = Matcher::new("$$code{0}$$");
        assert_eq!(matcher.push("a"), "$$code0$$");
        assert_eq!(matcher.push("b"), "$$code1$$");
        assert_eq!(matcher.len(), 2);
        assert_eq!(matcher[1], "b");
    }

    #[test]
    fn test_restore_uses_exact_placeholders() {
        let mut matcher = Matcher::new("$$x{0}$$");
        let mut text = String::new();
        for i in 0..11 {
            text.push_str(&matcher.push(i));
            text.push(' ');
        }
        let restored = matcher.restore(&text, |i| format!("<{i}>"));
        assert_eq!(restored, "<0> <1> <2> <3> <4> <5> <6> <7> <8> <9> <10> ");
    }

    #[test]
    fn test_nested_placeholders_are_filled_later() {
        let mut matcher = Matcher::new("$$x{0}$$");
        let text = format!("{} {}", matcher.push("first"), matcher.push("second"));
        // A captured span may itself contain a later placeholder.
        let restored = matcher.restore(&text, |s| {
            if *s == "first" {
                "[$$x1$$]".to_string()
            } else {
                s.to_string()
            }
        });
        assert_eq!(restored, "[second] second");
    }

    #[test]
    fn test_reset() {
        let mut matcher = Matcher::new("{0}");
        matcher.push(());
        matcher.reset();
        assert!(matcher.is_empty());
        assert_eq!(matcher.push(()), "0");
    }
}
