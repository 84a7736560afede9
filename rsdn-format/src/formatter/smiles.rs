//! Smiley glyphs.
//!
//! Rules run in table order. Longer glyphs come first and the shorter ones
//! refuse to start right after a `:`, so `:-)))` is only ever the laughing
//! face. Doubling the leading character (`::-)`) cancels a glyph; the
//! extra character is dropped by the escape pass at the end.

use crate::escape::encode_uri_against_xss;
use crate::rx;
use fancy_regex::Regex;
use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy)]
pub struct Smiley {
    pub pattern: &'static str,
    pub file: &'static str,
    pub width: u32,
    pub height: u32,
}

const fn smiley(pattern: &'static str, file: &'static str, width: u32, height: u32) -> Smiley {
    Smiley {
        pattern,
        file,
        width,
        height,
    }
}

pub const SMILEYS: &[Smiley] = &[
    smiley(r":up:", "sup.gif", 15, 15),
    smiley(r":down:", "down.gif", 15, 15),
    smiley(r":super:", "super.gif", 26, 28),
    smiley(r":shuffle:", "shuffle.gif", 15, 20),
    smiley(r":crash:", "crash.gif", 30, 30),
    smiley(r":maniac:", "maniac.gif", 70, 25),
    smiley(r":user:", "user.gif", 40, 20),
    smiley(r":wow:", "wow.gif", 19, 19),
    smiley(r":beer:", "beer.gif", 57, 16),
    smiley(r":team:", "invasion.gif", 110, 107),
    smiley(r":no:", "no.gif", 15, 15),
    smiley(r":nopont:", "nopont.gif", 35, 35),
    smiley(r":xz:", "xz.gif", 37, 15),
    smiley(r"(?<!:):-?\)\)\)", "lol.gif", 15, 15),
    smiley(r"(?<!:):-?\)\)", "biggrin.gif", 15, 15),
    smiley(r"(?<!:):-?\)", "smile.gif", 15, 15),
    // Not the tail of an entity such as `&gt;)` or `&#36;)`.
    smiley(
        r"(?<!;)(?<!amp)(?<!gt)(?<!lt)(?<!quot)(?<!&#\d)(?<!&#\d\d)(?<!&#\d\d\d);[-oO]?\)",
        "wink.gif",
        15,
        15,
    ),
    smiley(r"(?<!:):-?\(", "frown.gif", 15, 15),
    smiley(r"(?<!:):-[\\/]", "smirk.gif", 15, 15),
    smiley(r":\?\?\?:", "confused.gif", 15, 22),
];

static COMPILED: Lazy<Vec<(Regex, &'static Smiley)>> = Lazy::new(|| {
    SMILEYS
        .iter()
        .map(|smiley| (rx::fixed(&format!("(?i){}", smiley.pattern)), smiley))
        .collect()
});

impl Smiley {
    pub fn render(&self, image_prefix: &str) -> String {
        format!(
            "<img border='0' width='{}' height='{}' src='{}' />",
            self.width,
            self.height,
            encode_uri_against_xss(&format!("{image_prefix}{}", self.file))
        )
    }
}

pub(crate) fn replace_smileys(text: &str, image_prefix: &str) -> String {
    COMPILED.iter().fold(text.to_string(), |text, (regex, smiley)| {
        let html = smiley.render(image_prefix);
        rx::replace_with(regex, &text, &html)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_paren_is_one_glyph() {
        let out = replace_smileys(":-)))", "/i/");
        assert_eq!(out, "<img border='0' width='15' height='15' src='/i/lol.gif' />");
    }

    #[test]
    fn test_glyphs_side_by_side() {
        let out = replace_smileys(":) ;) :super:", "");
        assert!(out.contains("src='smile.gif'"));
        assert!(out.contains("src='wink.gif'"));
        assert!(out.contains("width='26' height='28' src='super.gif'"));
    }

    #[test]
    fn test_entity_tail_is_not_a_wink() {
        assert_eq!(replace_smileys("(a &gt;) &quot;)", ""), "(a &gt;) &quot;)");
        assert_eq!(replace_smileys("(&#36;) (&#169;)", ""), "(&#36;) (&#169;)");
    }

    #[test]
    fn test_doubled_colon_cancels() {
        assert_eq!(replace_smileys("::-)", ""), "::-)");
    }

    #[test]
    fn test_named_glyphs_ignore_case() {
        assert!(replace_smileys(":BEER:", "").contains("beer.gif"));
    }
}
