//! Helpers for composing forum replies: subjects, quoting and tag lists.

use crate::escape::escape_html_quotes;
use crate::formatter::{CITATION_TEXT, MODERATOR, TAGLINE};
use crate::rx;
use fancy_regex::Regex;
use once_cell::sync::Lazy;

/// Greeting put in front of a quoted message.
pub const REPLY_GREETING: &str = "Здравствуйте, {nick}, Вы писали:";

static RE_PREFIXES: Lazy<Regex> =
    Lazy::new(|| rx::fixed(r"(?i)^(?:(?:Re|На)(?:\[\d+\])?:\s*)+"));
static RE_NUMBER: Lazy<Regex> = Lazy::new(|| rx::fixed(r"\[(\d+)\]"));

static NON_WORD: Lazy<Regex> = Lazy::new(|| rx::fixed(r"\W+"));
static LOWER_OR_DIGIT: Lazy<Regex> = Lazy::new(|| rx::fixed(r"[a-zа-я0-9]"));

static QUOTED_LINE: Lazy<Regex> = Lazy::new(|| rx::fixed(r"(?m)^\s*[-\w\.]{0,5}>+"));
static UNQUOTED_LINE: Lazy<Regex> =
    Lazy::new(|| rx::fixed(r"(?m)^(?!\s*[-\w\.]{0,5}>|\s*$)"));
static GREETING: Lazy<Regex> = Lazy::new(|| rx::fixed("Здравствуйте.*ы писали:"));

static TAG: Lazy<Regex> = Lazy::new(|| rx::fixed(r#"(?P<bare>[^\s",]+)|"(?P<quoted>.+?)""#));

fn first_number(prefixes: &str) -> Option<usize> {
    RE_NUMBER
        .captures(prefixes)
        .ok()
        .flatten()
        .and_then(|caps| rx::group(&caps, 1).parse().ok())
}

/// Subject with every leading `Re:`/`Re[n]:` removed.
pub fn edit_subject(subject: &str) -> String {
    rx::replace_with(&RE_PREFIXES, subject, "")
}

/// Reply depth a subject carries: 0 without a prefix, the first `[n]`
/// otherwise, 1 for a bare `Re:`.
pub fn subject_depth(subject: &str) -> usize {
    match RE_PREFIXES.find(subject) {
        Ok(Some(found)) => first_number(found.as_str()).unwrap_or(1),
        _ => 0,
    }
}

/// `Re: ` for the first reply, `Re[n]: ` below it.
pub fn re_prefix(depth: usize) -> String {
    if depth <= 1 {
        "Re: ".to_string()
    } else {
        format!("Re[{depth}]: ")
    }
}

/// Subject for a reply to a message titled `old_subject`.
pub fn adjust_subject(old_subject: &str, new_subject: &str) -> String {
    format!("{}{new_subject}", re_prefix(subject_depth(old_subject) + 1))
}

/// Renumber the prefix of `subject` for a thread re-rooted `level` deep.
pub fn rebase_subject(level: usize, subject: &str) -> String {
    rx::replace_all(&RE_PREFIXES, subject, |caps| {
        let depth = first_number(rx::group(caps, 0)).map_or(1, |n| n.saturating_sub(level));
        re_prefix(depth)
    })
}

/// Initials used in front of quoted lines.
pub fn short_nick(nick: &str) -> String {
    if nick.chars().count() <= 3 && !nick.contains(' ') {
        return nick.chars().filter(|c| !"&<>\"'".contains(*c)).collect();
    }

    let words = rx::replace_with(&NON_WORD, nick, " ");
    let words = words.trim();
    let mut short = String::new();
    if !words.contains(' ') {
        short = rx::replace_with(&LOWER_OR_DIGIT, words, "")
            .chars()
            .take(3)
            .collect();
    }
    if short.is_empty() {
        short = words
            .split(' ')
            .take(3)
            .filter_map(|word| word.chars().next())
            .collect::<String>()
            .to_uppercase();
    }
    short
}

/// Strip `[moderator]` sections.
pub fn remove_moderator_notes(text: &str) -> String {
    rx::replace_with(&MODERATOR, text, "")
}

/// Whether `text` carries a `[moderator]` section.
pub fn has_moderator_note(text: &str) -> bool {
    rx::is_match(&MODERATOR, text)
}

/// Strip the `[tagline]` together with the blank space before it.
pub fn remove_tagline(text: &str) -> String {
    rx::replace_with(&TAGLINE, text, "")
}

/// Prepare `message` by `nick` for quoting in a reply. Moderator notes are
/// kept only when the replying user is a moderator.
pub fn edit_message(message: &str, nick: &str, moderator: bool) -> String {
    let short = short_nick(nick);
    let message = if moderator {
        message.to_string()
    } else {
        remove_moderator_notes(message)
    };
    let message = remove_tagline(&message);
    let message = rx::replace_all(&QUOTED_LINE, &message, |caps| format!("{}>", rx::group(caps, 0)));
    let message = rx::replace_with(&UNQUOTED_LINE, &message, &format!("{short}>"));
    format!("{}\n\n{message}", REPLY_GREETING.replace("{nick}", nick))
}

/// Escaped message text without the greeting, citations, tagline or
/// moderator notes.
pub fn remove_quotations(message: &str) -> String {
    let message = remove_tagline(message);
    let message = remove_moderator_notes(&message);
    let message = rx::replace_with(&GREETING, &message, "");
    let message = escape_html_quotes(&message);
    rx::replace_with(&CITATION_TEXT, &message, "")
}

/// Split a tag list on blanks and commas. Double-quoted phrases stay whole.
/// Tags are lowercased.
pub fn extract_tags(tags: &str) -> Vec<String> {
    TAG.captures_iter(tags)
        .filter_map(Result::ok)
        .map(|caps| {
            let tag = caps.name("bare").or_else(|| caps.name("quoted"));
            tag.map_or("", |m| m.as_str()).to_lowercase()
        })
        .collect()
}

/// Rewrite every tag in a tag list with `render`, keeping the separators.
pub fn format_tags(tags: &str, mut render: impl FnMut(&str) -> String) -> String {
    rx::replace_all(&TAG, tags, |caps| {
        let tag = caps.name("bare").or_else(|| caps.name("quoted"));
        render(tag.map_or("", |m| m.as_str()))
    })
}
