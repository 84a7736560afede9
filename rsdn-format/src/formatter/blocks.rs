//! Block-level tags and the soft newline rule.

use crate::rx;
use fancy_regex::Regex;
use once_cell::sync::Lazy;

pub(crate) static TAGLINE: Lazy<Regex> =
    Lazy::new(|| rx::fixed(r"(?is)\s*(?<!\[)\[tagline\](.*?)\[[\\/]tagline\]"));

pub(crate) static MODERATOR: Lazy<Regex> =
    Lazy::new(|| rx::fixed(r"(?is)(?<!\[)\[moderator\]\s*(.*?)\s*\[[\\/]moderator\]"));

static LIST: Lazy<Regex> =
    Lazy::new(|| rx::fixed(r"(?is)(?<!\[)\[list\]\s*(.*?)\s*\[[\\/]list\]"));

static ORDERED_LIST: Lazy<Regex> = Lazy::new(|| {
    rx::fixed(
        r"(?is)(?<!\[)\[list=(?:(?P<number>\d+)|(?P<style>a|i))\]\s*(?P<content>.*?)\s*\[[\\/]list\]",
    )
});

static LIST_ITEM: Lazy<Regex> = Lazy::new(|| rx::fixed(r"(?<!\[)\[\*\]"));

static RULE: Lazy<Regex> = Lazy::new(|| rx::fixed(r"(?i)(?<!\[)\[hr\]"));

static TABLE: Lazy<Regex> =
    Lazy::new(|| rx::fixed(r"(?is)(?<!\[)\[t\]\n*(.*?)\[[\\/]t\]\n*"));
static TABLE_ROW: Lazy<Regex> =
    Lazy::new(|| rx::fixed(r"(?is)(?<!\[)\[tr\]\n*(.*?)\[[\\/]tr\]\n*"));
static TABLE_HEADER: Lazy<Regex> =
    Lazy::new(|| rx::fixed(r"(?is)(?<!\[)\[th\](.*?)\[[\\/]th\]\n*"));
static TABLE_CELL: Lazy<Regex> =
    Lazy::new(|| rx::fixed(r"(?is)(?<!\[)\[td\](.*?)\[[\\/]td\]\n*"));

// A body stops at the next opening header tag.
static HEADER: Lazy<Regex> = Lazy::new(|| {
    rx::fixed(
        r"(?is)(?<!\[)\[h(?P<level>[1-6])\](?P<body>(?:(?!\[h[1-6]\]).)*?)\[[\\/]h\k<level>\]",
    )
});

// A line ending in one of these needs no `<br />`.
static BLOCK_END: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"(?i)</(?:ul|ol|div|blockquote|table|h[1-6])>(?:</span>)?$")
        .unwrap_or_else(|err| panic!("invalid built-in pattern: {err}"))
});

const LIST_STYLE: &str = "style='margin-top:0; margin-bottom:0;'";

pub(crate) fn taglines(text: &str) -> String {
    rx::wrap_group(&TAGLINE, text, "<div class='tagline'>", "</div>")
}

pub(crate) fn lists(text: &str) -> String {
    let text = rx::wrap_group(&LIST, text, &format!("<ul {LIST_STYLE}>"), "</ul>");
    let text = rx::replace_all(&ORDERED_LIST, &text, |caps| {
        let content = rx::named(caps, "content");
        match caps.name("number") {
            Some(number) => format!(
                "<ol type='1' start='{}' {LIST_STYLE}>{content}</ol>",
                strip_leading_zeros(number.as_str())
            ),
            None => format!(
                "<ol type='{}' {LIST_STYLE}>{content}</ol>",
                rx::named(caps, "style")
            ),
        }
    });
    rx::replace_with(&LIST_ITEM, &text, "<li />")
}

fn strip_leading_zeros(number: &str) -> &str {
    let trimmed = number.trim_start_matches('0');
    if trimmed.is_empty() {
        "0"
    } else {
        trimmed
    }
}

pub(crate) fn rules(text: &str) -> String {
    rx::replace_with(&RULE, text, "<hr />")
}

pub(crate) fn moderator_notes(text: &str) -> String {
    rx::wrap_group(&MODERATOR, text, "<div class='mod'>", "</div>")
}

pub(crate) fn tables(text: &str) -> String {
    let text = rx::wrap_group(
        &TABLE,
        text,
        "<table class='formatter' border='0' cellspacing='2' cellpadding='5'>",
        "</table>",
    );
    let text = rx::wrap_group(&TABLE_ROW, &text, "<tr class='formatter'>", "</tr>");
    let text = rx::wrap_group(&TABLE_HEADER, &text, "<th class='formatter'>", "</th>");
    rx::wrap_group(&TABLE_CELL, &text, "<td class='formatter'>", "</td>")
}

pub(crate) fn headers(text: &str) -> String {
    rx::replace_all(&HEADER, text, |caps| {
        let level = rx::named(caps, "level");
        format!(
            "<h{level} class='formatter'>{}</h{level}>",
            rx::named(caps, "body")
        )
    })
}

/// Put `<br />` at the end of every line but the last, unless the line
/// already ends with a block element.
pub(crate) fn line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut lines = text.split('\n').peekable();
    while let Some(line) = lines.next() {
        out.push_str(line);
        if lines.peek().is_some() {
            if !BLOCK_END.is_match(line) {
                out.push_str("<br />");
            }
            out.push('\n');
        }
    }
    out
}
