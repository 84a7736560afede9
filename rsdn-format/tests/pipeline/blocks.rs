//! Block constructs and how the passes interact.

use crate::common::format;
use insta::assert_snapshot;

#[test]
fn test_blank_input_is_empty() {
    assert_eq!(format(""), "");
    assert_eq!(format(" \r\n\t "), "");
}

#[test]
fn test_plain_text_line_breaks() {
    assert_eq!(format("a\nb"), "a<br />\nb");
    assert_eq!(format("a\r\nb\rc"), "a<br />\nb<br />\nc");
}

#[test]
fn test_emphasis_and_escapes() {
    assert_eq!(format("[b]bold[/b] [i]it[/i]"), "<b>bold</b> <i>it</i>");
    assert_eq!(format("[[b]x[/b]"), "[b]x[/b]");
}

#[test]
fn test_colorized_code_block() {
    assert_snapshot!(
        format("[code=csharp]int x = 1;[/code]"),
        @"<pre><code><span class='kw'>int</span> x = 1;</code></pre>"
    );
}

#[test]
fn test_code_is_protected_from_other_passes() {
    assert_eq!(
        format("[code]:) - [q]x[/q][/code]"),
        "<pre><code>:) - [q]x[/q]</code></pre>"
    );
    assert_eq!(format("[code][b]x[/b][/code]"), "<pre><code><b>x</b></code></pre>");
}

#[test]
fn test_unknown_code_tag_stays_literal() {
    assert_eq!(format("[code=nope]x[/code]"), "[code=nope]x[/code]");
}

#[test]
fn test_quote_gets_smileys() {
    assert_snapshot!(
        format("[q]hi :)[/q]"),
        @"<blockquote class='q'><p>hi <img border='0' width='15' height='15' src='smile.gif' /></p></blockquote>"
    );
}

#[test]
fn test_citation_lines() {
    assert_eq!(
        format(">one\nAB>> two\nplain"),
        "<span class='lineQuote level1'>&gt;one</span><br />\n\
         <span class='lineQuote level2'>AB&gt;&gt; two</span><br />\nplain"
    );
}

#[test]
fn test_cut_with_default_caption() {
    let out = format("[cut]hidden[/cut]");
    assert!(out.contains("Скрытый текст"));
    assert!(out.contains("<div class='q' style='display: none'>hidden</div>"));
}

#[test]
fn test_lists() {
    assert_eq!(
        format("[list]\n[*]a\n[*]b\n[/list]"),
        "<ul style='margin-top:0; margin-bottom:0;'><li />a<br />\n<li />b</ul>"
    );
    assert_eq!(
        format("[list=05][*]a[/list]"),
        "<ol type='1' start='5' style='margin-top:0; margin-bottom:0;'><li />a</ol>"
    );
}

#[test]
fn test_table() {
    assert_snapshot!(
        format("[t][tr][td]1[/td][td]2[/td][/tr][/t]"),
        @"<table class='formatter' border='0' cellspacing='2' cellpadding='5'><tr class='formatter'><td class='formatter'>1</td><td class='formatter'>2</td></tr></table>"
    );
}

#[test]
fn test_header_takes_no_break() {
    assert_eq!(format("[h2]Title[/h2]\nbody"), "<h2 class='formatter'>Title</h2>\nbody");
}

#[test]
fn test_header_after_many_unclosed_headers() {
    let mut text = "see [h1] filler text on this line\n".repeat(1000);
    text.push_str("[h2]ok[/h2]");
    assert!(format(&text).ends_with("<h2 class='formatter'>ok</h2>"));
}

#[test]
fn test_mixed_message() {
    assert_eq!(
        format("[b]Hi[/b] :-) see [url=http://x.com]here[/url]"),
        "<b>Hi</b> <img border='0' width='15' height='15' src='smile.gif' /> see \
         <a href=\"http://x.com\" class=\"m\" target=\"_blank\">here</a>"
    );
}

#[test]
fn test_small_blocks() {
    assert_eq!(format("[hr]"), "<hr />");
    assert_eq!(format("a - b"), "a &mdash; b");
    assert_eq!(format("[moderator]stop[/moderator]"), "<div class='mod'>stop</div>");
    assert_eq!(format("x\n[tagline]bye[/tagline]"), "x<div class='tagline'>bye</div>");
}

#[test]
fn test_smileys_and_escaped_smileys() {
    assert_eq!(
        format(":-)))"),
        "<img border='0' width='15' height='15' src='lol.gif' />"
    );
    assert_eq!(format("::-)"), ":-)");
}
