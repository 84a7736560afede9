use crate::common::{format, formatter_with};
use rsdn_format::{FormatOptions, FormatterSettings, RequestContext};

#[test]
fn test_explicit_link() {
    assert_eq!(
        format("[url=http://x.com]here[/url]"),
        r#"<a href="http://x.com" class="m" target="_blank">here</a>"#
    );
}

#[test]
fn test_link_label_is_formatted() {
    assert_eq!(
        format("[url=http://x.com][b]bold[/b] :-)[/url]"),
        r#"<a href="http://x.com" class="m" target="_blank"><b>bold</b> :-)</a>"#
    );
}

#[test]
fn test_link_arguments_swapped() {
    assert_eq!(
        format("[url=click me]http://x.com[/url]"),
        r#"<a href="http://x.com" class="m" target="_blank">click me</a>"#
    );
}

#[test]
fn test_empty_link_disappears() {
    assert_eq!(format("a [url][/url] b"), "a  b");
}

#[test]
fn test_scheme_less_link() {
    assert!(format("[url]www.x.com[/url]").contains(r#"href="http://www.x.com""#));
}

#[test]
fn test_smileys_do_not_touch_addresses() {
    let out = format("[url=http://x.com/a:-)]x[/url]");
    assert!(out.contains(r#"href="http://x.com/a:-)""#));
    assert!(!out.contains("smile.gif"));
}

#[test]
fn test_bare_links() {
    assert_eq!(
        format("see http://x.com/a."),
        r#"see <a href="http://x.com/a" class="m" target="_blank">http://x.com/a</a>."#
    );
}

#[test]
fn test_bare_link_stops_before_image() {
    let out = format("http://x.com/[img]http://x.com/a.png[/img]");
    assert_eq!(
        out,
        r#"<a href="http://x.com/" class="m" target="_blank">http://x.com/</a><img border='0' src='http://x.com/a.png' />"#
    );
}

#[test]
fn test_forum_links_are_rebased() {
    let formatter = formatter_with(FormatterSettings {
        canonical_host: "rsdn.org".to_string(),
        ..FormatterSettings::default()
    });
    assert!(formatter
        .format("[url=http://www.rsdn.ru/forum/?mid=1]thread[/url]")
        .contains(r#"href="http://rsdn.org/forum/?mid=1""#));
}

#[test]
fn test_bare_forum_links_are_rebased() {
    let formatter = formatter_with(FormatterSettings {
        canonical_host: "rsdn.org".to_string(),
        ..FormatterSettings::default()
    });

    let out = formatter.format("see http://rsdn.ru/foo");
    assert!(out.contains(r#"href="http://rsdn.org/foo""#));
    assert!(out.contains(r#"class="m""#));

    let secure = RequestContext::new(true, 0.0);
    let out = formatter.format_for("see http://rsdn.ru/foo", FormatOptions::default(), &secure);
    assert!(out.contains(r#"href="https://rsdn.org/foo""#));
}

#[test]
fn test_cut_caption_links_stay_text() {
    let out = format("[cut=see http://x.com now]body[/cut]");
    assert_eq!(out.matches("<a ").count(), 1);
    assert!(out.contains(">see http://x.com now</a>"));

    let out = format("[cut=[url=http://x.com]docs[/url]]body[/cut]");
    assert_eq!(out.matches("<a ").count(), 1);
    assert!(out.contains(">docs</a>"));
}

#[test]
fn test_forum_info_and_email() {
    let formatter = formatter_with(FormatterSettings {
        path_to_root: "/root".to_string(),
        ..FormatterSettings::default()
    });
    assert_eq!(
        formatter.format("[#nick]"),
        r#"<a target="_blank" href="/root/Forum/Info/nick.aspx" class="m">nick</a>"#
    );
    assert_eq!(
        format("[email]a@b.ru[/email]"),
        "<a class='m' href='mailto:a@b.ru'>a@b.ru</a>"
    );
}

#[test]
fn test_kb_and_isbn() {
    assert!(format("see Q123456").contains("scid=kb;EN-US;Q123456'>Q123456</a>"));
    assert!(format("ISBN 5-94723-360-4").contains("isbn=5-94723-360-4"));
}

#[test]
fn test_smiley_prefix() {
    let formatter = formatter_with(FormatterSettings {
        image_prefix: "/smiles/".to_string(),
        ..FormatterSettings::default()
    });
    assert_eq!(
        formatter.format(";)"),
        "<img border='0' width='15' height='15' src='/smiles/wink.gif' />"
    );
}
