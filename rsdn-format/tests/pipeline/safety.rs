//! Markup from users must never reach the page as markup.

use crate::common::format;

#[test]
fn test_html_is_escaped() {
    assert_eq!(
        format("<script>alert(1)</script> & co"),
        "&lt;script&gt;alert(1)&lt;/script&gt; &amp; co"
    );
}

#[test]
fn test_entities_are_kept() {
    assert_eq!(format("&copy; &#169;"), "&copy; &#169;");
}

#[test]
fn test_script_links_render_label_only() {
    assert_eq!(format("[url=javascript:alert(1)]click[/url]"), "click");
    assert_eq!(format("[url= JavaScript:alert(1)]click[/url]"), "click");
}

#[test]
fn test_script_images_stay_text() {
    assert_eq!(format("[img]javascript:x[/img]"), "[img]javascript:x[/img]");
    assert_eq!(format("[img] vbscript:x[/img]"), "[img] vbscript:x[/img]");
}

#[test]
fn test_quotes_cannot_break_attributes() {
    let out = format("[url=http://x.com/\"onmouseover=\"x]a[/url]");
    assert!(!out.contains("\"onmouseover"));
}

#[test]
fn test_typed_placeholders_are_inert() {
    assert_eq!(
        format("[code]x[/code] $$code0$$ $5"),
        "<pre><code>x</code></pre> &#36;&#36;code0&#36;&#36; &#36;5"
    );
}

#[test]
fn test_dollars_in_code_are_colorized_as_typed() {
    assert_eq!(
        format("[code=csharp]s = \"$x\";[/code]"),
        "<pre><code>s = <span class='str'>\"&#36;x\"</span>;</code></pre>"
    );
}

#[test]
fn test_placeholder_text_between_spans() {
    let out = format("[img]a.png[/img]url0[code]x[/code][url=http://x.com]y[/url]");
    assert!(out.contains("<img border='0' src='a.png' />"));
    assert!(out.contains("<pre><code>x</code></pre>"));
}
