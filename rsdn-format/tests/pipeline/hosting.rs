//! Hooks a hosting application plugs into the formatter.

use crate::common::{format, formatter_with, FORMATTER};
use rsdn_format::resources::{Resource, CUT_TEMPLATE};
use rsdn_format::{
    FormatOptions, FormatterSettings, ImageRenderer, ImageTag, RequestContext, ResourceError,
    ResourceProvider,
};

struct LazyImages;

impl ImageRenderer for LazyImages {
    fn render(&self, image: &ImageTag) -> String {
        format!("<img src='{}' loading='lazy' />", image.url)
    }
}

struct Details;

impl ResourceProvider for Details {
    fn resource(&self, name: &str) -> Result<Resource, ResourceError> {
        if name == CUT_TEMPLATE {
            Ok(Resource::new(
                CUT_TEMPLATE,
                b"<details><summary>{caption}</summary>{body}</details>".as_slice(),
            ))
        } else {
            Err(ResourceError::NotFound(name.to_string()))
        }
    }
}

struct Missing;

impl ResourceProvider for Missing {
    fn resource(&self, name: &str) -> Result<Resource, ResourceError> {
        Err(ResourceError::NotFound(name.to_string()))
    }
}

#[test]
fn test_custom_image_renderer() {
    let formatter = formatter_with(FormatterSettings::default()).with_image_renderer(LazyImages);
    assert_eq!(
        formatter.format("[img]http://x.com/a.png[/img]"),
        "<img src='http://x.com/a.png' loading='lazy' />"
    );
}

#[test]
fn test_custom_cut_template() {
    let formatter = formatter_with(FormatterSettings::default())
        .with_resources(&Details)
        .unwrap();
    assert_eq!(
        formatter.format("[cut=More]hidden[/cut]"),
        "<details><summary>More</summary>hidden</details>"
    );
    assert_eq!(
        formatter.format("[cut]x[/cut]"),
        "<details><summary>Скрытый текст</summary>x</details>"
    );
}

#[test]
fn test_missing_cut_template_is_an_error() {
    let result = formatter_with(FormatterSettings::default()).with_resources(&Missing);
    assert_eq!(
        result.unwrap_err(),
        ResourceError::NotFound(CUT_TEMPLATE.to_string())
    );
}

#[test]
fn test_secure_request_upgrades_forum_links() {
    let text = "[url=http://rsdn.ru/foo]f[/url]";
    let secure = RequestContext::new(true, 0.0);
    assert!(FORMATTER
        .format_for(text, FormatOptions::default(), &secure)
        .contains(r#"href="https://rsdn.ru/foo""#));
    assert!(format(text).contains(r#"href="http://rsdn.ru/foo""#));
}

#[test]
fn test_options() {
    let no_smiles = FormatOptions {
        smiles: false,
        ..FormatOptions::default()
    };
    assert_eq!(FORMATTER.format_with(":)", no_smiles), ":)");

    let explicit_only = FormatOptions {
        implicit_links: false,
        ..FormatOptions::default()
    };
    assert_eq!(FORMATTER.format_with("www.x.com", explicit_only), "www.x.com");

    let raw = FormatOptions {
        raw: true,
        ..FormatOptions::default()
    };
    assert_eq!(FORMATTER.format_with("&lt;b&gt; [b]x[/b]", raw), "&lt;b&gt; <b>x</b>");
}

#[test]
fn test_crate_level_format() {
    assert_eq!(rsdn_format::format("[i]x[/i]").unwrap(), "<i>x</i>");
}

#[test]
fn test_formatter_is_shared_between_threads() {
    let outputs: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| scope.spawn(move || FORMATTER.format(&format!("[b]{i}[/b] [url]www.x{i}.com[/url]"))))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for (i, out) in outputs.iter().enumerate() {
        assert!(out.starts_with(&format!("<b>{i}</b> ")));
        assert!(out.contains(&format!(r#"href="http://www.x{i}.com""#)));
    }
}
