//! Properties that hold for any input.

use crate::common::FORMATTER;
use proptest::prelude::*;

const TOKENS: &[&str] = &[
    "[b]", "[/b]", "[i]", "[/i]", "[[", "[q]", "[/q]", "[cut]", "[cut=x]", "[/cut]",
    "[code]", "[code=csharp]", "[/code]", "[cs]", "[/cs]", "[img]", "[/img]", "[url]",
    "[url=http://a.com]", "[url=javascript:alert(1)]", "[/url]", "[purl]", "[/purl]",
    "[list]", "[list=1]", "[*]", "[/list]", "[t]", "[tr]", "[td]", "[/td]", "[/tr]", "[/t]",
    "[h1]", "[/h1]", "[hr]", "[#", "]", "[email]", "[/email]", "[tagline]", "[/tagline]",
    "[moderator]", "[/moderator]", "[msdn]", "[/msdn]", "http://x.com/", "www.y.ru",
    "javascript:", "$", "$$", "$$$", "code0", "url1", "img0$$", "&", "&gt;", "<script>",
    ">", "\n", "\r\n", " ", ":)", ";)", ":-)))", "::)", " - ", "Q123456", "ISBN 5-94723-360-4",
    "\"", "'",
];

fn markup() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        prop::sample::select(TOKENS).prop_map(|token| token.to_string()),
        "[a-z0-9 ]{1,6}",
    ];
    prop::collection::vec(piece, 0..24).prop_map(|pieces| pieces.concat())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn no_placeholder_survives(text in markup()) {
        let out = FORMATTER.format(&text);
        prop_assert!(!out.contains('$'), "{text:?} -> {out:?}");
    }

    #[test]
    fn no_script_reaches_the_page(text in markup()) {
        let out = FORMATTER.format(&text).to_lowercase();
        prop_assert!(!out.contains("<script"));
        prop_assert!(!out.contains("href=\"javascript"));
        prop_assert!(!out.contains("src='javascript"));
    }

    #[test]
    fn any_text_formats(text in "\\PC{0,80}") {
        let out = FORMATTER.format(&text);
        prop_assert!(!out.contains('$'));
    }

    #[test]
    fn blank_text_formats_to_nothing(text in "[ \t\r\n]{0,12}") {
        prop_assert_eq!(FORMATTER.format(&text), "");
    }
}
