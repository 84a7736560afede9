//! Shared formatter instances for the integration tests.

use once_cell::sync::Lazy;
use rsdn_format::{FormatterSettings, LanguageRegistry, TextFormatter};

pub static FORMATTER: Lazy<TextFormatter> =
    Lazy::new(|| TextFormatter::with_defaults().expect("bundled grammars load"));

/// Formatter over the bundled grammars with custom settings.
pub fn formatter_with(settings: FormatterSettings) -> TextFormatter {
    let registry = LanguageRegistry::shared().expect("bundled grammars load");
    TextFormatter::new(registry, settings)
}

pub fn format(text: &str) -> String {
    FORMATTER.format(text)
}
