//! The `[output_language: ...]` suffix carried by every optimized prompt.

use pc_core::OutputLanguage;
use regex::Regex;
use std::sync::LazyLock;

static RE_TRAILING_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[output_language:\s*[A-Za-z_-]+\]\s*\z").unwrap());

pub fn render(language: OutputLanguage) -> String {
    format!("[output_language: {}]", language.as_str())
}

/// Body, exactly one blank line, directive. An empty body yields the
/// directive preceded by the blank line alone.
pub fn append(body: &str, language: OutputLanguage) -> String {
    format!("{}\n\n{}", body.trim_end(), render(language))
}

/// Remove every trailing directive so re-optimizing never stacks them.
pub fn strip(text: &str) -> &str {
    let mut body = text;
    while let Some(m) = RE_TRAILING_DIRECTIVE.find(body) {
        body = &body[..m.start()];
    }
    body
}

pub fn has_directive(text: &str) -> bool {
    RE_TRAILING_DIRECTIVE.is_match(text)
}
