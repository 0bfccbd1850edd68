//! Structural validator: read-only diagnostics over finished text.

use crate::capitalize::is_terminal;
use crate::protect::{self, ProtectedRegion};
use pc_core::ValidatorConfig;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const SNIPPET_CHARS: usize = 60;

static RE_ORPHAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^for\s+(?:your|this|that|these|those|the|my|our|all)\b(?:\s+[\w'-]+){0,3}\s*[.!?]+$").unwrap()
});
static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    OrphanPhrase,
    LowercaseStart,
    Repetition,
    ForbiddenResidue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Byte offset into the validated text.
    pub offset: usize,
    pub snippet: String,
}

impl Diagnostic {
    fn new(kind: DiagnosticKind, offset: usize, snippet: &str) -> Self {
        Self { kind, offset, snippet: snippet.chars().take(SNIPPET_CHARS).collect() }
    }
}

pub struct Validator {
    config: ValidatorConfig,
    forbidden: Vec<(String, Regex)>,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        let forbidden = config
            .forbidden_terms
            .iter()
            .filter(|t| !t.trim().is_empty())
            .filter_map(|term| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(term.trim()));
                match Regex::new(&pattern) {
                    Ok(re) => Some((term.clone(), re)),
                    Err(e) => {
                        tracing::warn!(term = %term, error = %e, "skipping forbidden term");
                        None
                    }
                }
            })
            .collect();
        Self { config, forbidden }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Run every check. Checks are independent; order of the result is
    /// orphan, capitalization, repetition, residue. Nothing starting inside
    /// a protected region (code, URLs, paths, template variables) is reported.
    pub fn validate(&self, text: &str) -> Vec<Diagnostic> {
        let protected = protect::detect(text);
        let mut out = self.orphans_outside(text, &protected);
        out.extend(self.lowercase_outside(text, &protected));
        out.extend(self.repetitions_outside(text, &protected));
        out.extend(self.residue_outside(text, &protected));
        out
    }

    /// Sentences made only of "for" + possessive/demonstrative + a few words.
    pub fn orphan_phrases(&self, text: &str) -> Vec<Diagnostic> {
        self.orphans_outside(text, &protect::detect(text))
    }

    /// Lines and post-terminal segments that begin with a lowercase letter.
    pub fn lowercase_starts(&self, text: &str) -> Vec<Diagnostic> {
        self.lowercase_outside(text, &protect::detect(text))
    }

    /// Words of at least `min_word_len` chars seen more than `repetition_threshold` times.
    pub fn repetitions(&self, text: &str) -> Vec<Diagnostic> {
        self.repetitions_outside(text, &protect::detect(text))
    }

    pub fn forbidden_residue(&self, text: &str) -> Vec<Diagnostic> {
        self.residue_outside(text, &protect::detect(text))
    }

    fn orphans_outside(&self, text: &str, protected: &[ProtectedRegion]) -> Vec<Diagnostic> {
        segments(text)
            .into_iter()
            .filter(|(offset, seg)| !protect::contains(protected, *offset) && RE_ORPHAN.is_match(seg))
            .map(|(offset, seg)| Diagnostic::new(DiagnosticKind::OrphanPhrase, offset, seg))
            .collect()
    }

    fn lowercase_outside(&self, text: &str, protected: &[ProtectedRegion]) -> Vec<Diagnostic> {
        segments(text)
            .into_iter()
            .filter(|(offset, _)| !protect::contains(protected, *offset))
            .filter(|(_, seg)| seg.chars().next().is_some_and(|c| c.is_alphabetic() && c.is_lowercase()))
            .map(|(offset, seg)| Diagnostic::new(DiagnosticKind::LowercaseStart, offset, seg))
            .collect()
    }

    fn repetitions_outside(&self, text: &str, protected: &[ProtectedRegion]) -> Vec<Diagnostic> {
        let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for m in RE_WORD.find_iter(text).filter(|m| !protect::contains(protected, m.start())) {
            let word = m.as_str().trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            if word.chars().count() < self.config.min_word_len {
                continue;
            }
            let entry = counts.entry(word).or_insert((0, m.start()));
            entry.0 += 1;
        }
        counts
            .into_iter()
            .filter(|(_, (count, _))| *count > self.config.repetition_threshold)
            .map(|(word, (count, offset))| {
                Diagnostic::new(DiagnosticKind::Repetition, offset, &format!("{word} x{count}"))
            })
            .collect()
    }

    fn residue_outside(&self, text: &str, protected: &[ProtectedRegion]) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for (_, re) in &self.forbidden {
            for m in re.find_iter(text).filter(|m| !protect::overlaps(protected, m.start(), m.end())) {
                out.push(Diagnostic::new(DiagnosticKind::ForbiddenResidue, m.start(), m.as_str()));
            }
        }
        out.sort_by_key(|d| d.offset);
        out
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

/// Split into trimmed, non-empty segments at line breaks and after
/// terminal punctuation followed by whitespace. Returns `(byte offset, text)`.
pub fn segments(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();

    while let Some((i, ch)) = iter.next() {
        let end = if ch == '\n' {
            Some(i)
        } else if is_terminal(ch) && iter.peek().is_some_and(|(_, c)| c.is_whitespace()) {
            Some(i + ch.len_utf8())
        } else {
            None
        };
        if let Some(end) = end {
            push_segment(text, start, end, &mut out);
            while iter.next_if(|(_, c)| c.is_whitespace()).is_some() {}
            start = iter.peek().map(|(j, _)| *j).unwrap_or(text.len());
        }
    }
    push_segment(text, start, text.len(), &mut out);

    out
}

fn push_segment<'t>(text: &'t str, from: usize, to: usize, out: &mut Vec<(usize, &'t str)>) {
    let raw = &text[from..to];
    let lead = raw.len() - raw.trim_start().len();
    let seg = raw.trim();
    if !seg.is_empty() {
        out.push((from + lead, seg));
    }
}
