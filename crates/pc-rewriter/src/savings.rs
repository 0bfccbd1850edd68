//! Savings estimator. Heuristic counts for reporting only.

use crate::directive;
use serde::Serialize;

const WORD_WEIGHT: f64 = 0.75;
const PUNCT_WEIGHT: f64 = 0.3;

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn count_punctuation(text: &str) -> usize {
    text.chars().filter(|c| matches!(c, '.' | ',' | '!' | '?' | ';' | ':')).count()
}

/// `round(words * 0.75 + punctuation * 0.3)`.
pub fn estimate_tokens(text: &str) -> usize {
    let raw = count_words(text) as f64 * WORD_WEIGHT + count_punctuation(text) as f64 * PUNCT_WEIGHT;
    raw.round() as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub words: usize,
    pub tokens: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self { words: count_words(text), tokens: estimate_tokens(text) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsReport {
    pub original_words: usize,
    pub original_tokens: usize,
    pub optimized_words: usize,
    pub optimized_tokens: usize,
    pub word_savings: i64,
    pub token_savings: i64,
    /// Token savings as a percentage of the original estimate.
    pub savings_pct: f64,
}

impl SavingsReport {
    /// Trailing directives are ignored on both sides.
    pub fn new(original: &str, optimized: &str) -> Self {
        let before = TextStats::of(directive::strip(original));
        let after = TextStats::of(directive::strip(optimized));
        let word_savings = before.words as i64 - after.words as i64;
        let token_savings = before.tokens as i64 - after.tokens as i64;
        let savings_pct = if before.tokens == 0 {
            0.0
        } else {
            token_savings as f64 / before.tokens as f64 * 100.0
        };
        Self {
            original_words: before.words,
            original_tokens: before.tokens,
            optimized_words: after.words,
            optimized_tokens: after.tokens,
            word_savings,
            token_savings,
            savings_pct,
        }
    }
}
