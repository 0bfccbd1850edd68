//! Prompt categorization and balanced sampling.

use crate::record::CorpusRecord;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

const VERBOSE_CHARS: usize = 200;
const CONCISE_CHARS: usize = 100;

const CODE_MARKERS: &[&str] = &["```", "def ", "function ", "class ", "import "];

const BOILERPLATE_PHRASES: &[&str] = &[
    "i would appreciate",
    "please make sure",
    "thank you in advance",
    "could you please",
    "i would like you to",
    "can you help me",
];

const INSTRUCTION_VERBS: &[&str] = &["analyze", "explain", "describe", "write", "create"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Boilerplate,
    CodeMixed,
    Concise,
    Instruction,
    Medium,
    Multilingual,
    Question,
    Uncategorized,
    Verbose,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boilerplate => "boilerplate",
            Self::CodeMixed => "code_mixed",
            Self::Concise => "concise",
            Self::Instruction => "instruction",
            Self::Medium => "medium",
            Self::Multilingual => "multilingual",
            Self::Question => "question",
            Self::Uncategorized => "uncategorized",
            Self::Verbose => "verbose",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every category a prompt belongs to. The length class always applies,
/// so `Uncategorized` only shows up for records tagged by hand.
pub fn categorize(text: &str) -> Vec<Category> {
    let mut out = Vec::new();
    let len = text.chars().count();

    out.push(if len > VERBOSE_CHARS {
        Category::Verbose
    } else if len < CONCISE_CHARS {
        Category::Concise
    } else {
        Category::Medium
    });

    if CODE_MARKERS.iter().any(|m| text.contains(m)) {
        out.push(Category::CodeMixed);
    }
    if !text.is_ascii() {
        out.push(Category::Multilingual);
    }

    let lower = text.to_lowercase();
    if BOILERPLATE_PHRASES.iter().any(|p| lower.contains(p)) {
        out.push(Category::Boilerplate);
    }

    if text.trim_end().ends_with('?') {
        out.push(Category::Question);
    } else if INSTRUCTION_VERBS.iter().any(|v| lower.starts_with(v)) {
        out.push(Category::Instruction);
    }

    if out.is_empty() {
        out.push(Category::Uncategorized);
    }
    out
}

#[derive(Debug, Clone, Default)]
pub struct BalancedCorpus {
    pub records: Vec<CorpusRecord>,
    /// Records drawn per category, before deduplication.
    pub per_category: BTreeMap<Category, usize>,
    pub duplicates_removed: usize,
}

/// Draw up to `per_category` records from every category, visiting
/// categories in sorted order with one RNG seeded from `seed`. Each drawn
/// record is tagged with the categories it was drawn for; records sharing a
/// text are merged into the first occurrence.
pub fn sample_balanced(records: &[CorpusRecord], per_category: usize, seed: u64) -> BalancedCorpus {
    let mut groups: BTreeMap<Category, Vec<usize>> = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        for category in categorize(&record.text) {
            groups.entry(category).or_default().push(idx);
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut result = BalancedCorpus::default();
    let mut drawn: Vec<(usize, Category)> = Vec::new();

    for (category, members) in &groups {
        let picked: Vec<usize> = if members.len() > per_category {
            members.choose_multiple(&mut rng, per_category).copied().collect()
        } else {
            members.clone()
        };
        result.per_category.insert(*category, picked.len());
        drawn.extend(picked.into_iter().map(|idx| (idx, *category)));
    }

    let mut by_text: HashMap<&str, usize> = HashMap::new();
    for (idx, category) in drawn {
        let source = &records[idx];
        match by_text.get(source.text.as_str()) {
            Some(&pos) => {
                let existing = &mut result.records[pos];
                if !existing.categories.contains(&category) {
                    existing.categories.push(category);
                }
                result.duplicates_removed += 1;
            }
            None => {
                let mut record = source.clone();
                if !record.categories.contains(&category) {
                    record.categories.push(category);
                }
                by_text.insert(source.text.as_str(), result.records.len());
                result.records.push(record);
            }
        }
    }

    tracing::info!(
        records = result.records.len(),
        categories = result.per_category.len(),
        duplicates = result.duplicates_removed,
        "sampled balanced corpus"
    );
    result
}
