//! Rule catalog: the ordered, phase-grouped rewrite table.
//!
//! Rules are data: `(phase, category, anchor, pattern, replacement)`. The
//! catalog buckets them by [`Phase`], so a rule can only ever run inside its
//! own phase, and phases run in declaration order.

use crate::protect::{self, ProtectedRegion};
use pc_core::{Anchor, PcError, Phase, Result, RuleDef};
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::sync::{Arc, LazyLock};

/// Bumped whenever the built-in table changes behaviour.
pub const CATALOG_VERSION: &str = "0.3.0";

/// Single words removed by the filler phase (whole-word, case-insensitive).
pub const FILLER_WORDS: &[&str] = &[
    "really", "very", "quite", "just", "actually", "basically", "essentially",
    "definitely", "absolutely", "certainly", "carefully", "also", "furthermore",
    "moreover", "indeed", "clearly", "obviously", "literally", "simply", "any",
];

/// Rest of a clause up to (not including) its terminator. A `.` inside a
/// token (`1.2`, `app.rs`) or a common abbreviation does not end the clause.
macro_rules! clause_body {
    () => {
        r"(?:\b(?:e\.g|i\.e|etc|vs|cf|approx|Mr|Mrs|Ms|Dr)\.|[^.!?\n]|[.!?][^\s.!?])*"
    };
}

type RuleSpec = (Phase, &'static str, Anchor, &'static str, &'static str);

const A: Anchor = Anchor::Anywhere;
const S: Anchor = Anchor::SentenceStart;

use pc_core::Phase::*;

/// Built-in rules. Filler words are appended to the filler phase from
/// [`FILLER_WORDS`] at build time.
static BUILTIN_RULES: &[RuleSpec] = &[
    // --- politeness markers
    (Politeness, "trailing_please", A, r"(?i),?[ \t]*\bplease\b[ \t]*([.!?])", "${1}"),
    (Politeness, "please", A, r"(?i)\bplease\b,?[ \t]*", ""),
    (Politeness, "kindly", A, r"(?i)\bkindly\b,?[ \t]*", ""),

    // --- whole sentences, terminator included; greetings first so what
    // follows "Hi," is already at sentence start
    (CompleteSentenceBoilerplate, "greeting", S,
     r"(?i)\b(?:hello|hi|hey|greetings)(?:\s+there)?[!.,]+", ""),
    (CompleteSentenceBoilerplate, "greeting_wellbeing", S,
     r"(?i)\bI\s+hope\s+(?:you(?:'re|\s+are)\s+doing\s+well|this\s+(?:message|email)\s+finds\s+you\s+well)(?:\s+today)?[.!?]+", ""),
    (CompleteSentenceBoilerplate, "gratitude", S,
     concat!(r"(?i)\b(?:thank\s+you|thanks)(?:\s+(?:so|very)\s+much|\s+a\s+lot)?(?:\s+in\s+advance)?(?:\s+for\s+", clause_body!(), r")?[.!?]+"), ""),
    (CompleteSentenceBoilerplate, "gratitude_appreciation", S,
     concat!(r"(?i)\bI\s+(?:really\s+|truly\s+)?appreciate\s+(?:your|the|any)\s+(?:help|time|assistance|support)", clause_body!(), r"[.!?]+"), ""),
    (CompleteSentenceBoilerplate, "help_appreciated", S,
     r"(?i)\bany\s+(?:help|assistance|guidance)\s+(?:would\s+be|is)\s+(?:greatly\s+|much\s+|really\s+)?appreciated[.!?]+", ""),
    (CompleteSentenceBoilerplate, "wondering_mind", S,
     r"(?i)\bI\s+was\s+wondering\s+if\s+you\s+(?:wouldn'?t|would\s+not)\s+mind\s+helping\s+me(?:\s+out)?(?:\s+with\s+(?:something|this|a\s+few\s+things))?[.!?]+", ""),
    (CompleteSentenceBoilerplate, "closing_questions", S,
     concat!(r"(?i)\blet\s+me\s+know\s+if\s+you\s+(?:have|need)\s+(?:any\s+)?(?:questions|clarification|more\s+information)", clause_body!(), r"[.!?]+"), ""),
    (CompleteSentenceBoilerplate, "closing_feel_free", S,
     concat!(r"(?i)\bfeel\s+free\s+to\s+(?:ask|reach\s+out)", clause_body!(), r"[.!?]+"), ""),
    (CompleteSentenceBoilerplate, "hedge_makes_sense", S,
     r"(?i)\bI\s+hope\s+(?:this|that)\s+makes\s+sense[.!?]+", ""),

    // --- clause-initial prefixes that leave a complete remainder
    (PartialPhraseBoilerplate, "appreciate_if", S,
     r"(?i)\bI\s+would\s+(?:really\s+|greatly\s+)?appreciate\s+(?:it\s+)?if\s+you\s+(?:could|would|can)\s+", ""),
    (PartialPhraseBoilerplate, "if_you_dont_mind", S,
     r"(?i)\bif\s+you\s+(?:don'?t|do\s+not)\s+mind,?\s+", ""),
    (PartialPhraseBoilerplate, "looking_for_help", S,
     r"(?i)\bI(?:'m|\s+am)\s+looking\s+for\s+(?:some\s+)?help\s+with\s+", "help with "),
    (PartialPhraseBoilerplate, "having_trouble", S,
     r"(?i)\bI(?:'m|\s+am)\s+having\s+(?:some\s+)?trouble\s+with\s+", "help with "),
    (PartialPhraseBoilerplate, "help_request_with", S,
     r"(?i)\b(?:can|could|would|will)\s+you\s+help\s+me\s+with\s+", "help with "),
    (PartialPhraseBoilerplate, "help_request", S,
     r"(?i)\b(?:can|could|would|will)\s+you\s+help\s+me\s+(?:to\s+)?", ""),
    (PartialPhraseBoilerplate, "great_if", S,
     r"(?i)\bit\s+would\s+be\s+(?:great|nice|helpful|wonderful)\s+if\s+you\s+(?:could|would|can)\s+", ""),
    (PartialPhraseBoilerplate, "wondering_if", S,
     r"(?i)\bI\s+was\s+wondering\s+if\s+you\s+(?:could|would|can)\s+", ""),
    (PartialPhraseBoilerplate, "would_you_mind", S, r"(?i)\bwould\s+you\s+mind\s+", ""),
    (PartialPhraseBoilerplate, "polite_request", S, r"(?i)\b(?:could|can|would|will)\s+you\s+", ""),

    // --- verbose instructions; whole-sentence forms first
    (InstructionCompression, "explain_code_full", A,
     r"(?i)\bprovide\s+a\s+(?:very\s+)?detailed\s+(?:and\s+thorough\s+)?explanation\s+of\s+what\s+(?:the\s+)?code\s+does,?\s+how\s+it\s+works,?\s+and\s+why\s+it\s+was\s+implemented(?:\s+in\s+this\s+particular\s+way)?\.?",
     "Explain: functionality, implementation, rationale."),
    (InstructionCompression, "bugs_and_performance", A,
     r"(?i)\blook\s+into\s+(?:any\s+)?(?:potential\s+)?bugs?\s+or\s+issues\s+(?:that\s+you\s+might\s+find)?,?\s+and\s+(?:also\s+)?check\s+for\s+(?:any\s+)?performance\s+problems?\s+or\s+areas\s+where\s+(?:the\s+)?code\s+could\s+be\s+improved\s+or\s+optimized\.?",
     "Identify: bugs, performance issues, improvements."),
    (InstructionCompression, "best_practices_review", A,
     r"(?i)\bresearch\s+and\s+explain\s+whether\s+(?:this\s+|the\s+)?code\s+follows\s+best\s+practices\s+and\s+coding\s+standards\.?",
     "Verify best practices."),
    (InstructionCompression, "suggest_fixes", A,
     r"(?i)\bif\s+you\s+find\s+(?:any\s+)?problems?\s+or\s+issues?,?\s+(?:please\s+)?provide\s+detailed\s+suggestions\s+on\s+how\s+to\s+fix\s+them\.?",
     "Suggest fixes."),
    (InstructionCompression, "want_you_to", A, r"(?i)\bI\s+(?:really\s+)?want\s+you\s+to\s+", ""),
    (InstructionCompression, "like_you_to", A, r"(?i)\bI(?:\s+would|'d)\s+(?:also\s+|really\s+)?like\s+you\s+to\s+", ""),
    (InstructionCompression, "need_you_to", A, r"(?i)\bI\s+(?:also\s+)?need\s+you\s+to\s+", ""),
    (InstructionCompression, "take_the_time", A, r"(?i)\btake\s+the\s+time\s+to\s+", ""),
    (InstructionCompression, "make_sure", A, r"(?i)\bmake\s+sure\s+(?:to|that\s+you)\s+", ""),
    (InstructionCompression, "go_ahead_and", A, r"(?i)\bgo\s+ahead\s+and\s+", ""),
    (InstructionCompression, "explanation_of", A,
     r"(?i)\bprovide\s+(?:me\s+with\s+)?an?\s+(?:very\s+)?(?:detailed\s+)?(?:and\s+thorough\s+)?explanation\s+of\s+", "explain "),
    (InstructionCompression, "summary_of", A,
     r"(?i)\bprovide\s+(?:me\s+with\s+)?an?\s+(?:brief\s+|short\s+)?summary\s+of\s+", "summarize "),
    (InstructionCompression, "list_of", A,
     r"(?i)\b(?:provide|give)\s+(?:me\s+)?(?:with\s+)?a\s+list\s+of\s+", "list "),

    // --- multi-word fillers (single words come from FILLER_WORDS)
    (FillerRemoval, "in_fact", A, r"(?i)\bin\s+fact\b,?[ \t]*", ""),
    (FillerRemoval, "to_be_honest", A, r"(?i)\bto\s+be\s+honest\b,?[ \t]*", ""),

    // --- verbose constructions merged into one concise form
    (RedundantPhraseMerge, "detailed_thorough", A, r"(?i)\b(?:very\s+)?detailed\s+and\s+thorough\b", "detailed"),
    (RedundantPhraseMerge, "thorough_detailed", A, r"(?i)\bthorough\s+and\s+detailed\b", "detailed"),
    (RedundantPhraseMerge, "problems_issues", A, r"(?i)\bproblems?\s+(?:or|and)\s+issues\b", "issues"),
    (RedundantPhraseMerge, "bugs_issues", A, r"(?i)\bbugs?\s+(?:or|and)\s+issues\b", "bugs"),
    (RedundantPhraseMerge, "errors_bugs", A, r"(?i)\berrors?\s+(?:or|and)\s+bugs\b", "bugs"),
    (RedundantPhraseMerge, "improve_optimize", A, r"(?i)\bimprove(d?)\s+or\s+optimized?\b", "optimize${1}"),
    (RedundantPhraseMerge, "best_practices_standards", A, r"(?i)\bbest\s+practices\s+and\s+coding\s+standards\b", "best practices"),
    (RedundantPhraseMerge, "working_on", A, r"(?i)[ \t]*\bthat\s+I(?:'m|\s+am)\s+working\s+on\b", ""),
    (RedundantPhraseMerge, "might_find", A, r"(?i)[ \t]*\bthat\s+you\s+(?:might|may)\s+find\b", ""),
    (RedundantPhraseMerge, "particular_way", A, r"(?i)[ \t]*\bin\s+this\s+particular\s+way\b", ""),
    (RedundantPhraseMerge, "code_snippet", A, r"(?i)\b(this|the)\s+code\s+snippet\b", "${1} code"),
    (RedundantPhraseMerge, "in_order_to", A, r"(?i)\bin\s+order\s+to\b", "to"),
    (RedundantPhraseMerge, "due_to_the_fact", A, r"(?i)\bdue\s+to\s+the\s+fact\s+that\b", "because"),
    (RedundantPhraseMerge, "point_in_time", A, r"(?i)\bat\s+this\s+point\s+in\s+time\b", "now"),
    (RedundantPhraseMerge, "each_and_every", A, r"(?i)\beach\s+and\s+every\b", "every"),

    // --- non-lexical normalization
    (StructuralNormalization, "unit_km", A, r"(?i)\b(\d+)\s*kilometers?\b", "${1}km"),
    (StructuralNormalization, "unit_m", A, r"(?i)\b(\d+)\s*meters?\b", "${1}m"),
    (StructuralNormalization, "unit_min", A, r"(?i)\b(\d+)\s*minutes?\b", "${1}min"),
    (StructuralNormalization, "unit_s", A, r"(?i)\b(\d+)\s*seconds?\b", "${1}s"),
    (StructuralNormalization, "unit_percent", A, r"(?i)\b(\d+(?:\.\d+)?)\s*percent\b", "${1}%"),
    (StructuralNormalization, "unit_dollars", A, r"(?i)\b(\d+)\s*dollars?\b", "$$${1}"),
    (StructuralNormalization, "repeated_exclaim", A, r"!{2,}", "!"),
    (StructuralNormalization, "repeated_question", A, r"\?{2,}", "?"),
    (StructuralNormalization, "separator_line", A, r"(?m)^[ \t]*={3,}[ \t]*$", ""),
    (StructuralNormalization, "blank_lines", A, r"\n(?:[ \t]*\n){2,}", "\n\n"),

    // --- residue left behind by deletions
    (WhitespaceCleanup, "space_before_punct", A, r"[ \t]+([.,;:!?])", "${1}"),
    (WhitespaceCleanup, "dangling_separator", A, r"[,;:]+([.!?])", "${1}"),
    (WhitespaceCleanup, "leading_separator", A, r"(?m)^[ \t]*[,;][ \t]*", ""),
    (WhitespaceCleanup, "inner_spaces", A, r"(\S)[ \t]{2,}", "${1} "),
    (WhitespaceCleanup, "trailing_spaces", A, r"(?m)[ \t]+$", ""),
    (WhitespaceCleanup, "outer_trim", A, r"\A\s+|\s+\z", ""),
];

static BUILTIN: LazyLock<Arc<RuleCatalog>> = LazyLock::new(|| {
    Arc::new(RuleCatalog::build().expect("built-in rule table must compile"))
});

/// One compiled rewrite rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub phase: Phase,
    pub category: String,
    pub anchor: Anchor,
    regex: Regex,
    replacement: String,
}

impl Rule {
    pub fn new(
        phase: Phase,
        category: impl Into<String>,
        anchor: Anchor,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        let category = category.into();
        let regex = Regex::new(pattern).map_err(|e| PcError::InvalidRule {
            category: category.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { phase, category, anchor, regex, replacement: replacement.into() })
    }

    pub fn from_def(def: &RuleDef) -> Result<Self> {
        Self::new(def.phase, def.category.clone(), def.anchor, &def.pattern, def.replacement.clone())
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Replace every non-overlapping match once. Returns the new text and
    /// the number of replacements made. Empty matches are never replaced.
    pub fn apply<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        self.apply_outside(text, &[])
    }

    /// Like [`apply`](Self::apply), skipping matches that touch a protected region.
    pub fn apply_outside<'t>(&self, text: &'t str, protected: &[ProtectedRegion]) -> (Cow<'t, str>, usize) {
        let mut out = String::new();
        let mut last = 0;
        let mut hits = 0;

        for caps in self.regex.captures_iter(text) {
            let Some(m) = caps.get(0) else { continue };
            if m.as_str().is_empty() {
                continue;
            }
            if self.anchor == Anchor::SentenceStart && !at_sentence_start(&text[..m.start()]) {
                continue;
            }
            if self.phase == CompleteSentenceBoilerplate && !at_sentence_end(&text[m.end()..]) {
                continue;
            }
            if protect::overlaps(protected, m.start(), m.end()) {
                continue;
            }
            if hits == 0 {
                out.reserve(text.len());
            }
            out.push_str(&text[last..m.start()]);
            caps.expand(&self.replacement, &mut out);
            last = m.end();
            hits += 1;
        }

        if hits == 0 {
            return (Cow::Borrowed(text), 0);
        }
        out.push_str(&text[last..]);
        (Cow::Owned(out), hits)
    }
}

/// True when `prefix` ends where a new sentence may begin: nothing but
/// whitespace, a line break, or `[.!?]` followed by whitespace.
pub fn at_sentence_start(prefix: &str) -> bool {
    let trimmed = prefix.trim_end();
    if trimmed.is_empty() {
        return true;
    }
    if trimmed.len() == prefix.len() {
        return false;
    }
    let gap = &prefix[trimmed.len()..];
    gap.contains('\n') || trimmed.ends_with(['.', '!', '?'])
}

/// True when `suffix` begins where a clause may end: end of text or whitespace.
pub fn at_sentence_end(suffix: &str) -> bool {
    suffix.chars().next().map_or(true, char::is_whitespace)
}

/// Per-phase listing used by the CLI and HTTP surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseSummary {
    pub phase: Phase,
    pub rules: Vec<String>,
}

/// Ordered, immutable table of phases and their rules.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    version: String,
    phases: Vec<Vec<Rule>>,
}

impl RuleCatalog {
    /// Shared process-wide built-in catalog.
    pub fn builtin() -> Arc<RuleCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// Compile a fresh copy of the built-in table.
    pub fn build() -> Result<Self> {
        let mut catalog = Self::empty(CATALOG_VERSION);
        for (phase, category, anchor, pattern, replacement) in BUILTIN_RULES {
            catalog.push(Rule::new(*phase, *category, *anchor, pattern, *replacement)?);
        }
        for word in FILLER_WORDS {
            let pattern = format!(r"(?i)\b{}\b,?[ \t]*", regex::escape(word));
            catalog.push(Rule::new(FillerRemoval, format!("filler_{word}"), A, &pattern, "")?);
        }
        Ok(catalog)
    }

    /// Built-in table plus user rules, each slotted after the built-ins of its phase.
    pub fn with_extra_rules(defs: &[RuleDef]) -> Result<Self> {
        let mut catalog = Self::build()?;
        for def in defs {
            catalog.push(Rule::from_def(def)?);
        }
        if !defs.is_empty() {
            catalog.version = format!("{CATALOG_VERSION}+{}", defs.len());
        }
        Ok(catalog)
    }

    pub fn empty(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            phases: Phase::ALL.iter().map(|_| Vec::new()).collect(),
        }
    }

    /// Append a rule to the end of its phase.
    pub fn push(&mut self, rule: Rule) {
        self.phases[rule.phase.index()].push(rule);
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn phase_rules(&self, phase: Phase) -> &[Rule] {
        &self.phases[phase.index()]
    }

    /// Phases in execution order with their rules.
    pub fn phases(&self) -> impl Iterator<Item = (Phase, &[Rule])> + '_ {
        Phase::ALL.iter().map(move |p| (*p, self.phases[p.index()].as_slice()))
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> + '_ {
        self.phases.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.phases.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summary(&self) -> Vec<PhaseSummary> {
        self.phases()
            .map(|(phase, rules)| PhaseSummary {
                phase,
                rules: rules.iter().map(|r| r.category.clone()).collect(),
            })
            .collect()
    }
}
