use pc_rewriter::{DiagnosticKind, PromptPipeline, FILLER_WORDS};
use proptest::prelude::*;
use regex::Regex;

const NEUTRAL: &[&str] = &[
    "review", "the", "report", "data", "summarize", "items", "many", "company",
    "table", "rows", "sort", "by", "date", "code", "list", "errors", "module",
];

const BOILERPLATE: &[&str] = &[
    "Thank you for your help!",
    "Thanks in advance for your help.",
    "Thank you so much for your time!",
    "Any help would be appreciated.",
    "I hope this makes sense.",
    "Feel free to ask if anything is unclear.",
];

const PREFIXES: &[&str] = &[
    "Please ",
    "Could you ",
    "I would really appreciate it if you could ",
    "Hello! ",
    "Kindly ",
];

fn arb_sentence(words: &'static [&'static str]) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(words), 1..12).prop_map(|ws| format!("{}.", ws.join(" ")))
}

fn arb_mixed_sentence() -> impl Strategy<Value = String> {
    let vocab: Vec<&'static str> = NEUTRAL.iter().chain(FILLER_WORDS.iter()).copied().collect();
    prop::collection::vec(prop::sample::select(vocab), 1..16).prop_map(|ws| format!("{}.", ws.join(" ")))
}

fn count_directives(text: &str) -> usize {
    text.matches("[output_language:").count()
}

proptest! {
    #[test]
    fn no_filler_word_survives(sentences in prop::collection::vec(arb_mixed_sentence(), 1..4)) {
        let input = sentences.join(" ");
        let out = PromptPipeline::new().optimize(&input).rewritten;
        for word in FILLER_WORDS {
            let re = Regex::new(&format!(r"(?i)\b{word}\b")).unwrap();
            prop_assert!(!re.is_match(&out), "{word} survived in {out:?}");
        }
    }

    #[test]
    fn boilerplate_leaves_no_orphan(
        body in arb_sentence(NEUTRAL),
        closing in prop::sample::select(BOILERPLATE),
    ) {
        let input = format!("{body} {closing}");
        let result = PromptPipeline::new().optimize(&input);
        prop_assert!(
            result.diagnostics.iter().all(|d| d.kind != DiagnosticKind::OrphanPhrase),
            "orphan in {:?}", result.output
        );
        prop_assert!(!result.output.to_lowercase().contains("for your"));
    }

    #[test]
    fn sentences_start_uppercase(input in "[a-zA-Z .,!?\n]{0,200}") {
        let out = PromptPipeline::new().rewrite(&input);
        if let Some(first) = out.chars().find(|c| c.is_alphabetic()) {
            prop_assert!(!first.is_lowercase(), "first letter lowercase in {out:?}");
        }
        let chars: Vec<char> = out.chars().collect();
        for i in 1..chars.len() {
            let after_break = chars[i - 1].is_whitespace()
                && chars[..i].iter().rev().find(|c| !c.is_whitespace()).is_some_and(|c| matches!(c, '.' | '!' | '?'));
            if after_break && chars[i].is_alphabetic() {
                prop_assert!(!chars[i].is_lowercase(), "lowercase after terminal at {i} in {out:?}");
            }
        }
    }

    #[test]
    fn exactly_one_directive_after_reruns(input in "[a-zA-Z .,!?\n]{0,200}", runs in 1usize..4) {
        let pipeline = PromptPipeline::new();
        let mut text = input;
        for _ in 0..runs {
            text = pipeline.optimize(&text).output;
            prop_assert_eq!(count_directives(&text), 1);
            prop_assert!(text.ends_with("\n\n[output_language: english]"));
        }
    }

    #[test]
    fn neutral_text_has_zero_savings(sentences in prop::collection::vec(arb_sentence(NEUTRAL), 1..4)) {
        let input = sentences.join(" ");
        let savings = PromptPipeline::new().optimize(&input).savings;
        prop_assert_eq!(savings.word_savings, 0);
        prop_assert_eq!(savings.token_savings, 0);
    }

    #[test]
    fn boilerplate_savings_non_negative(
        prefix in prop::sample::select(PREFIXES),
        body in arb_sentence(NEUTRAL),
        closing in prop::sample::select(BOILERPLATE),
    ) {
        let input = format!("{prefix}{body} {closing}");
        let savings = PromptPipeline::new().optimize(&input).savings;
        prop_assert!(savings.token_savings >= 0);
        prop_assert!(savings.word_savings > 0);
    }
}
