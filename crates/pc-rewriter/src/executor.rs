//! Phase executor: runs a catalog over one text buffer.

use crate::catalog::RuleCatalog;
use crate::protect;
use pc_core::{ApplyMode, Phase};
use serde::Serialize;

/// A rule that changed the buffer during one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleHit {
    pub phase: Phase,
    pub category: String,
    pub count: usize,
}

/// Single-pass rewrite: every rule replaces its matches exactly once.
pub fn rewrite(text: &str, catalog: &RuleCatalog) -> String {
    rewrite_traced(text, catalog, ApplyMode::SinglePass, 1).0
}

pub fn rewrite_with_mode(text: &str, catalog: &RuleCatalog, mode: ApplyMode, max_passes: usize) -> String {
    rewrite_traced(text, catalog, mode, max_passes).0
}

/// Rewrite and report which rules fired, in execution order.
///
/// In [`ApplyMode::FixedPoint`] each rule is re-applied to its own output
/// until nothing changes or `max_passes` is reached; phases stay sequential
/// either way. Matches touching a protected region (code, template
/// variables, URLs, paths) are never replaced.
pub fn rewrite_traced(
    text: &str,
    catalog: &RuleCatalog,
    mode: ApplyMode,
    max_passes: usize,
) -> (String, Vec<RuleHit>) {
    let passes = match mode {
        ApplyMode::SinglePass => 1,
        ApplyMode::FixedPoint => max_passes.max(1),
    };

    let mut buffer = text.to_string();
    let mut protected = protect::detect(&buffer);
    let mut hits = Vec::new();

    for (phase, rules) in catalog.phases() {
        for rule in rules {
            let mut count = 0;
            for _ in 0..passes {
                let (next, n) = rule.apply_outside(&buffer, &protected);
                if n == 0 {
                    break;
                }
                let next = next.into_owned();
                count += n;
                if next == buffer {
                    break;
                }
                buffer = next;
                protected = protect::detect(&buffer);
            }
            if count > 0 {
                tracing::debug!(%phase, category = %rule.category, count, "rule fired");
                hits.push(RuleHit { phase, category: rule.category.clone(), count });
            }
        }
    }

    (buffer, hits)
}
