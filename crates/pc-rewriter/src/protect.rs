//! Protected regions: byte spans that rewrite rules must leave alone.
//!
//! Code (fenced and inline), template variables, URLs and file paths are
//! detected on the current buffer; a rule match overlapping any of them is
//! skipped. Regions are sorted by start and never overlap each other.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static RE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?(?:```|\z)").unwrap());
static RE_INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`\n]+`").unwrap());
static RE_TEMPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{.*?\}\}|\$\{[^}\n]*\}|\{%.*?%\}").unwrap());
static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(?:https?|ftp)://[^\s<>"'`)\]]+"#).unwrap());
static RE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)(?:^|[\s(\["'])((?:~|\.{1,2})?/[\w.-]+(?:/[\w.-]*)*|[A-Za-z]:\\[\w.\\-]+)"#).unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Code,
    TemplateVariable,
    Url,
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectedRegion {
    pub start: usize,
    pub end: usize,
    pub kind: RegionKind,
}

impl ProtectedRegion {
    fn new(start: usize, end: usize, kind: RegionKind) -> Self {
        Self { start, end, kind }
    }
}

/// Find every protected span in `text`, merged and sorted by start.
pub fn detect(text: &str) -> Vec<ProtectedRegion> {
    let mut regions: Vec<ProtectedRegion> = RE_FENCE
        .find_iter(text)
        .map(|m| ProtectedRegion::new(m.start(), m.end(), RegionKind::Code))
        .collect();

    // Inline code is only looked for between fences, so a closing fence
    // never pairs with a later backtick.
    let mut inline = Vec::new();
    let mut from = 0;
    for fence in regions.iter().map(|r| (r.start, r.end)).chain([(text.len(), text.len())]) {
        for m in RE_INLINE_CODE.find_iter(&text[from..fence.0]) {
            inline.push(ProtectedRegion::new(from + m.start(), from + m.end(), RegionKind::Code));
        }
        from = fence.1;
    }
    regions.extend(inline);

    regions.extend(
        RE_TEMPLATE
            .find_iter(text)
            .map(|m| ProtectedRegion::new(m.start(), m.end(), RegionKind::TemplateVariable)),
    );
    regions.extend(RE_URL.find_iter(text).map(|m| {
        let end = m.start() + trim_trailing_punct(m.as_str()).len();
        ProtectedRegion::new(m.start(), end, RegionKind::Url)
    }));
    regions.extend(RE_PATH.captures_iter(text).filter_map(|caps| {
        let m = caps.get(1)?;
        let end = m.start() + trim_trailing_punct(m.as_str()).len();
        (end > m.start()).then(|| ProtectedRegion::new(m.start(), end, RegionKind::Path))
    }));

    merge(regions)
}

fn trim_trailing_punct(s: &str) -> &str {
    s.trim_end_matches(['.', ',', ';', ':', '!', '?'])
}

/// Sort and fold overlapping spans; the earliest span keeps its kind.
fn merge(mut regions: Vec<ProtectedRegion>) -> Vec<ProtectedRegion> {
    regions.sort_by_key(|r| (r.start, std::cmp::Reverse(r.end)));
    let mut out: Vec<ProtectedRegion> = Vec::with_capacity(regions.len());
    for region in regions {
        match out.last_mut() {
            Some(last) if region.start < last.end => last.end = last.end.max(region.end),
            _ => out.push(region),
        }
    }
    out
}

/// True when `start..end` shares at least one byte with a region.
pub fn overlaps(regions: &[ProtectedRegion], start: usize, end: usize) -> bool {
    let idx = regions.partition_point(|r| r.end <= start);
    regions.get(idx).is_some_and(|r| r.start < end.max(start + 1))
}

/// True when byte `offset` lies inside a region.
pub fn contains(regions: &[ProtectedRegion], offset: usize) -> bool {
    overlaps(regions, offset, offset + 1)
}
