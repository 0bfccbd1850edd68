//! Newline-delimited JSON corpus I/O.

use crate::record::CorpusRecord;
use pc_core::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct LoadedCorpus {
    pub records: Vec<CorpusRecord>,
    /// Non-blank lines that were not a JSON object with a string `text`.
    pub skipped: usize,
}

/// Parse JSONL. Blank lines are ignored; lines that are not UTF-8, not
/// JSON, or lack a string `text` are skipped and counted. Only read errors fail.
pub fn load_jsonl<R: BufRead>(mut reader: R) -> Result<LoadedCorpus> {
    let mut loaded = LoadedCorpus::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;
        let parsed = std::str::from_utf8(&buf)
            .map_err(|e| e.to_string())
            .map(str::trim);
        let record = match parsed {
            Ok("") => continue,
            Ok(line) => parse_line(line),
            Err(reason) => Err(reason),
        };
        match record {
            Ok(record) => loaded.records.push(record),
            Err(reason) => {
                tracing::warn!(line = line_no, %reason, "skipping corpus line");
                loaded.skipped += 1;
            }
        }
    }

    tracing::debug!(records = loaded.records.len(), skipped = loaded.skipped, "loaded corpus");
    Ok(loaded)
}

fn parse_line(line: &str) -> std::result::Result<CorpusRecord, String> {
    let value: serde_json::Value = serde_json::from_str(line).map_err(|e| e.to_string())?;
    if !value.get("text").is_some_and(serde_json::Value::is_string) {
        return Err("missing string field `text`".into());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

pub fn load_jsonl_file(path: impl AsRef<Path>) -> Result<LoadedCorpus> {
    let file = File::open(path.as_ref())?;
    load_jsonl(BufReader::new(file))
}

/// Write one JSON document per line.
pub fn write_jsonl<W: Write, T: Serialize>(writer: W, items: &[T]) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    for item in items {
        serde_json::to_writer(&mut writer, item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
