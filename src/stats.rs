//! Per-plane statistics sink.
//!
//! Mirrors the original's `stats_file` parameter on `process()`: an opaque,
//! appendable record format rather than a structured return value. Modeled
//! as a trait so `process` doesn't hardcode a file format, with
//! [`JsonlStatsSink`] as the concrete implementation (JSON-lines, one
//! object per plane), matching how `serde_json` is used elsewhere in the
//! reference pack for line-delimited output.

use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use serde::Serialize;

use crate::error::{ClipError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct ClipStats {
    pub plane_index: usize,
    pub input_triangles: usize,
    pub output_triangles: usize,
    pub cap_loops: u32,
    pub degenerate_triangles: u32,
    pub elapsed_secs: f64,
}

pub trait StatsSink {
    fn record(&mut self, stats: ClipStats);
}

/// Writes one JSON object per line to a file, flushing after each record so
/// a killed process still leaves a readable partial log.
pub struct JsonlStatsSink {
    file: File,
}

impl JsonlStatsSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path).map_err(ClipError::Io)?;
        Ok(Self { file })
    }
}

impl StatsSink for JsonlStatsSink {
    fn record(&mut self, stats: ClipStats) {
        let line = match serde_json::to_string(&stats) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize clip stats");
                return;
            }
        };
        if let Err(e) = writeln!(self.file, "{line}") {
            tracing::warn!(error = %e, "failed to write clip stats");
        }
    }
}

/// An in-memory sink, useful for tests and for embedding callers that want
/// the records without a file.
#[derive(Debug, Default)]
pub struct MemoryStatsSink {
    pub records: Vec<ClipStats>,
}

impl StatsSink for MemoryStatsSink {
    fn record(&mut self, stats: ClipStats) {
        self.records.push(stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_accumulates_records() {
        let mut sink = MemoryStatsSink::default();
        sink.record(ClipStats {
            plane_index: 0,
            input_triangles: 12,
            output_triangles: 20,
            cap_loops: 1,
            degenerate_triangles: 0,
            elapsed_secs: 0.001,
        });
        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].input_triangles, 12);
    }

    #[test]
    fn jsonl_sink_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.jsonl");
        {
            let mut sink = JsonlStatsSink::create(&path).unwrap();
            sink.record(ClipStats {
                plane_index: 0,
                input_triangles: 4,
                output_triangles: 6,
                cap_loops: 1,
                degenerate_triangles: 0,
                elapsed_secs: 0.0005,
            });
            sink.record(ClipStats {
                plane_index: 1,
                input_triangles: 6,
                output_triangles: 10,
                cap_loops: 2,
                degenerate_triangles: 1,
                elapsed_secs: 0.0012,
            });
        }
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.lines().next().unwrap().contains("\"plane_index\":0"));
    }
}
