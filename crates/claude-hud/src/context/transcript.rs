//! Usage extraction from the assistant's NDJSON transcript.
//!
//! Only assistant records are inspected, and only their `model` and `usage`
//! fields. Every other record shape, and every line that fails to parse, is
//! skipped on its own without affecting the rest of the scan.

use serde::{Deserialize, Deserializer};

/// Token counters reported on an assistant message. Missing or `null`
/// counters read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TranscriptUsage {
    #[serde(deserialize_with = "null_as_zero")]
    pub input_tokens: u64,
    #[serde(deserialize_with = "null_as_zero")]
    pub output_tokens: u64,
    #[serde(deserialize_with = "null_as_zero")]
    pub cache_creation_input_tokens: u64,
    #[serde(deserialize_with = "null_as_zero")]
    pub cache_read_input_tokens: u64,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

impl TranscriptUsage {
    /// Sum of all four counters.
    pub fn total(&self) -> u64 {
        self.input_tokens
            + self.output_tokens
            + self.cache_creation_input_tokens
            + self.cache_read_input_tokens
    }

    /// Cache creation plus cache reads.
    pub fn cache_tokens(&self) -> u64 {
        self.cache_creation_input_tokens + self.cache_read_input_tokens
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptRecord {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<TranscriptMessage>,
}

#[derive(Debug, Deserialize)]
struct TranscriptMessage {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<TranscriptUsage>,
}

/// Result of scanning a transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptScan {
    /// Usage from the most recent assistant record that carried one.
    pub usage: Option<TranscriptUsage>,
    /// Most recent model identifier seen on an assistant usage record.
    pub model: Option<String>,
    /// Non-empty lines that could not be parsed.
    pub malformed_lines: usize,
}

/// Scan transcript content for the latest assistant usage record.
pub fn scan_transcript(content: &str) -> TranscriptScan {
    let mut scan = TranscriptScan::default();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: TranscriptRecord = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(_) => {
                scan.malformed_lines += 1;
                continue;
            }
        };
        if record.kind.as_deref() != Some("assistant") {
            continue;
        }
        let Some(message) = record.message else {
            continue;
        };
        if let Some(usage) = message.usage {
            scan.usage = Some(usage);
            if message.model.is_some() {
                scan.model = message.model;
            }
        }
    }

    scan
}
