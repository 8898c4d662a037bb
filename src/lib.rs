//! Streaming decoder for step-delimited agent responses
//!
//! An agent backend streams its response as arbitrarily-sized text chunks. The
//! stream body is a sequence of completed "step" records, each shaped as
//! `<step><step_name>{name}</step_name>{json}`, followed by exactly one
//! `final_answer` step whose JSON body (`{"answer": string, "tools_used":
//! [string...]}`) keeps arriving token by token until the stream ends.
//!
//! This crate reconstructs, at every chunk boundary, the best-known snapshot
//! of all completed steps plus the partially-formed final answer, so a display
//! can update continuously instead of waiting for stream completion.
//!
//! ## Usage
//!
//! ```rust
//! use stepstream::StreamDecoder;
//!
//! let mut decoder = StreamDecoder::new();
//!
//! // Chunks arrive from the transport in arbitrary sizes; markers and JSON
//! // may be split anywhere.
//! let snapshot = decoder.feed("<step><step_name>lookup</step_name>{\"food\":\"egg\"}");
//! assert_eq!(snapshot.steps.len(), 1);
//! assert_eq!(snapshot.steps[0].name, "lookup");
//!
//! let snapshot = decoder.feed("<step><step_name>final_answer</step_name>{\"answer\":\"Use le");
//! assert_eq!(snapshot.answer.answer, "Use le");
//! ```
//!
//! ## Core Principles
//!
//! 1. **One snapshot per chunk**: never batched, never skipped
//! 2. **Monotonic progress**: the step list only ever grows, and emitted
//!    answer fields never shrink while the stream is open
//! 3. **Boundary-independent**: feeding the full stream as one chunk yields
//!    the same final snapshot as any arbitrary split of it
//! 4. **Total `feed`**: incomplete step or answer bodies are expected, not
//!    exceptional; they are retried as more text arrives

use serde::{Deserialize, Serialize};

// ============================================================================
// Decoder
// ============================================================================

pub mod decoder;
pub use decoder::StreamDecoder;

// ============================================================================
// Truncation-Tolerant JSON Reading
// ============================================================================

pub mod partial_json;
pub use partial_json::parse_partial;

// ============================================================================
// Errors
// ============================================================================

mod error;
pub use error::DecodeError;

// ============================================================================
// Async Stream Drivers (optional feature)
// ============================================================================

#[cfg(feature = "streaming")]
pub mod stream;
#[cfg(feature = "streaming")]
pub use stream::{decode_to_end, snapshots};

// ============================================================================
// Core Snapshot Types
// ============================================================================

/// A completed unit of agent work: a tool call or reasoning action.
///
/// Steps are identified positionally within a session (names may repeat) and
/// are immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Name announced in the step header
    pub name: String,
    /// Parsed step body. Usually a JSON object, but any valid JSON value is
    /// accepted; result rendering is the caller's concern.
    pub result: serde_json::Value,
}

impl StepRecord {
    /// Create a step record
    pub fn new(name: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            result,
        }
    }
}

/// Best current parse of the still-growing final-answer object.
///
/// May be structurally incomplete at any point before stream end. Starts at
/// `{answer: "", tools_used: []}` and is refined as tokens arrive; a field
/// that has appeared never shrinks in a later snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialAnswer {
    /// User-facing answer text parsed so far
    #[serde(default)]
    pub answer: String,
    /// Names of the tools the agent reports having used
    #[serde(default)]
    pub tools_used: Vec<String>,
}

/// The decoder's complete output for one `feed` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All completed steps seen so far, in arrival order. Append-only across
    /// the lifetime of one decode session.
    pub steps: Vec<StepRecord>,
    /// Current best parse of the final answer
    pub answer: PartialAnswer,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_answer_default() {
        let answer = PartialAnswer::default();
        assert_eq!(answer.answer, "");
        assert!(answer.tools_used.is_empty());
    }

    #[test]
    fn test_step_record_creation() {
        let step = StepRecord::new("lookup", serde_json::json!({"food": "egg"}));
        assert_eq!(step.name, "lookup");
        assert_eq!(step.result["food"], "egg");
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = Snapshot {
            steps: vec![StepRecord::new("lookup", serde_json::json!({"food": "egg"}))],
            answer: PartialAnswer {
                answer: "Use less butter.".to_string(),
                tools_used: vec!["lookup".to_string()],
            },
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["steps"][0]["name"], "lookup");
        assert_eq!(json["steps"][0]["result"]["food"], "egg");
        assert_eq!(json["answer"]["answer"], "Use less butter.");
        assert_eq!(json["answer"]["tools_used"][0], "lookup");

        let roundtrip: Snapshot = serde_json::from_value(json).unwrap();
        assert_eq!(roundtrip, snapshot);
    }

    #[test]
    fn test_partial_answer_deserializes_with_missing_fields() {
        // A renderer may persist snapshots mid-stream; absent fields fall
        // back to their defaults.
        let answer: PartialAnswer = serde_json::from_str("{}").unwrap();
        assert_eq!(answer, PartialAnswer::default());
    }
}
