//! The stateful chunk-processing loop.

use serde_json::Value;
use tracing::{debug, trace, warn};

use super::state::{
    holdback_cut, ScanState, FINAL_ANSWER, NAME_CLOSE, NAME_OPEN, STEP_CLOSE, STEP_OPEN,
};
use crate::{partial_json, PartialAnswer, Snapshot, StepRecord};

/// Decodes a streamed agent response one chunk at a time.
///
/// One decoder instance serves exactly one in-flight request: construct it
/// when the request is issued, call [`feed`](Self::feed) for every chunk the
/// transport delivers, and drop it (or call [`finish`](Self::finish)) when
/// the transport signals end-of-stream. A new user message starts a fresh
/// decoder with empty state.
///
/// `feed` never blocks and never fails. Step or answer bodies that are still
/// arriving simply stay pending and are retried when more text shows up.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    /// Unconsumed stream text not yet attributed to the scanner state
    buffer: String,
    /// Scanner position plus pending-token accumulators
    state: ScanState,
    /// Completed steps, in arrival order
    steps: Vec<StepRecord>,
    /// Best current parse of the final answer
    answer: PartialAnswer,
    /// Raw final-answer JSON received after the `final_answer` header
    answer_text: String,
}

impl StreamDecoder {
    /// Create a decoder with empty session state
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one chunk of stream text and return the resulting snapshot.
    ///
    /// Exactly one snapshot is produced per call. An empty chunk (an encoding
    /// boundary artifact) is a legal no-op: the returned snapshot is
    /// identical to the previous one.
    pub fn feed(&mut self, chunk: &str) -> Snapshot {
        if !chunk.is_empty() {
            trace!(len = chunk.len(), "feeding chunk");
            self.buffer.push_str(chunk);
            self.scan();
        }
        self.snapshot()
    }

    /// Current snapshot without feeding any text
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            steps: self.steps.clone(),
            answer: self.answer.clone(),
        }
    }

    /// Completed steps seen so far
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Best current parse of the final answer
    pub fn answer(&self) -> &PartialAnswer {
        &self.answer
    }

    /// Whether the `final_answer` step has been announced.
    ///
    /// Once true, no further non-final step can legally appear; everything
    /// still arriving belongs to the answer object.
    pub fn final_answer_started(&self) -> bool {
        self.state == ScanState::Answer
    }

    /// Consume the decoder at end-of-stream and return the final snapshot.
    ///
    /// A step that never terminated (its body still unparsed when the stream
    /// ended) is silently dropped, matching the backend's presumption that
    /// the last chunk completes the response.
    pub fn finish(self) -> Snapshot {
        match &self.state {
            ScanState::Body { name, .. } => {
                trace!(step = %name, "stream ended with an unterminated step; dropping it");
            }
            ScanState::SeekNameOpen | ScanState::Name { .. } => {
                trace!("stream ended inside a step header; dropping the partial step");
            }
            ScanState::SeekStepOpen | ScanState::Answer => {}
        }
        Snapshot {
            steps: self.steps,
            answer: self.answer,
        }
    }

    /// Advance the scanner as far as the buffered text allows.
    ///
    /// Each pass either makes progress (a marker was recognized, a step was
    /// completed, answer text was absorbed) or consumes the scanned region
    /// into the current state's accumulator, holding back only a tail short
    /// enough to still be a split marker prefix.
    fn scan(&mut self) {
        loop {
            let state = std::mem::take(&mut self.state);
            match state {
                ScanState::SeekStepOpen => {
                    if let Some(at) = self.buffer.find(STEP_OPEN) {
                        self.buffer.drain(..at + STEP_OPEN.len());
                        self.state = ScanState::SeekNameOpen;
                    } else {
                        // Text between steps carries no meaning; keep only a
                        // possible marker prefix.
                        let cut = holdback_cut(&self.buffer, STEP_OPEN.len() - 1);
                        self.buffer.drain(..cut);
                        self.state = ScanState::SeekStepOpen;
                        return;
                    }
                }
                ScanState::SeekNameOpen => {
                    if let Some(at) = self.buffer.find(NAME_OPEN) {
                        self.buffer.drain(..at + NAME_OPEN.len());
                        self.state = ScanState::Name {
                            pending: String::new(),
                        };
                    } else {
                        let cut = holdback_cut(&self.buffer, NAME_OPEN.len() - 1);
                        self.buffer.drain(..cut);
                        self.state = ScanState::SeekNameOpen;
                        return;
                    }
                }
                ScanState::Name { mut pending } => {
                    if let Some(at) = self.buffer.find(NAME_CLOSE) {
                        pending.push_str(&self.buffer[..at]);
                        self.buffer.drain(..at + NAME_CLOSE.len());
                        if pending == FINAL_ANSWER {
                            debug!(
                                steps = self.steps.len(),
                                "final answer announced; switching to answer extraction"
                            );
                            self.state = ScanState::Answer;
                        } else {
                            self.state = ScanState::Body {
                                name: pending,
                                pending: String::new(),
                            };
                        }
                    } else {
                        let cut = holdback_cut(&self.buffer, NAME_CLOSE.len() - 1);
                        pending.extend(self.buffer.drain(..cut));
                        self.state = ScanState::Name { pending };
                        return;
                    }
                }
                ScanState::Body { name, mut pending } => {
                    // A body terminates at the next step-open marker, an
                    // explicit step-close marker, or the end of the buffer.
                    let open = self.buffer.find(STEP_OPEN);
                    let close = self.buffer.find(STEP_CLOSE);
                    let terminator = match (open, close) {
                        (Some(o), Some(c)) if c < o => Some((c, STEP_CLOSE)),
                        (Some(o), _) => Some((o, STEP_OPEN)),
                        (None, Some(c)) => Some((c, STEP_CLOSE)),
                        (None, None) => None,
                    };

                    if let Some((at, marker)) = terminator {
                        pending.push_str(&self.buffer[..at]);
                        self.buffer.drain(..at + marker.len());
                        self.complete_step(name, &pending);
                        // The step-open marker both terminates this body and
                        // opens the next step.
                        self.state = if marker == STEP_OPEN {
                            ScanState::SeekNameOpen
                        } else {
                            ScanState::SeekStepOpen
                        };
                    } else {
                        // No terminator yet: the buffer end itself terminates
                        // the body if what we have already parses.
                        if !self.buffer.is_empty() || !pending.is_empty() {
                            let candidate = format!("{pending}{}", self.buffer);
                            if serde_json::from_str::<Value>(candidate.trim()).is_ok() {
                                self.buffer.clear();
                                self.complete_step(name, &candidate);
                                self.state = ScanState::SeekStepOpen;
                                return;
                            }
                        }
                        let cut = holdback_cut(&self.buffer, STEP_CLOSE.len() - 1);
                        pending.extend(self.buffer.drain(..cut));
                        self.state = ScanState::Body { name, pending };
                        return;
                    }
                }
                ScanState::Answer => {
                    if !self.buffer.is_empty() {
                        self.answer_text.push_str(&self.buffer);
                        self.buffer.clear();
                        self.refresh_answer();
                    }
                    self.state = ScanState::Answer;
                    return;
                }
            }
        }
    }

    /// Record a terminated step body, or drop it if it never was valid JSON.
    fn complete_step(&mut self, name: String, body: &str) {
        match serde_json::from_str::<Value>(body.trim()) {
            Ok(result) => {
                debug!(step = %name, index = self.steps.len(), "step completed");
                self.steps.push(StepRecord { name, result });
            }
            Err(error) => {
                // The terminator has arrived, so this body can never grow
                // into valid JSON; retrying would loop forever.
                warn!(step = %name, %error, "dropping step with malformed body");
            }
        }
    }

    /// Re-read the accumulated answer tail and refine the partial answer.
    ///
    /// Fields absent from the best extractable object keep their previous
    /// values, and a present field never replaces a longer previous value: a
    /// shrink would indicate a decoding bug, not backend behavior.
    fn refresh_answer(&mut self) {
        let Some(Value::Object(map)) = partial_json::parse_partial(self.answer_text.trim_start())
        else {
            return;
        };

        if let Some(answer) = map.get("answer").and_then(Value::as_str) {
            if answer.len() >= self.answer.answer.len() {
                self.answer.answer = answer.to_string();
            }
        }
        if let Some(tools) = map.get("tools_used").and_then(Value::as_array) {
            let tools: Vec<String> = tools
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            if tools.len() >= self.answer.tools_used.len() {
                self.answer.tools_used = tools;
            }
        }
    }
}
