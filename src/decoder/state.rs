//! Wire markers and incremental scanner state.

/// Opens a step. Also terminates the previous step's body when no explicit
/// close marker was sent.
pub(crate) const STEP_OPEN: &str = "<step>";

/// Explicit step close marker. The producer may omit it.
pub(crate) const STEP_CLOSE: &str = "</step>";

/// Opens the step name inside a step.
pub(crate) const NAME_OPEN: &str = "<step_name>";

/// Closes the step name; everything after it is the step body.
pub(crate) const NAME_CLOSE: &str = "</step_name>";

/// Step name that announces the terminal answer object. Once seen, the rest
/// of the stream is the growing final-answer JSON.
pub(crate) const FINAL_ANSWER: &str = "final_answer";

/// Scanner position within the wire format.
///
/// The scanner advances through the received text exactly once; text already
/// attributed to a state lives in that state's pending accumulator, so
/// confirmed regions are never rescanned on later chunks.
#[derive(Debug, Default, PartialEq)]
pub(crate) enum ScanState {
    /// Expecting the next `<step>` marker
    #[default]
    SeekStepOpen,
    /// Inside a step, expecting `<step_name>`
    SeekNameOpen,
    /// Collecting the step name until `</step_name>`
    Name {
        /// Name text received so far
        pending: String,
    },
    /// Collecting a non-final step body until it terminates
    Body {
        /// Name announced in the header
        name: String,
        /// Body text received so far
        pending: String,
    },
    /// The `final_answer` step was announced; all remaining stream text is
    /// the running answer JSON
    Answer,
}

/// Largest index `<= s.len() - keep` that falls on a char boundary.
///
/// Used to consume a scanned region while holding back a tail that could be
/// the prefix of a marker split across chunks. Markers are ASCII, so moving
/// the cut left to a char boundary can only retain extra non-marker bytes.
pub(crate) fn holdback_cut(s: &str, keep: usize) -> usize {
    let mut cut = s.len().saturating_sub(keep);
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }
    cut
}
