//! Error types for decode sessions.

use thiserror::Error;

use crate::Snapshot;

/// Terminal failure of a decode session.
///
/// [`feed`](crate::StreamDecoder::feed) itself never fails: incomplete step
/// or answer bodies are expected mid-stream and retried on later chunks. The
/// only terminal condition is the transport erroring before end-of-stream,
/// which aborts the session. The error carries the last snapshot emitted
/// before the failure so the caller can keep displaying it.
#[derive(Debug, Error)]
pub enum DecodeError<E>
where
    E: std::error::Error + 'static,
{
    /// The transport failed before signalling end-of-stream
    #[error("transport failed mid-stream")]
    Transport {
        /// Underlying transport error
        #[source]
        source: E,
        /// Last snapshot emitted before the failure
        last: Snapshot,
    },
}

impl<E> DecodeError<E>
where
    E: std::error::Error + 'static,
{
    /// The last snapshot emitted before the session aborted
    pub fn last_snapshot(&self) -> &Snapshot {
        match self {
            Self::Transport { last, .. } => last,
        }
    }
}
