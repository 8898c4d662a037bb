//! Async drivers connecting a transport chunk stream to a [`StreamDecoder`].
//!
//! The decoder itself is synchronous and transport-agnostic; these helpers
//! wire it to any `Stream` of text chunks (an HTTP body, a channel, a mock).

use futures_util::{stream, Stream, StreamExt};

use crate::{DecodeError, Snapshot, StreamDecoder};

/// Decode `chunks` into a lazy sequence of snapshots, one per chunk.
///
/// The output stream ends when the transport signals end-of-stream. A
/// transport error ends it with exactly one `Err` carrying the last snapshot
/// emitted before the failure; no further items follow.
pub fn snapshots<S, E>(chunks: S) -> impl Stream<Item = Result<Snapshot, DecodeError<E>>>
where
    S: Stream<Item = Result<String, E>> + Unpin,
    E: std::error::Error + 'static,
{
    stream::unfold(Some((StreamDecoder::new(), chunks)), |state| async move {
        let (mut decoder, mut chunks) = state?;
        match chunks.next().await {
            Some(Ok(chunk)) => {
                let snapshot = decoder.feed(&chunk);
                Some((Ok(snapshot), Some((decoder, chunks))))
            }
            Some(Err(source)) => {
                let last = decoder.snapshot();
                Some((Err(DecodeError::Transport { source, last }), None))
            }
            None => None,
        }
    })
}

/// Drive `chunks` to completion and return the final snapshot.
///
/// Convenience for callers that do not render intermediate progress.
pub async fn decode_to_end<S, E>(mut chunks: S) -> Result<Snapshot, DecodeError<E>>
where
    S: Stream<Item = Result<String, E>> + Unpin,
    E: std::error::Error + 'static,
{
    let mut decoder = StreamDecoder::new();
    while let Some(chunk) = chunks.next().await {
        match chunk {
            Ok(chunk) => {
                decoder.feed(&chunk);
            }
            Err(source) => {
                let last = decoder.snapshot();
                return Err(DecodeError::Transport { source, last });
            }
        }
    }
    Ok(decoder.finish())
}
