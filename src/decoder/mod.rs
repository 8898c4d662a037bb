//! Streaming decode of step-delimited agent responses.
//!
//! This module owns the stateful chunk-processing loop: each `feed` extracts
//! any newly-completed step records, refines the partial final answer, and
//! returns a [`Snapshot`](crate::Snapshot) of everything known so far.

mod state;
mod stream_decoder;

pub use stream_decoder::StreamDecoder;
