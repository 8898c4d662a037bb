//! Truncation-tolerant JSON reading.
//!
//! The final-answer object arrives token by token, so at almost every chunk
//! boundary its serialized form is incomplete. [`parse_partial`] extracts the
//! largest well-formed value obtainable by conceptually closing all open
//! strings and brackets at the truncation point:
//!
//! - a truncated string literal keeps its decoded content so far (a trailing
//!   incomplete escape sequence is dropped)
//! - a truncated number or keyword literal is dropped entirely, since the
//!   next chunk could still extend it
//! - a truncated object key, or a key whose value never started, is dropped
//! - truncated nested objects and arrays keep whatever members were salvaged
//!
//! Genuinely malformed input (not merely truncated) yields nothing.

mod reader;

pub use reader::parse_partial;

#[cfg(test)]
mod tests;
