//! Embeddable chat dashboard core: message history, durable persistence,
//! delayed echo replies, filtering, and export.

// No escape hatches in library code: errors are propagated or logged.
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

/// Chat history core (store, persistence bridge, responder, views, export).
pub mod chat;
