//! Sendcue — message-template management and scheduling.
//!
//! Reusable message templates organised into folders, a contact roster, and
//! messages scheduled for future delivery with a three-state lifecycle
//! (scheduled → sent/failed). All data lives in a single in-memory
//! [`store::Store`] that simulates persistence latency; the one true
//! external boundary is the [`enrich`] gateway, which asks an LLM provider
//! to rewrite template content.
//!
//! See `DESIGN.md` for architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod enrich;
pub mod logging;
pub mod messaging;
pub mod model;
pub mod store;
