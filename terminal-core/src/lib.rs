//! Core types for the Prediction Market Terminal
//!
//! This crate defines the shared data structures used across the terminal:
//! scraped market records, the flat-file record sets they travel in, and the
//! listing documents that get embedded for retrieval.

pub mod document;
pub mod error;
pub mod record;

pub use document::{unique_documents, MarketDocument};
pub use error::{TerminalError, TerminalResult};
pub use record::{is_flagged_duplicate, Record, RecordSet, DUPLICATE_FLAG};
