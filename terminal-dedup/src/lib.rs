//! Duplicate detection for aggregated prediction-market listings
//!
//! Listings scraped from several platforms frequently describe the same
//! market. This crate decides which records are equivalent under a
//! configurable normalization policy and flags every member of a group that
//! occurs more than once.
//!
//! ## Features
//! - Normalize string fields with independent case and whitespace switches
//! - Canonicalize numbers and nested structures so key order never matters
//! - Two-pass frequency count and flagging, with no state kept between runs
//! - File-level pass that loads, annotates, and rewrites a JSON array file

pub mod detector;
pub mod normalizer;

pub use detector::{
    detect_file, DetectionReport, DetectorConfig, DuplicateDetector, FrequencyTable,
};
pub use normalizer::{normalize, NormalizationPolicy, NormalizedKey};
