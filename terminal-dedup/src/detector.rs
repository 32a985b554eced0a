//! Frequency-based duplicate detection over record sets

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use terminal_core::{RecordSet, TerminalResult, DUPLICATE_FLAG};

use crate::normalizer::{normalize, NormalizationPolicy, NormalizedKey};

/// Configuration for the duplicate detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Record field whose normalized value defines equivalence
    pub key_field: String,
    /// Case and whitespace folding applied to the key field
    pub policy: NormalizationPolicy,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            key_field: "product".to_string(),
            policy: NormalizationPolicy::default(),
        }
    }
}

/// Occurrence count of each normalized key within one detection pass
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<NormalizedKey, usize>,
}

impl FrequencyTable {
    /// Count every non-null key
    pub fn from_keys<'a, I>(keys: I) -> Self
    where
        I: IntoIterator<Item = &'a Option<NormalizedKey>>,
    {
        let mut counts: HashMap<NormalizedKey, usize> = HashMap::new();
        for key in keys.into_iter().flatten() {
            *counts.entry(key.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, key: &NormalizedKey) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Whether `key` occurs more than once
    pub fn is_repeated(&self, key: &NormalizedKey) -> bool {
        self.count(key) > 1
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Outcome of one detection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DetectionReport {
    /// Mapping-typed records that were annotated
    pub processed: usize,
    /// Records flagged `is_duplicate = true`
    pub duplicates: usize,
    /// Non-mapping entries passed through untouched
    pub skipped: usize,
    /// Distinct non-null normalized keys
    pub distinct_keys: usize,
}

impl fmt::Display for DetectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} objects. {} duplicates were flagged.",
            self.processed, self.duplicates
        )?;
        if self.skipped > 0 {
            write!(f, " {} non-object entries were skipped.", self.skipped)?;
        }
        Ok(())
    }
}

/// Flags records whose key field collides with another record's after normalization
#[derive(Debug, Clone, Default)]
pub struct DuplicateDetector {
    config: DetectorConfig,
}

impl DuplicateDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Normalized key of every entry, index-aligned with `entries`.
    ///
    /// Non-object entries and null or missing key fields yield `None`.
    pub fn keys(&self, entries: &[Value]) -> Vec<Option<NormalizedKey>> {
        entries
            .iter()
            .map(|entry| {
                entry.as_object().and_then(|record| {
                    normalize(record.get(&self.config.key_field), self.config.policy)
                })
            })
            .collect()
    }

    /// Annotate every object entry with `is_duplicate`.
    ///
    /// Only the key field is read and only the flag is written, so running the
    /// pass again over its own output yields the same flags. Non-object entries
    /// are left exactly as they were.
    pub fn detect(&self, entries: &mut [Value]) -> DetectionReport {
        let keys = self.keys(entries);
        let table = FrequencyTable::from_keys(&keys);
        debug!(
            "Built frequency table: {} entries, {} distinct keys on '{}'",
            entries.len(),
            table.len(),
            self.config.key_field
        );

        let mut report = DetectionReport {
            distinct_keys: table.len(),
            ..DetectionReport::default()
        };

        for (entry, key) in entries.iter_mut().zip(&keys) {
            let Some(record) = entry.as_object_mut() else {
                report.skipped += 1;
                continue;
            };
            let is_duplicate = key.as_ref().is_some_and(|k| table.is_repeated(k));
            record.insert(DUPLICATE_FLAG.to_string(), Value::Bool(is_duplicate));
            report.processed += 1;
            if is_duplicate {
                report.duplicates += 1;
            }
        }

        report
    }

    /// Run detection over a whole record set
    pub fn detect_set(&self, set: &mut RecordSet) -> DetectionReport {
        self.detect(set.entries_mut())
    }
}

/// Load a JSON array file, flag duplicates, and write the annotated array to `output`.
///
/// A file whose top level is not an array is rejected before anything is written.
#[instrument(skip(config), fields(key_field = %config.key_field))]
pub fn detect_file(
    input: &Path,
    output: &Path,
    config: &DetectorConfig,
) -> TerminalResult<DetectionReport> {
    let mut set = RecordSet::load(input)?;
    let report = DuplicateDetector::new(config.clone()).detect_set(&mut set);
    set.save(output)?;
    info!("{}", report);
    Ok(report)
}
