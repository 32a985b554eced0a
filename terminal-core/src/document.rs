//! Listing documents: the text form of a record that gets embedded

use serde::Serialize;
use serde_json::Value;

use crate::record::{is_flagged_duplicate, Record, RecordSet};

/// A deduplicated market listing together with its display text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketDocument {
    /// The original scraped record
    pub record: Record,
    /// Text submitted to the embedding provider and shown to the synthesizer
    pub text: String,
}

impl MarketDocument {
    /// Render a record as a listing document.
    ///
    /// Format:
    /// ```text
    /// Product: <product>
    /// Price: <price>
    /// Site: <site>
    /// ```
    /// Missing fields fall back to `N/A`, `0` and `N/A` respectively.
    pub fn from_record(record: Record) -> Self {
        let text = format!(
            "Product: {}\nPrice: {}\nSite: {}",
            field_text(&record, "product", "N/A"),
            field_text(&record, "price", "0"),
            field_text(&record, "site", "N/A"),
        );
        Self { record, text }
    }

    /// Text with line breaks flattened, for one-line display
    pub fn one_line(&self) -> String {
        self.text.replace('\n', " | ")
    }
}

impl AsRef<str> for MarketDocument {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Build listing documents from every record not flagged as a duplicate.
///
/// Non-object entries are ignored. A record without a duplicate flag is kept.
pub fn unique_documents(set: &RecordSet) -> Vec<MarketDocument> {
    set.records()
        .filter(|record| !is_flagged_duplicate(record))
        .cloned()
        .map(MarketDocument::from_record)
        .collect()
}

fn field_text(record: &Record, field: &str, default: &str) -> String {
    match record.get(field) {
        None => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
