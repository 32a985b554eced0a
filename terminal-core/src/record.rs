//! Scraped market records and the flat JSON files that carry them

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::error::{TerminalError, TerminalResult};

/// Field written by the duplicate detector on every mapping-typed record
pub const DUPLICATE_FLAG: &str = "is_duplicate";

/// A single scraped item: an ordered mapping of field name to JSON value.
///
/// Field order is preserved through load and save, so annotating a record
/// only ever appends (or overwrites) the duplicate flag.
pub type Record = Map<String, Value>;

/// An ordered collection of scraped entries as found in a flat JSON array file.
///
/// Entries are kept as raw JSON values rather than [`Record`]s: the sources are
/// not trusted to emit only objects, and non-object entries must survive a
/// round trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordSet {
    entries: Vec<Value>,
}

impl RecordSet {
    /// Create a record set from already-parsed entries
    pub fn new(entries: Vec<Value>) -> Self {
        Self { entries }
    }

    /// Build a record set from a parsed JSON document.
    ///
    /// The document must be a top-level array.
    pub fn from_value(value: Value) -> TerminalResult<Self> {
        match value {
            Value::Array(entries) => Ok(Self { entries }),
            other => Err(TerminalError::malformed(format!(
                "expected a top-level JSON array of records, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parse a record set from JSON text
    pub fn from_json_str(json: &str) -> TerminalResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Load a record set from a UTF-8 JSON file
    #[instrument]
    pub fn load(path: &Path) -> TerminalResult<Self> {
        let contents = fs::read_to_string(path)?;
        let set = Self::from_json_str(&contents).map_err(|e| match e {
            TerminalError::MalformedInput(msg) => {
                TerminalError::malformed(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        info!("Loaded {} entries from {}", set.len(), path.display());
        Ok(set)
    }

    /// Write the record set as pretty-printed JSON.
    ///
    /// Non-ASCII text is written verbatim rather than escaped.
    #[instrument(skip(self))]
    pub fn save(&self, path: &Path) -> TerminalResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.entries)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        info!("Saved {} entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Concatenate several record sets, preserving source order
    pub fn merge<I>(sets: I) -> Self
    where
        I: IntoIterator<Item = RecordSet>,
    {
        let mut entries = Vec::new();
        for set in sets {
            debug!("Merging {} entries", set.len());
            entries.extend(set.entries);
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [Value] {
        &mut self.entries
    }

    pub fn into_entries(self) -> Vec<Value> {
        self.entries
    }

    /// Iterate over the mapping-typed entries only
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().filter_map(Value::as_object)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Value>> for RecordSet {
    fn from(entries: Vec<Value>) -> Self {
        Self::new(entries)
    }
}

/// Whether a record carries `is_duplicate: true`.
///
/// A missing or non-boolean flag counts as "not a duplicate".
pub fn is_flagged_duplicate(record: &Record) -> bool {
    record
        .get(DUPLICATE_FLAG)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
