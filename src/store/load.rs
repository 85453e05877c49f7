use bson::{Bson, Document as BsonDocument};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use super::MemoryStore;
use crate::errors::DirectoryError;
use crate::utils::num::usize_to_u64;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub inserted: u64,
    pub skipped: u64,
}

/// Reads every record of `path` into `store`.
///
/// # Errors
/// Fails on I/O errors or on the first record that is not a JSON object with a
/// string `name`; nothing is inserted in that case.
pub fn load_documents(store: &MemoryStore, path: &Path) -> Result<LoadReport, DirectoryError> {
    let file = File::open(path)
        .map_err(|e| DirectoryError::Io(format!("{}: {e}", path.display())))?;
    let (docs, skipped) = read_documents(file)?;
    let inserted = store.insert_many(docs);
    let report = LoadReport { inserted: usize_to_u64(inserted), skipped };
    log::info!(
        "loaded {} restaurants from {} (skipped {} blank lines)",
        report.inserted,
        path.display(),
        report.skipped
    );
    Ok(report)
}

/// Parses a JSON array or NDJSON stream of restaurant documents. Extended JSON
/// wrappers such as `{"$date": ...}` become native BSON values.
///
/// # Errors
/// Returns `InvalidDocument` for unparsable lines or records without a `name`.
pub fn read_documents<R: Read>(reader: R) -> Result<(Vec<BsonDocument>, u64), DirectoryError> {
    let mut reader = BufReader::new(reader);
    let mut docs = Vec::new();
    let mut skipped = 0u64;

    let array_mode = loop {
        let first = reader.fill_buf()?.first().copied();
        match first {
            None => return Ok((docs, skipped)),
            Some(b) if b.is_ascii_whitespace() => reader.consume(1),
            Some(b) => break b == b'[',
        }
    };

    if array_mode {
        // Read entire content and parse as JSON array (sufficient for the dataset sizes we serve)
        let mut s = String::new();
        reader.read_to_string(&mut s)?;
        let serde_json::Value::Array(arr) = serde_json::from_str(&s)? else {
            return Err(DirectoryError::InvalidDocument("expected JSON array".into()));
        };
        for (i, v) in arr.into_iter().enumerate() {
            docs.push(to_restaurant_document(v, i + 1)?);
        }
        return Ok((docs, skipped));
    }

    let mut line_no: usize = 0;
    let mut buf = String::with_capacity(8 * 1024);
    loop {
        buf.clear();
        let n = reader.read_line(&mut buf)?;
        if n == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim();
        if line.is_empty() {
            skipped += 1;
            continue;
        }
        let v: serde_json::Value = serde_json::from_str(line).map_err(|e| {
            DirectoryError::InvalidDocument(format!("record {line_no}: {e}"))
        })?;
        docs.push(to_restaurant_document(v, line_no)?);
    }
    Ok((docs, skipped))
}

fn to_restaurant_document(v: serde_json::Value, record: usize) -> Result<BsonDocument, DirectoryError> {
    let bson = Bson::try_from(v)
        .map_err(|e| DirectoryError::InvalidDocument(format!("record {record}: {e}")))?;
    match bson {
        Bson::Document(d) if matches!(d.get("name"), Some(Bson::String(_))) => Ok(d),
        Bson::Document(_) => Err(DirectoryError::InvalidDocument(format!(
            "record {record}: missing string `name`"
        ))),
        _ => Err(DirectoryError::InvalidDocument(format!("record {record}: expected object"))),
    }
}
