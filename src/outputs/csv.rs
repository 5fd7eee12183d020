//! CSV export of collected articles.

use csv::Writer;
use tracing::{info, instrument};

use super::{ExportError, ExportRecord};

/// Serialize records as CSV with a header row.
#[instrument(level = "info", skip_all, fields(rows = records.len()))]
pub fn to_csv(records: &[ExportRecord]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    if records.is_empty() {
        // serde-driven headers are only emitted alongside the first row
        writer.write_record(["title", "link", "source", "published", "keyword"])?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    let csv = String::from_utf8(bytes)?;
    info!(bytes = csv.len(), "Rendered CSV export");
    Ok(csv)
}

/// Read records back from a CSV export.
#[cfg(test)]
pub fn from_csv(data: &str) -> Result<Vec<ExportRecord>, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
