use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write `records` as CSV with a header row taken from the field names
pub fn write_csv<W: Write, T: Serialize>(writer: W, records: &[T]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    for record in records {
        wtr.serialize(record)
            .context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV")?;
    Ok(())
}

/// Write `records` to a CSV file at `path`, replacing any existing file
pub fn save_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, records)
}
