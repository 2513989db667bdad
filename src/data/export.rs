//! CSV export of record batches

use crate::data::extract::RecordBatch;
use crate::Result;
use std::io::Write;
use std::path::Path;

/// Write a header row and one line per record
pub fn write_records<W: Write>(writer: W, headers: &[&str], batch: &RecordBatch) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(headers)?;
    for record in &batch.records {
        csv_writer.write_record(record.fields())?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write a batch to a CSV file, creating parent directories
pub fn write_csv<P: AsRef<Path>>(path: P, headers: &[&str], batch: &RecordBatch) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_records(file, headers, batch)?;
    log::info!("Wrote {} row(s) to {}", batch.len(), path.display());
    Ok(())
}
