use std::io::Write;
use std::path::Path;

use log::info;
use tempfile::NamedTempFile;

use super::{CsvOptions, ExportConfig, ExportError, ExportSummary, ExportTable};
use crate::experiment::Experiment;

const INDEX_COLUMN: &str = "index";

/// Serialize an export table as CSV into any writer
pub fn write_csv<W: Write>(table: &ExportTable, writer: W, options: &CsvOptions) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(table.columns().len() + 1);
    if options.index {
        header.push(INDEX_COLUMN);
    }
    header.extend(table.columns().iter().map(String::as_str));
    csv_writer.write_record(&header)?;

    let mut record: Vec<String> = Vec::with_capacity(header.len());
    for row in table.rows() {
        record.clear();
        if options.index {
            record.push(row.consensus.index().to_string());
        }
        record.extend(row.cells.iter().map(|cell| match cell {
            Some(value) => value.to_string(),
            None => options.na_rep.clone(),
        }));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write an export table to `path` atomically
///
/// The table is written to a temporary file in the target directory, which
/// replaces `path` only once complete. On error no file is left behind.
pub fn write_csv_file<P: AsRef<Path>>(table: &ExportTable, path: P, options: &CsvOptions) -> Result<(), ExportError> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    write_csv(table, &mut tmp, options)?;
    tmp.as_file().sync_all()?;
    // Dropping the returned file removes the temporary copy
    tmp.persist(path)
        .map_err(|err| ExportError::PersistError(err.error))?;
    Ok(())
}

impl Experiment {
    /// Export to a CSV file
    ///
    /// Uses the same filtering as [`Experiment::export_table`]. Invalid
    /// configuration fails before the target is touched.
    pub fn export_to_csv<P: AsRef<Path>>(
        &self,
        path: P,
        config: &ExportConfig,
        options: &CsvOptions,
    ) -> Result<ExportSummary, ExportError> {
        let path = path.as_ref();
        let table = self.export_table(config)?;
        write_csv_file(&table, path, options)?;
        info!("Wrote {} rows to {}", table.rows().len(), path.display());
        Ok(table.summary())
    }
}
