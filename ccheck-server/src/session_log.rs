//! Append-only session log with CSV export

use ccheck_common::{Error, LogRow, Result};

/// Download file name for the CSV export
pub const CSV_FILE_NAME: &str = "copyright_check_log.csv";
pub const CSV_MIME: &str = "text/csv";
pub const CSV_HEADER: [&str; 3] = ["Type", "Input", "Result"];

/// Ordered record of one session's completed checks
///
/// Rows are only ever appended.
#[derive(Debug, Default, Clone)]
pub struct SessionLog {
    rows: Vec<LogRow>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, row: LogRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[LogRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize all rows as UTF-8 CSV with a `Type,Input,Result` header
    ///
    /// # Errors
    /// `Error::NothingToExport` when the log is empty.
    pub fn export_csv(&self) -> Result<Vec<u8>> {
        if self.rows.is_empty() {
            return Err(Error::NothingToExport);
        }

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(CSV_HEADER)?;
        for row in &self.rows {
            writer.write_record([
                row.type_label(),
                row.input_summary.as_str(),
                row.verdict.as_str(),
            ])?;
        }

        writer
            .into_inner()
            .map_err(|e| Error::Internal(format!("CSV flush failed: {}", e)))
    }
}
