//! In-memory CSV table for batch uploads
//!
//! Cells are kept as the uploaded text so the result file reproduces the
//! input columns untouched.

use pdm_common::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse an uploaded file with a header row
    ///
    /// An empty file, a missing header or rows of uneven width are schema
    /// errors.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(Error::Schema("uploaded file is empty".to_string()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::Schema(format!("malformed CSV header: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(Error::Schema("CSV header row is empty".to_string()));
        }

        let rows = reader
            .records()
            .map(|record| {
                record
                    .map(|r| r.iter().map(str::to_string).collect())
                    .map_err(|e| Error::Schema(format!("malformed CSV: {}", e)))
            })
            .collect::<Result<Vec<Vec<String>>>>()?;

        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Set `column` to `values`, one per row
    ///
    /// The column is appended, or overwritten in place when the header
    /// already has it.
    pub fn set_column(&mut self, column: &str, values: &[&str]) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(Error::Prediction(format!(
                "{} values for {} rows",
                values.len(),
                self.rows.len()
            )));
        }

        match self.headers.iter().position(|h| h == column) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    if row.len() <= idx {
                        row.resize(idx + 1, String::new());
                    }
                    row[idx] = value.to_string();
                }
            }
            None => {
                self.headers.push(column.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value.to_string());
                }
            }
        }
        Ok(())
    }

    /// Serialize back to CSV bytes with a header row
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers).map_err(std::io::Error::from)?;
        for row in &self.rows {
            writer.write_record(row).map_err(std::io::Error::from)?;
        }
        writer
            .into_inner()
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))
    }
}
