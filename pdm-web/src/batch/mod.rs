//! Batch prediction jobs
//!
//! One upload-to-download lifecycle: save the raw upload, parse it, drop
//! the identifier column, predict every row with the failure-type model,
//! decode labels, and write the `output_` result file next to the input.
//! The result is only reachable once it has been written in full.

pub mod storage;
pub mod table;

pub use storage::UploadStore;
pub use table::CsvTable;

use pdm_common::labels::{decode_failure_labels, PREDICTED_VALUE_COLUMN};
use pdm_common::reading::normalize_table;
use pdm_common::Result;
use tracing::info;

use crate::filename::output_filename;
use crate::gateway::PredictionGateway;

/// A finished batch job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub input_name: String,
    pub output_name: String,
    pub rows: usize,
}

/// Everything a batch job needs, borrowed from application state
pub struct BatchFlow<'a> {
    pub gateway: &'a PredictionGateway,
    pub store: &'a UploadStore,
    pub identifier_column: Option<&'a str>,
}

impl BatchFlow<'_> {
    /// Run one job for an already validated and sanitized input name
    pub async fn run(&self, input_name: &str, bytes: &[u8]) -> Result<BatchJob> {
        self.store.save(input_name, bytes).await?;

        let mut table = CsvTable::parse(bytes)?;
        let rows = normalize_table(&table.headers, &table.rows, self.identifier_column)?;

        let labels = if rows.is_empty() {
            Vec::new()
        } else {
            let codes = self.gateway.predict(rows).await?;
            decode_failure_labels(&codes)?
        };
        table.set_column(PREDICTED_VALUE_COLUMN, &labels)?;

        let output_name = output_filename(input_name);
        self.store.save(&output_name, &table.to_csv_bytes()?).await?;

        info!(
            "Batch {} -> {} ({} rows)",
            input_name,
            output_name,
            table.len()
        );

        Ok(BatchJob {
            input_name: input_name.to_string(),
            output_name,
            rows: table.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdm_common::{Error, FeatureRow, ModelSummary, Predictor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Returns code `row index % 6`, or a fixed code when set
    struct Cycling {
        fixed: Option<i64>,
        calls: AtomicUsize,
    }

    impl Predictor for Cycling {
        fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<i64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((0..rows.len() as i64).map(|i| self.fixed.unwrap_or(i % 6)).collect())
        }
        fn summary(&self) -> ModelSummary {
            ModelSummary { name: "cycling".to_string(), version: None, classes: (0..6).collect(), features: 0 }
        }
    }

    const HEADER: &str = "UDI,Product ID,Type,Air temperature [K],Process temperature [K],Rotational speed [rpm],Torque [Nm],Tool wear [min]";

    fn csv_with_rows(n: usize) -> String {
        let mut s = format!("{}\n", HEADER);
        for i in 0..n {
            s.push_str(&format!("{},M{},M,298.1,308.6,1551,42.8,{}\n", i + 1, 14860 + i, i * 3));
        }
        s
    }

    async fn run(predictor: Arc<Cycling>, body: &str) -> (tempfile::TempDir, Result<BatchJob>) {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        let gateway = PredictionGateway::new("failure-type", predictor);
        let flow = BatchFlow { gateway: &gateway, store: &store, identifier_column: Some("UDI") };
        let result = flow.run("batch.csv", body.as_bytes()).await;
        (dir, result)
    }

    #[tokio::test]
    async fn test_output_is_input_plus_predicted_column() {
        let predictor = Arc::new(Cycling { fixed: None, calls: AtomicUsize::new(0) });
        let (dir, job) = run(predictor.clone(), &csv_with_rows(7)).await;
        let job = job.unwrap();

        assert_eq!(job.output_name, "output_batch.csv");
        assert_eq!(job.rows, 7);
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);

        let input = std::fs::read(dir.path().join("batch.csv")).unwrap();
        assert_eq!(input, csv_with_rows(7).as_bytes());

        let output = std::fs::read(dir.path().join("output_batch.csv")).unwrap();
        let out = CsvTable::parse(&output).unwrap();
        let inp = CsvTable::parse(&input).unwrap();
        assert_eq!(out.headers.len(), inp.headers.len() + 1);
        assert_eq!(&out.headers[..inp.headers.len()], &inp.headers[..]);
        assert_eq!(out.headers.last().unwrap(), "Predicted_Value");
        assert_eq!(out.len(), inp.len());
        for (o, i) in out.rows.iter().zip(&inp.rows) {
            assert_eq!(&o[..i.len()], &i[..]);
        }
        let labels: Vec<&str> = out.rows.iter().map(|r| r.last().unwrap().as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Heat Dissipation",
                "No Failure",
                "Over Strain",
                "Power Failure",
                "Random Failure",
                "Tool Wear Failure",
                "Heat Dissipation",
            ]
        );
    }

    #[tokio::test]
    async fn test_out_of_range_code_fails_whole_batch() {
        let predictor = Arc::new(Cycling { fixed: Some(6), calls: AtomicUsize::new(0) });
        let (dir, job) = run(predictor, &csv_with_rows(3)).await;
        assert!(matches!(job, Err(Error::Prediction(_))));
        assert!(!dir.path().join("output_batch.csv").exists());
    }

    #[tokio::test]
    async fn test_missing_columns_is_schema_error() {
        let predictor = Arc::new(Cycling { fixed: None, calls: AtomicUsize::new(0) });
        let (_dir, job) = run(predictor.clone(), "UDI,Type\n1,M\n").await;
        assert!(matches!(job, Err(Error::Schema(_))));
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_table_skips_classifier() {
        let predictor = Arc::new(Cycling { fixed: None, calls: AtomicUsize::new(0) });
        let (dir, job) = run(predictor.clone(), &csv_with_rows(0)).await;
        assert_eq!(job.unwrap().rows, 0);
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);

        let output = std::fs::read_to_string(dir.path().join("output_batch.csv")).unwrap();
        assert_eq!(output, format!("{},Predicted_Value\n", HEADER));
    }
}
