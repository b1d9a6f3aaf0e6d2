//! Load cashflow snapshots from CSV

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::Reader;
use log::info;

use super::SourceRepository;
use crate::error::{IrrError, Result};
use crate::model::CashflowSnapshot;

/// Raw CSV row matching the staging cashflow table columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    first_day_of_month: Option<NaiveDate>,
    inflow: f64,
    outflow: f64,
    value: f64,
    entity_name: String,
}

impl CsvRow {
    fn into_snapshot(self) -> CashflowSnapshot {
        CashflowSnapshot::new(
            self.first_day_of_month,
            self.inflow,
            self.outflow,
            self.value,
            self.entity_name,
        )
    }
}

/// Load cashflow snapshots from any reader (e.g., string buffer, file)
pub fn load_cashflow_snapshots_from_reader<R: Read>(reader: R) -> Result<Vec<CashflowSnapshot>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut snapshots = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        snapshots.push(row.into_snapshot());
    }

    Ok(snapshots)
}

/// Snapshot source backed by a CSV file
#[derive(Debug, Clone)]
pub struct CsvSourceRepository {
    path: PathBuf,
}

impl CsvSourceRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceRepository for CsvSourceRepository {
    fn get_cashflow_snapshots(&self) -> Result<Vec<CashflowSnapshot>> {
        let file = File::open(&self.path).map_err(|e| {
            IrrError::Source(format!("cannot open {}: {}", self.path.display(), e))
        })?;
        let snapshots = load_cashflow_snapshots_from_reader(file)?;
        info!("Read {} cashflow snapshots from {}", snapshots.len(), self.path.display());
        Ok(snapshots)
    }
}
