//! Write IRR results as CSV or newline-delimited JSON

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::ValueEnum;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{DestinationRepository, LoadReport};
use crate::error::{IrrError, Result};
use crate::model::AccountMap;

/// One persisted IRR row, named after the destination table columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrRecord {
    pub first_day_of_month: Option<NaiveDate>,
    pub irr_monthly: f64,
    pub irr_annual: f64,
    pub entity_name: String,
}

const CSV_HEADER: [&str; 4] = ["first_day_of_month", "irr_monthly", "irr_annual", "entity_name"];

/// Output encoding for file destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Ndjson,
}

impl OutputFormat {
    /// `.json`/`.ndjson`/`.jsonl` map to NDJSON, anything else to CSV
    pub fn infer_from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if matches!(ext.to_ascii_lowercase().as_str(), "json" | "ndjson" | "jsonl") => {
                OutputFormat::Ndjson
            }
            _ => OutputFormat::Csv,
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "ndjson" | "json" | "jsonl" => Ok(OutputFormat::Ndjson),
            other => Err(IrrError::Config(format!("unknown output format: {}", other))),
        }
    }
}

/// Collect persistable rows from every account.
///
/// Snapshots whose monthly or annual rate is unresolved are left out; the
/// second element of the result counts them.
pub fn resolved_irr_records(accounts: &AccountMap) -> (Vec<IrrRecord>, usize) {
    let mut records = Vec::new();
    let mut skipped = 0;

    for account in accounts.values() {
        for irr in account.irr_snapshots() {
            match (irr.is_resolved(), irr.rate_per_period, irr.annualized_rate()) {
                (true, Some(irr_monthly), Some(irr_annual)) => records.push(IrrRecord {
                    first_day_of_month: irr.as_of_date,
                    irr_monthly,
                    irr_annual,
                    entity_name: irr.account_id.clone(),
                }),
                _ => skipped += 1,
            }
        }
    }

    (records, skipped)
}

/// Encode records to any writer
pub fn write_irr_records<W: Write>(writer: W, records: &[IrrRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut csv_writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(writer);
            csv_writer.write_record(CSV_HEADER)?;
            for record in records {
                csv_writer.serialize(record)?;
            }
            csv_writer.flush()?;
        }
        OutputFormat::Ndjson => {
            let mut writer = writer;
            for record in records {
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

/// Destination backed by a single file, replaced in full on every load
#[derive(Debug, Clone)]
pub struct FileDestinationRepository {
    path: PathBuf,
    format: OutputFormat,
}

impl FileDestinationRepository {
    pub fn new<P: AsRef<Path>>(path: P, format: OutputFormat) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".partial");
        self.path.with_file_name(name)
    }

    fn replace_contents(&self, records: &[IrrRecord]) -> Result<()> {
        let staging = self.staging_path();
        let file = File::create(&staging)?;
        write_irr_records(BufWriter::new(file), records, self.format)?;
        // Readers never observe a half-written destination
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl DestinationRepository for FileDestinationRepository {
    fn load_irrs(&mut self, accounts: &AccountMap) -> Result<LoadReport> {
        let (records, skipped) = resolved_irr_records(accounts);
        if skipped > 0 {
            warn!("Skipping {} IRR snapshots with unresolved rates", skipped);
        }

        self.replace_contents(&records).map_err(|e| match e {
            IrrError::Io(io) => {
                IrrError::Destination(format!("cannot write {}: {}", self.path.display(), io))
            }
            other => other,
        })?;

        info!("Wrote {} IRR rows to {}", records.len(), self.path.display());
        Ok(LoadReport {
            written: records.len(),
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Account, CashflowSnapshot};

    fn date(y: i32, m: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, 1)
    }

    fn computed_accounts() -> AccountMap {
        let mut accounts = AccountMap::new();

        let mut growing = Account::new("growing");
        growing.add_cashflow(CashflowSnapshot::new(date(2022, 1), 1000.0, 0.0, 0.0, "growing"));
        growing.add_cashflow(CashflowSnapshot::new(date(2022, 2), 0.0, 100.0, 1000.0, "growing"));
        growing.calculate_irr();
        accounts.insert("growing".to_string(), growing);

        let mut stuck = Account::new("stuck");
        stuck.add_cashflow(CashflowSnapshot::new(date(2022, 1), 0.0, 500.0, 0.0, "stuck"));
        stuck.add_cashflow(CashflowSnapshot::new(date(2022, 2), 0.0, 600.0, 700.0, "stuck"));
        stuck.calculate_irr();
        accounts.insert("stuck".to_string(), stuck);

        accounts
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rolling_irr_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_unresolved_rates_are_filtered() {
        let (records, skipped) = resolved_irr_records(&computed_accounts());

        assert_eq!(skipped, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entity_name, "growing");
        assert_eq!(records[0].first_day_of_month, date(2022, 2));
        assert!((records[0].irr_monthly - 0.1).abs() < 1e-12);
        assert!((records[0].irr_annual - 2.1384).abs() < 1e-12);
    }

    #[test]
    fn test_write_csv() {
        let (records, _) = resolved_irr_records(&computed_accounts());
        let mut buffer = Vec::new();
        write_irr_records(&mut buffer, &records, OutputFormat::Csv).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "first_day_of_month,irr_monthly,irr_annual,entity_name\n2022-02-01,0.1,2.1384,growing\n"
        );
    }

    #[test]
    fn test_write_csv_empty_has_header() {
        let mut buffer = Vec::new();
        write_irr_records(&mut buffer, &[], OutputFormat::Csv).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "first_day_of_month,irr_monthly,irr_annual,entity_name\n"
        );
    }

    #[test]
    fn test_write_ndjson() {
        let (records, _) = resolved_irr_records(&computed_accounts());
        let mut buffer = Vec::new();
        write_irr_records(&mut buffer, &records, OutputFormat::Ndjson).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let parsed: IrrRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, records[0]);
    }

    #[test]
    fn test_file_destination_replaces_contents() {
        let path = temp_path("replace.csv");
        fs::write(&path, "stale contents that must disappear\n").unwrap();

        let mut destination = FileDestinationRepository::new(&path, OutputFormat::Csv);
        let report = destination.load_irrs(&computed_accounts()).unwrap();
        assert_eq!(report, LoadReport { written: 1, skipped: 1 });

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("stale"));
        assert_eq!(contents.lines().count(), 2);
        assert!(!destination.staging_path().exists());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unwritable_destination_fails() {
        let mut destination =
            FileDestinationRepository::new("/definitely/not/here/irrs.csv", OutputFormat::Csv);
        let err = destination.load_irrs(&computed_accounts()).unwrap_err();
        assert!(matches!(err, IrrError::Destination(_)));
    }

    #[test]
    fn test_output_format_selection() {
        assert_eq!(OutputFormat::infer_from_path(Path::new("out/irrs.csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::infer_from_path(Path::new("irrs.NDJSON")), OutputFormat::Ndjson);
        assert_eq!(OutputFormat::infer_from_path(Path::new("irrs.json")), OutputFormat::Ndjson);
        assert_eq!(OutputFormat::infer_from_path(Path::new("irrs")), OutputFormat::Csv);
        assert_eq!(OutputFormat::parse(" NDJSON ").unwrap(), OutputFormat::Ndjson);
        assert!(matches!(OutputFormat::parse("parquet"), Err(IrrError::Config(_))));
    }
}
