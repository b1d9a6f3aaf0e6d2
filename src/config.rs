//! Pipeline configuration
//!
//! Values come from environment variables and can be overridden from the
//! command line:
//!   IRR_SOURCE_PATH, IRR_DESTINATION_PATH, IRR_OUTPUT_FORMAT, IRR_PARALLEL

use std::env;
use std::path::PathBuf;

use crate::error::{IrrError, Result};
use crate::repository::OutputFormat;

pub const SOURCE_PATH_VAR: &str = "IRR_SOURCE_PATH";
pub const DESTINATION_PATH_VAR: &str = "IRR_DESTINATION_PATH";
pub const OUTPUT_FORMAT_VAR: &str = "IRR_OUTPUT_FORMAT";
pub const PARALLEL_VAR: &str = "IRR_PARALLEL";

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_path: Option<PathBuf>,
    pub destination_path: Option<PathBuf>,
    pub output_format: Option<OutputFormat>,
    pub sequential: bool,
}

/// Fully resolved pipeline configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// CSV file with cashflow snapshots
    pub source_path: PathBuf,

    /// File the IRR results replace
    pub destination_path: PathBuf,

    pub output_format: OutputFormat,

    /// Compute accounts in parallel with rayon
    pub parallel: bool,
}

impl PipelineConfig {
    /// Resolve from the process environment
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        Self::resolve(overrides, |key| env::var(key).ok())
    }

    /// Resolve using `lookup` for environment values; overrides win
    pub fn resolve<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let source_path = overrides
            .source_path
            .or_else(|| non_empty(SOURCE_PATH_VAR).map(PathBuf::from))
            .ok_or_else(|| IrrError::Config(format!("{} is not set", SOURCE_PATH_VAR)))?;

        let destination_path = overrides
            .destination_path
            .or_else(|| non_empty(DESTINATION_PATH_VAR).map(PathBuf::from))
            .ok_or_else(|| IrrError::Config(format!("{} is not set", DESTINATION_PATH_VAR)))?;

        let output_format = match overrides.output_format {
            Some(format) => format,
            None => match non_empty(OUTPUT_FORMAT_VAR) {
                Some(value) => OutputFormat::parse(&value)?,
                None => OutputFormat::infer_from_path(&destination_path),
            },
        };

        let parallel = if overrides.sequential {
            false
        } else {
            match non_empty(PARALLEL_VAR) {
                Some(value) => parse_flag(PARALLEL_VAR, &value)?,
                None => true,
            }
        };

        Ok(Self {
            source_path,
            destination_path,
            output_format,
            parallel,
        })
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(IrrError::Config(format!("{} must be a boolean, got '{}'", key, other))),
    }
}
