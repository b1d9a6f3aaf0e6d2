//! Rolling IRR - expanding-window internal rate of return per account
//!
//! This library provides:
//! - Cashflow and IRR snapshot value types with chronological ordering
//! - Per-account aggregation of unordered snapshot lists
//! - The rolling IRR computation and its periodic rate solver
//! - Source/destination collaborators and the end-to-end pipeline

pub mod error;
pub mod model;
pub mod solver;
pub mod repository;
pub mod config;
pub mod services;

// Re-export commonly used types
pub use error::{IrrError, Result};
pub use model::{Account, AccountMap, CashflowSnapshot, IrrSnapshot, build_accounts};
pub use solver::solve_periodic_rate;
pub use repository::{DestinationRepository, SourceRepository};
pub use config::PipelineConfig;
pub use services::{irr_pipeline, PipelineSummary};
