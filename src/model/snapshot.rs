//! Snapshot value types

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::solver;

/// An account's cumulative cash position at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowSnapshot {
    /// Snapshot date (first day of month); `None` when unknown
    pub as_of_date: Option<NaiveDate>,

    /// Total cash received up to this date
    pub cumulative_inflow: f64,

    /// Total cash spent up to this date
    pub cumulative_outflow: f64,

    /// Estimated value of the account at this date
    pub valuation: f64,

    /// Owning account identifier
    pub account_id: String,
}

impl CashflowSnapshot {
    pub fn new(
        as_of_date: Option<NaiveDate>,
        cumulative_inflow: f64,
        cumulative_outflow: f64,
        valuation: f64,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            as_of_date,
            cumulative_inflow,
            cumulative_outflow,
            valuation,
            account_id: account_id.into(),
        }
    }

    /// True if this snapshot is strictly later than `other`.
    ///
    /// A snapshot without a date is never later than anything, and is earlier
    /// than every dated snapshot.
    pub fn is_later_than(&self, other: &CashflowSnapshot) -> bool {
        match (self.as_of_date, other.as_of_date) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(this), Some(that)) => this > that,
        }
    }

    /// Chronological ordering used for sorting; only the date participates
    pub fn chronological_cmp(&self, other: &CashflowSnapshot) -> Ordering {
        if self.is_later_than(other) {
            Ordering::Greater
        } else if other.is_later_than(self) {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    /// Net cash put into the account so far (outflow positive, inflow reduces it)
    pub fn net_outflow(&self) -> f64 {
        self.cumulative_outflow - self.cumulative_inflow
    }

    /// Net outflow plus valuation, treating the account as liquidated at this date
    pub fn terminal_value(&self) -> f64 {
        self.valuation + self.net_outflow()
    }
}

/// Rolling IRR for an account at a snapshot date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrSnapshot {
    /// Date of the cashflow snapshot that produced this rate
    pub as_of_date: Option<NaiveDate>,

    /// Monthly rate rounded to 4 decimals; `None` when the solver found no rate
    pub rate_per_period: Option<f64>,

    /// Owning account identifier
    pub account_id: String,
}

impl IrrSnapshot {
    pub fn new(
        as_of_date: Option<NaiveDate>,
        rate_per_period: Option<f64>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            as_of_date,
            rate_per_period,
            account_id: account_id.into(),
        }
    }

    /// Annualized IRR with monthly compounding, rounded to 4 decimals
    pub fn annualized_rate(&self) -> Option<f64> {
        self.rate_per_period.map(solver::annualize)
    }

    /// Both the monthly and annual rates are defined and finite
    pub fn is_resolved(&self) -> bool {
        match (self.rate_per_period, self.annualized_rate()) {
            (Some(monthly), Some(annual)) => monthly.is_finite() && annual.is_finite(),
            _ => false,
        }
    }
}
