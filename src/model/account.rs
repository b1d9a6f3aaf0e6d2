//! Account aggregate and rolling IRR computation

use std::hash::{Hash, Hasher};

use log::{debug, info};

use super::{CashflowSnapshot, IrrSnapshot};
use crate::solver::{round_rate, solve_periodic_rate};

/// A financial account holding its cashflow history and the IRR series
/// derived from it.
///
/// Identity is the account identifier alone: two accounts with the same
/// identifier are equal and hash the same regardless of their contents.
#[derive(Debug, Clone)]
pub struct Account {
    account_id: String,

    /// Kept in chronological order after every insertion
    sorted_cashflow_snapshots: Vec<CashflowSnapshot>,

    /// Replaced wholesale by each `calculate_irr` call
    irr_snapshots: Vec<IrrSnapshot>,
}

impl Account {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            sorted_cashflow_snapshots: Vec::new(),
            irr_snapshots: Vec::new(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Cashflow snapshots in chronological order
    pub fn cashflow_snapshots(&self) -> &[CashflowSnapshot] {
        &self.sorted_cashflow_snapshots
    }

    /// IRR series from the last `calculate_irr` call
    pub fn irr_snapshots(&self) -> &[IrrSnapshot] {
        &self.irr_snapshots
    }

    /// Add a snapshot, keeping the collection chronologically sorted.
    ///
    /// The snapshot goes after every existing entry that is not later than
    /// it, which is where a stable re-sort of the appended list would put it.
    pub fn add_cashflow(&mut self, snapshot: CashflowSnapshot) {
        let position = self
            .sorted_cashflow_snapshots
            .partition_point(|existing| !existing.is_later_than(&snapshot));
        self.sorted_cashflow_snapshots.insert(position, snapshot);
    }

    /// Recompute the rolling IRR series from the cashflow history.
    ///
    /// The window starts with the first snapshot's net outflow. For every
    /// later snapshot its terminal value (valuation plus net outflow) is
    /// appended, the rate is solved, and then that last period is rewritten
    /// to the plain net outflow so the next extension does not count the
    /// valuation twice.
    pub fn calculate_irr(&mut self) {
        self.irr_snapshots = Vec::new();

        if self.sorted_cashflow_snapshots.len() < 2 {
            info!("Not enough values for {}", self.account_id);
            return;
        }

        let first = &self.sorted_cashflow_snapshots[0];
        let rest = &self.sorted_cashflow_snapshots[1..];

        let mut periodic_cashflows = Vec::with_capacity(self.sorted_cashflow_snapshots.len());
        periodic_cashflows.push(first.net_outflow());

        let mut irr_snapshots = Vec::with_capacity(rest.len());
        for snapshot in rest {
            periodic_cashflows.push(snapshot.terminal_value());

            let rate = solve_periodic_rate(&periodic_cashflows).map(round_rate);
            irr_snapshots.push(IrrSnapshot::new(
                snapshot.as_of_date,
                rate,
                self.account_id.clone(),
            ));

            if let Some(last) = periodic_cashflows.last_mut() {
                *last = snapshot.net_outflow();
            }
        }

        let unresolved = irr_snapshots
            .iter()
            .filter(|irr| irr.rate_per_period.is_none())
            .count();
        debug!(
            "Computed {} IRR snapshots for {} ({} unresolved)",
            irr_snapshots.len(),
            self.account_id,
            unresolved
        );

        self.irr_snapshots = irr_snapshots;
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.account_id == other.account_id
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.account_id.hash(state);
    }
}
