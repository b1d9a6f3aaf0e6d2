//! IRR pipeline: read snapshots, build accounts, compute, write

use log::info;
use rayon::prelude::*;

use crate::error::Result;
use crate::model::{build_accounts, AccountMap};
use crate::repository::{DestinationRepository, LoadReport, SourceRepository};

/// Counts describing a completed pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub accounts: usize,
    pub cashflow_snapshots: usize,
    pub irr_snapshots: usize,
    pub unresolved_rates: usize,
    pub load: LoadReport,
}

/// Compute the rolling IRR series of every account.
///
/// Accounts share no state, so the parallel and sequential paths produce
/// identical results.
pub fn calculate_irrs(accounts: &mut AccountMap, parallel: bool) {
    if parallel {
        accounts
            .par_iter_mut()
            .for_each(|(_, account)| account.calculate_irr());
    } else {
        accounts
            .values_mut()
            .for_each(|account| account.calculate_irr());
    }
}

/// Run the full pipeline against the given collaborators.
///
/// Any source or destination failure aborts the run; nothing is salvaged.
pub fn irr_pipeline<S, D>(source: &S, destination: &mut D, parallel: bool) -> Result<PipelineSummary>
where
    S: SourceRepository + ?Sized,
    D: DestinationRepository + ?Sized,
{
    let snapshots = source.get_cashflow_snapshots()?;
    let cashflow_snapshots = snapshots.len();

    let mut accounts = build_accounts(snapshots)?;
    info!(
        "Built {} accounts from {} cashflow snapshots",
        accounts.len(),
        cashflow_snapshots
    );

    calculate_irrs(&mut accounts, parallel);

    let (irr_snapshots, unresolved_rates) = accounts
        .values()
        .flat_map(|account| account.irr_snapshots())
        .fold((0, 0), |(total, unresolved), irr| {
            (total + 1, unresolved + usize::from(irr.rate_per_period.is_none()))
        });

    let load = destination.load_irrs(&accounts)?;

    Ok(PipelineSummary {
        accounts: accounts.len(),
        cashflow_snapshots,
        irr_snapshots,
        unresolved_rates,
        load,
    })
}
