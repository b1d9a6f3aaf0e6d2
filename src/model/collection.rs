//! Grouping of flat snapshot lists into per-account aggregates

use std::collections::BTreeMap;

use super::{Account, CashflowSnapshot};
use crate::error::{IrrError, Result};

/// Accounts keyed by account identifier
pub type AccountMap = BTreeMap<String, Account>;

/// Create one empty account per distinct account identifier in `snapshots`
pub fn create_accounts(snapshots: &[CashflowSnapshot]) -> AccountMap {
    let mut accounts = AccountMap::new();
    for snapshot in snapshots {
        accounts
            .entry(snapshot.account_id.clone())
            .or_insert_with(|| Account::new(snapshot.account_id.clone()));
    }
    accounts
}

/// Hand every snapshot to its owning account, in input order.
///
/// Fails with [`IrrError::UnknownAccount`] if a snapshot's account was not
/// created beforehand.
pub fn allocate_cashflow_snapshots(
    snapshots: Vec<CashflowSnapshot>,
    accounts: &mut AccountMap,
) -> Result<()> {
    for snapshot in snapshots {
        let account = accounts
            .get_mut(&snapshot.account_id)
            .ok_or_else(|| IrrError::UnknownAccount(snapshot.account_id.clone()))?;
        account.add_cashflow(snapshot);
    }
    Ok(())
}

/// Build the account collection for a flat, unordered list of snapshots
pub fn build_accounts(snapshots: Vec<CashflowSnapshot>) -> Result<AccountMap> {
    let mut accounts = create_accounts(&snapshots);
    allocate_cashflow_snapshots(snapshots, &mut accounts)?;
    Ok(accounts)
}
