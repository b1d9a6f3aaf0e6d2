//! Snapshot value types, the account aggregate and account collection building

mod snapshot;
mod account;
pub mod collection;

pub use snapshot::{CashflowSnapshot, IrrSnapshot};
pub use account::Account;
pub use collection::{allocate_cashflow_snapshots, build_accounts, create_accounts, AccountMap};
