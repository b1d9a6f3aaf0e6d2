//! Periodic rate solver used by the rolling IRR computation

mod irr;

pub use irr::{annualize, npv_at_rate, round_rate, solve_periodic_rate, PERIODS_PER_YEAR};
