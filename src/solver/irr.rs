//! Internal Rate of Return (IRR) solver
//!
//! Finds the periodic rate that zeroes the net present value of a cashflow
//! series, where the series index is the period offset from zero.

use log::debug;

/// Compounding periods per year for monthly snapshots
pub const PERIODS_PER_YEAR: i32 = 12;

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 200;

/// Bracket search runs over u = ln(1 + r), stepping outward from 0.
/// |u| <= 50 covers 1 + r from about 2e-22 to 5e21.
const SEARCH_START: f64 = 1e-4;
const SEARCH_GROWTH: f64 = 1.25;
const SEARCH_LIMIT: f64 = 50.0;

/// Solve for the periodic rate `r > -1` such that
/// `sum(cashflows[i] / (1 + r)^i) == 0`.
///
/// Steps outward from r = 0 in both directions until the NPV changes sign,
/// then bisects that bracket. The first bracket found holds the root closest
/// to zero when several roots exist.
///
/// # Returns
/// * `Some(rate)` - periodic rate as a decimal (e.g., 0.1 for 10% per period)
/// * `None` - no rate exists or none could be found; callers treat this as
///   "no IRR available" rather than a failure
pub fn solve_periodic_rate(cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    // A flat zero series has no unique root
    if cashflows.iter().all(|&cf| cf.abs() < TOLERANCE) {
        return None;
    }

    // At least one sign change is required for an IRR to exist
    let has_positive = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let has_negative = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_positive || !has_negative {
        return None;
    }

    if cashflows.iter().any(|cf| !cf.is_finite()) {
        return None;
    }

    let at_zero = signed_value(cashflows, 0.0);
    if at_zero == 0.0 {
        return Some(0.0);
    }

    // Last finite (u, value) seen on each side of zero
    let mut below = (0.0, at_zero);
    let mut above = (0.0, at_zero);
    let mut step = SEARCH_START;

    while step <= SEARCH_LIMIT {
        let mut roots = Vec::with_capacity(2);

        for (last, u) in [(&mut below, -step), (&mut above, step)] {
            let value = signed_value(cashflows, u.exp_m1());
            if !value.is_finite() {
                continue;
            }
            if value == 0.0 {
                roots.push(u.exp_m1());
            } else if (value < 0.0) != (last.1 < 0.0) {
                roots.push(bisect(cashflows, (last.0, last.1), (u, value)));
            }
            *last = (u, value);
        }

        if let Some(rate) = roots.into_iter().min_by(|a, b| a.abs().total_cmp(&b.abs())) {
            return Some(rate);
        }

        step *= SEARCH_GROWTH;
    }

    debug!("No sign change found for a {}-period series", cashflows.len());
    None
}

/// Bisect between two points in u = ln(1 + r) whose values differ in sign
fn bisect(cashflows: &[f64], start: (f64, f64), end: (f64, f64)) -> f64 {
    let (mut low, mut value_low) = start;
    let (mut high, _) = end;

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        if (high.exp_m1() - low.exp_m1()).abs() < 1e-12 {
            return mid.exp_m1();
        }

        let value_mid = signed_value(cashflows, mid.exp_m1());
        if value_mid == 0.0 {
            return mid.exp_m1();
        }

        if (value_mid < 0.0) == (value_low < 0.0) {
            low = mid;
            value_low = value_mid;
        } else {
            high = mid;
        }
    }

    ((low + high) / 2.0).exp_m1()
}

/// A value with the same sign and roots as the NPV, evaluated without
/// overflow: the NPV itself for r >= 0, and the future value
/// `sum(cashflows[i] * (1 + r)^(n - i))` for -1 < r < 0, where discounting
/// by a factor below one would blow up over long series.
fn signed_value(cashflows: &[f64], rate: f64) -> f64 {
    if rate >= 0.0 {
        return npv_at_rate(cashflows, rate);
    }

    // Horner's scheme: ((c0 * g + c1) * g + c2) ... with g = 1 + r
    let growth = 1.0 + rate;
    cashflows.iter().fold(0.0, |acc, &cf| acc * growth + cf)
}

/// Calculate NPV at a given periodic rate
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Round a rate to 4 decimal places
pub fn round_rate(rate: f64) -> f64 {
    (rate * 10_000.0).round() / 10_000.0
}

/// Convert a monthly rate to an annual one with monthly compounding,
/// rounded to 4 decimal places
pub fn annualize(monthly_rate: f64) -> f64 {
    round_rate((1.0 + monthly_rate).powi(PERIODS_PER_YEAR) - 1.0)
}
