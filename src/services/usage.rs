use crate::services::tariff::BLENDED_UNIT_COST;

/// Fixed monthly charge on every bill; not tied to consumption (LKR).
pub const FIXED_CHARGE_LKR: f64 = 1000.0;

/// Estimated monthly usage (units) behind a bill of `monthly_bill_lkr`.
///
/// The blended per-unit cost is picked on the raw bill, then applied to the
/// part above the fixed charge. Rounded to one decimal.
pub fn estimate_units(monthly_bill_lkr: f64) -> f64 {
    if monthly_bill_lkr <= FIXED_CHARGE_LKR {
        return 0.0;
    }
    let chargeable = monthly_bill_lkr - FIXED_CHARGE_LKR;
    let avg_cost = BLENDED_UNIT_COST.lookup(monthly_bill_lkr);
    round_to(chargeable / avg_cost, 1)
}

/// Rounds `value` to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
