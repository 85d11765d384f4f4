//! Generation, income and financing for a sized system.

use crate::models::feasibility::LoanTerms;
use crate::services::tariff::{buy_back_rate, NIGHT_EXPORT_RATE};
use crate::services::usage::round_to;

const DAYS_PER_MONTH: f64 = 30.0;
/// Inverter, wiring and temperature losses.
pub const PERFORMANCE_RATIO: f64 = 0.75;
/// Installed cost per kW (LKR).
pub const COST_PER_KW_LKR: f64 = 280_000.0;
/// Share of generation exported at night when a battery shifts it.
const NIGHT_EXPORT_SHARE: f64 = 0.5;

/// Unrounded projection for one system size.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub monthly_generation_kwh: f64,
    pub tariff_rate: f64,
    pub monthly_income: f64,
    pub battery_income: f64,
    pub battery_extra_profit: f64,
    pub total_investment: f64,
    /// Already rounded to 2 decimals
    pub loan_installment: f64,
    pub net_monthly_result: f64,
    /// Already rounded to 1 decimal
    pub payback_years: f64,
}

pub fn monthly_generation_kwh(system_kw: f64, irradiance_kwh_m2_day: f64) -> f64 {
    system_kw * irradiance_kwh_m2_day * DAYS_PER_MONTH * PERFORMANCE_RATIO
}

/// Fixed monthly payment for an amortized loan, rounded to 2 decimals.
///
/// Returns 0 when there is nothing to borrow or no term. A 0 % rate repays
/// the principal in equal parts. When `(1 + r)^n` overflows the payment is
/// the interest-only limit `P × r`, and 0 if even that is not finite.
pub fn loan_installment(terms: &LoanTerms) -> f64 {
    if terms.principal_lkr <= 0.0 || terms.years == 0 {
        return 0.0;
    }
    let n = f64::from(terms.years) * 12.0;
    let r = terms.annual_rate_percent / 100.0 / 12.0;
    if r <= 0.0 {
        return round_to(terms.principal_lkr / n, 2);
    }
    let growth = (1.0 + r).powf(n);
    let installment = if growth.is_finite() {
        terms.principal_lkr * (r * growth) / (growth - 1.0)
    } else {
        terms.principal_lkr * r
    };
    if !installment.is_finite() {
        return 0.0;
    }
    round_to(installment, 2)
}

/// Years for income to cover the investment, rounded to 1 decimal.
/// `0` when there is no income; callers read that as "no payback".
pub fn payback_years(total_investment: f64, monthly_income: f64) -> f64 {
    if monthly_income <= 0.0 {
        return 0.0;
    }
    round_to(total_investment / (monthly_income * 12.0), 1)
}

pub fn project(
    system_kw: f64,
    irradiance_kwh_m2_day: f64,
    loan_rate_percent: f64,
    loan_years: u32,
) -> Projection {
    let generation = monthly_generation_kwh(system_kw, irradiance_kwh_m2_day);
    let tariff_rate = buy_back_rate(system_kw);
    let monthly_income = generation * tariff_rate;
    let total_investment = system_kw * COST_PER_KW_LKR;

    let battery_income = generation * (1.0 - NIGHT_EXPORT_SHARE) * tariff_rate
        + generation * NIGHT_EXPORT_SHARE * NIGHT_EXPORT_RATE;

    let loan = loan_installment(&LoanTerms {
        principal_lkr: total_investment,
        annual_rate_percent: loan_rate_percent,
        years: loan_years,
    });

    Projection {
        monthly_generation_kwh: generation,
        tariff_rate,
        monthly_income,
        battery_income,
        battery_extra_profit: battery_income - monthly_income,
        total_investment,
        loan_installment: loan,
        net_monthly_result: monthly_income - loan,
        payback_years: payback_years(total_investment, monthly_income),
    }
}
