use crate::models::feasibility::{ConnectionPhase, FinancialProjection};
use crate::services::{capacity, finance};
use crate::services::usage::round_to;

/// Everything the engine needs for one projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiInputs {
    pub roof_area_m2: f64,
    pub irradiance_kwh_m2_day: f64,
    pub monthly_bill_lkr: f64,
    pub phase: ConnectionPhase,
    pub loan_rate_percent: f64,
    pub loan_years: u32,
}

/// Sizes the system, projects its finances and rounds the result for
/// reporting. Pure: identical inputs give identical output.
pub fn compose(inputs: &RoiInputs) -> FinancialProjection {
    let plan = capacity::plan(inputs.roof_area_m2, inputs.phase, inputs.monthly_bill_lkr);
    let money = finance::project(
        plan.recommended_kw,
        inputs.irradiance_kwh_m2_day,
        inputs.loan_rate_percent,
        inputs.loan_years,
    );

    let recommended = round_to(plan.recommended_kw, 2);
    let income = round_to(money.monthly_income, 2);

    FinancialProjection {
        recommended_system_kw: recommended,
        system_capacity_kw: recommended,
        max_roof_capacity_kw: round_to(plan.max_roof_kw, 2),
        effective_max_kw: round_to(plan.effective_max_kw, 2),
        monthly_generation_kwh: round_to(money.monthly_generation_kwh, 2),
        tariff_rate: money.tariff_rate,
        normal_monthly_income: income,
        monthly_earning_lkr: income,
        battery_monthly_earning: round_to(money.battery_income, 2),
        battery_extra_profit: round_to(money.battery_extra_profit, 2),
        total_investment_lkr: round_to(money.total_investment, 2),
        loan_installment: money.loan_installment,
        net_monthly_result: round_to(money.net_monthly_result, 2),
        payback_period: money.payback_years,
        note: plan.note(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(roof: f64, irradiance: f64, bill: f64, phase: ConnectionPhase) -> RoiInputs {
        RoiInputs {
            roof_area_m2: roof,
            irradiance_kwh_m2_day: irradiance,
            monthly_bill_lkr: bill,
            phase,
            loan_rate_percent: 11.5,
            loan_years: 5,
        }
    }

    #[test]
    fn test_default_roof_single_phase_no_bill() {
        let r = compose(&inputs(60.0, 4.5, 0.0, ConnectionPhase::Single));
        assert_eq!(r.max_roof_capacity_kw, 7.0);
        assert_eq!(r.effective_max_kw, 5.0);
        assert_eq!(r.recommended_system_kw, 5.0);
        assert_eq!(r.system_capacity_kw, 5.0);
        assert_eq!(r.tariff_rate, 20.90);
        assert_eq!(r.monthly_generation_kwh, 506.25);
        assert!((r.normal_monthly_income - 10580.6).abs() < 0.05);
        assert_eq!(r.monthly_earning_lkr, r.normal_monthly_income);
        assert_eq!(r.total_investment_lkr, 1_400_000.0);
        assert_eq!(r.loan_installment, 30789.65);
        assert_eq!(r.payback_period, 11.0);
        assert!(r.note.contains("Phase limit is 5.0kW"));
        assert!(r.note.ends_with("Based on maximum roof potential."));
    }

    #[test]
    fn test_bill_driven_three_phase_large_roof() {
        let r = compose(&inputs(400.0, 4.5, 20000.0, ConnectionPhase::Three));
        assert_eq!(r.recommended_system_kw, 2.88);
        assert!((r.recommended_system_kw - 2.9).abs() < 0.05);
        assert_eq!(r.tariff_rate, 20.90);
        assert!(r.note.contains("Success: System meets your full needs."));
        assert!(r.note.starts_with("Roof capacity is within phase limits."));
    }

    #[test]
    fn test_floor_applies_to_tiny_roof() {
        let r = compose(&inputs(0.0, 4.5, 0.0, ConnectionPhase::Single));
        assert_eq!(r.recommended_system_kw, 1.0);
        assert_eq!(r.max_roof_capacity_kw, 0.0);
        assert_eq!(r.total_investment_lkr, 280_000.0);
    }

    #[test]
    fn test_zero_irradiance_has_no_payback() {
        let r = compose(&inputs(60.0, 0.0, 0.0, ConnectionPhase::Single));
        assert_eq!(r.normal_monthly_income, 0.0);
        assert_eq!(r.payback_period, 0.0);
        assert!(r.net_monthly_result.is_finite());
        assert!(r.battery_extra_profit.is_finite());
    }

    #[test]
    fn test_zero_year_loan_costs_nothing_monthly() {
        let mut i = inputs(60.0, 4.5, 0.0, ConnectionPhase::Single);
        i.loan_years = 0;
        let r = compose(&i);
        assert_eq!(r.loan_installment, 0.0);
        assert_eq!(r.net_monthly_result, r.normal_monthly_income);
    }

    #[test]
    fn test_identical_inputs_identical_output() {
        let i = inputs(137.3, 5.42, 18250.0, ConnectionPhase::Three);
        let a = compose(&i);
        let b = compose(&i);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_recommendation_floor_holds_across_inputs() {
        for roof in [0.0, 3.0, 25.0, 60.0, 900.0] {
            for bill in [0.0, 900.0, 1200.0, 8000.0, 90000.0] {
                for phase in [ConnectionPhase::Single, ConnectionPhase::Three] {
                    let r = compose(&inputs(roof, 4.5, bill, phase));
                    assert!(r.recommended_system_kw >= 1.0);
                    assert!(r.recommended_system_kw <= r.effective_max_kw.max(1.0));
                }
            }
        }
    }

    #[test]
    fn test_serialized_keys_cover_report_contract() {
        let r = compose(&inputs(60.0, 4.5, 0.0, ConnectionPhase::Single));
        let v = serde_json::to_value(&r).unwrap();
        for key in [
            "recommended_system_kw",
            "max_roof_capacity_kw",
            "effective_max_kw",
            "monthly_generation_kwh",
            "tariff_rate",
            "normal_monthly_income",
            "battery_monthly_earning",
            "battery_extra_profit",
            "total_investment_lkr",
            "loan_installment",
            "net_monthly_result",
            "payback_period",
            "note",
        ] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
    }
}
