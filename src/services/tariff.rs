//! Regulator rate tables used by the feasibility engine.
//!
//! Every tiered rule (buy-back brackets, blended bill cost) is an ordered
//! table of `(threshold, value)` pairs with an unbounded top value, evaluated
//! by [`StepTable::lookup`]. The tables are `'static` and shared read-only.

use serde::Serialize;
use utoipa::ToSchema;

// ─── Generic step function ───────────────────────────────────

/// How an input is compared against a step threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// `x <= threshold` falls into the step.
    Inclusive,
    /// `x < threshold` falls into the step.
    Exclusive,
}

#[derive(Debug, Clone, Copy)]
pub struct StepTable {
    steps: &'static [(f64, f64)],
    above: f64,
    boundary: Boundary,
}

impl StepTable {
    pub const fn new(steps: &'static [(f64, f64)], above: f64, boundary: Boundary) -> Self {
        Self { steps, above, boundary }
    }

    /// Value of the first step whose threshold admits `x`, or the top value.
    pub fn lookup(&self, x: f64) -> f64 {
        self.steps
            .iter()
            .find(|(threshold, _)| match self.boundary {
                Boundary::Inclusive => x <= *threshold,
                Boundary::Exclusive => x < *threshold,
            })
            .map_or(self.above, |(_, value)| *value)
    }

    pub fn steps(&self) -> &'static [(f64, f64)] {
        self.steps
    }

    pub fn above(&self) -> f64 {
        self.above
    }
}

// ─── Buy-back tariff (Net Plus, LKR/unit) ────────────────────

/// 0-5 kW: 20.90 | 5-20 kW: 19.61 | 20-100 kW: 17.46 | >100 kW: 15.07
pub const BUY_BACK_TARIFF: StepTable = StepTable::new(
    &[(5.0, 20.90), (20.0, 19.61), (100.0, 17.46)],
    15.07,
    Boundary::Inclusive,
);

/// Night peak export rate used by the battery-shifted variant (LKR/unit).
pub const NIGHT_EXPORT_RATE: f64 = 45.80;

/// Buy-back rate for a system of `system_kw`.
pub fn buy_back_rate(system_kw: f64) -> f64 {
    BUY_BACK_TARIFF.lookup(system_kw)
}

// ─── Blended bill cost (LKR/unit, keyed by raw bill) ─────────

pub const BLENDED_UNIT_COST: StepTable = StepTable::new(
    &[(5000.0, 25.0), (15000.0, 45.0), (40000.0, 55.0)],
    65.0,
    Boundary::Exclusive,
);

// ─── District sun-hours fallback ─────────────────────────────

/// Used when the district is not in [`DISTRICT_SUN_HOURS`].
pub const DEFAULT_SUN_HOURS: f64 = 4.5;

pub const DISTRICT_SUN_HOURS: [(&str, f64); 25] = [
    ("Colombo", 4.5),
    ("Gampaha", 4.6),
    ("Kalutara", 4.5),
    ("Galle", 4.8),
    ("Matara", 4.9),
    ("Hambantota", 5.5),
    ("Jaffna", 5.8),
    ("Kilinochchi", 5.7),
    ("Mannar", 5.8),
    ("Vavuniya", 5.6),
    ("Mullaitivu", 5.6),
    ("Batticaloa", 5.4),
    ("Ampara", 5.3),
    ("Trincomalee", 5.4),
    ("Kurunegala", 5.0),
    ("Puttalam", 5.2),
    ("Anuradhapura", 5.4),
    ("Polonnaruwa", 5.3),
    ("Matale", 4.8),
    ("Kandy", 4.4),
    ("Nuwara Eliya", 4.0),
    ("Kegalle", 4.2),
    ("Ratnapura", 4.3),
    ("Badulla", 4.6),
    ("Monaragala", 5.0),
];

/// Table value for `district`, matched case-insensitively after trimming.
pub fn district_sun_hours(district: &str) -> Option<f64> {
    let wanted = district.trim();
    DISTRICT_SUN_HOURS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .map(|(_, hours)| *hours)
}

// ─── API views ───────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct TariffBracketView {
    /// Upper bound of the bracket in kW; `None` for the unbounded top bracket
    pub up_to_kw: Option<f64>,
    pub rate_lkr_per_unit: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TariffScheduleView {
    pub brackets: Vec<TariffBracketView>,
    pub night_export_rate: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DistrictSunHours {
    pub district: String,
    pub sun_hours: f64,
}

pub fn tariff_schedule() -> TariffScheduleView {
    let mut brackets: Vec<TariffBracketView> = BUY_BACK_TARIFF
        .steps()
        .iter()
        .map(|(up_to, rate)| TariffBracketView {
            up_to_kw: Some(*up_to),
            rate_lkr_per_unit: *rate,
        })
        .collect();
    brackets.push(TariffBracketView {
        up_to_kw: None,
        rate_lkr_per_unit: BUY_BACK_TARIFF.above(),
    });
    TariffScheduleView {
        brackets,
        night_export_rate: NIGHT_EXPORT_RATE,
    }
}

pub fn district_table() -> Vec<DistrictSunHours> {
    DISTRICT_SUN_HOURS
        .iter()
        .map(|(district, hours)| DistrictSunHours {
            district: (*district).to_string(),
            sun_hours: *hours,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_back_brackets_are_inclusive_upper_bounds() {
        assert_eq!(buy_back_rate(1.0), 20.90);
        assert_eq!(buy_back_rate(5.0), 20.90);
        assert_eq!(buy_back_rate(5.01), 19.61);
        assert_eq!(buy_back_rate(20.0), 19.61);
        assert_eq!(buy_back_rate(20.5), 17.46);
        assert_eq!(buy_back_rate(100.0), 17.46);
        assert_eq!(buy_back_rate(100.1), 15.07);
        assert_eq!(buy_back_rate(5000.0), 15.07);
    }

    #[test]
    fn test_buy_back_rate_never_increases_with_size() {
        let mut last = f64::INFINITY;
        let mut kw = 0.0;
        while kw <= 150.0 {
            let rate = buy_back_rate(kw);
            assert!(rate <= last, "rate went up at {kw} kW: {rate} > {last}");
            last = rate;
            kw += 0.25;
        }
    }

    #[test]
    fn test_night_rate_beats_every_bracket() {
        for (_, rate) in BUY_BACK_TARIFF.steps() {
            assert!(NIGHT_EXPORT_RATE > *rate);
        }
        assert!(NIGHT_EXPORT_RATE > BUY_BACK_TARIFF.above());
    }

    #[test]
    fn test_blended_cost_uses_strict_thresholds() {
        assert_eq!(BLENDED_UNIT_COST.lookup(4999.99), 25.0);
        assert_eq!(BLENDED_UNIT_COST.lookup(5000.0), 45.0);
        assert_eq!(BLENDED_UNIT_COST.lookup(14999.0), 45.0);
        assert_eq!(BLENDED_UNIT_COST.lookup(15000.0), 55.0);
        assert_eq!(BLENDED_UNIT_COST.lookup(40000.0), 65.0);
    }

    #[test]
    fn test_district_table_matches_production_values() {
        assert_eq!(DISTRICT_SUN_HOURS.len(), 25);
        assert_eq!(district_sun_hours("Jaffna"), Some(5.8));
        assert_eq!(district_sun_hours("Nuwara Eliya"), Some(4.0));
        assert_eq!(district_sun_hours("  kandy "), Some(4.4));
        assert_eq!(district_sun_hours("Atlantis"), None);
        for (_, hours) in DISTRICT_SUN_HOURS {
            assert!((4.0..=5.8).contains(&hours));
        }
    }

    #[test]
    fn test_schedule_view_ends_with_unbounded_bracket() {
        let schedule = tariff_schedule();
        assert_eq!(schedule.brackets.len(), 4);
        let top = schedule.brackets.last().unwrap();
        assert!(top.up_to_kw.is_none());
        assert_eq!(top.rate_lkr_per_unit, 15.07);
        assert_eq!(schedule.night_export_rate, 45.80);
    }
}
