//! Roof area + connection type + bill → system size.

use crate::models::feasibility::ConnectionPhase;
use crate::services::usage::estimate_units;

/// Share of the roof left after setbacks, shading and bad orientation.
pub const USABLE_ROOF_FRACTION: f64 = 0.7;
/// Panel area needed per installed kW (m²).
pub const M2_PER_KW: f64 = 6.0;
/// Expected generation per installed kW per month, used to size for a bill.
pub const KWH_PER_KW_MONTH: f64 = 120.0;
/// Smallest system worth recommending (kW).
pub const MIN_SYSTEM_KW: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CapacityPlan {
    pub max_roof_kw: f64,
    pub phase_limit_kw: f64,
    pub effective_max_kw: f64,
    /// `None` when no bill was supplied
    pub required_kw: Option<f64>,
    pub recommended_kw: f64,
    /// Which of roof or phase bounded the maximum
    pub roof_note: String,
    /// Whether the bill-driven need was met or capped
    pub need_note: String,
}

impl CapacityPlan {
    pub fn note(&self) -> String {
        format!("{} {}", self.roof_note, self.need_note)
    }
}

pub fn plan(roof_area_m2: f64, phase: ConnectionPhase, monthly_bill_lkr: f64) -> CapacityPlan {
    let usable_area = roof_area_m2 * USABLE_ROOF_FRACTION;
    let max_roof_kw = usable_area / M2_PER_KW;
    let phase_limit_kw = phase.limit_kw();

    let (effective_max_kw, roof_note) = if max_roof_kw > phase_limit_kw {
        (
            phase_limit_kw,
            format!(
                "Roof fits {:.1}kW, but Phase limit is {:.1}kW.",
                max_roof_kw, phase_limit_kw
            ),
        )
    } else {
        (max_roof_kw, "Roof capacity is within phase limits.".to_string())
    };

    let (required_kw, recommended_kw, need_note) = if monthly_bill_lkr > 0.0 {
        let required_kw = estimate_units(monthly_bill_lkr) / KWH_PER_KW_MONTH;
        if required_kw > effective_max_kw {
            let note = format!(
                "Warning: You need {:.1}kW, but are limited to {:.1}kW.",
                required_kw, effective_max_kw
            );
            (Some(required_kw), effective_max_kw, note)
        } else {
            (
                Some(required_kw),
                required_kw,
                "Success: System meets your full needs.".to_string(),
            )
        }
    } else {
        (None, effective_max_kw, "Based on maximum roof potential.".to_string())
    };

    CapacityPlan {
        max_roof_kw,
        phase_limit_kw,
        effective_max_kw,
        required_kw,
        recommended_kw: recommended_kw.max(MIN_SYSTEM_KW),
        roof_note,
        need_note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_single_phase_caps_a_large_roof() {
        let p = plan(60.0, ConnectionPhase::Single, 0.0);
        assert!(close(p.max_roof_kw, 7.0));
        assert_eq!(p.effective_max_kw, 5.0);
        assert_eq!(p.recommended_kw, 5.0);
        assert!(p.required_kw.is_none());
        assert_eq!(p.roof_note, "Roof fits 7.0kW, but Phase limit is 5.0kW.");
        assert_eq!(p.need_note, "Based on maximum roof potential.");
    }

    #[test]
    fn test_roof_binds_under_three_phase() {
        let p = plan(60.0, ConnectionPhase::Three, 0.0);
        assert!(close(p.effective_max_kw, 7.0));
        assert_eq!(p.roof_note, "Roof capacity is within phase limits.");
    }

    #[test]
    fn test_effective_max_is_min_of_roof_and_phase() {
        for area in [0.0, 10.0, 42.0, 42.857, 43.0, 100.0, 857.0, 858.0, 5000.0] {
            for phase in [ConnectionPhase::Single, ConnectionPhase::Three] {
                let p = plan(area, phase, 0.0);
                let expected = (area * 0.7 / 6.0).min(phase.limit_kw());
                assert!(close(p.effective_max_kw, expected), "area {area} phase {phase:?}");
            }
        }
    }

    #[test]
    fn test_bill_need_fully_met() {
        let p = plan(500.0, ConnectionPhase::Three, 20000.0);
        let required = p.required_kw.unwrap();
        assert!(close(required, 345.5 / 120.0));
        assert!(close(p.recommended_kw, required));
        assert_eq!(p.need_note, "Success: System meets your full needs.");
    }

    #[test]
    fn test_bill_need_capped_by_phase() {
        // 66000 → 1000 units → 8.33 kW needed
        let p = plan(500.0, ConnectionPhase::Single, 66000.0);
        assert_eq!(p.recommended_kw, 5.0);
        assert_eq!(p.need_note, "Warning: You need 8.3kW, but are limited to 5.0kW.");
    }

    #[test]
    fn test_recommendation_never_below_one_kw() {
        assert_eq!(plan(0.0, ConnectionPhase::Single, 0.0).recommended_kw, 1.0);
        assert_eq!(plan(5.0, ConnectionPhase::Three, 0.0).recommended_kw, 1.0);
        // small bill: 1500 → 20 units → 0.17 kW
        assert_eq!(plan(100.0, ConnectionPhase::Three, 1500.0).recommended_kw, 1.0);
        // bill under fixed charge counts as supplied but needs nothing
        assert_eq!(plan(100.0, ConnectionPhase::Three, 800.0).recommended_kw, 1.0);
    }

    #[test]
    fn test_combined_note_has_roof_part_first() {
        let p = plan(60.0, ConnectionPhase::Single, 0.0);
        assert_eq!(
            p.note(),
            "Roof fits 7.0kW, but Phase limit is 5.0kW. Based on maximum roof potential."
        );
    }
}
