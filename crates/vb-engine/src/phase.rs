//! Three-phase load balance and neutral current derivations.
//!
//! BS 7671-aligned rule of thumb: under 10% deviation from the mean phase
//! current counts as balanced.

use crate::error::{EngineError, EngineResult};
use core::fmt;
use vb_core::{Real, round_to, round_whole};

/// Compliance threshold, percent deviation from mean.
pub const IMBALANCE_LIMIT_PERCENT: Real = 10.0;
/// Above this the imbalance is treated as critical rather than a warning.
pub const IMBALANCE_CRITICAL_PERCENT: Real = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    L1,
    L2,
    L3,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::L1 => "L1",
            Phase::L2 => "L2",
            Phase::L3 => "L3",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One set of clamp-meter readings, amps per phase.
///
/// Transient input only: consumed immediately by the derivations below and
/// never persisted as its own entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseReadings {
    pub l1: Real,
    pub l2: Real,
    pub l3: Real,
}

impl PhaseReadings {
    /// Build readings, clamping negative or non-finite entries to 0 the way
    /// the form layer treats unparseable input.
    pub fn new(l1: Real, l2: Real, l3: Real) -> Self {
        let clamp = |v: Real| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            l1: clamp(l1),
            l2: clamp(l2),
            l3: clamp(l3),
        }
    }

    /// Number of phases carrying current.
    pub fn active_phase_count(&self) -> usize {
        [self.l1, self.l2, self.l3]
            .iter()
            .filter(|v| **v > 0.0)
            .count()
    }

    fn labelled(&self) -> [(Phase, Real); 3] {
        [
            (Phase::L1, self.l1),
            (Phase::L2, self.l2),
            (Phase::L3, self.l3),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseBalance {
    /// Deviation from the mean, whole percentage points.
    pub imbalance_percent: Real,
    /// True when under the 10% threshold.
    pub is_compliant: bool,
    pub highest_phase: Phase,
    pub lowest_phase: Phase,
    /// Advisory text, present only when non-compliant.
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeutralCurrent {
    pub estimated_amps: Real,
}

/// Phase balance from a set of readings.
///
/// Requires at least two non-zero readings; with fewer there is no balance
/// to speak of and the caller should show "no result" instead.
pub fn calculate_phase_balance(readings: PhaseReadings) -> EngineResult<PhaseBalance> {
    let active = readings.active_phase_count();
    if active < 2 {
        return Err(EngineError::InsufficientReadings {
            needed: 2,
            got: active,
        });
    }

    let labelled = readings.labelled();
    // Ties break toward the first phase in L1, L2, L3 order.
    let mut highest = labelled[0];
    let mut lowest = labelled[0];
    for entry in &labelled[1..] {
        if entry.1 > highest.1 {
            highest = *entry;
        }
        if entry.1 < lowest.1 {
            lowest = *entry;
        }
    }

    // Average is non-zero: at least two readings are positive.
    let average = (readings.l1 + readings.l2 + readings.l3) / 3.0;
    let imbalance_percent = round_whole((highest.1 - lowest.1) / average * 100.0);
    let is_compliant = imbalance_percent < IMBALANCE_LIMIT_PERCENT;

    let recommendation = if is_compliant {
        None
    } else {
        Some(format!(
            "Phase imbalance exceeds {IMBALANCE_LIMIT_PERCENT:.0}%. Move single-phase loads \
             from {} to {} to even out the distribution.",
            highest.0, lowest.0
        ))
    };

    Ok(PhaseBalance {
        imbalance_percent,
        is_compliant,
        highest_phase: highest.0,
        lowest_phase: lowest.0,
        recommendation,
    })
}

/// Estimated neutral current assuming 120 degree phase separation.
///
/// Standard vector sum of three phasors at 0/120/240 degrees:
/// `sqrt(L1^2 + L2^2 + L3^2 - L1*L2 - L2*L3 - L3*L1)`.
/// Balanced loads cancel to ~0; a single loaded phase returns its own
/// current.
pub fn calculate_neutral_current(readings: PhaseReadings) -> EngineResult<NeutralCurrent> {
    let active = readings.active_phase_count();
    if active == 0 {
        return Err(EngineError::InsufficientReadings { needed: 1, got: 0 });
    }

    let (a, b, c) = (readings.l1, readings.l2, readings.l3);
    let squared = a * a + b * b + c * c - a * b - b * c - c * a;
    // Rounding error can push a balanced sum a hair below zero.
    let estimated_amps = round_to(squared.max(0.0).sqrt(), 1);

    Ok(NeutralCurrent { estimated_amps })
}

/// Presentation tier for an imbalance figure. The Ok/Warning boundary is the
/// same 10% cutoff as `is_compliant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceTier {
    Ok,
    Warning,
    Critical,
}

impl BalanceTier {
    pub fn as_str(self) -> &'static str {
        match self {
            BalanceTier::Ok => "ok",
            BalanceTier::Warning => "warning",
            BalanceTier::Critical => "critical",
        }
    }
}

pub fn balance_tier(imbalance_percent: Real) -> BalanceTier {
    if imbalance_percent < IMBALANCE_LIMIT_PERCENT {
        BalanceTier::Ok
    } else if imbalance_percent <= IMBALANCE_CRITICAL_PERCENT {
        BalanceTier::Warning
    } else {
        BalanceTier::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vb_core::{Tolerances, nearly_equal};

    #[test]
    fn balanced_phases_have_zero_imbalance() {
        let balance = calculate_phase_balance(PhaseReadings::new(10.0, 10.0, 10.0)).unwrap();
        assert_eq!(balance.imbalance_percent, 0.0);
        assert!(balance.is_compliant);
        assert!(balance.recommendation.is_none());
    }

    #[test]
    fn known_imbalance_scenario() {
        // (16 - 10) / 12 * 100 = 50%
        let balance = calculate_phase_balance(PhaseReadings::new(10.0, 10.0, 16.0)).unwrap();
        assert_eq!(balance.imbalance_percent, 50.0);
        assert!(!balance.is_compliant);
        assert_eq!(balance.highest_phase, Phase::L3);
        // L1/L2 tie at the bottom resolves to L1.
        assert_eq!(balance.lowest_phase, Phase::L1);
        assert!(balance.recommendation.is_some());
    }

    #[test]
    fn insufficient_readings_refused() {
        let err = calculate_phase_balance(PhaseReadings::new(10.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientReadings { needed: 2, got: 1 }
        ));
    }

    #[test]
    fn negative_and_nan_clamp_to_zero() {
        let readings = PhaseReadings::new(-5.0, f64::NAN, 12.0);
        assert_eq!(readings.l1, 0.0);
        assert_eq!(readings.l2, 0.0);
        assert_eq!(readings.l3, 12.0);
        assert_eq!(readings.active_phase_count(), 1);
    }

    #[test]
    fn neutral_current_cancels_when_balanced() {
        for x in [0.5, 13.0, 400.0] {
            let neutral = calculate_neutral_current(PhaseReadings::new(x, x, x)).unwrap();
            assert!(
                nearly_equal(neutral.estimated_amps, 0.0, Tolerances::default()),
                "x={x} gave {}",
                neutral.estimated_amps
            );
        }
    }

    #[test]
    fn neutral_current_single_phase_equals_that_phase() {
        let neutral = calculate_neutral_current(PhaseReadings::new(13.0, 0.0, 0.0)).unwrap();
        assert_eq!(neutral.estimated_amps, 13.0);
    }

    #[test]
    fn neutral_current_all_zero_refused() {
        let err = calculate_neutral_current(PhaseReadings::new(0.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientReadings { .. }));
    }

    #[test]
    fn tier_boundaries_match_compliance() {
        assert_eq!(balance_tier(0.0), BalanceTier::Ok);
        assert_eq!(balance_tier(9.0), BalanceTier::Ok);
        assert_eq!(balance_tier(10.0), BalanceTier::Warning);
        assert_eq!(balance_tier(20.0), BalanceTier::Warning);
        assert_eq!(balance_tier(21.0), BalanceTier::Critical);

        // The ok/warning edge agrees with is_compliant at 10%.
        let balance = calculate_phase_balance(PhaseReadings::new(100.0, 100.0, 110.6)).unwrap();
        assert_eq!(balance.imbalance_percent, 10.0);
        assert!(!balance.is_compliant);
        assert_eq!(balance_tier(balance.imbalance_percent), BalanceTier::Warning);
    }

    proptest! {
        /// Imbalance is invariant under phase permutation while the
        /// high/low labels track the actual extremes.
        #[test]
        fn imbalance_is_permutation_invariant(
            a in 0.1_f64..500.0,
            b in 0.1_f64..500.0,
            c in 0.1_f64..500.0,
        ) {
            let base = calculate_phase_balance(PhaseReadings::new(a, b, c)).unwrap();
            for (x, y, z) in [(a, c, b), (b, a, c), (b, c, a), (c, a, b), (c, b, a)] {
                let permuted = calculate_phase_balance(PhaseReadings::new(x, y, z)).unwrap();
                prop_assert_eq!(permuted.imbalance_percent, base.imbalance_percent);
                prop_assert_eq!(permuted.is_compliant, base.is_compliant);
            }
        }

        #[test]
        fn extreme_labels_track_max_and_min(
            a in 0.1_f64..500.0,
            b in 0.1_f64..500.0,
            c in 0.1_f64..500.0,
        ) {
            let readings = PhaseReadings::new(a, b, c);
            let balance = calculate_phase_balance(readings).unwrap();
            let values = [a, b, c];
            let hi = match balance.highest_phase {
                Phase::L1 => a,
                Phase::L2 => b,
                Phase::L3 => c,
            };
            let lo = match balance.lowest_phase {
                Phase::L1 => a,
                Phase::L2 => b,
                Phase::L3 => c,
            };
            prop_assert_eq!(hi, values.iter().copied().fold(f64::MIN, f64::max));
            prop_assert_eq!(lo, values.iter().copied().fold(f64::MAX, f64::min));
        }

        #[test]
        fn neutral_current_is_bounded_and_finite(
            a in 0.0_f64..500.0,
            b in 0.0_f64..500.0,
            c in 0.1_f64..500.0,
        ) {
            let neutral = calculate_neutral_current(PhaseReadings::new(a, b, c)).unwrap();
            prop_assert!(neutral.estimated_amps >= 0.0);
            prop_assert!(neutral.estimated_amps.is_finite());
            // Never exceeds the largest single phase (plus rounding).
            let max = a.max(b).max(c);
            prop_assert!(neutral.estimated_amps <= max + 0.05 + max * 1e-9);
        }
    }
}
