//! vb-engine: pure derived-calculation engine.
//!
//! Every calculator is a deterministic function of its inputs with no side
//! effects and no I/O. The session layer validates inputs first; the engine
//! still refuses out-of-domain combinations with a typed error rather than
//! producing garbage.

mod common;
pub mod error;
pub mod ohms_law;
pub mod phase;
pub mod three_phase;
pub mod traits;
pub mod voltage_drop;

pub use error::{EngineError, EngineResult};
pub use ohms_law::OhmsLaw;
pub use phase::{
    BalanceTier, NeutralCurrent, Phase, PhaseBalance, PhaseReadings, balance_tier,
    calculate_neutral_current, calculate_phase_balance,
};
pub use three_phase::ThreePhaseBalance;
pub use traits::Calculator;
pub use voltage_drop::VoltageDrop;

/// All built-in calculators, in menu order.
pub fn registry() -> Vec<Box<dyn Calculator>> {
    vec![
        Box::new(ThreePhaseBalance),
        Box::new(OhmsLaw),
        Box::new(VoltageDrop),
    ]
}

/// Look a calculator up by its kind tag (e.g. "ohms-law").
pub fn find_calculator(kind: &str) -> Option<Box<dyn Calculator>> {
    registry().into_iter().find(|c| c.kind() == kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_kinds_are_unique() {
        let mut kinds: Vec<_> = registry().iter().map(|c| c.kind().to_string()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), registry().len());
    }

    #[test]
    fn find_by_kind() {
        assert!(find_calculator("three-phase-balance").is_some());
        assert!(find_calculator("ohms-law").is_some());
        assert!(find_calculator("no-such-calculator").is_none());
    }
}
