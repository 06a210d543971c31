//! Success evaluation: does the attempt pay off?
//!
//! Stat and item conditions are checked against the current state. Each
//! probability gate draws exactly one uniform sample in [0, 1) and passes if
//! the sample falls below `p`. Every gate in a conjunction is evaluated, so
//! the number of samples drawn depends only on the condition's shape and
//! never on the player's stats.

use mz_core::{Condition, CoreError, GameState};
use rand::Rng;

use crate::error::RulesResult;

/// Decide whether a choice succeeds. Absent conditions always succeed.
pub fn evaluate_success<R: Rng + ?Sized>(
    conditions: Option<&Condition>,
    state: &GameState,
    rng: &mut R,
) -> RulesResult<bool> {
    match conditions {
        None => Ok(true),
        Some(condition) => evaluate(condition, state, rng),
    }
}

fn evaluate<R: Rng + ?Sized>(condition: &Condition, state: &GameState, rng: &mut R) -> RulesResult<bool> {
    match condition {
        Condition::ItemsPresent(ids) => Ok(ids.iter().all(|id| state.inventory.has_item(id))),
        Condition::StatCompare { stat, op, value } => Ok(op.holds(state.stats.get(*stat), *value)),
        Condition::Probability(p) => {
            if !(0.0..=1.0).contains(p) {
                return Err(CoreError::InvalidProbability(*p).into());
            }
            let sample: f64 = rng.random();
            Ok(sample < *p)
        }
        Condition::All(inner) => {
            let mut ok = true;
            for c in inner {
                ok &= evaluate(c, state, rng)?;
            }
            Ok(ok)
        }
    }
}
