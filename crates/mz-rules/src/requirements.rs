//! Requirement evaluation: can the player pick this choice at all?

use mz_core::{CompareOp, Condition, GameState, StatKind};
use serde::Serialize;

use crate::error::{RulesError, RulesResult};

/// A stat comparison that did not hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmetStat {
    /// Which stat.
    #[serde(rename = "statName")]
    pub stat: StatKind,
    /// The comparison.
    pub operator: CompareOp,
    /// Threshold.
    pub required: i32,
    /// The player's current value.
    pub actual: i32,
}

impl UnmetStat {
    /// Human-readable reason, e.g. `Insufficient FIT: 30 >= 50 required`.
    pub fn reason(&self) -> String {
        format!(
            "Insufficient {}: {} {} {} required",
            self.stat, self.actual, self.operator, self.required
        )
    }
}

/// The outcome of checking a choice's requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementCheck {
    /// True when every requirement holds.
    pub available: bool,
    /// Required item ids that are not held.
    pub missing_items: Vec<String>,
    /// Stat comparisons that failed.
    pub unmet_stats: Vec<UnmetStat>,
    /// One reason per missing item and per unmet stat.
    pub reasons: Vec<String>,
}

impl RequirementCheck {
    fn passed() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }
}

/// Check a choice's requirements against the game state.
///
/// Absent requirements are always met. Requirements may only name items and
/// stat thresholds; a probability inside requirements is malformed.
pub fn check_requirements(
    requirements: Option<&Condition>,
    state: &GameState,
) -> RulesResult<RequirementCheck> {
    let mut check = RequirementCheck::passed();
    if let Some(condition) = requirements {
        collect(condition, state, &mut check)?;
    }
    check.available = check.missing_items.is_empty() && check.unmet_stats.is_empty();
    Ok(check)
}

fn collect(condition: &Condition, state: &GameState, check: &mut RequirementCheck) -> RulesResult<()> {
    match condition {
        Condition::ItemsPresent(ids) => {
            for id in ids {
                if !state.inventory.has_item(id) && !check.missing_items.contains(id) {
                    check.reasons.push(format!("Missing required item: {id}"));
                    check.missing_items.push(id.clone());
                }
            }
        }
        Condition::StatCompare { stat, op, value } => {
            let actual = state.stats.get(*stat);
            if !op.holds(actual, *value) {
                let unmet = UnmetStat {
                    stat: *stat,
                    operator: *op,
                    required: *value,
                    actual,
                };
                check.reasons.push(unmet.reason());
                check.unmet_stats.push(unmet);
            }
        }
        Condition::Probability(p) => {
            return Err(RulesError::InvalidArgument(format!(
                "requirements cannot contain a probability ({p})"
            )));
        }
        Condition::All(inner) => {
            for c in inner {
                collect(c, state, check)?;
            }
        }
    }
    Ok(())
}
