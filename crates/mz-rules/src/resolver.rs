//! Effect resolution: turning a declarative payload into a new game state.
//!
//! Resolution never fails as a whole. Clamped stats, a full inventory,
//! missing items and unknown status ids are recorded as warnings; malformed
//! entries (blank ids) are recorded as errors. Both lists name the stat,
//! item or status responsible.

use std::collections::BTreeMap;

use mz_core::{
    ChoiceEffects, ClampBound, CoreError, GameState, StatChange, StatKind, StatusEffects,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{RulesError, RulesResult};

/// What a resolution actually did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsApplied {
    /// Requested vs applied delta per stat.
    pub stat_changes: BTreeMap<StatKind, StatChange>,
    /// Item ids added, one entry per unit.
    pub items_gained: Vec<String>,
    /// Item ids removed, one entry per unit.
    pub items_lost: Vec<String>,
    /// Status ids applied.
    pub status_effects_applied: Vec<String>,
    /// Status ids removed (item use only).
    pub status_removed: Vec<String>,
    /// Non-fatal anomalies.
    pub warnings: Vec<String>,
    /// Malformed entries that were skipped.
    pub errors: Vec<String>,
}

impl EffectsApplied {
    fn warn(&mut self, message: String) {
        warn!(%message, "effect anomaly");
        self.warnings.push(message);
    }

    fn error(&mut self, message: String) {
        warn!(%message, "malformed effect entry skipped");
        self.errors.push(message);
    }

    /// True if any stat, item or status actually changed.
    pub fn changed_anything(&self) -> bool {
        self.stat_changes.values().any(|c| c.actual != 0)
            || !self.items_gained.is_empty()
            || !self.items_lost.is_empty()
            || !self.status_effects_applied.is_empty()
            || !self.status_removed.is_empty()
    }
}

/// A resolved state together with its report.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The state after resolution.
    pub state: GameState,
    /// What happened.
    pub applied: EffectsApplied,
}

/// Apply an effects payload to a game state.
///
/// Order: stats, gained items, lost items, statuses. The turn counter moves
/// forward by one when the payload declares any stat change; a payload with
/// no stat changes leaves it alone.
pub fn resolve_effects(effects: &ChoiceEffects, state: &GameState, config: &EngineConfig) -> Resolution {
    let mut applied = EffectsApplied::default();
    let mut next = state.clone();

    for (&stat, &delta) in &effects.stat_changes {
        let (stats, change) = next.stats.adjust(stat, delta);
        match change.clamped() {
            Some(ClampBound::Maximum) => applied.warn(format!("{stat} clamped to maximum (100)")),
            Some(ClampBound::Minimum) => applied.warn(format!("{stat} clamped to minimum (0)")),
            None => {}
        }
        applied.stat_changes.insert(stat, change);
        next.stats = stats;
    }

    for id in &effects.items_gained {
        if id.trim().is_empty() {
            applied.error("Blank item id in itemsGained".to_string());
            continue;
        }
        match next.inventory.add_item(config.items.item_for(id)) {
            Ok(inventory) => {
                next.inventory = inventory;
                applied.items_gained.push(id.clone());
            }
            Err(CoreError::InventoryFull(_)) => {
                applied.warn(format!("Inventory full - could not add {id}"));
            }
            Err(other) => applied.error(other.to_string()),
        }
    }

    for (id, wanted) in tally(&effects.items_lost) {
        if id.trim().is_empty() {
            applied.error("Blank item id in itemsLost".to_string());
            continue;
        }
        match next.inventory.remove_item(id, wanted) {
            Ok((inventory, removed)) => {
                next.inventory = inventory;
                if removed < wanted {
                    applied.warn(format!("Only removed {removed} of {wanted} {id}"));
                }
                applied
                    .items_lost
                    .extend(std::iter::repeat_n(id.to_string(), removed as usize));
            }
            Err(CoreError::ItemNotFound(_)) => {
                applied.warn(format!("Item {id} not found in inventory"));
            }
            Err(other) => applied.error(other.to_string()),
        }
    }

    next.status_effects = apply_statuses(&effects.apply_status, &next.status_effects, config, &mut applied);

    if !effects.stat_changes.is_empty() {
        next.turn_count = next.turn_count.saturating_add(1);
    }

    debug!(
        stats = applied.stat_changes.len(),
        gained = applied.items_gained.len(),
        lost = applied.items_lost.len(),
        statuses = applied.status_effects_applied.len(),
        warnings = applied.warnings.len(),
        "effects resolved"
    );
    Resolution { state: next, applied }
}

fn apply_statuses(
    ids: &[String],
    current: &StatusEffects,
    config: &EngineConfig,
    applied: &mut EffectsApplied,
) -> StatusEffects {
    let mut set = current.clone();
    for id in ids {
        if id.trim().is_empty() {
            applied.error("Blank status id in applyStatus".to_string());
            continue;
        }
        let (effect, known) = config.statuses.instantiate(id);
        if !known {
            applied.warn(format!("Unknown status effect {id} - applied as generic debuff"));
        }
        set = set.apply(effect);
        applied.status_effects_applied.push(id.clone());
    }
    set
}

/// Count repeated ids, keeping first-seen order.
fn tally(ids: &[String]) -> Vec<(&str, u32)> {
    let mut counts: Vec<(&str, u32)> = Vec::new();
    for id in ids {
        match counts.iter_mut().find(|(seen, _)| *seen == id.as_str()) {
            Some((_, n)) => *n += 1,
            None => counts.push((id.as_str(), 1)),
        }
    }
    counts
}

/// Use one item from the inventory.
///
/// Cured statuses are removed first and recorded in `status_removed`; then
/// the item's stat changes and statuses resolve like any effects payload,
/// consuming one unit when the item is consumable.
pub fn use_item(state: &GameState, item_id: &str, config: &EngineConfig) -> RulesResult<Resolution> {
    if !state.inventory.has_item(item_id) {
        return Err(RulesError::ItemNotHeld(item_id.to_string()));
    }
    let on_use = config
        .items
        .get(item_id)
        .and_then(|def| def.on_use.as_ref())
        .ok_or_else(|| RulesError::ItemNotUsable(item_id.to_string()))?;

    let mut removed = Vec::new();
    let mut cure_warnings = Vec::new();
    let mut statuses = state.status_effects.clone();
    for status in &on_use.cures {
        let (next, was_active) = statuses.remove(status);
        statuses = next;
        if was_active {
            removed.push(status.clone());
        } else {
            cure_warnings.push(format!("Status {status} was not active"));
        }
    }
    let cured = state.clone().with_status_effects(statuses);

    let payload = ChoiceEffects {
        description: on_use.description.clone(),
        stat_changes: on_use.stat_changes.clone(),
        items_gained: Vec::new(),
        items_lost: if on_use.consumed {
            vec![item_id.to_string()]
        } else {
            Vec::new()
        },
        apply_status: on_use.apply_status.clone(),
    };
    let mut resolution = resolve_effects(&payload, &cured, config);
    resolution.applied.status_removed = removed;
    for message in cure_warnings {
        resolution.applied.warn(message);
    }
    debug!(item = item_id, "item used");
    Ok(resolution)
}
