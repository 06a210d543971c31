//! Engine configuration: RNG seed, selection mode, and content tables.
//!
//! Narrative content that the resolver needs (what a status id means, what
//! an item is called and what using it does) is injected through
//! [`StatusTable`] and [`ItemTable`] instead of being hard-coded.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mz_core::inventory::DEFAULT_MAX_SLOTS;
use mz_core::{
    GameState, Inventory, InventoryItem, StatKind, StatusEffect, StatusKind, parse_stat_changes,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RulesError, RulesResult};

/// How the event selector picks among a room's available events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    /// Every candidate is equally likely.
    #[default]
    Uniform,
    /// Candidates are drawn proportionally to [`mz_core::Event::weight`].
    Weighted,
}

/// What a status id turns into when applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDefinition {
    /// Display name.
    pub name: String,
    /// Buff or debuff.
    #[serde(rename = "type")]
    pub kind: StatusKind,
    /// Turns the effect lasts.
    pub duration: u32,
    /// Optional icon asset reference.
    #[serde(default)]
    pub icon: Option<String>,
}

impl StatusDefinition {
    /// A definition without an icon.
    pub fn new(name: impl Into<String>, kind: StatusKind, duration: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            duration,
            icon: None,
        }
    }
}

/// Name given to status ids missing from the table.
pub const GENERIC_STATUS_NAME: &str = "Unknown Effect";
/// Duration given to status ids missing from the table.
pub const GENERIC_STATUS_DURATION: u32 = 3;

/// Status id to definition lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusTable {
    definitions: BTreeMap<String, StatusDefinition>,
}

impl Default for StatusTable {
    fn default() -> Self {
        Self::empty()
            .with("blessing", StatusDefinition::new("Blessed", StatusKind::Buff, 3))
            .with("curse", StatusDefinition::new("Cursed", StatusKind::Debuff, 3))
            .with("poison", StatusDefinition::new("Poisoned", StatusKind::Debuff, 3))
            .with("bleeding", StatusDefinition::new("Bleeding", StatusKind::Debuff, 2))
            .with("focused", StatusDefinition::new("Focused", StatusKind::Buff, 2))
            .with("exhausted", StatusDefinition::new("Exhausted", StatusKind::Debuff, 2))
    }
}

impl StatusTable {
    /// A table with no definitions.
    pub fn empty() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }

    /// Parse a table from JSON (`{"id": {"name", "type", "duration"}}`).
    pub fn from_json(json: &str) -> RulesResult<Self> {
        serde_json::from_str(json).map_err(|e| RulesError::InvalidConfig(e.to_string()))
    }

    /// Add or replace a definition.
    pub fn with(mut self, id: impl Into<String>, definition: StatusDefinition) -> Self {
        self.definitions.insert(id.into(), definition);
        self
    }

    /// Look up a definition.
    pub fn get(&self, id: &str) -> Option<&StatusDefinition> {
        self.definitions.get(id)
    }

    /// Build the status effect for an id.
    ///
    /// Unknown ids become a generic debuff; the flag says whether the id was
    /// found.
    pub fn instantiate(&self, id: &str) -> (StatusEffect, bool) {
        match self.definitions.get(id) {
            Some(def) => {
                let mut effect = StatusEffect::new(id, def.name.clone(), def.kind, def.duration);
                effect.icon = def.icon.clone();
                (effect, true)
            }
            None => (
                StatusEffect::new(
                    id,
                    GENERIC_STATUS_NAME,
                    StatusKind::Debuff,
                    GENERIC_STATUS_DURATION,
                ),
                false,
            ),
        }
    }
}

/// What happens when an item is used from the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUse {
    /// Result text shown to the player.
    pub description: String,
    /// Stat deltas.
    #[serde(default, deserialize_with = "deserialize_stat_changes")]
    pub stat_changes: BTreeMap<StatKind, i32>,
    /// Status ids removed by the item.
    #[serde(default)]
    pub cures: Vec<String>,
    /// Status ids applied by the item.
    #[serde(default)]
    pub apply_status: Vec<String>,
    /// Whether one unit is used up.
    #[serde(default = "default_consumed")]
    pub consumed: bool,
}

fn default_consumed() -> bool {
    true
}

fn deserialize_stat_changes<'de, D>(deserializer: D) -> Result<BTreeMap<StatKind, i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, i32>::deserialize(deserializer)?;
    parse_stat_changes(raw).map_err(serde::de::Error::custom)
}

impl ItemUse {
    /// A consumable use with only a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            stat_changes: BTreeMap::new(),
            cures: Vec::new(),
            apply_status: Vec::new(),
            consumed: true,
        }
    }

    /// Add a stat delta.
    pub fn with_stat(mut self, stat: StatKind, delta: i32) -> Self {
        self.stat_changes.insert(stat, delta);
        self
    }

    /// Add a cured status.
    pub fn curing(mut self, status: impl Into<String>) -> Self {
        self.cures.push(status.into());
        self
    }

    /// Add an applied status.
    pub fn applying(mut self, status: impl Into<String>) -> Self {
        self.apply_status.push(status.into());
        self
    }
}

/// Display data and behaviour for an item id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    /// Display name.
    pub name: String,
    /// Flavour text.
    #[serde(default)]
    pub description: Option<String>,
    /// Icon asset reference.
    #[serde(default)]
    pub icon: Option<String>,
    /// Use effect, if the item can be used.
    #[serde(default, rename = "use")]
    pub on_use: Option<ItemUse>,
}

impl ItemDefinition {
    /// A plain item with no use effect.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            icon: None,
            on_use: None,
        }
    }

    /// Attach a use effect.
    pub fn usable(mut self, on_use: ItemUse) -> Self {
        self.on_use = Some(on_use);
        self
    }
}

/// Item id to definition lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemTable {
    definitions: BTreeMap<String, ItemDefinition>,
}

impl Default for ItemTable {
    fn default() -> Self {
        Self::empty()
            .with(
                "bandage",
                ItemDefinition::new("Bandage").usable(
                    ItemUse::new("You bind your wounds.")
                        .with_stat(StatKind::Hp, 15)
                        .curing("bleeding"),
                ),
            )
            .with(
                "antidote",
                ItemDefinition::new("Antidote")
                    .usable(ItemUse::new("The bitter draught clears your veins.").curing("poison")),
            )
            .with(
                "ration",
                ItemDefinition::new("Ration")
                    .usable(ItemUse::new("You eat quickly.").with_stat(StatKind::Hunger, 30)),
            )
            .with(
                "holy_water",
                ItemDefinition::new("Holy Water").usable(
                    ItemUse::new("A cool calm washes over you.")
                        .with_stat(StatKind::San, 10)
                        .curing("curse")
                        .applying("blessing"),
                ),
            )
            .with("torch", ItemDefinition::new("Torch"))
    }
}

impl ItemTable {
    /// A table with no definitions.
    pub fn empty() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }

    /// Parse a table from JSON.
    pub fn from_json(json: &str) -> RulesResult<Self> {
        serde_json::from_str(json).map_err(|e| RulesError::InvalidConfig(e.to_string()))
    }

    /// Add or replace a definition.
    pub fn with(mut self, id: impl Into<String>, definition: ItemDefinition) -> Self {
        self.definitions.insert(id.into(), definition);
        self
    }

    /// Look up a definition.
    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.definitions.get(id)
    }

    /// A single inventory unit for an id. Unknown ids are named after
    /// themselves.
    pub fn item_for(&self, id: &str) -> InventoryItem {
        match self.definitions.get(id) {
            Some(def) => InventoryItem {
                id: id.to_string(),
                name: def.name.clone(),
                quantity: 1,
                description: def.description.clone(),
                icon: def.icon.clone(),
            },
            None => InventoryItem::new(id, id),
        }
    }
}

/// Configuration for a [`crate::RulesEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed for reproducible selection and success rolls.
    pub seed: u64,
    /// Inventory slots for new games.
    pub inventory_slots: usize,
    /// How events are drawn from a room.
    pub selection: SelectionMode,
    /// Status id lookup.
    pub statuses: StatusTable,
    /// Item id lookup.
    pub items: ItemTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            inventory_slots: DEFAULT_MAX_SLOTS,
            selection: SelectionMode::Uniform,
            statuses: StatusTable::default(),
            items: ItemTable::default(),
        }
    }
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the inventory slot count (at least 1).
    pub fn with_inventory_slots(mut self, slots: usize) -> Self {
        self.inventory_slots = slots.max(1);
        self
    }

    /// Set the selection mode.
    pub fn with_selection(mut self, selection: SelectionMode) -> Self {
        self.selection = selection;
        self
    }

    /// Replace the status table.
    pub fn with_statuses(mut self, statuses: StatusTable) -> Self {
        self.statuses = statuses;
        self
    }

    /// Replace the item table.
    pub fn with_items(mut self, items: ItemTable) -> Self {
        self.items = items;
        self
    }

    /// A fresh game state using this configuration's inventory size.
    pub fn new_game(&self, start_time: DateTime<Utc>) -> GameState {
        GameState::new(start_time).with_inventory(Inventory::with_slots(self.inventory_slots))
    }
}
