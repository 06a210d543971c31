//! Slot-limited, stacking inventory.
//!
//! Items stack by id: each id occupies exactly one slot regardless of its
//! quantity. Only a *new* id needs a free slot.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Slot count used when none is specified.
pub const DEFAULT_MAX_SLOTS: usize = 5;

/// A stack of one item kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Item identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Number held; always at least 1.
    pub quantity: u32,
    /// Optional flavour text.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional icon asset reference.
    #[serde(default)]
    pub icon: Option<String>,
}

impl InventoryItem {
    /// A single unit of an item.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity: 1,
            description: None,
            icon: None,
        }
    }

    /// Set the quantity.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// The player's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<InventoryItem>", into = "Vec<InventoryItem>")]
pub struct Inventory {
    items: Vec<InventoryItem>,
    max_slots: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_slots(DEFAULT_MAX_SLOTS)
    }
}

impl Inventory {
    /// An empty inventory with the default slot count.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty inventory with a custom slot count.
    pub fn with_slots(max_slots: usize) -> Self {
        Self {
            items: Vec::new(),
            max_slots,
        }
    }

    /// Rebuild an inventory from saved items, stacking repeated ids.
    ///
    /// Fails with [`CoreError::InventoryFull`] if the items need more than
    /// `max_slots` slots.
    pub fn from_items(items: Vec<InventoryItem>, max_slots: usize) -> CoreResult<Self> {
        items
            .into_iter()
            .try_fold(Self::with_slots(max_slots), |inv, item| inv.add_item(item))
    }

    /// Add an item, stacking onto an existing id.
    ///
    /// Fails with [`CoreError::InventoryFull`] when the id is new and every
    /// slot is taken. Stacking never needs a free slot.
    pub fn add_item(&self, item: InventoryItem) -> CoreResult<Self> {
        if item.quantity == 0 {
            return Err(CoreError::ZeroQuantity(item.id));
        }
        let mut items = self.items.clone();
        if let Some(existing) = items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else if items.len() >= self.max_slots {
            return Err(CoreError::InventoryFull(item.id));
        } else {
            items.push(item);
        }
        Ok(Self {
            items,
            max_slots: self.max_slots,
        })
    }

    /// Remove up to `quantity` units of an item.
    ///
    /// Takes what exists when fewer are held; the returned count says how
    /// many were actually removed. A stack that reaches zero frees its slot.
    pub fn remove_item(&self, id: &str, quantity: u32) -> CoreResult<(Self, u32)> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
        let mut items = self.items.clone();
        let held = items[pos].quantity;
        let removed = quantity.min(held);
        if removed == held {
            items.remove(pos);
        } else {
            items[pos].quantity = held - removed;
        }
        Ok((
            Self {
                items,
                max_slots: self.max_slots,
            },
            removed,
        ))
    }

    /// Check whether at least one unit of an item is held.
    pub fn has_item(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    /// Units held of an item, 0 if absent.
    pub fn quantity_of(&self, id: &str) -> u32 {
        self.get(id).map(|i| i.quantity).unwrap_or(0)
    }

    /// Look up an item stack.
    pub fn get(&self, id: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// All stacks in insertion order.
    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    /// Maximum number of distinct item ids.
    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no item is held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_slots
    }
}

impl TryFrom<Vec<InventoryItem>> for Inventory {
    type Error = CoreError;

    fn try_from(list: Vec<InventoryItem>) -> CoreResult<Self> {
        Self::from_items(list, DEFAULT_MAX_SLOTS)
    }
}

impl From<Inventory> for Vec<InventoryItem> {
    fn from(inv: Inventory) -> Self {
        inv.items
    }
}
