//! Status effects and the per-player status set.

use serde::{Deserialize, Serialize};

/// Whether a status effect helps or hurts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusKind {
    /// A beneficial effect.
    Buff,
    /// A harmful effect.
    Debuff,
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buff => write!(f, "BUFF"),
            Self::Debuff => write!(f, "DEBUFF"),
        }
    }
}

/// A timed effect on the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEffect {
    /// Identifier; at most one effect per id is active.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Buff or debuff.
    #[serde(rename = "type")]
    pub kind: StatusKind,
    /// Turns left before the effect wears off.
    pub remaining_duration: u32,
    /// Optional icon asset reference.
    #[serde(default)]
    pub icon: Option<String>,
}

impl StatusEffect {
    /// Create a status effect without an icon.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: StatusKind,
        remaining_duration: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            remaining_duration,
            icon: None,
        }
    }

    /// Attach an icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// The set of active status effects, unique by id, in application order.
///
/// All operations return a new set; the receiver is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<StatusEffect>", into = "Vec<StatusEffect>")]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an effect, replacing any active effect with the same id.
    ///
    /// A replaced effect keeps its position in the ordering.
    pub fn apply(&self, effect: StatusEffect) -> Self {
        let mut effects = self.effects.clone();
        match effects.iter_mut().find(|e| e.id == effect.id) {
            Some(slot) => *slot = effect,
            None => effects.push(effect),
        }
        Self { effects }
    }

    /// Remove the effect with the given id. Returns the new set and whether
    /// anything was removed.
    pub fn remove(&self, id: &str) -> (Self, bool) {
        let effects: Vec<_> = self.effects.iter().filter(|e| e.id != id).cloned().collect();
        let removed = effects.len() < self.effects.len();
        (Self { effects }, removed)
    }

    /// Advance one turn: decrement every duration and drop expired effects.
    ///
    /// Returns the new set and the ids that expired, in order.
    pub fn tick(&self) -> (Self, Vec<String>) {
        let mut expired = Vec::new();
        let mut effects = Vec::with_capacity(self.effects.len());
        for effect in &self.effects {
            let remaining = effect.remaining_duration.saturating_sub(1);
            if remaining == 0 {
                expired.push(effect.id.clone());
            } else {
                effects.push(StatusEffect {
                    remaining_duration: remaining,
                    ..effect.clone()
                });
            }
        }
        (Self { effects }, expired)
    }

    /// Check whether an effect with this id is active.
    pub fn contains(&self, id: &str) -> bool {
        self.effects.iter().any(|e| e.id == id)
    }

    /// Look up an active effect.
    pub fn get(&self, id: &str) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.id == id)
    }

    /// Iterate over active effects.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    /// Number of active effects.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// True if no effect is active.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl From<Vec<StatusEffect>> for StatusEffects {
    fn from(list: Vec<StatusEffect>) -> Self {
        list.into_iter()
            .fold(Self::default(), |set, effect| set.apply(effect))
    }
}

impl From<StatusEffects> for Vec<StatusEffect> {
    fn from(set: StatusEffects) -> Self {
        set.effects
    }
}
