//! Player stats: four bounded integers and the stat-name vocabulary.
//!
//! Every stat lives in `[STAT_MIN, STAT_MAX]`. Mutations never write through
//! a shared reference; [`PlayerStats::adjust`] returns a new value together
//! with a [`StatChange`] describing what was requested and what happened.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Lowest value any stat can take.
pub const STAT_MIN: i32 = 0;
/// Highest value any stat can take.
pub const STAT_MAX: i32 = 100;

/// One of the four player stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatKind {
    /// Health. The player dies at 0.
    Hp,
    /// Sanity. The player breaks at 0.
    San,
    /// Fitness.
    Fit,
    /// Satiety; lower means hungrier.
    Hunger,
}

impl StatKind {
    /// All stats in canonical order.
    pub const ALL: [StatKind; 4] = [Self::Hp, Self::San, Self::Fit, Self::Hunger];

    /// Resolve a stat name, accepting the `FITNESS` and `SANITY` aliases.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn from_name(name: &str) -> CoreResult<Self> {
        match name.trim().to_uppercase().as_str() {
            "HP" => Ok(Self::Hp),
            "SAN" | "SANITY" => Ok(Self::San),
            "FIT" | "FITNESS" => Ok(Self::Fit),
            "HUNGER" => Ok(Self::Hunger),
            _ => Err(CoreError::UnknownStat(name.to_string())),
        }
    }

    /// The canonical upper-case label used in reports and warnings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hp => "HP",
            Self::San => "SAN",
            Self::Fit => "FIT",
            Self::Hunger => "HUNGER",
        }
    }
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for StatKind {
    type Error = CoreError;

    fn try_from(value: String) -> CoreResult<Self> {
        Self::from_name(&value)
    }
}

impl From<StatKind> for String {
    fn from(stat: StatKind) -> Self {
        stat.label().to_string()
    }
}

/// Which bound a stat change ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampBound {
    /// The change would have exceeded [`STAT_MAX`].
    Maximum,
    /// The change would have gone below [`STAT_MIN`].
    Minimum,
}

/// The record of a single stat mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatChange {
    /// The delta that was asked for.
    pub requested: i32,
    /// The delta that was actually applied after clamping.
    pub actual: i32,
    /// Value before the change.
    pub old_value: i32,
    /// Value after the change.
    pub new_value: i32,
}

impl StatChange {
    /// The bound the requested delta ran into, if any.
    pub fn clamped(&self) -> Option<ClampBound> {
        let raw = i64::from(self.old_value) + i64::from(self.requested);
        if raw > i64::from(STAT_MAX) {
            Some(ClampBound::Maximum)
        } else if raw < i64::from(STAT_MIN) {
            Some(ClampBound::Minimum)
        } else {
            None
        }
    }
}

/// The player's four bounded stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StatsRecord", into = "StatsRecord")]
pub struct PlayerStats {
    hp: i32,
    san: i32,
    fit: i32,
    hunger: i32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            hp: 100,
            san: 100,
            fit: 70,
            hunger: 80,
        }
    }
}

impl PlayerStats {
    /// Create stats from raw values, clamping each into range.
    pub fn new(hp: i32, san: i32, fit: i32, hunger: i32) -> Self {
        Self {
            hp: clamp_stat(hp),
            san: clamp_stat(san),
            fit: clamp_stat(fit),
            hunger: clamp_stat(hunger),
        }
    }

    /// Current health.
    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Current sanity.
    pub fn san(&self) -> i32 {
        self.san
    }

    /// Current fitness.
    pub fn fit(&self) -> i32 {
        self.fit
    }

    /// Current satiety.
    pub fn hunger(&self) -> i32 {
        self.hunger
    }

    /// Read a stat by kind.
    pub fn get(&self, stat: StatKind) -> i32 {
        match stat {
            StatKind::Hp => self.hp,
            StatKind::San => self.san,
            StatKind::Fit => self.fit,
            StatKind::Hunger => self.hunger,
        }
    }

    /// Return a copy with one stat set to `value` (clamped).
    pub fn with(mut self, stat: StatKind, value: i32) -> Self {
        let value = clamp_stat(value);
        match stat {
            StatKind::Hp => self.hp = value,
            StatKind::San => self.san = value,
            StatKind::Fit => self.fit = value,
            StatKind::Hunger => self.hunger = value,
        }
        self
    }

    /// Apply a signed delta to one stat, clamping to bounds.
    ///
    /// Returns the new stats and the change record. `actual` may be smaller
    /// in magnitude than `requested`, down to zero when already at a bound.
    pub fn adjust(&self, stat: StatKind, delta: i32) -> (Self, StatChange) {
        let old_value = self.get(stat);
        let new_value = clamp_stat(old_value.saturating_add(delta));
        let change = StatChange {
            requested: delta,
            actual: new_value - old_value,
            old_value,
            new_value,
        };
        (self.with(stat, new_value), change)
    }

    /// True while health is above zero.
    pub fn is_alive(&self) -> bool {
        self.hp > STAT_MIN
    }

    /// True while sanity is above zero.
    pub fn is_sane(&self) -> bool {
        self.san > STAT_MIN
    }
}

impl std::fmt::Display for PlayerStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HP {} | SAN {} | FIT {} | HUNGER {}",
            self.hp, self.san, self.fit, self.hunger
        )
    }
}

fn clamp_stat(value: i32) -> i32 {
    value.clamp(STAT_MIN, STAT_MAX)
}

/// Save-layer shape: a plain int map keyed by lower-case stat name.
#[derive(Serialize, Deserialize)]
struct StatsRecord {
    hp: i32,
    san: i32,
    fit: i32,
    hunger: i32,
}

impl From<StatsRecord> for PlayerStats {
    fn from(r: StatsRecord) -> Self {
        Self::new(r.hp, r.san, r.fit, r.hunger)
    }
}

impl From<PlayerStats> for StatsRecord {
    fn from(s: PlayerStats) -> Self {
        Self {
            hp: s.hp,
            san: s.san,
            fit: s.fit,
            hunger: s.hunger,
        }
    }
}
