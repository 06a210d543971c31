//! Narrative events, their choices, and declarative effect payloads.
//!
//! Events arrive already parsed from authoring JSON and are never mutated.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::condition::Condition;
use crate::error::{CoreError, CoreResult};
use crate::stats::StatKind;

/// Category tag marking an event that exclusively occupies its room.
pub const TRAP_CATEGORY: &str = "trap";

/// Whether an event leaves the room once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Persistence {
    /// Consumed after the first resolution.
    OneTime,
    /// Stays available for future visits.
    Persistent,
}

impl Persistence {
    /// Parse the authoring name (`oneTime` or `persistent`).
    pub fn from_name(name: &str) -> CoreResult<Self> {
        match name {
            "oneTime" => Ok(Self::OneTime),
            "persistent" => Ok(Self::Persistent),
            other => Err(CoreError::UnknownPersistence(other.to_string())),
        }
    }
}

impl std::fmt::Display for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneTime => write!(f, "oneTime"),
            Self::Persistent => write!(f, "persistent"),
        }
    }
}

impl TryFrom<String> for Persistence {
    type Error = CoreError;

    fn try_from(value: String) -> CoreResult<Self> {
        Self::from_name(&value)
    }
}

impl From<Persistence> for String {
    fn from(persistence: Persistence) -> Self {
        persistence.to_string()
    }
}

/// Resolve authored stat names to stats.
///
/// Two spellings of the same stat (`FIT` and `FITNESS`) in one payload are
/// rejected instead of one silently replacing the other.
pub fn parse_stat_changes(raw: BTreeMap<String, i32>) -> CoreResult<BTreeMap<StatKind, i32>> {
    let mut changes = BTreeMap::new();
    let mut spelled: BTreeMap<StatKind, String> = BTreeMap::new();
    for (name, delta) in raw {
        let stat = StatKind::from_name(&name)?;
        if let Some(first) = spelled.get(&stat) {
            return Err(CoreError::DuplicateStat {
                stat,
                first: first.clone(),
                second: name,
            });
        }
        spelled.insert(stat, name);
        changes.insert(stat, delta);
    }
    Ok(changes)
}

fn deserialize_stat_changes<'de, D>(deserializer: D) -> Result<BTreeMap<StatKind, i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, i32>::deserialize(deserializer)?;
    parse_stat_changes(raw).map_err(serde::de::Error::custom)
}

/// What happens when a choice resolves one way or the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceEffects {
    /// User-facing result text.
    pub description: String,
    /// Signed deltas per stat.
    #[serde(
        default,
        deserialize_with = "deserialize_stat_changes",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub stat_changes: BTreeMap<StatKind, i32>,
    /// Item ids to add, one unit each.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items_gained: Vec<String>,
    /// Item ids to remove, one unit each.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items_lost: Vec<String>,
    /// Status effect ids to apply.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apply_status: Vec<String>,
}

impl ChoiceEffects {
    /// A payload with only a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Add a stat delta.
    pub fn with_stat(mut self, stat: StatKind, delta: i32) -> Self {
        self.stat_changes.insert(stat, delta);
        self
    }

    /// Add a gained item.
    pub fn gain(mut self, item: impl Into<String>) -> Self {
        self.items_gained.push(item.into());
        self
    }

    /// Add a lost item.
    pub fn lose(mut self, item: impl Into<String>) -> Self {
        self.items_lost.push(item.into());
        self
    }

    /// Add a status to apply.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.apply_status.push(status.into());
        self
    }

    /// A payload is valid when its description is non-empty.
    pub fn is_valid(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// True when the payload declares no stat, item, or status change.
    pub fn is_noop(&self) -> bool {
        self.stat_changes.is_empty()
            && self.items_gained.is_empty()
            && self.items_lost.is_empty()
            && self.apply_status.is_empty()
    }
}

/// A selectable action within an event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Button text.
    pub text: String,
    /// Prerequisites; absent means always available.
    #[serde(default)]
    pub requirements: Option<Condition>,
    /// Gate deciding success vs failure; absent means always succeed.
    #[serde(default)]
    pub success_conditions: Option<Condition>,
    /// Applied on success.
    pub success_effects: ChoiceEffects,
    /// Applied on failure; success effects are used when absent.
    #[serde(default)]
    pub failure_effects: Option<ChoiceEffects>,
}

impl Choice {
    /// An ungated choice that always applies `effects`.
    pub fn new(text: impl Into<String>, effects: ChoiceEffects) -> Self {
        Self {
            text: text.into(),
            requirements: None,
            success_conditions: None,
            success_effects: effects,
            failure_effects: None,
        }
    }

    /// Attach prerequisites.
    pub fn with_requirements(mut self, requirements: Condition) -> Self {
        self.requirements = Some(requirements);
        self
    }

    /// Attach a success gate.
    pub fn with_success_conditions(mut self, conditions: Condition) -> Self {
        self.success_conditions = Some(conditions);
        self
    }

    /// Attach failure effects.
    pub fn with_failure(mut self, effects: ChoiceEffects) -> Self {
        self.failure_effects = Some(effects);
        self
    }

    /// Valid when the text is non-empty and the success effects are valid.
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && self.success_effects.is_valid()
    }
}

fn default_weight() -> u32 {
    1
}

/// A narrative encounter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Narrative text.
    pub description: String,
    /// Opaque asset reference.
    pub image: String,
    /// Free-form tag such as `trap`, `item`, `character`, or `monster`.
    pub category: String,
    /// Selection bias for weighted selection.
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// One-time or persistent.
    pub persistence: Persistence,
    /// Ordered choices; never empty in a valid event.
    pub choices: Vec<Choice>,
}

impl Event {
    /// Construct an event with weight 1 whose image reference is its id.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        persistence: Persistence,
        choices: Vec<Choice>,
    ) -> Self {
        let id = id.into();
        Self {
            image: id.clone(),
            id,
            name: name.into(),
            description: description.into(),
            category: category.into(),
            weight: 1,
            persistence,
            choices,
        }
    }

    /// Set the selection weight.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Set the image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Check every structural invariant, reporting the first violation.
    pub fn validate(&self) -> CoreResult<()> {
        let fail = |reason: &str| -> CoreResult<()> {
            Err(CoreError::InvalidEvent {
                id: self.id.clone(),
                reason: reason.to_string(),
            })
        };
        let fields = [
            ("id", &self.id),
            ("name", &self.name),
            ("description", &self.description),
            ("image", &self.image),
            ("category", &self.category),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
            return fail(&format!("{field} is empty"));
        }
        if self.weight == 0 {
            return fail("weight must be positive");
        }
        if self.choices.is_empty() {
            return fail("no choices");
        }
        for (index, choice) in self.choices.iter().enumerate() {
            if !choice.is_valid() {
                return fail(&format!("choice {index} is invalid"));
            }
            for cond in [&choice.requirements, &choice.success_conditions]
                .into_iter()
                .flatten()
            {
                if cond.validate().is_err() {
                    return fail(&format!("choice {index} has a malformed condition"));
                }
            }
        }
        Ok(())
    }

    /// Boolean form of [`Event::validate`].
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// True for events that lock their room against other events.
    pub fn is_trap(&self) -> bool {
        self.category == TRAP_CATEGORY
    }

    /// True when resolving the event consumes it.
    pub fn is_one_time(&self) -> bool {
        self.persistence == Persistence::OneTime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::CompareOp;

    fn sample_event() -> Event {
        Event::new(
            "rope_bridge",
            "Rope Bridge",
            "A frayed bridge spans the chasm.",
            "trap",
            Persistence::Persistent,
            vec![Choice::new(
                "Cross carefully",
                ChoiceEffects::new("You make it across.").with_stat(StatKind::Fit, -5),
            )],
        )
    }

    #[test]
    fn valid_event() {
        let event = sample_event();
        assert!(event.is_valid());
        assert!(event.is_trap());
        assert!(!event.is_one_time());
    }

    #[test]
    fn empty_fields_are_invalid() {
        let mut event = sample_event();
        event.name = String::new();
        assert!(matches!(
            event.validate(),
            Err(CoreError::InvalidEvent { reason, .. }) if reason == "name is empty"
        ));
    }

    #[test]
    fn zero_weight_and_no_choices_are_invalid() {
        assert!(!sample_event().with_weight(0).is_valid());
        let mut event = sample_event();
        event.choices.clear();
        assert!(!event.is_valid());
    }

    #[test]
    fn choice_validity() {
        assert!(!Choice::new("", ChoiceEffects::new("x")).is_valid());
        assert!(!Choice::new("Go", ChoiceEffects::new("  ")).is_valid());
        let mut event = sample_event();
        event.choices.push(Choice::new("Wait", ChoiceEffects::default()));
        assert!(!event.is_valid());
    }

    #[test]
    fn malformed_condition_invalidates_event() {
        let mut event = sample_event();
        event.choices[0].success_conditions = Some(Condition::Probability(3.0));
        assert!(!event.is_valid());
    }

    #[test]
    fn persistence_names() {
        assert_eq!(Persistence::from_name("oneTime").unwrap(), Persistence::OneTime);
        assert_eq!(Persistence::from_name("persistent").unwrap(), Persistence::Persistent);
        assert!(Persistence::from_name("forever").is_err());
        assert_eq!(Persistence::OneTime.to_string(), "oneTime");
    }

    #[test]
    fn noop_effects() {
        assert!(ChoiceEffects::new("Nothing happens.").is_noop());
        assert!(!ChoiceEffects::new("Ouch").with_stat(StatKind::Hp, -1).is_noop());
    }

    #[test]
    fn deserialize_authoring_json() {
        let json = serde_json::json!({
            "id": "locked_door",
            "name": "Locked Door",
            "description": "A heavy door blocks the way.",
            "image": "door.png",
            "category": "item",
            "persistence": "oneTime",
            "choices": [{
                "text": "Force it open",
                "requirements": {"stats": {"FIT": {"operator": ">", "value": 40}}},
                "successConditions": {"probability": 0.5},
                "successEffects": {
                    "description": "The door gives way.",
                    "statChanges": {"FITNESS": -10},
                    "itemsGained": ["door_hinge"]
                },
                "failureEffects": {
                    "description": "You hurt your shoulder.",
                    "statChanges": {"HP": -5}
                }
            }]
        });
        let event: Event = serde_json::from_value(json).unwrap();
        assert!(event.is_valid());
        assert_eq!(event.weight, 1);
        assert!(event.is_one_time());
        let choice = &event.choices[0];
        assert_eq!(
            choice.requirements,
            Some(Condition::All(vec![Condition::stat(StatKind::Fit, CompareOp::Gt, 40)]))
        );
        assert_eq!(choice.success_effects.stat_changes.get(&StatKind::Fit), Some(&-10));
        assert_eq!(
            choice.failure_effects.as_ref().map(|e| e.description.as_str()),
            Some("You hurt your shoulder.")
        );
    }

    #[test]
    fn alias_collision_in_stat_changes_is_rejected() {
        let json = serde_json::json!({
            "description": "You stumble.",
            "statChanges": {"FIT": -10, "FITNESS": -5}
        });
        let err = serde_json::from_value::<ChoiceEffects>(json).unwrap_err();
        assert!(err.to_string().contains("FIT given twice"), "{err}");

        let raw = BTreeMap::from([("SAN".to_string(), 1), ("sanity".to_string(), 2)]);
        assert!(matches!(
            parse_stat_changes(raw),
            Err(CoreError::DuplicateStat { stat: StatKind::San, .. })
        ));
    }

    #[test]
    fn distinct_stat_names_all_survive() {
        let json = serde_json::json!({
            "description": "A long march.",
            "statChanges": {"FITNESS": -10, "HUNGER": -5, "sanity": 2}
        });
        let effects: ChoiceEffects = serde_json::from_value(json).unwrap();
        assert_eq!(
            effects.stat_changes,
            BTreeMap::from([(StatKind::San, 2), (StatKind::Fit, -10), (StatKind::Hunger, -5)])
        );
        assert!(serde_json::from_value::<ChoiceEffects>(
            serde_json::json!({"description": "x", "statChanges": {"MANA": 1}})
        )
        .is_err());
    }

    #[test]
    fn persistence_round_trips_through_json() {
        assert_eq!(serde_json::to_value(Persistence::OneTime).unwrap(), "oneTime");
        let back: Persistence = serde_json::from_value(serde_json::json!("persistent")).unwrap();
        assert_eq!(back, Persistence::Persistent);
    }

    #[test]
    fn deserialize_rejects_unknown_persistence() {
        let json = serde_json::json!({
            "id": "x", "name": "x", "description": "x", "image": "x",
            "category": "x", "persistence": "sometimes",
            "choices": [{"text": "ok", "successEffects": {"description": "ok"}}]
        });
        let err = serde_json::from_value::<Event>(json).unwrap_err();
        assert!(err.to_string().contains("unknown persistence mode: sometimes"), "{err}");
    }
}
