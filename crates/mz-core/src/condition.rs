//! Predicates gating choices: requirements and success conditions.
//!
//! Authoring JSON describes these as loose maps
//! (`{"items": [...], "stats": {...}, "probability": 0.5}`). They are parsed
//! once into a [`Condition`] tree so that evaluation is an exhaustive match
//! over typed variants rather than string dispatch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::stats::StatKind;

/// A comparison between a stat's current value and a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CompareOp {
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `<`
    Lt,
    /// `<=`
    Le,
}

impl CompareOp {
    /// Parse an operator symbol. Anything unrecognised is an error.
    pub fn from_symbol(symbol: &str) -> CoreResult<Self> {
        match symbol.trim() {
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "==" => Ok(Self::Eq),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            other => Err(CoreError::UnknownOperator(other.to_string())),
        }
    }

    /// The operator's symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }

    /// Compare `actual` against `required`.
    pub fn holds(self, actual: i32, required: i32) -> bool {
        match self {
            Self::Gt => actual > required,
            Self::Ge => actual >= required,
            Self::Eq => actual == required,
            Self::Lt => actual < required,
            Self::Le => actual <= required,
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl From<CompareOp> for String {
    fn from(op: CompareOp) -> Self {
        op.symbol().to_string()
    }
}

impl TryFrom<String> for CompareOp {
    type Error = CoreError;

    fn try_from(value: String) -> CoreResult<Self> {
        Self::from_symbol(&value)
    }
}

/// A predicate over game state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawCondition")]
pub enum Condition {
    /// Every listed item id must be in the inventory.
    ItemsPresent(Vec<String>),
    /// A stat must satisfy a comparison.
    StatCompare {
        /// Which stat.
        stat: StatKind,
        /// The comparison.
        op: CompareOp,
        /// Threshold on the right-hand side.
        value: i32,
    },
    /// Succeeds when a uniform sample in [0, 1) falls below `p`.
    Probability(f64),
    /// Every nested condition must hold.
    All(Vec<Condition>),
}

impl Condition {
    /// Require every listed item.
    pub fn items<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ItemsPresent(ids.into_iter().map(Into::into).collect())
    }

    /// Require a stat comparison.
    pub fn stat(stat: StatKind, op: CompareOp, value: i32) -> Self {
        Self::StatCompare { stat, op, value }
    }

    /// A probability gate. `p` must lie in [0, 1].
    pub fn probability(p: f64) -> CoreResult<Self> {
        check_probability(p)?;
        Ok(Self::Probability(p))
    }

    /// Conjunction of conditions.
    pub fn all(conditions: Vec<Condition>) -> Self {
        Self::All(conditions)
    }

    /// Check structural validity of the whole tree.
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            Self::ItemsPresent(_) | Self::StatCompare { .. } => Ok(()),
            Self::Probability(p) => check_probability(*p),
            Self::All(inner) => inner.iter().try_for_each(Condition::validate),
        }
    }

    /// True if evaluating this tree draws from the random source.
    pub fn is_random(&self) -> bool {
        match self {
            Self::Probability(_) => true,
            Self::All(inner) => inner.iter().any(Condition::is_random),
            Self::ItemsPresent(_) | Self::StatCompare { .. } => false,
        }
    }
}

fn check_probability(p: f64) -> CoreResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(CoreError::InvalidProbability(p))
    }
}

/// A stat threshold as authored: either a full `{operator, value}` object or
/// a bare number meaning `>=`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawThreshold {
    Full { operator: String, value: i32 },
    AtLeast(i32),
}

/// Authoring shape shared by `requirements` and `successConditions`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCondition {
    #[serde(default)]
    items: Vec<String>,
    #[serde(default)]
    stats: BTreeMap<String, RawThreshold>,
    #[serde(default)]
    probability: Option<f64>,
}

impl TryFrom<RawCondition> for Condition {
    type Error = CoreError;

    fn try_from(raw: RawCondition) -> CoreResult<Self> {
        let mut parts = Vec::new();
        if !raw.items.is_empty() {
            parts.push(Condition::ItemsPresent(raw.items));
        }
        for (name, threshold) in raw.stats {
            let stat = StatKind::from_name(&name)?;
            let (op, value) = match threshold {
                RawThreshold::Full { operator, value } => (CompareOp::from_symbol(&operator)?, value),
                RawThreshold::AtLeast(value) => (CompareOp::Ge, value),
            };
            parts.push(Condition::stat(stat, op, value));
        }
        if let Some(p) = raw.probability {
            parts.push(Condition::probability(p)?);
        }
        Ok(Condition::All(parts))
    }
}
