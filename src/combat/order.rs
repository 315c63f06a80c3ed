//! Turn order
//!
//! Stable sort by total initiative (descending), then the configured
//! tie-breaker rule, then `initiative_tie_breaker` (descending).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::combatant::Combatant;

/// How equal total initiatives are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreakerRule {
    /// Higher initiative modifier acts first
    #[default]
    Modifier,
    /// Case-insensitive name, A before Z
    Name,
}

impl TieBreakerRule {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<TieBreakerRule> {
        match s.to_lowercase().as_str() {
            "modifier" | "mod" | "dex" => Some(TieBreakerRule::Modifier),
            "name" | "alpha" | "alphabetical" => Some(TieBreakerRule::Name),
            _ => None,
        }
    }
}

impl std::fmt::Display for TieBreakerRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TieBreakerRule::Modifier => write!(f, "modifier"),
            TieBreakerRule::Name => write!(f, "name"),
        }
    }
}

/// Compare two combatants for turn order; `Less` acts first
pub fn compare(a: &Combatant, b: &Combatant, rule: TieBreakerRule) -> Ordering {
    b.total_initiative()
        .cmp(&a.total_initiative())
        .then_with(|| match rule {
            TieBreakerRule::Modifier => b.initiative_modifier.cmp(&a.initiative_modifier),
            TieBreakerRule::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        })
        .then_with(|| b.initiative_tie_breaker.cmp(&a.initiative_tie_breaker))
}

/// Full ranking of `combatants` for a round. Equal entries keep insertion order.
pub fn turn_order(combatants: &[Combatant], rule: TieBreakerRule) -> Vec<&Combatant> {
    let mut order: Vec<&Combatant> = combatants.iter().collect();
    order.sort_by(|a, b| compare(a, b, rule));
    order
}
