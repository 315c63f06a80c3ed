//! Combatants
//!
//! Current hit points are never stored. They are derived from `max_hp`
//! plus every hp-log entry run through the math evaluator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::effects::Status;
use crate::text::{damage_taken, parse_math_expression};

/// Hit points given to heroes spawned by name
pub const DEFAULT_HERO_HP: i32 = 10;

/// Which side a combatant fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CombatantKind {
    #[default]
    Hero,
    Monster,
}

impl CombatantKind {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<CombatantKind> {
        match s.to_lowercase().as_str() {
            "hero" | "pc" | "player" => Some(CombatantKind::Hero),
            "monster" | "npc" | "enemy" => Some(CombatantKind::Monster),
            _ => None,
        }
    }
}

impl std::fmt::Display for CombatantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombatantKind::Hero => write!(f, "Hero"),
            CombatantKind::Monster => write!(f, "Monster"),
        }
    }
}

/// A participant in the encounter
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Combatant {
    /// Unique combatant ID (filled in on load when missing)
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CombatantKind,
    pub initiative: i32,
    /// Last-resort ordering key, higher acts first
    pub initiative_tie_breaker: i32,
    pub initiative_modifier: i32,
    pub max_hp: i32,
    /// Free-text damage/heal deltas keyed by round
    pub hp_log: BTreeMap<u32, String>,
    pub statuses: Vec<Status>,
}

impl Combatant {
    /// Create a combatant with an empty log and no statuses
    pub fn new(id: &str, name: &str, kind: CombatantKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            ..Default::default()
        }
    }

    pub fn with_initiative(mut self, initiative: i32) -> Self {
        self.initiative = initiative;
        self
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.initiative_modifier = modifier;
        self
    }

    pub fn with_max_hp(mut self, max_hp: i32) -> Self {
        self.max_hp = max_hp;
        self
    }

    pub fn total_initiative(&self) -> i32 {
        self.initiative.saturating_add(self.initiative_modifier)
    }

    /// Current hit points: max plus the sum of every log entry
    pub fn current_hp(&self) -> i64 {
        self.hp_log
            .values()
            .map(|entry| parse_math_expression(entry))
            .fold(i64::from(self.max_hp), |hp, delta| hp.saturating_add(delta))
    }

    /// Total damage received, ignoring healing
    pub fn damage_taken(&self) -> i64 {
        self.hp_log
            .values()
            .map(|entry| damage_taken(entry))
            .fold(0i64, |sum, d| sum.saturating_add(d))
    }

    /// Statuses in effect during `round`
    pub fn active_statuses(&self, round: u32) -> Vec<&Status> {
        self.statuses.iter().filter(|s| s.is_active_in(round)).collect()
    }

    /// Statuses applied after `round`
    pub fn future_statuses(&self, round: u32) -> Vec<&Status> {
        self.statuses.iter().filter(|s| s.is_future_in(round)).collect()
    }

    pub fn status(&self, status_id: &str) -> Option<&Status> {
        self.statuses.iter().find(|s| s.id == status_id)
    }

    /// Drop timed statuses that have run out by the start of this combatant's turn
    pub fn expire_statuses(&mut self, current_round: u32) -> usize {
        let before = self.statuses.len();
        self.statuses.retain(|s| s.survives_turn_start(current_round));
        before - self.statuses.len()
    }

    /// Clear per-combat state, keeping identity and stats
    pub fn reset_for_new_combat(&mut self) {
        self.initiative = 0;
        self.hp_log.clear();
        self.statuses.clear();
    }
}

/// Partial update for a combatant. `id`, the hp-log and statuses have their
/// own operations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CombatantPatch {
    pub name: Option<String>,
    pub kind: Option<CombatantKind>,
    pub initiative: Option<i32>,
    pub initiative_tie_breaker: Option<i32>,
    pub initiative_modifier: Option<i32>,
    pub max_hp: Option<i32>,
}

impl CombatantPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(self, combatant: &mut Combatant) {
        if let Some(name) = self.name {
            combatant.name = name;
        }
        if let Some(kind) = self.kind {
            combatant.kind = kind;
        }
        if let Some(initiative) = self.initiative {
            combatant.initiative = initiative;
        }
        if let Some(tie_breaker) = self.initiative_tie_breaker {
            combatant.initiative_tie_breaker = tie_breaker;
        }
        if let Some(modifier) = self.initiative_modifier {
            combatant.initiative_modifier = modifier;
        }
        if let Some(max_hp) = self.max_hp {
            combatant.max_hp = max_hp;
        }
    }
}
