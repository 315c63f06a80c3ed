//! Damage statistics
//!
//! Damage taken counts only negative terms of the hp-log, so healing in the
//! same entry does not cancel it out.

use serde::Serialize;

use super::combatant::{Combatant, CombatantKind};

/// Damage totals for one faction
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactionDamage {
    pub total: i64,
    pub avg_per_round: f64,
}

/// Damage taken by a single combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantDamage {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CombatantKind,
    pub damage_taken: i64,
}

/// Aggregate damage report for the encounter
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatStatistics {
    pub hero_damage: FactionDamage,
    pub monster_damage: FactionDamage,
    /// Combatant who took the most damage, if anyone took any
    pub max_damage_taken: Option<CombatantDamage>,
    /// Every combatant, most damage first
    pub by_combatant: Vec<CombatantDamage>,
}

impl CombatStatistics {
    pub fn compute(combatants: &[Combatant], current_round: u32) -> Self {
        let mut hero_total = 0i64;
        let mut monster_total = 0i64;
        let mut by_combatant = Vec::with_capacity(combatants.len());

        for combatant in combatants {
            let damage = combatant.damage_taken();
            match combatant.kind {
                CombatantKind::Hero => hero_total = hero_total.saturating_add(damage),
                CombatantKind::Monster => monster_total = monster_total.saturating_add(damage),
            }
            by_combatant.push(CombatantDamage {
                id: combatant.id.clone(),
                name: combatant.name.clone(),
                kind: combatant.kind,
                damage_taken: damage,
            });
        }

        // First in insertion order wins a tie
        let max_damage_taken = by_combatant
            .iter()
            .fold(None::<&CombatantDamage>, |best, entry| match best {
                Some(b) if b.damage_taken >= entry.damage_taken => Some(b),
                _ => Some(entry),
            })
            .filter(|entry| entry.damage_taken > 0)
            .cloned();

        by_combatant.sort_by(|a, b| b.damage_taken.cmp(&a.damage_taken));

        let rounds = f64::from(current_round.max(1));
        Self {
            hero_damage: FactionDamage {
                total: hero_total,
                avg_per_round: hero_total as f64 / rounds,
            },
            monster_damage: FactionDamage {
                total: monster_total,
                avg_per_round: monster_total as f64 / rounds,
            },
            max_damage_taken,
            by_combatant,
        }
    }
}
