//! TestParty - a fixed line-up for encounter tests
//!
//! Turn order under the modifier rule:
//! - Aria (hero, 18 + 3)
//! - Warg (monster, 16 + 2)
//! - Bram (hero, 12 + 1)
//! - Goblin (monster, 10 + 0)

#![allow(dead_code)]

use turnkeeper::combat::{Combatant, CombatantKind, CombatStore};
use turnkeeper::storage::Storage;

pub struct TestParty {
    pub aria: String,
    pub warg: String,
    pub bram: String,
    pub goblin: String,
}

impl TestParty {
    /// Add the line-up in insertion order Bram, Goblin, Aria, Warg
    pub fn join<S: Storage>(store: &mut CombatStore<S>) -> Self {
        let bram = store.add_combatant(
            Combatant::new("bram", "Bram", CombatantKind::Hero)
                .with_initiative(12)
                .with_modifier(1)
                .with_max_hp(30),
        );
        let goblin = store.add_combatant(
            Combatant::new("goblin", "Goblin", CombatantKind::Monster)
                .with_initiative(10)
                .with_max_hp(7),
        );
        let aria = store.add_combatant(
            Combatant::new("aria", "Aria", CombatantKind::Hero)
                .with_initiative(18)
                .with_modifier(3)
                .with_max_hp(24),
        );
        let warg = store.add_combatant(
            Combatant::new("warg", "Warg", CombatantKind::Monster)
                .with_initiative(16)
                .with_modifier(2)
                .with_max_hp(26),
        );

        Self {
            aria,
            warg,
            bram,
            goblin,
        }
    }

    /// Ids in turn order
    pub fn order(&self) -> Vec<String> {
        vec![
            self.aria.clone(),
            self.warg.clone(),
            self.bram.clone(),
            self.goblin.clone(),
        ]
    }
}
