//! Table view sort layer
//!
//! Presentation-only ordering of the combatant table. The default mode shows
//! the store's turn order; a keyed mode sorts by a single column. Nothing
//! here mutates the store.

use std::cmp::Ordering;

use crate::combat::{Combatant, CombatStore};
use crate::storage::Storage;

/// Column a table can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Kind,
    Initiative,
    Modifier,
    MaxHp,
    CurrentHp,
}

impl SortKey {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<SortKey> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "name" => Some(SortKey::Name),
            "kind" | "type" => Some(SortKey::Kind),
            "initiative" | "init" => Some(SortKey::Initiative),
            "modifier" | "mod" => Some(SortKey::Modifier),
            "maxhp" | "max" => Some(SortKey::MaxHp),
            "hp" | "currenthp" => Some(SortKey::CurrentHp),
            _ => None,
        }
    }

    fn compare(&self, a: &Combatant, b: &Combatant) -> Ordering {
        match self {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Kind => a.kind.to_string().cmp(&b.kind.to_string()),
            SortKey::Initiative => a.initiative.cmp(&b.initiative),
            SortKey::Modifier => a.initiative_modifier.cmp(&b.initiative_modifier),
            SortKey::MaxHp => a.max_hp.cmp(&b.max_hp),
            SortKey::CurrentHp => a.current_hp().cmp(&b.current_hp()),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Name => write!(f, "name"),
            SortKey::Kind => write!(f, "type"),
            SortKey::Initiative => write!(f, "initiative"),
            SortKey::Modifier => write!(f, "modifier"),
            SortKey::MaxHp => write!(f, "max-hp"),
            SortKey::CurrentHp => write!(f, "hp"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Sort state for the combatant table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    /// `None` means turn order
    key: Option<SortKey>,
    direction: SortDirection,
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<SortKey> {
        self.key
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Select a column. Picking the current column while descending flips it.
    pub fn set_sort(&mut self, key: SortKey) {
        if self.key == Some(key) && self.direction == SortDirection::Desc {
            self.direction = SortDirection::Asc;
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Desc;
        }
    }

    /// Flip the turn-order direction, or return to turn order from a column sort
    pub fn toggle_order_sort(&mut self) {
        if self.key.is_none() {
            self.direction = self.direction.flipped();
        } else {
            self.key = None;
            self.direction = SortDirection::Desc;
        }
    }

    /// Combatants in display order
    pub fn sorted<'a, S: Storage>(&self, store: &'a CombatStore<S>) -> Vec<&'a Combatant> {
        match self.key {
            None => {
                let mut order = store.turn_order();
                if self.direction == SortDirection::Asc {
                    order.reverse();
                }
                order
            }
            Some(key) => {
                let mut rows: Vec<&Combatant> = store.combatants().iter().collect();
                rows.sort_by(|a, b| match self.direction {
                    SortDirection::Asc => key.compare(a, b),
                    SortDirection::Desc => key.compare(b, a),
                });
                rows
            }
        }
    }

    /// Whether `id` is the combatant whose turn it is
    pub fn is_active<S: Storage>(store: &CombatStore<S>, id: &str) -> bool {
        store.active_combatant_id() == Some(id)
    }
}
