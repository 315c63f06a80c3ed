//! Combat tracking module
//!
//! Implements initiative-driven encounters with:
//! - Turn order with configurable tie-breaking
//! - Free-text hit-point logs per round
//! - Round-windowed status effects
//! - Damage statistics
//! - Snapshot persistence with undo/redo

mod combatant;
mod dice;
mod effects;
mod order;
mod snapshot;
mod stats;
mod store;

pub use combatant::{Combatant, CombatantKind, CombatantPatch, DEFAULT_HERO_HP};
pub use dice::{
    parse_die_size, DiceError, DiceRoller, ScriptedRoller, SeededRoller, ThreadRoller,
    DEFAULT_INITIATIVE_DICE,
};
pub use effects::{Condition, NewStatus, Status, StatusPatch, DEFAULT_STATUS_ICON};
pub use order::{compare, turn_order, TieBreakerRule};
pub use snapshot::{EncounterState, SnapshotError, STARTING_ROUND};
pub use stats::{CombatStatistics, CombatantDamage, FactionDamage};
pub use store::{CombatStore, CombatStoreBuilder};
