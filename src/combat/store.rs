//! Combat store
//!
//! Owns every combatant and the round/turn state of one encounter:
//! - Turn order and the next/previous turn state machine
//! - Hit-point logs and status effects
//! - Snapshot persistence and undo/redo
//!
//! Every mutating method ends in `commit`, which serializes the encounter,
//! pushes the snapshot into history and writes it through storage. A call
//! that changes nothing commits nothing.

use tracing::{debug, error, info, warn};

use super::combatant::{Combatant, CombatantKind, CombatantPatch, DEFAULT_HERO_HP};
use super::dice::{DiceRoller, ThreadRoller};
use super::effects::{NewStatus, Status, StatusPatch, DEFAULT_STATUS_ICON};
use super::order::{turn_order, TieBreakerRule};
use super::snapshot::{EncounterState, SnapshotError, STARTING_ROUND};
use super::stats::CombatStatistics;
use crate::history::{HistoryManager, DEFAULT_HISTORY_LIMIT};
use crate::ids::{IdGenerator, UuidIds};
use crate::storage::{Storage, COMBAT_STATE_KEY};

/// Builder for a `CombatStore`
pub struct CombatStoreBuilder<S> {
    storage: S,
    history_limit: usize,
    ids: Box<dyn IdGenerator>,
    dice: Box<dyn DiceRoller>,
    defaults: EncounterState,
}

impl<S: Storage> CombatStoreBuilder<S> {
    fn new(storage: S) -> Self {
        Self {
            storage,
            history_limit: DEFAULT_HISTORY_LIMIT,
            ids: Box::new(UuidIds),
            dice: Box::new(ThreadRoller),
            defaults: EncounterState::default(),
        }
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn dice(mut self, dice: impl DiceRoller + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    /// Die size for a store with nothing saved
    pub fn initiative_dice(mut self, sides: u32) -> Self {
        self.defaults.initiative_dice = sides.max(1);
        self
    }

    /// Tie-breaker rule for a store with nothing saved
    pub fn tie_breaker_rule(mut self, rule: TieBreakerRule) -> Self {
        self.defaults.tie_breaker_rule = rule;
        self
    }

    /// Load any saved encounter and seed history with it
    pub fn build(self) -> CombatStore<S> {
        let mut store = CombatStore {
            state: self.defaults,
            storage: self.storage,
            history: HistoryManager::new(self.history_limit),
            ids: self.ids,
            dice: self.dice,
            last_committed: None,
        };

        store.load_saved();
        store.state.max_round = store.state.max_round.max(store.state.current_round);
        store.heal_active();

        match store.state.to_json() {
            Ok(json) => {
                store.history.push(json.clone());
                store.last_committed = Some(json);
            }
            Err(e) => error!("Failed to serialize combat state: {}", e),
        }

        store
    }
}

/// The encounter aggregate
pub struct CombatStore<S> {
    state: EncounterState,
    storage: S,
    history: HistoryManager<String>,
    ids: Box<dyn IdGenerator>,
    dice: Box<dyn DiceRoller>,
    /// Last snapshot pushed to history and storage
    last_committed: Option<String>,
}

impl<S: Storage> CombatStore<S> {
    /// Open a store over `storage` with default collaborators
    pub fn new(storage: S) -> Self {
        Self::builder(storage).build()
    }

    pub fn builder(storage: S) -> CombatStoreBuilder<S> {
        CombatStoreBuilder::new(storage)
    }

    // Read access

    pub fn state(&self) -> &EncounterState {
        &self.state
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.state.combatants
    }

    pub fn combatant(&self, id: &str) -> Option<&Combatant> {
        self.state.combatants.iter().find(|c| c.id == id)
    }

    pub fn current_round(&self) -> u32 {
        self.state.current_round
    }

    pub fn max_round(&self) -> u32 {
        self.state.max_round
    }

    pub fn active_combatant_id(&self) -> Option<&str> {
        self.state.active_combatant_id.as_deref()
    }

    pub fn active_combatant(&self) -> Option<&Combatant> {
        self.active_combatant_id().and_then(|id| self.combatant(id))
    }

    pub fn initiative_dice(&self) -> u32 {
        self.state.initiative_dice
    }

    pub fn tie_breaker_rule(&self) -> TieBreakerRule {
        self.state.tie_breaker_rule
    }

    /// Combatants ranked for the round, recomputed on every call
    pub fn turn_order(&self) -> Vec<&Combatant> {
        turn_order(&self.state.combatants, self.state.tie_breaker_rule)
    }

    pub fn statistics(&self) -> CombatStatistics {
        CombatStatistics::compute(&self.state.combatants, self.state.current_round)
    }

    /// Current hit points, `None` for an unknown combatant
    pub fn get_hp(&self, id: &str) -> Option<i64> {
        self.combatant(id).map(Combatant::current_hp)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &HistoryManager<String> {
        &self.history
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // Roster

    /// Add a prepared combatant. A missing or duplicate id is replaced.
    pub fn add_combatant(&mut self, mut combatant: Combatant) -> String {
        if combatant.id.is_empty() || self.combatant(&combatant.id).is_some() {
            combatant.id = self.ids.next_id();
        }
        let id = combatant.id.clone();
        self.insert_combatants(vec![combatant]);
        id
    }

    /// Add a hero with a fixed initiative
    pub fn spawn_hero(&mut self, name: &str, initiative: i32) -> String {
        let hero = Combatant::new(&self.ids.next_id(), name, CombatantKind::Hero)
            .with_initiative(initiative)
            .with_max_hp(DEFAULT_HERO_HP);
        let id = hero.id.clone();
        self.insert_combatants(vec![hero]);
        id
    }

    /// Add `count` monsters, each rolling its own initiative.
    ///
    /// With more than one, names become "Name 1" … "Name N".
    pub fn spawn_monster(
        &mut self,
        name: &str,
        hp: i32,
        initiative_modifier: i32,
        count: u32,
    ) -> Vec<String> {
        let sides = self.state.initiative_dice;
        let mut monsters = Vec::with_capacity(count as usize);

        for i in 1..=count {
            let monster_name = if count > 1 {
                format!("{} {}", name, i)
            } else {
                name.to_string()
            };
            let roll = self.roll_initiative_die(sides);
            monsters.push(
                Combatant::new(&self.ids.next_id(), &monster_name, CombatantKind::Monster)
                    .with_initiative(roll)
                    .with_modifier(initiative_modifier)
                    .with_max_hp(hp),
            );
        }

        let ids = monsters.iter().map(|m| m.id.clone()).collect();
        self.insert_combatants(monsters);
        ids
    }

    /// Insert while keeping the turn pointer on the same position in the order
    fn insert_combatants(&mut self, new_combatants: Vec<Combatant>) {
        if new_combatants.is_empty() {
            return;
        }

        let previous_index = self.active_index();
        self.state.combatants.extend(new_combatants);

        if let Some(index) = previous_index {
            let moved_to = self.turn_order().get(index).map(|c| c.id.clone());
            if moved_to.is_some() {
                self.state.active_combatant_id = moved_to;
            }
        }

        self.commit();
    }

    pub fn remove_combatant(&mut self, id: &str) {
        self.state.combatants.retain(|c| c.id != id);
        self.commit();
    }

    pub fn update_combatant(&mut self, id: &str, patch: CombatantPatch) {
        if let Some(combatant) = self.combatant_mut(id) {
            patch.apply(combatant);
            self.commit();
        }
    }

    /// Roll the initiative die for each listed combatant.
    ///
    /// Initiative becomes roll + modifier and the tie-breaker value resets.
    pub fn roll_initiative(&mut self, ids: &[&str]) {
        let sides = self.state.initiative_dice;
        for id in ids {
            let Some(index) = self.state.combatants.iter().position(|c| c.id == *id) else {
                continue;
            };
            let roll = self.roll_initiative_die(sides);
            let combatant = &mut self.state.combatants[index];
            combatant.initiative = roll.saturating_add(combatant.initiative_modifier);
            combatant.initiative_tie_breaker = 0;
            debug!("{} rolled {} for initiative", combatant.name, roll);
        }
        self.commit();
    }

    // Hit points

    /// Append a delta term to the current round's log entry
    pub fn modify_hp(&mut self, id: &str, delta: &str) {
        let round = self.state.current_round;
        let Some(combatant) = self.combatant(id) else {
            return;
        };
        let entry = match combatant.hp_log.get(&round) {
            Some(existing) if !existing.is_empty() => format!("{}, {}", existing, delta),
            _ => delta.to_string(),
        };
        self.update_hp_log(id, round, &entry);
    }

    /// Replace one round's log entry; blank text removes it
    pub fn update_hp_log(&mut self, id: &str, round: u32, text: &str) {
        if round < STARTING_ROUND {
            return;
        }
        let Some(combatant) = self.combatant_mut(id) else {
            return;
        };
        if text.trim().is_empty() {
            combatant.hp_log.remove(&round);
        } else {
            combatant.hp_log.insert(round, text.to_string());
        }
        self.commit();
    }

    // Statuses

    /// Attach a status applied now by whoever is acting. Returns its id.
    pub fn add_status(&mut self, id: &str, new_status: NewStatus) -> Option<String> {
        self.combatant(id)?;

        let status_id = self.ids.next_id();
        let status = Status {
            id: status_id.clone(),
            name: new_status.name,
            duration: new_status.duration,
            source_round: self.state.current_round,
            source_id: self.state.active_combatant_id.clone(),
            icon: if new_status.icon.is_empty() {
                DEFAULT_STATUS_ICON.to_string()
            } else {
                new_status.icon
            },
            description: new_status.description,
        };

        let combatant = self.combatant_mut(id)?;
        combatant.statuses.push(status);
        self.commit();
        Some(status_id)
    }

    pub fn update_status(&mut self, id: &str, status_id: &str, patch: StatusPatch) {
        let Some(status) = self
            .combatant_mut(id)
            .and_then(|c| c.statuses.iter_mut().find(|s| s.id == status_id))
        else {
            return;
        };
        patch.apply(status);
        self.commit();
    }

    pub fn remove_status(&mut self, id: &str, status_id: &str) {
        if let Some(combatant) = self.combatant_mut(id) {
            combatant.statuses.retain(|s| s.id != status_id);
            self.commit();
        }
    }

    // Turn state machine

    /// Hand the turn to the next combatant, wrapping into a new round
    pub fn next_turn(&mut self) {
        let order: Vec<String> = self.turn_order().iter().map(|c| c.id.clone()).collect();
        if order.is_empty() {
            return;
        }

        let mut next = self.active_index().map_or(0, |i| i + 1);
        if next >= order.len() {
            next = 0;
            self.state.current_round += 1;
            self.state.max_round = self.state.max_round.max(self.state.current_round);
            debug!("Round {} begins", self.state.current_round);
        }

        let active_id = order[next].clone();
        let round = self.state.current_round;
        if let Some(combatant) = self.combatant_mut(&active_id) {
            let expired = combatant.expire_statuses(round);
            if expired > 0 {
                debug!("{} status(es) expired on {}", expired, combatant.name);
            }
        }
        self.state.active_combatant_id = Some(active_id);
        self.commit();
    }

    /// Step the turn back. Never goes before the first turn of round 1.
    pub fn previous_turn(&mut self) {
        let order: Vec<String> = self.turn_order().iter().map(|c| c.id.clone()).collect();
        if order.is_empty() {
            return;
        }

        let previous = match self.active_index() {
            None => 0,
            Some(0) if self.state.current_round > STARTING_ROUND => {
                self.state.current_round -= 1;
                order.len() - 1
            }
            Some(0) => 0,
            Some(i) => i - 1,
        };

        self.state.active_combatant_id = Some(order[previous].clone());
        self.commit();
    }

    /// Drop every monster and reset heroes for a fresh fight
    pub fn new_combat(&mut self) {
        self.state
            .combatants
            .retain(|c| c.kind == CombatantKind::Hero);
        for hero in &mut self.state.combatants {
            hero.reset_for_new_combat();
        }
        self.state.current_round = STARTING_ROUND;
        self.state.max_round = STARTING_ROUND;
        self.state.active_combatant_id = None;

        info!(
            "New combat started with {} hero(es)",
            self.state.combatants.len()
        );
        self.commit();
    }

    // Settings

    pub fn set_initiative_dice(&mut self, sides: u32) {
        if sides == 0 {
            return;
        }
        self.state.initiative_dice = sides;
        self.commit();
    }

    pub fn set_tie_breaker_rule(&mut self, rule: TieBreakerRule) {
        self.state.tie_breaker_rule = rule;
        self.commit();
    }

    // History and import/export

    /// Restore the previous snapshot. Returns false when there is none
    /// or it cannot be applied.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        if self.restore(&snapshot) {
            return true;
        }
        self.history.redo();
        false
    }

    /// Restore the next snapshot. Returns false when there is none
    /// or it cannot be applied.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        if self.restore(&snapshot) {
            return true;
        }
        self.history.undo();
        false
    }

    /// Indented JSON of the full encounter
    pub fn export_state(&self) -> Result<String, serde_json::Error> {
        self.state.to_pretty_json()
    }

    /// Replace the encounter with an exported document.
    ///
    /// On error the store is left exactly as it was.
    pub fn import_state(&mut self, json: &str) -> Result<(), SnapshotError> {
        let state = EncounterState::decode(json, self.state.max_round, self.ids.as_mut())
            .inspect_err(|e| warn!("Rejected import: {}", e))?;

        info!(
            "Imported {} combatant(s) at round {}",
            state.combatants.len(),
            state.current_round
        );
        self.state = state;
        self.commit();
        Ok(())
    }

    // Internals

    fn combatant_mut(&mut self, id: &str) -> Option<&mut Combatant> {
        self.state.combatants.iter_mut().find(|c| c.id == id)
    }

    /// Position of the active combatant in the turn order
    fn active_index(&self) -> Option<usize> {
        let active = self.state.active_combatant_id.as_deref()?;
        self.turn_order().iter().position(|c| c.id == active)
    }

    /// Die result as an initiative score
    fn roll_initiative_die(&mut self, sides: u32) -> i32 {
        i32::try_from(self.dice.roll(sides)).unwrap_or(i32::MAX)
    }

    /// Point a missing or stale active id at the head of the turn order
    fn heal_active(&mut self) {
        if self.state.combatants.is_empty() {
            self.state.active_combatant_id = None;
            return;
        }
        let stale = match self.state.active_combatant_id.as_deref() {
            Some(id) => self.combatant(id).is_none(),
            None => true,
        };
        if stale {
            self.state.active_combatant_id = self.turn_order().first().map(|c| c.id.clone());
        }
    }

    fn load_saved(&mut self) {
        let saved = match self.storage.load(COMBAT_STATE_KEY) {
            Ok(Some(saved)) => saved,
            Ok(None) => {
                debug!("No saved combat state");
                return;
            }
            Err(e) => {
                warn!("Failed to load state: {}", e);
                return;
            }
        };

        match EncounterState::decode(&saved, self.state.max_round, self.ids.as_mut()) {
            Ok(state) => {
                info!(
                    "Loaded saved combat: {} combatant(s), round {}",
                    state.combatants.len(),
                    state.current_round
                );
                self.state = state;
            }
            Err(e) => warn!("Ignoring saved combat state: {}", e),
        }
    }

    /// Apply a history entry without recording it again
    fn restore(&mut self, snapshot: &str) -> bool {
        match EncounterState::decode(snapshot, self.state.max_round, self.ids.as_mut()) {
            Ok(state) => {
                self.state = state;
                self.heal_active();
            }
            Err(e) => {
                error!("Failed to restore history entry: {}", e);
                return false;
            }
        }

        match self.state.to_json() {
            Ok(json) => {
                self.persist(&json);
                self.last_committed = Some(json);
            }
            Err(e) => error!("Failed to serialize combat state: {}", e),
        }
        true
    }

    /// Serialize, record in history and persist, if anything changed
    fn commit(&mut self) {
        self.heal_active();

        let json = match self.state.to_json() {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize combat state: {}", e);
                return;
            }
        };
        if self.last_committed.as_deref() == Some(json.as_str()) {
            return;
        }

        self.persist(&json);
        self.history.push(json.clone());
        self.last_committed = Some(json);
    }

    fn persist(&mut self, json: &str) {
        if let Err(e) = self.storage.save(COMBAT_STATE_KEY, json) {
            error!("Failed to save combat state: {}", e);
        }
    }
}
