//! TestTracker - a combat store wired for reproducible tests

#![allow(dead_code)]

use turnkeeper::combat::{CombatStore, ScriptedRoller, TieBreakerRule};
use turnkeeper::ids::SequentialIds;
use turnkeeper::shell::{Outcome, Shell, ShellError};
use turnkeeper::storage::{MemoryStorage, Storage, COMBAT_STATE_KEY};

/// Builder for `TestTracker`
pub struct TestTrackerBuilder {
    rolls: Vec<u32>,
    saved: Option<String>,
    history_limit: usize,
    tie_breaker: TieBreakerRule,
}

impl TestTrackerBuilder {
    /// Initiative die results, consumed in order
    pub fn rolls(mut self, rolls: impl IntoIterator<Item = u32>) -> Self {
        self.rolls = rolls.into_iter().collect();
        self
    }

    /// Raw snapshot already present in storage before the store opens
    pub fn saved(mut self, json: &str) -> Self {
        self.saved = Some(json.to_string());
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn tie_breaker(mut self, rule: TieBreakerRule) -> Self {
        self.tie_breaker = rule;
        self
    }

    pub fn start(self) -> TestTracker {
        let mut storage = MemoryStorage::new();
        if let Some(json) = &self.saved {
            storage
                .save(COMBAT_STATE_KEY, json)
                .expect("memory storage never fails");
        }

        let store = CombatStore::builder(storage)
            .ids(SequentialIds::new("c"))
            .dice(ScriptedRoller::new(self.rolls))
            .history_limit(self.history_limit)
            .tie_breaker_rule(self.tie_breaker)
            .build();

        TestTracker { store }
    }
}

/// A store over `MemoryStorage`, `SequentialIds` ("c-1", "c-2", …) and
/// scripted dice
pub struct TestTracker {
    pub store: CombatStore<MemoryStorage>,
}

impl TestTracker {
    pub fn builder() -> TestTrackerBuilder {
        TestTrackerBuilder {
            rolls: Vec::new(),
            saved: None,
            history_limit: 100,
            tie_breaker: TieBreakerRule::Modifier,
        }
    }

    pub fn start() -> Self {
        Self::builder().start()
    }

    /// The snapshot currently written to storage
    pub fn saved_json(&self) -> Option<String> {
        self.store
            .storage()
            .load(COMBAT_STATE_KEY)
            .expect("memory storage never fails")
    }

    /// Ids in turn order
    pub fn order(&self) -> Vec<String> {
        self.store
            .turn_order()
            .iter()
            .map(|c| c.id.clone())
            .collect()
    }

    /// Names in turn order
    pub fn order_names(&self) -> Vec<String> {
        self.store
            .turn_order()
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// Id of the first combatant called `name`
    pub fn id_of(&self, name: &str) -> String {
        self.store
            .combatants()
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id.clone())
            .unwrap_or_else(|| panic!("no combatant named {}", name))
    }

    /// Name of the acting combatant
    pub fn active_name(&self) -> Option<String> {
        self.store.active_combatant().map(|c| c.name.clone())
    }

    /// Hand the store to a console
    pub fn into_shell(self) -> Shell<MemoryStorage> {
        Shell::new(self.store)
    }
}

/// Run one console line, panicking on errors or quit
pub fn console(shell: &mut Shell<MemoryStorage>, line: &str) -> String {
    match shell.execute(line) {
        Ok(Outcome::Output(text)) => text,
        Ok(Outcome::Quit) => panic!("unexpected quit on {:?}", line),
        Err(e) => panic!("{:?} failed: {}", line, e),
    }
}

/// Run one console line expecting an error
pub fn console_err(shell: &mut Shell<MemoryStorage>, line: &str) -> ShellError {
    match shell.execute(line) {
        Err(e) => e,
        Ok(outcome) => panic!("{:?} unexpectedly succeeded: {:?}", line, outcome),
    }
}
