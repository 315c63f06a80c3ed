//! Line-oriented console
//!
//! Each input line is tokenized, parsed into a `Command` and applied to the
//! store. Combatants are addressed by id or by case-insensitive name;
//! statuses likewise within their combatant.

mod commands;
mod render;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use thiserror::Error;
use tracing::{debug, info};

use crate::combat::{
    parse_die_size, CombatStore, Combatant, CombatantKind, CombatantPatch, Condition, DiceError,
    NewStatus, SnapshotError, StatusPatch, TieBreakerRule,
};
use crate::storage::Storage;
use crate::text::generate_next_name;
use crate::view::{SortKey, TableView};

pub use commands::{tokenize, Command, CommandLine, StatusCommand};

const PROMPT: &str = "turnkeeper> ";

/// Console errors, reported to the user and never fatal
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{0}")]
    Usage(String),

    #[error("no combatant matches {0:?}")]
    UnknownCombatant(String),

    #[error("{0:?} matches more than one combatant, use its id")]
    AmbiguousCombatant(String),

    #[error("no status matches {0:?}")]
    UnknownStatus(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Dice(#[from] DiceError),

    #[error("export failed: {0}")]
    Export(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result of one console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Output(String),
    Quit,
}

/// Interactive front end over a combat store
pub struct Shell<S> {
    store: CombatStore<S>,
    view: TableView,
}

impl<S: Storage> Shell<S> {
    pub fn new(store: CombatStore<S>) -> Self {
        Self {
            store,
            view: TableView::new(),
        }
    }

    pub fn store(&self) -> &CombatStore<S> {
        &self.store
    }

    pub fn view(&self) -> &TableView {
        &self.view
    }

    /// Read commands until end of input or `quit`
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        mut output: W,
        interactive: bool,
    ) -> io::Result<()> {
        if interactive {
            writeln!(output, "{}", render::table(&self.store, &self.view))?;
            write!(output, "{}", PROMPT)?;
            output.flush()?;
        }

        for line in input.lines() {
            let line = line?;
            match self.execute(&line) {
                Ok(Outcome::Quit) => break,
                Ok(Outcome::Output(text)) if text.is_empty() => {}
                Ok(Outcome::Output(text)) => writeln!(output, "{}", text)?,
                Err(e) => writeln!(output, "error: {}", e)?,
            }
            if interactive {
                write!(output, "{}", PROMPT)?;
                output.flush()?;
            }
        }
        Ok(())
    }

    /// Execute one line
    pub fn execute(&mut self, line: &str) -> Result<Outcome, ShellError> {
        let words = tokenize(line)?;
        if words.is_empty() || words[0].starts_with('#') {
            return Ok(Outcome::Output(String::new()));
        }

        let command = match CommandLine::try_parse_from(&words) {
            Ok(parsed) => parsed.command,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                return Ok(Outcome::Output(e.render().to_string().trim_end().to_string()));
            }
            Err(e) => {
                return Err(ShellError::Usage(e.render().to_string().trim_end().to_string()))
            }
        };

        debug!("Console command: {:?}", command);
        self.dispatch(command)
    }

    fn dispatch(&mut self, command: Command) -> Result<Outcome, ShellError> {
        let message = match command {
            Command::Hero { name, initiative } => {
                self.store.spawn_hero(&name, initiative);
                self.table()
            }
            Command::Monster {
                name,
                hp,
                modifier,
                count,
            } => {
                if count == 0 {
                    return Err(ShellError::InvalidArgument("count must be at least 1".to_string()));
                }
                self.store.spawn_monster(&name, hp, modifier, count);
                self.table()
            }
            Command::Remove { target } => {
                let id = self.resolve(&target)?;
                self.store.remove_combatant(&id);
                self.table()
            }
            Command::Set {
                target,
                name,
                kind,
                initiative,
                modifier,
                max_hp,
                tie_breaker,
            } => {
                let id = self.resolve(&target)?;
                let kind = kind
                    .map(|k| {
                        CombatantKind::from_str(&k)
                            .ok_or_else(|| ShellError::InvalidArgument(format!("unknown type {:?}", k)))
                    })
                    .transpose()?;
                let patch = CombatantPatch {
                    name,
                    kind,
                    initiative,
                    initiative_tie_breaker: tie_breaker,
                    initiative_modifier: modifier,
                    max_hp,
                };
                if patch.is_empty() {
                    return Err(ShellError::InvalidArgument("nothing to change".to_string()));
                }
                self.store.update_combatant(&id, patch);
                self.table()
            }
            Command::Roll { targets } => {
                let ids: Vec<String> = if targets.is_empty() {
                    self.store.combatants().iter().map(|c| c.id.clone()).collect()
                } else {
                    targets
                        .iter()
                        .map(|t| self.resolve(t))
                        .collect::<Result<Vec<_>, _>>()?
                };
                let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
                self.store.roll_initiative(&refs);
                self.table()
            }
            Command::Hp { target, delta } => {
                let id = self.resolve(&target)?;
                self.store.modify_hp(&id, &delta.join(" "));
                let hp = self.store.get_hp(&id).unwrap_or_default();
                format!("{} now has {} HP", self.name_of(&id), hp)
            }
            Command::Log {
                target,
                round,
                text,
            } => {
                let id = self.resolve(&target)?;
                self.store.update_hp_log(&id, round, &text.join(" "));
                let hp = self.store.get_hp(&id).unwrap_or_default();
                format!("{} now has {} HP", self.name_of(&id), hp)
            }
            Command::Status { action } => self.status(action)?,
            Command::Next => {
                self.store.next_turn();
                self.table()
            }
            Command::Prev => {
                self.store.previous_turn();
                self.table()
            }
            Command::NewCombat => {
                self.store.new_combat();
                self.table()
            }
            Command::Undo => {
                if !self.store.undo() {
                    return Ok(Outcome::Output("nothing to undo".to_string()));
                }
                self.table()
            }
            Command::Redo => {
                if !self.store.redo() {
                    return Ok(Outcome::Output("nothing to redo".to_string()));
                }
                self.table()
            }
            Command::Export { path } => {
                let path = path.unwrap_or_else(default_export_path);
                fs::write(&path, self.store.export_state()?)?;
                info!("Exported combat to {}", path.display());
                format!("exported to {}", path.display())
            }
            Command::Import { path } => {
                let json = fs::read_to_string(&path)?;
                self.store.import_state(&json)?;
                self.table()
            }
            Command::Show { sort, order } => {
                if let Some(key) = sort {
                    let key = SortKey::from_str(&key)
                        .ok_or_else(|| ShellError::InvalidArgument(format!("unknown column {:?}", key)))?;
                    self.view.set_sort(key);
                }
                if order {
                    self.view.toggle_order_sort();
                }
                self.table()
            }
            Command::Stats => render::statistics(&self.store.statistics()),
            Command::Dice { size } => {
                let sides = parse_die_size(&size)?;
                self.store.set_initiative_dice(sides);
                format!("initiative die is now d{}", self.store.initiative_dice())
            }
            Command::Tiebreak { rule } => {
                let rule = TieBreakerRule::from_str(&rule)
                    .ok_or_else(|| ShellError::InvalidArgument(format!("unknown rule {:?}", rule)))?;
                self.store.set_tie_breaker_rule(rule);
                format!("ties now broken by {}", rule)
            }
            Command::Name { base } => {
                let names: Vec<&str> = self
                    .store
                    .combatants()
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect();
                generate_next_name(&base.join(" "), &names)
            }
            Command::Quit => return Ok(Outcome::Quit),
        };

        Ok(Outcome::Output(message))
    }

    fn status(&mut self, action: StatusCommand) -> Result<String, ShellError> {
        match action {
            StatusCommand::Add {
                target,
                name,
                duration,
                icon,
                description,
            } => {
                let id = self.resolve(&target)?;
                let mut new_status = match name.parse::<Condition>() {
                    Ok(condition) => NewStatus::from_condition(condition, duration),
                    Err(()) => NewStatus::new(&name, duration),
                };
                if let Some(icon) = icon {
                    new_status = new_status.with_icon(&icon);
                }
                if let Some(description) = description {
                    new_status = new_status.with_description(&description);
                }
                self.store.add_status(&id, new_status);
            }
            StatusCommand::Edit {
                target,
                status,
                name,
                duration,
                icon,
                description,
                source,
            } => {
                let (id, status_id) = self.resolve_status(&target, &status)?;
                let source_id = source.map(|s| self.resolve(&s)).transpose()?;
                let patch = StatusPatch {
                    name,
                    duration,
                    source_id: source_id.map(Some),
                    icon,
                    description: description.map(|d| (!d.is_empty()).then_some(d)),
                };
                if patch.is_empty() {
                    return Err(ShellError::InvalidArgument("nothing to change".to_string()));
                }
                self.store.update_status(&id, &status_id, patch);
            }
            StatusCommand::Rm { target, status } => {
                let (id, status_id) = self.resolve_status(&target, &status)?;
                self.store.remove_status(&id, &status_id);
            }
            StatusCommand::List { target } => return self.describe_statuses(&target),
        }

        Ok(self.table())
    }

    fn table(&self) -> String {
        render::table(&self.store, &self.view)
    }

    fn name_of(&self, id: &str) -> String {
        self.store
            .combatant(id)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    /// Find a combatant by exact id, then by unique case-insensitive name
    fn resolve(&self, target: &str) -> Result<String, ShellError> {
        if let Some(c) = self.store.combatant(target) {
            return Ok(c.id.clone());
        }

        let wanted = target.to_lowercase();
        let matches: Vec<&Combatant> = self
            .store
            .combatants()
            .iter()
            .filter(|c| c.name.to_lowercase() == wanted)
            .collect();

        match matches.as_slice() {
            [only] => Ok(only.id.clone()),
            [] => Err(ShellError::UnknownCombatant(target.to_string())),
            _ => Err(ShellError::AmbiguousCombatant(target.to_string())),
        }
    }

    fn resolve_status(&self, target: &str, status: &str) -> Result<(String, String), ShellError> {
        let id = self.resolve(target)?;
        let combatant = self
            .store
            .combatant(&id)
            .ok_or_else(|| ShellError::UnknownCombatant(target.to_string()))?;

        let wanted = status.to_lowercase();
        let found = combatant
            .status(status)
            .or_else(|| {
                combatant
                    .statuses
                    .iter()
                    .find(|s| s.name.to_lowercase() == wanted)
            })
            .ok_or_else(|| ShellError::UnknownStatus(status.to_string()))?;

        Ok((id, found.id.clone()))
    }

    /// Every status on one combatant with its state this round
    fn describe_statuses(&self, target: &str) -> Result<String, ShellError> {
        let id = self.resolve(target)?;
        let combatant = self
            .store
            .combatant(&id)
            .ok_or_else(|| ShellError::UnknownCombatant(target.to_string()))?;
        Ok(render::status_list(combatant, self.store.current_round()))
    }
}

/// `combat-state-YYYY-MM-DD.json` in the working directory
pub fn default_export_path() -> PathBuf {
    PathBuf::from(format!(
        "combat-state-{}.json",
        chrono::Local::now().format("%Y-%m-%d")
    ))
}
