//! Console command grammar

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::ShellError;

/// One console line
#[derive(Parser, Debug)]
#[command(
    name = "turnkeeper",
    no_binary_name = true,
    disable_version_flag = true,
    about = "Combat tracker commands"
)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a hero (10 HP)
    Hero {
        name: String,
        #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
        initiative: i32,
    },

    /// Add one or more monsters with rolled initiative
    Monster {
        name: String,
        #[arg(long, default_value_t = 10, allow_hyphen_values = true)]
        hp: i32,
        /// Initiative modifier
        #[arg(short = 'm', long = "mod", default_value_t = 0, allow_hyphen_values = true)]
        modifier: i32,
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },

    /// Remove a combatant
    #[command(alias = "rm")]
    Remove { target: String },

    /// Change a combatant's fields
    Set {
        target: String,
        #[arg(long)]
        name: Option<String>,
        /// hero or monster
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        initiative: Option<i32>,
        #[arg(long = "mod", allow_hyphen_values = true)]
        modifier: Option<i32>,
        #[arg(long, allow_hyphen_values = true)]
        max_hp: Option<i32>,
        #[arg(long = "tie", allow_hyphen_values = true)]
        tie_breaker: Option<i32>,
    },

    /// Roll initiative (all combatants when none named)
    Roll { targets: Vec<String> },

    /// Append an HP change to the current round, e.g. `hp Orc -5`
    Hp {
        target: String,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        delta: Vec<String>,
    },

    /// Overwrite one round's HP log entry (empty text clears it)
    Log {
        target: String,
        round: u32,
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Manage status effects
    Status {
        #[command(subcommand)]
        action: StatusCommand,
    },

    /// Advance to the next turn
    Next,

    /// Step back one turn
    #[command(alias = "previous")]
    Prev,

    /// Keep heroes, drop monsters and reset rounds
    NewCombat,

    Undo,

    Redo,

    /// Write the encounter to a JSON file
    Export { path: Option<PathBuf> },

    /// Replace the encounter with a JSON file
    Import { path: PathBuf },

    /// Print the combatant table
    Show {
        /// Sort by column; repeating the current column flips direction
        #[arg(long)]
        sort: Option<String>,
        /// Flip turn order, or return to it from a column sort
        #[arg(long)]
        order: bool,
    },

    /// Damage statistics
    Stats,

    /// Set the initiative die, e.g. `dice d12`
    Dice { size: String },

    /// Set the tie-breaker rule (modifier or name)
    Tiebreak { rule: String },

    /// Suggest the next free name for a base name
    Name {
        #[arg(required = true, num_args = 1..)]
        base: Vec<String>,
    },

    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug)]
pub enum StatusCommand {
    /// Apply a status; standard conditions get their own icon
    Add {
        target: String,
        name: String,
        /// Rounds, 0 = permanent
        #[arg(short, long, default_value_t = 1)]
        duration: u32,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Change a status
    Edit {
        target: String,
        status: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        duration: Option<u32>,
        #[arg(long)]
        icon: Option<String>,
        /// Empty string clears it
        #[arg(long)]
        description: Option<String>,
        /// Combatant credited with applying it
        #[arg(long)]
        source: Option<String>,
    },

    /// Remove a status
    #[command(alias = "remove")]
    Rm { target: String, status: String },

    /// List every status on a combatant
    #[command(alias = "ls")]
    List { target: String },
}

/// Split a line into words, honouring single and double quotes
pub fn tokenize(line: &str) -> Result<Vec<String>, ShellError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ShellError::Usage("unterminated quote".to_string()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
