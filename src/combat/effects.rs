//! Timed status effects
//!
//! A status covers the round window `[source_round, source_round + duration)`.
//! A duration of 0 means permanent: always active from its source round on
//! and never expired by turn advancement.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Icon tag used when a status carries none
pub const DEFAULT_STATUS_ICON: &str = "sparkles";

/// A status effect attached to a combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Unique status ID (filled in on load when missing)
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Length in rounds, 0 = permanent
    #[serde(default)]
    pub duration: u32,
    /// Round in which the status was applied
    #[serde(default = "first_round")]
    pub source_round: u32,
    /// Combatant who was acting when the status was applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn first_round() -> u32 {
    1
}

impl Status {
    pub fn is_permanent(&self) -> bool {
        self.duration == 0
    }

    /// Whether the status applies during `round`
    pub fn is_active_in(&self, round: u32) -> bool {
        if round < self.source_round {
            return false;
        }
        self.is_permanent() || round - self.source_round < self.duration
    }

    /// Whether the status should be kept when its owner's turn starts in `current_round`
    pub fn survives_turn_start(&self, current_round: u32) -> bool {
        self.is_permanent() || current_round.saturating_sub(self.source_round) < self.duration
    }

    /// Whether the status is applied after `round`
    pub fn is_future_in(&self, round: u32) -> bool {
        self.source_round > round
    }
}

/// Fields supplied when adding a status; id and source are stamped by the store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewStatus {
    pub name: String,
    pub duration: u32,
    pub icon: String,
    pub description: Option<String>,
}

impl NewStatus {
    pub fn new(name: &str, duration: u32) -> Self {
        Self {
            name: name.to_string(),
            duration,
            icon: DEFAULT_STATUS_ICON.to_string(),
            description: None,
        }
    }

    /// Build from a standard condition, using its default icon
    pub fn from_condition(condition: Condition, duration: u32) -> Self {
        Self {
            name: condition.to_string(),
            duration,
            icon: condition.default_icon().to_string(),
            description: None,
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Partial update for a status. `id` and `source_round` are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusPatch {
    pub name: Option<String>,
    pub duration: Option<u32>,
    /// `Some(None)` clears the source
    pub source_id: Option<Option<String>>,
    pub icon: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
}

impl StatusPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(self, status: &mut Status) {
        if let Some(name) = self.name {
            status.name = name;
        }
        if let Some(duration) = self.duration {
            status.duration = duration;
        }
        if let Some(source_id) = self.source_id {
            status.source_id = source_id;
        }
        if let Some(icon) = self.icon {
            status.icon = icon;
        }
        if let Some(description) = self.description {
            status.description = description;
        }
    }
}

/// Standard tabletop conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Blinded,
    Charmed,
    Deafened,
    Frightened,
    Grappled,
    Incapacitated,
    Invisible,
    Paralyzed,
    Petrified,
    Poisoned,
    Prone,
    Restrained,
    Stunned,
    Unconscious,
    Exhaustion,
}

impl Condition {
    pub const ALL: [Condition; 15] = [
        Condition::Blinded,
        Condition::Charmed,
        Condition::Deafened,
        Condition::Frightened,
        Condition::Grappled,
        Condition::Incapacitated,
        Condition::Invisible,
        Condition::Paralyzed,
        Condition::Petrified,
        Condition::Poisoned,
        Condition::Prone,
        Condition::Restrained,
        Condition::Stunned,
        Condition::Unconscious,
        Condition::Exhaustion,
    ];

    /// Icon tag shown for this condition unless overridden
    pub fn default_icon(&self) -> &'static str {
        match self {
            Condition::Blinded => "eyeSlash",
            Condition::Charmed => "heart",
            Condition::Deafened => "speakerXMark",
            Condition::Frightened => "exclamationTriangle",
            Condition::Grappled => "handRaised",
            Condition::Incapacitated => "noSymbol",
            Condition::Invisible => "eyeSlash",
            Condition::Paralyzed => "bolt",
            Condition::Petrified => "cube",
            Condition::Poisoned => "beaker",
            Condition::Prone => "arrowDown",
            Condition::Restrained => "lockClosed",
            Condition::Stunned => "sparkles",
            Condition::Unconscious => "moon",
            Condition::Exhaustion => "clock",
        }
    }
}

impl FromStr for Condition {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blinded" | "blind" => Ok(Condition::Blinded),
            "charmed" | "charm" => Ok(Condition::Charmed),
            "deafened" | "deaf" => Ok(Condition::Deafened),
            "frightened" | "fear" | "afraid" => Ok(Condition::Frightened),
            "grappled" | "grapple" => Ok(Condition::Grappled),
            "incapacitated" => Ok(Condition::Incapacitated),
            "invisible" | "invis" => Ok(Condition::Invisible),
            "paralyzed" | "paralyze" => Ok(Condition::Paralyzed),
            "petrified" | "stone" => Ok(Condition::Petrified),
            "poisoned" | "poison" => Ok(Condition::Poisoned),
            "prone" => Ok(Condition::Prone),
            "restrained" | "restrain" => Ok(Condition::Restrained),
            "stunned" | "stun" => Ok(Condition::Stunned),
            "unconscious" | "ko" => Ok(Condition::Unconscious),
            "exhaustion" | "exhausted" => Ok(Condition::Exhaustion),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Condition::Blinded => "Blinded",
            Condition::Charmed => "Charmed",
            Condition::Deafened => "Deafened",
            Condition::Frightened => "Frightened",
            Condition::Grappled => "Grappled",
            Condition::Incapacitated => "Incapacitated",
            Condition::Invisible => "Invisible",
            Condition::Paralyzed => "Paralyzed",
            Condition::Petrified => "Petrified",
            Condition::Poisoned => "Poisoned",
            Condition::Prone => "Prone",
            Condition::Restrained => "Restrained",
            Condition::Stunned => "Stunned",
            Condition::Unconscious => "Unconscious",
            Condition::Exhaustion => "Exhaustion",
        };
        write!(f, "{}", s)
    }
}
