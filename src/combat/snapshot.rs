//! Persisted encounter shape
//!
//! One JSON document is used for local persistence, export and import:
//!
//! ```json
//! {
//!   "combatants": [ ... ],
//!   "currentRound": 2,
//!   "maxRound": 3,
//!   "activeCombatantId": "c-1",
//!   "initiativeDice": 20,
//!   "tieBreakerRule": "modifier"
//! }
//! ```
//!
//! Decoding checks the top-level shape before the typed parse, then fills in
//! ids and icons that older saves may lack.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::combatant::Combatant;
use super::dice::DEFAULT_INITIATIVE_DICE;
use super::effects::DEFAULT_STATUS_ICON;
use super::order::TieBreakerRule;
use crate::ids::IdGenerator;

/// Round every encounter starts in
pub const STARTING_ROUND: u32 = 1;

/// Snapshot decoding errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Invalid JSON file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid JSON file: schema mismatch ({0})")]
    Shape(String),

    #[error("Invalid JSON file: {0}")]
    Decode(serde_json::Error),
}

fn default_initiative_dice() -> u32 {
    DEFAULT_INITIATIVE_DICE
}

/// The complete persisted state of an encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterState {
    pub combatants: Vec<Combatant>,
    pub current_round: u32,
    /// Highest round reached; absent in older saves
    #[serde(default)]
    pub max_round: u32,
    #[serde(default)]
    pub active_combatant_id: Option<String>,
    #[serde(default = "default_initiative_dice")]
    pub initiative_dice: u32,
    #[serde(default)]
    pub tie_breaker_rule: TieBreakerRule,
}

impl Default for EncounterState {
    fn default() -> Self {
        Self {
            combatants: Vec::new(),
            current_round: STARTING_ROUND,
            max_round: STARTING_ROUND,
            active_combatant_id: None,
            initiative_dice: DEFAULT_INITIATIVE_DICE,
            tie_breaker_rule: TieBreakerRule::default(),
        }
    }
}

impl EncounterState {
    /// Compact JSON used for storage and history
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Indented JSON used for export files
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse, validate and migrate a snapshot.
    ///
    /// `held_max_round` is the highest round the caller has already seen; the
    /// result's `max_round` never falls below it or below `current_round`.
    pub fn decode(
        json: &str,
        held_max_round: u32,
        ids: &mut dyn IdGenerator,
    ) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(json)?;
        validate_shape(&value)?;

        let mut state: EncounterState =
            serde_json::from_value(value).map_err(SnapshotError::Decode)?;
        state.migrate(held_max_round, ids);
        Ok(state)
    }

    /// Bring an older or partial snapshot up to the current invariants
    fn migrate(&mut self, held_max_round: u32, ids: &mut dyn IdGenerator) {
        self.current_round = self.current_round.max(STARTING_ROUND);
        self.max_round = self
            .max_round
            .max(self.current_round)
            .max(held_max_round);
        self.initiative_dice = self.initiative_dice.max(1);

        if self.active_combatant_id.as_deref() == Some("") {
            self.active_combatant_id = None;
        }

        for combatant in &mut self.combatants {
            if combatant.id.is_empty() {
                combatant.id = ids.next_id();
            }
            for status in &mut combatant.statuses {
                if status.id.is_empty() {
                    status.id = ids.next_id();
                }
                if status.icon.is_empty() {
                    status.icon = DEFAULT_STATUS_ICON.to_string();
                }
            }
        }
    }
}

/// Check the top-level field types before the typed parse
fn validate_shape(value: &Value) -> Result<(), SnapshotError> {
    let object = value
        .as_object()
        .ok_or_else(|| SnapshotError::Shape("expected an object".to_string()))?;

    if !object.get("combatants").is_some_and(Value::is_array) {
        return Err(SnapshotError::Shape("combatants must be an array".to_string()));
    }
    if !object.get("currentRound").is_some_and(Value::is_number) {
        return Err(SnapshotError::Shape("currentRound must be a number".to_string()));
    }
    if object.get("maxRound").is_some_and(|v| !v.is_number()) {
        return Err(SnapshotError::Shape("maxRound must be a number".to_string()));
    }
    if object
        .get("activeCombatantId")
        .is_some_and(|v| !v.is_string() && !v.is_null())
    {
        return Err(SnapshotError::Shape(
            "activeCombatantId must be a string or null".to_string(),
        ));
    }
    if object.get("initiativeDice").is_some_and(|v| !v.is_number()) {
        return Err(SnapshotError::Shape("initiativeDice must be a number".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::combatant::CombatantKind;
    use crate::ids::SequentialIds;

    fn decode(json: &str) -> Result<EncounterState, SnapshotError> {
        EncounterState::decode(json, 1, &mut SequentialIds::new("gen"))
    }

    #[test]
    fn test_minimal_document_gets_defaults() {
        let state = decode(r#"{"combatants":[],"currentRound":4}"#).unwrap();
        assert_eq!(state.current_round, 4);
        assert_eq!(state.max_round, 4);
        assert_eq!(state.active_combatant_id, None);
        assert_eq!(state.initiative_dice, 20);
        assert_eq!(state.tie_breaker_rule, TieBreakerRule::Modifier);
    }

    #[test]
    fn test_max_round_never_behind() {
        let state = decode(r#"{"combatants":[],"currentRound":5,"maxRound":2}"#).unwrap();
        assert_eq!(state.max_round, 5);

        let state = EncounterState::decode(
            r#"{"combatants":[],"currentRound":2,"maxRound":3}"#,
            9,
            &mut SequentialIds::default(),
        )
        .unwrap();
        assert_eq!(state.max_round, 9);
    }

    #[test]
    fn test_legacy_ids_and_icons_filled() {
        let json = r#"{
            "combatants": [
                {"name": "Old Hero", "type": "Hero", "statuses": [
                    {"id": "s1", "name": "Blessed", "duration": 2, "sourceRound": 1}
                ]}
            ],
            "currentRound": 1,
            "activeCombatantId": ""
        }"#;
        let state = decode(json).unwrap();
        let c = &state.combatants[0];
        assert_eq!(c.id, "gen-1");
        assert_eq!(c.statuses[0].icon, "sparkles");
        assert_eq!(state.active_combatant_id, None);
    }

    #[test]
    fn test_shape_violations() {
        let cases = [
            "[]",
            r#"{"currentRound":1}"#,
            r#"{"combatants":{},"currentRound":1}"#,
            r#"{"combatants":[],"currentRound":"1"}"#,
            r#"{"combatants":[],"currentRound":1,"maxRound":"x"}"#,
            r#"{"combatants":[],"currentRound":1,"activeCombatantId":5}"#,
            r#"{"combatants":[],"currentRound":1,"initiativeDice":null}"#,
        ];
        for case in cases {
            assert!(
                matches!(decode(case), Err(SnapshotError::Shape(_))),
                "expected shape error for {}",
                case
            );
        }
    }

    #[test]
    fn test_parse_and_decode_errors() {
        assert!(matches!(decode("{not json"), Err(SnapshotError::Parse(_))));
        assert!(matches!(
            decode(r#"{"combatants":[{"initiative":"high"}],"currentRound":1}"#),
            Err(SnapshotError::Decode(_))
        ));
        let err = decode("{").unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON file"));
    }

    #[test]
    fn test_null_active_id_accepted() {
        let state =
            decode(r#"{"combatants":[],"currentRound":1,"activeCombatantId":null}"#).unwrap();
        assert_eq!(state.active_combatant_id, None);
    }

    #[test]
    fn test_round_trip() {
        let mut original = EncounterState::default();
        original.current_round = 3;
        original.max_round = 4;
        original.tie_breaker_rule = TieBreakerRule::Name;
        original
            .combatants
            .push(Combatant::new("c-1", "Aria", CombatantKind::Hero).with_max_hp(12));
        original.active_combatant_id = Some("c-1".to_string());

        let json = original.to_pretty_json().unwrap();
        let back = decode(&json).unwrap();
        assert_eq!(back, original);
    }
}
