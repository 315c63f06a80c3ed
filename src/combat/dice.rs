//! Initiative dice
//!
//! The store rolls through a `DiceRoller` so tests can script results.
//! Die sizes accept "20", "d20" or "1d20".

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Default initiative die
pub const DEFAULT_INITIATIVE_DICE: u32 = 20;

/// Something that can roll a single die
pub trait DiceRoller {
    /// Roll one die with `sides` faces, returning 1..=sides
    fn roll(&mut self, sides: u32) -> u32;
}

/// Rolls with the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRoller;

impl DiceRoller for ThreadRoller {
    fn roll(&mut self, sides: u32) -> u32 {
        rand::rng().random_range(1..=sides.max(1))
    }
}

/// Reproducible rolls from a fixed seed
#[derive(Debug, Clone)]
pub struct SeededRoller {
    rng: StdRng,
}

impl SeededRoller {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DiceRoller for SeededRoller {
    fn roll(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides.max(1))
    }
}

/// Replays a fixed list of results, clamped to the die.
///
/// Once the script runs out every roll is a 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    results: VecDeque<u32>,
}

impl ScriptedRoller {
    pub fn new(results: impl IntoIterator<Item = u32>) -> Self {
        Self {
            results: results.into_iter().collect(),
        }
    }
}

impl DiceRoller for ScriptedRoller {
    fn roll(&mut self, sides: u32) -> u32 {
        self.results.pop_front().unwrap_or(1).clamp(1, sides.max(1))
    }
}

/// Die notation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("invalid die size: {0}")]
    InvalidSides(String),

    #[error("only a single die can be used for initiative, got {0}")]
    MultipleDice(u32),
}

/// Parse a die size written as "20", "d20" or "1d20"
pub fn parse_die_size(notation: &str) -> Result<u32, DiceError> {
    let notation = notation.trim().to_lowercase();

    let sides_str = match notation.find('d') {
        None => notation.as_str(),
        Some(d_pos) => {
            let count_str = &notation[..d_pos];
            if !count_str.is_empty() {
                let count: u32 = count_str
                    .parse()
                    .map_err(|_| DiceError::InvalidSides(notation.clone()))?;
                if count != 1 {
                    return Err(DiceError::MultipleDice(count));
                }
            }
            &notation[d_pos + 1..]
        }
    };

    match sides_str.parse::<u32>() {
        Ok(sides) if sides >= 1 => Ok(sides),
        _ => Err(DiceError::InvalidSides(notation.clone())),
    }
}
