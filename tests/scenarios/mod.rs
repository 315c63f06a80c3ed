//! Scenario Tests for turnkeeper
//!
//! Modular play-through scenarios covering:
//! - Encounter: a full fight from set-up to a fresh combat
//! - Console: command parsing, name lookup and error reporting

pub mod console;
pub mod encounter;
