//! Integration Test Harness
//!
//! Deterministic test infrastructure for turnkeeper:
//! - `TestTracker` - A store over in-memory storage with sequential ids and scripted dice
//! - `TestParty` - A standard hero/monster line-up to fight with
//! - `CountingStorage` - In-memory storage that counts writes
//!
//! # Example
//!
//! ```rust,ignore
//! use harness::TestTracker;
//!
//! #[test]
//! fn test_round_advance() {
//!     let mut tracker = TestTracker::builder().rolls([15, 4]).start();
//!     tracker.store.spawn_monster("Orc", 15, 0, 2);
//!     tracker.store.next_turn();
//!     assert_eq!(tracker.store.current_round(), 1);
//! }
//! ```

mod party;
mod storage;
mod tracker;

pub use party::TestParty;
pub use storage::CountingStorage;
pub use tracker::{console, console_err, TestTracker, TestTrackerBuilder};
