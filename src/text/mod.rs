//! Small text utilities used by the combat store and the console

pub mod math;
pub mod names;

pub use math::{damage_taken, parse_math_expression};
pub use names::generate_next_name;
