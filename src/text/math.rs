//! Free-text arithmetic for hit-point logs
//!
//! Turns entries like "-5, +2" or "12 3 -4" into signed integer sums.
//! Anything that is not a digit or a sign is ignored, so "-5 fire" is -5.

use std::sync::LazyLock;

use regex::Regex;

/// A digit followed by whitespace and another digit ("5 2" reads as "5+2")
static ADJACENT_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)\s+(\d)").unwrap());

/// Maximal signed integer tokens
static SIGNED_TERM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[+-]?[0-9]+").unwrap());

/// Split a log entry into its signed terms.
///
/// # Steps
/// 1. Commas become spaces
/// 2. Two digit runs separated only by whitespace get an implicit `+`
/// 3. Whitespace is removed
/// 4. Everything but digits, `+` and `-` is removed
/// 5. Maximal `[+-]?digits` tokens are extracted
pub fn terms(input: &str) -> Vec<i64> {
    let spaced = input.replace(',', " ");

    // The regex crate has no lookahead, so repeat until stable to catch
    // overlapping runs such as "1 2 3".
    let mut joined = spaced;
    loop {
        let next = ADJACENT_DIGITS.replace_all(&joined, "$1+$2").into_owned();
        if next == joined {
            break;
        }
        joined = next;
    }

    let sanitized: String = joined
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+' || *c == '-')
        .collect();

    SIGNED_TERM
        .find_iter(&sanitized)
        .map(|m| parse_term(m.as_str()))
        .collect()
}

/// Parse a single signed token, saturating on overflow
fn parse_term(token: &str) -> i64 {
    match token.parse::<i64>() {
        Ok(value) => value,
        Err(_) if token.starts_with('-') => i64::MIN,
        Err(_) => i64::MAX,
    }
}

/// Evaluate a free-text delta log into its signed sum.
///
/// Empty or token-less input yields 0.
pub fn parse_math_expression(input: &str) -> i64 {
    terms(input)
        .into_iter()
        .fold(0i64, |sum, term| sum.saturating_add(term))
}

/// Sum of the magnitudes of every negative term.
///
/// Healing in the same entry does not offset the damage counted here.
pub fn damage_taken(input: &str) -> i64 {
    terms(input)
        .into_iter()
        .filter(|term| *term < 0)
        .fold(0i64, |sum, term| sum.saturating_add(term.saturating_abs()))
}
