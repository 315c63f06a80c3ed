//! Name suggestions for newly spawned combatants

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// "Root" or "Root 123"; the last space-separated number is the counter
static NUMBERED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)(?:\s+(\d+))?$").unwrap());

/// Suggest the next unused name derived from `base`.
///
/// - `"Goblin"` unused → `"Goblin"`
/// - `"Goblin"` used → first free of `"Goblin 1"`, `"Goblin 2"`, …
/// - `"Goblin 3"` → first free of `"Goblin 4"`, `"Goblin 5"`, …
pub fn generate_next_name<S: AsRef<str>>(base: &str, existing: &[S]) -> String {
    let used: HashSet<&str> = existing.iter().map(|s| s.as_ref()).collect();

    let Some(caps) = NUMBERED_NAME.captures(base) else {
        return base.to_string();
    };
    let root = caps.get(1).map_or("", |m| m.as_str());

    let start = match caps.get(2).map(|m| m.as_str().parse::<u64>()) {
        None => {
            if !used.contains(base) {
                return base.to_string();
            }
            return first_free(base, 1, &used);
        }
        Some(Ok(n)) => n.saturating_add(1),
        // Suffix too large to count from; treat the whole name as the root
        Some(Err(_)) => return first_free(base, 1, &used),
    };

    first_free(root, start, &used)
}

fn first_free(root: &str, start: u64, used: &HashSet<&str>) -> String {
    let mut i = start;
    loop {
        let candidate = format!("{} {}", root, i);
        if !used.contains(candidate.as_str()) {
            return candidate;
        }
        i = i.saturating_add(1);
    }
}
