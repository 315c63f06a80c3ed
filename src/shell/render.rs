//! Plain-text rendering for console output

use std::fmt::Write;

use crate::combat::{CombatStatistics, CombatStore, Combatant, Status};
use crate::storage::Storage;
use crate::view::{SortDirection, TableView};

/// Round header plus one row per combatant in view order
pub fn table<S: Storage>(store: &CombatStore<S>, view: &TableView) -> String {
    let mut out = String::new();
    let round = store.current_round();

    let _ = writeln!(
        out,
        "Round {} (max {})  d{}  tie-break: {}  sort: {}",
        round,
        store.max_round(),
        store.initiative_dice(),
        store.tie_breaker_rule(),
        sort_label(view),
    );

    let rows = view.sorted(store);
    if rows.is_empty() {
        out.push_str("  (no combatants)");
        return out;
    }

    let _ = writeln!(
        out,
        "  {:<20} {:<8} {:>5} {:>9}  {}",
        "NAME", "TYPE", "INIT", "HP", "STATUSES"
    );
    for combatant in rows {
        let marker = if TableView::is_active(store, &combatant.id) {
            '>'
        } else {
            ' '
        };
        let _ = writeln!(
            out,
            "{} {:<20} {:<8} {:>5} {:>9}  {}",
            marker,
            combatant.name,
            combatant.kind.to_string(),
            combatant.total_initiative(),
            format!("{}/{}", combatant.current_hp(), combatant.max_hp),
            statuses(combatant, round),
        );
    }

    out.truncate(out.trim_end().len());
    out
}

fn sort_label(view: &TableView) -> String {
    let direction = match view.direction() {
        SortDirection::Asc => "asc",
        SortDirection::Desc => "desc",
    };
    match view.key() {
        Some(key) => format!("{} {}", key, direction),
        None => format!("turn order {}", direction),
    }
}

/// Active statuses with rounds left, e.g. `Blessed(2) Cursed(perm)`
fn statuses(combatant: &Combatant, round: u32) -> String {
    combatant
        .active_statuses(round)
        .iter()
        .map(|s| format!("{}({})", s.name, remaining(s, round)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn remaining(status: &Status, round: u32) -> String {
    if status.is_permanent() {
        "perm".to_string()
    } else {
        let ends = status.source_round.saturating_add(status.duration);
        ends.saturating_sub(round).to_string()
    }
}

/// Every status on one combatant, including ones not yet in effect
pub fn status_list(combatant: &Combatant, round: u32) -> String {
    if combatant.statuses.is_empty() {
        return format!("{} has no statuses", combatant.name);
    }

    let mut out = String::new();
    for status in &combatant.statuses {
        let state = if status.is_active_in(round) {
            "active"
        } else if status.is_future_in(round) {
            "pending"
        } else {
            "lapsed"
        };
        let _ = writeln!(
            out,
            "{}  {} [{}] {} round(s) from round {} ({})",
            status.id,
            status.name,
            status.icon,
            status.duration,
            status.source_round,
            state
        );
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn statistics(stats: &CombatStatistics) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Heroes:   {} damage taken ({:.1}/round)",
        stats.hero_damage.total, stats.hero_damage.avg_per_round
    );
    let _ = writeln!(
        out,
        "Monsters: {} damage taken ({:.1}/round)",
        stats.monster_damage.total, stats.monster_damage.avg_per_round
    );
    match &stats.max_damage_taken {
        Some(top) => {
            let _ = writeln!(out, "Most damaged: {} ({})", top.name, top.damage_taken);
        }
        None => out.push_str("Most damaged: nobody\n"),
    }
    for entry in &stats.by_combatant {
        let _ = writeln!(
            out,
            "  {:<20} {:<8} {:>5}",
            entry.name,
            entry.kind.to_string(),
            entry.damage_taken
        );
    }
    out.truncate(out.trim_end().len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{CombatantKind, NewStatus};
    use crate::ids::SequentialIds;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_table_marks_active_and_statuses() {
        let mut store = CombatStore::builder(MemoryStorage::new())
            .ids(SequentialIds::new("c"))
            .build();
        store.add_combatant(
            Combatant::new("a", "Aria", CombatantKind::Hero)
                .with_initiative(15)
                .with_max_hp(12),
        );
        store.add_status("a", NewStatus::new("Blessed", 2));
        store.add_status("a", NewStatus::new("Cursed", 0));
        store.modify_hp("a", "-4");

        let text = table(&store, &TableView::new());
        assert!(text.starts_with("Round 1 (max 1)"));
        assert!(text.contains("> Aria"));
        assert!(text.contains("8/12"));
        assert!(text.contains("Blessed(2) Cursed(perm)"));
    }

    #[test]
    fn test_empty_table() {
        let store = CombatStore::new(MemoryStorage::new());
        assert!(table(&store, &TableView::new()).ends_with("(no combatants)"));
    }

    #[test]
    fn test_statistics_text() {
        let text = statistics(&CombatStatistics::default());
        assert!(text.contains("Most damaged: nobody"));
    }
}
