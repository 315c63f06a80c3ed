//! Encounter scenario tests
//!
//! Runs a short fight end to end through console commands

use crate::harness::{console, TestTracker};

/// Test: set up a party, fight two rounds, then start over
#[test]
fn test_goblin_ambush() {
    // Goblin rolls: 15, 6
    let mut shell = TestTracker::builder().rolls([15, 6]).start().into_shell();

    console(&mut shell, "hero Aria -i 17");
    console(&mut shell, "hero Bram -i 9");
    console(&mut shell, "monster Goblin --hp 7 --mod 2 -n 2");

    let table = console(&mut shell, "show");
    assert!(table.contains("> Goblin 1"), "goblin 1 should act first:\n{}", table);

    // Round 1
    console(&mut shell, "hp Aria -4");
    console(&mut shell, "next");
    console(&mut shell, "status add 'goblin 1' prone -d 1");
    console(&mut shell, "hp 'Goblin 1' -5");
    console(&mut shell, "next");
    console(&mut shell, "next");
    console(&mut shell, "hp 'Goblin 2' -7");
    let table = console(&mut shell, "next");
    assert!(table.starts_with("Round 2"));

    // Round 2: goblin 1's turn clears the prone status applied by Aria
    let store = shell.store();
    let goblin = store
        .combatants()
        .iter()
        .find(|c| c.name == "Goblin 1")
        .unwrap();
    assert!(goblin.statuses.is_empty());
    assert_eq!(goblin.current_hp(), 2);

    let stats = console(&mut shell, "stats");
    assert!(stats.contains("Heroes:   4 damage taken (2.0/round)"));
    assert!(stats.contains("Monsters: 12 damage taken (6.0/round)"));
    assert!(stats.contains("Most damaged: Goblin 2 (7)"));

    // Fresh fight keeps only the heroes
    console(&mut shell, "new-combat");
    let store = shell.store();
    assert_eq!(store.combatants().len(), 2);
    assert_eq!(store.current_round(), 1);
    assert_eq!(store.get_hp(&store.combatants()[0].id), Some(10));

    // ...and can be taken back
    console(&mut shell, "undo");
    assert_eq!(shell.store().combatants().len(), 4);
    assert_eq!(shell.store().current_round(), 2);
}

/// Test: rolling initiative reorders the table
#[test]
fn test_reroll_initiative() {
    let mut shell = TestTracker::builder().rolls([3, 18]).start().into_shell();
    console(&mut shell, "hero Aria -i 10");
    console(&mut shell, "hero Bram -i 5");

    console(&mut shell, "roll");
    let store = shell.store();
    let names: Vec<&str> = store.turn_order().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Bram", "Aria"]);
}

/// Test: custom die and name tie-breaks
#[test]
fn test_options() {
    let mut shell = TestTracker::builder().rolls([30, 30]).start().into_shell();
    console(&mut shell, "dice d8");
    console(&mut shell, "tiebreak name");
    console(&mut shell, "monster Zombie --hp 22");
    console(&mut shell, "monster Bat --hp 1");

    // Rolls clamp to the d8
    let store = shell.store();
    assert!(store.combatants().iter().all(|c| c.initiative == 8));
    let names: Vec<&str> = store.turn_order().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Bat", "Zombie"]);
}
