//! Console scenario tests
//!
//! Tests command parsing, name lookup and error reporting

use std::fs;

use tempfile::TempDir;

use crate::harness::{console, console_err, TestTracker};
use turnkeeper::shell::ShellError;

/// Test: names resolve case-insensitively, ids always win
#[test]
fn test_target_lookup() {
    let mut shell = TestTracker::start().into_shell();
    console(&mut shell, "hero Aria");
    console(&mut shell, "hero c-1");

    // "c-1" is both an id (Aria) and a name; the id wins
    assert_eq!(console(&mut shell, "hp c-1 -1"), "Aria now has 9 HP");
    assert_eq!(console(&mut shell, "hp ARIA -1"), "Aria now has 8 HP");

    assert!(matches!(
        console_err(&mut shell, "hp Zed -1"),
        ShellError::UnknownCombatant(_)
    ));
}

/// Test: editing and clearing hp-log rounds
#[test]
fn test_log_editing() {
    let mut shell = TestTracker::start().into_shell();
    console(&mut shell, "hero Aria");
    console(&mut shell, "log Aria 1 -3 -2");
    assert_eq!(console(&mut shell, "log Aria 2 '5 2'"), "Aria now has 12 HP");
    assert_eq!(console(&mut shell, "log Aria 2"), "Aria now has 5 HP");
}

/// Test: status edits can move the source
#[test]
fn test_status_source_edit() {
    let mut shell = TestTracker::start().into_shell();
    console(&mut shell, "hero Aria -i 20");
    console(&mut shell, "hero Bram -i 10");
    console(&mut shell, "status add Bram Bless -d 0 --icon star");
    console(&mut shell, "status edit Bram bless --source Bram --description 'from a scroll'");

    let bram = &shell.store().combatants()[1];
    let status = &bram.statuses[0];
    assert_eq!(status.icon, "star");
    assert_eq!(status.source_id.as_deref(), Some("c-2"));
    assert_eq!(status.description.as_deref(), Some("from a scroll"));

    console(&mut shell, "status edit Bram Bless --description ''");
    assert_eq!(shell.store().combatants()[1].statuses[0].description, None);

    assert!(matches!(
        console_err(&mut shell, "status edit Bram Bless"),
        ShellError::InvalidArgument(_)
    ));
}

/// Test: exported files import into a fresh tracker, bad files are reported
#[test]
fn test_export_then_import() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let mut shell = TestTracker::start().into_shell();
    console(&mut shell, "hero Aria -i 12");
    console(&mut shell, "monster Orc --hp 15 -n 2");
    console(&mut shell, "next");
    let message = console(&mut shell, &format!("export '{}'", path.display()));
    assert!(message.starts_with("exported to"));

    let mut other = TestTracker::start().into_shell();
    console(&mut other, &format!("import '{}'", path.display()));
    assert_eq!(other.store().combatants(), shell.store().combatants());
    assert_eq!(
        other.store().active_combatant_id(),
        shell.store().active_combatant_id()
    );

    fs::write(&path, r#"{"combatants": [], "currentRound": "one"}"#).unwrap();
    let err = console_err(&mut other, &format!("import '{}'", path.display()));
    assert!(err.to_string().starts_with("Invalid JSON file"));
    assert_eq!(other.store().combatants().len(), 3);

    assert!(matches!(
        console_err(&mut other, "import /definitely/not/here.json"),
        ShellError::Io(_)
    ));
}

/// Test: a scripted session through the run loop
#[test]
fn test_scripted_session() {
    let mut shell = TestTracker::start().into_shell();
    let script = "\
# set up
hero Aria -i 14
hero 'Sir Bram' -i 11
next
bogus command
hp 'sir bram' -3
quit
hero Never
";
    let mut output = Vec::new();
    shell.run(script.as_bytes(), &mut output, false).unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("error:"));
    assert!(text.contains("Sir Bram now has 7 HP"));
    assert_eq!(shell.store().combatants().len(), 2);
    assert_eq!(shell.store().active_combatant().unwrap().name, "Sir Bram");
}
