//! Command history persistence and determinism.
//!
//! Saving a history and replaying it in a fresh session must reproduce the
//! same world, and running the same lines twice must give identical
//! snapshots.

use slogo_session::{Session, SessionConfig, SessionError};
use slogo_types::WorldSnapshot;
use std::path::Path;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

const PROGRAM: &[&str] = &[
    "make \"size 40",
    "to square [ :side ] [ repeat 4 [ fd :side rt 90 ] ]",
    "square :size",
    "to zigzag [ :n ]\n[ fd :n rt 90\n  fd :n lt 90 ]",
    "zigzag 5 zigzag 5",
    "tell [ 1 2 ]",
    "setpc 2 rt 45 fd 25",
    "fd jump",
    "ask [ 2 ] [ setxy 10 -10 ]",
    "( sum 1 2 3 )",
    "for [ :i 1 3 1 ] [ square :i ]",
];

fn session() -> Session {
    Session::new(SessionConfig::default()).unwrap()
}

fn run_program(session: &mut Session) -> WorldSnapshot {
    for line in PROGRAM {
        session.execute(line);
    }
    session.snapshot()
}

// ══════════════════════════════════════════════════════════════════════════════
// Save & load
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_save_appends_extension() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session();
    s.execute("fd 10");
    let written = s.save_history(&dir.path().join("drawing")).unwrap();
    assert_eq!(written, dir.path().join("drawing.logovar"));
    assert_eq!(std::fs::read_to_string(&written).unwrap(), "\"fd 10\"\n");
}

#[test]
fn test_save_keeps_existing_extension() {
    let dir = tempfile::tempdir().unwrap();
    let s = session();
    let path = dir.path().join("drawing.logovar");
    assert_eq!(s.save_history(&path).unwrap(), path);
}

#[test]
fn test_round_trip_reproduces_world() {
    let dir = tempfile::tempdir().unwrap();
    let mut original = session();
    let expected = run_program(&mut original);
    let path = original.save_history(&dir.path().join("program")).unwrap();

    let mut replay = session();
    let results = replay.load_history(&path).unwrap();
    assert_eq!(results.len(), PROGRAM.len());
    assert_eq!(replay.snapshot(), expected);
    assert_eq!(replay.history(), original.history());
}

#[test]
fn test_multiline_entry_survives_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut original = session();
    assert!(!original.execute("to sq [ ]\n[ fd 10 ]").error);
    original.execute("sq");
    original.execute("sq");
    assert_eq!(original.snapshot().turtles[&1].position.y, 20.0);

    let path = original.save_history(&dir.path().join("multiline")).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3);

    let mut replay = session();
    let results = replay.load_history(&path).unwrap();
    assert!(results.iter().all(|r| !r.error));
    assert_eq!(replay.history(), original.history());
    assert_eq!(replay.snapshot(), original.snapshot());
}

#[test]
fn test_replayed_errors_are_reported_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let mut original = session();
    run_program(&mut original);
    let path = original.save_history(&dir.path().join("program")).unwrap();

    let results = session().load_history(&path).unwrap();
    let failed: Vec<_> = results.iter().filter(|r| r.error).map(|r| r.command.as_str()).collect();
    assert_eq!(failed, vec!["fd jump"]);
}

#[test]
fn test_load_skips_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manual.logovar");
    std::fs::write(&path, "fd 10\n\n   \nrt 90\n").unwrap();
    let mut s = session();
    let results = s.load_history(&path).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(s.history().len(), 2);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = session().load_history(&dir.path().join("absent.logovar")).unwrap_err();
    assert!(matches!(err, SessionError::Io { .. }));
}

#[test]
fn test_history_directives() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("saved");

    let mut original = session();
    original.execute("fd 30 rt 90 fd 5");
    let saved = original.execute(&format!("saveCommandHistory {}", target.display()));
    assert!(!saved.error, "{}", saved.return_value);

    let mut replay = session();
    let file = dir.path().join("saved.logovar");
    let loaded = replay.execute(&format!("loadCommandHistory {}", file.display()));
    assert!(!loaded.error, "{}", loaded.return_value);
    assert_eq!(loaded.snapshot, original.snapshot());
}

#[test]
fn test_failed_load_directive_is_an_error_result() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session();
    let missing = dir.path().join("nothing.logovar");
    let result = s.execute(&format!("loadCommandHistory {}", missing.display()));
    assert!(result.error);
    assert!(s.history().is_empty());
}

// ══════════════════════════════════════════════════════════════════════════════
// Configuration files
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_config_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slogo.json");
    std::fs::write(&path, r#"{ "language": "German", "history_extension": "slg" }"#).unwrap();

    let config = SessionConfig::from_json_file(&path).unwrap();
    assert_eq!(config.language, "German");
    let mut s = Session::new(config).unwrap();
    s.execute("fd 1");
    let written = s.save_history(&dir.path().join("out")).unwrap();
    assert_eq!(written.extension().and_then(|e| e.to_str()), Some("slg"));
}

#[test]
fn test_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ language: ").unwrap();
    let err = SessionConfig::from_json_file(&path).unwrap_err();
    assert!(matches!(err, SessionError::Config { .. }));
    assert!(SessionConfig::from_json_file(Path::new("/nonexistent/slogo.json")).is_err());
}

// ══════════════════════════════════════════════════════════════════════════════
// Determinism
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_same_lines_same_snapshot() {
    let first = run_program(&mut session());
    for _ in 0..20 {
        assert_eq!(run_program(&mut session()), first);
    }
}

#[test]
fn test_snapshot_json_is_stable() {
    let first = serde_json::to_string(&run_program(&mut session())).unwrap();
    let second = serde_json::to_string(&run_program(&mut session())).unwrap();
    assert_eq!(first, second);
}
