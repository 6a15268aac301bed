// Keyview End-to-End Scenarios
//
// Complete user workflows driven through the public API without hardware:
// feeds or raw key codes in, snapshots out.
//
// Run with: cargo test --test e2e_scenarios

use keyview_core::input::{KeyTranslator, RawKeyEvent, KEY_PRESS, KEY_RELEASE};
use keyview_core::view::{key_caps, recent_log};
use keyview_core::{
    parse_script, CompositionEngine, InputEvent, KeyCatalog, KeyEvent, LatestSnapshot,
    SnapshotHistory,
};

// =========================================================================
// Test Helpers
// =========================================================================

fn engine_with_history() -> (CompositionEngine, SnapshotHistory) {
    let mut engine = CompositionEngine::new(KeyCatalog::standard());
    let history = SnapshotHistory::new();
    engine.subscribe(history.clone());
    (engine, history)
}

/// Feed raw evdev codes through the translator into the engine
fn type_raw(engine: &mut CompositionEngine, raw: &[(u16, i32)]) {
    let mut translator = KeyTranslator::new();
    for &(code, value) in raw {
        for input in translator.translate(RawKeyEvent::new(code, value)) {
            engine.dispatch(input);
        }
    }
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn test_scenario_no_events() {
    let (engine, history) = engine_with_history();
    let snapshot = history.last().unwrap();
    assert!(snapshot.log().is_empty());
    assert!(!snapshot.shift_held);
    assert_eq!(snapshot.keys(), KeyCatalog::standard().keys());
    assert_eq!(&snapshot, engine.snapshot());
}

#[test]
fn test_scenario_shift_down() {
    let (mut engine, history) = engine_with_history();
    engine.feeds().down.send(KeyEvent::new("shift"));
    engine.drain();

    let snapshot = history.last().unwrap();
    assert!(snapshot.shift_held);
    assert_eq!(snapshot.log(), &["shift key is down"]);
}

#[test]
fn test_scenario_shift_tap_then_type() {
    let (mut engine, history) = engine_with_history();
    let feeds = engine.feeds();
    feeds.down.send(KeyEvent::new("shift"));
    feeds.up.send(KeyEvent::new("shift"));
    feeds.press.send(KeyEvent::typed("a", "a"));
    engine.drain();

    let snapshot = history.last().unwrap();
    assert_eq!(
        snapshot.log(),
        &["shift key is down", "shift key is up", "a is typed"]
    );
    assert!(!snapshot.shift_held);
}

#[test]
fn test_scenario_fifty_presses() {
    let (mut engine, history) = engine_with_history();
    let keys: Vec<String> = (0..50).map(|i| format!("k{:02}", i)).collect();
    for key in &keys {
        engine.dispatch(InputEvent::press(key.as_str(), key.as_str()));
    }

    let snapshot = history.last().unwrap();
    assert_eq!(snapshot.log().len(), 50);
    let expected: Vec<String> = keys.iter().map(|k| format!("{} is typed", k)).collect();
    assert_eq!(snapshot.log(), expected.as_slice());
    // One initial snapshot plus one per press
    assert_eq!(history.len(), 51);
}

#[test]
fn test_scenario_shifted_typing_from_raw_codes() {
    let (mut engine, history) = engine_with_history();
    // LEFTSHIFT down, H, I, LEFTSHIFT up, SPACE
    type_raw(
        &mut engine,
        &[
            (42, KEY_PRESS),
            (35, KEY_PRESS),
            (35, KEY_RELEASE),
            (23, KEY_PRESS),
            (23, KEY_RELEASE),
            (42, KEY_RELEASE),
            (57, KEY_PRESS),
            (57, KEY_RELEASE),
        ],
    );

    let snapshot = history.last().unwrap();
    assert_eq!(
        snapshot.log(),
        &[
            "shift key is down",
            "h key is down",
            "H is typed",
            "h key is up",
            "i key is down",
            "I is typed",
            "i key is up",
            "shift key is up",
            "space key is down",
            "  is typed",
            "space key is up",
        ]
    );
    assert!(!snapshot.shift_held);
}

#[test]
fn test_scenario_key_caps_while_shift_held() {
    let (mut engine, history) = engine_with_history();
    engine.dispatch(InputEvent::down("shift"));

    let held = history.last().unwrap();
    let caps = key_caps(&held);
    assert!(caps.iter().all(|c| c.shifted));
    assert_eq!(caps.iter().find(|c| c.identity == "two").unwrap().label, "@");

    engine.dispatch(InputEvent::up("shift"));
    let released = history.last().unwrap();
    let caps = key_caps(&released);
    assert_eq!(caps.iter().find(|c| c.identity == "two").unwrap().label, "2");
}

#[test]
fn test_scenario_slow_renderer_sees_latest() {
    let mut engine = CompositionEngine::default();
    let latest = LatestSnapshot::new();
    engine.subscribe(latest.clone());
    assert_eq!(latest.take_fresh().unwrap().sequence, 0);

    // Renderer is busy while a burst arrives
    for c in ["a", "b", "c", "d"] {
        engine.dispatch(InputEvent::press(c, c));
    }
    let seen = latest.take_fresh().unwrap();
    assert_eq!(seen.sequence, 4);
    assert_eq!(recent_log(&seen, 1), &["d is typed"]);
    assert_eq!(latest.dropped(), 3);
    assert!(latest.take_fresh().is_none());
}

#[test]
fn test_scenario_replay_is_deterministic() {
    let script = "
down shift
press h H
up shift
press i i
down enter
up enter
";
    let events = parse_script(script).unwrap();

    let (mut first, first_history) = engine_with_history();
    first.dispatch_all(events.clone());
    let (mut second, second_history) = engine_with_history();
    second.dispatch_all(events);

    assert_eq!(first.log(), second.log());
    assert_eq!(first.shift_held(), second.shift_held());
    assert_eq!(first_history.snapshots(), second_history.snapshots());
}

#[test]
fn test_scenario_end_of_stream_keeps_last_snapshot() {
    let (mut engine, history) = engine_with_history();
    engine.dispatch_all([InputEvent::down("shift"), InputEvent::press("a", "A")]);
    let before = history.len();

    // Nothing left to drain
    assert_eq!(engine.drain(), 0);
    assert_eq!(history.len(), before);
    assert_eq!(history.last().unwrap().log(), &["shift key is down", "A is typed"]);
}
