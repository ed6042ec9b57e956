//! End-to-end checks of the command protocol against the null backend.
//!
//! Each test drives the public API only: build commands, push them through
//! the map/JSON forms, replay them into a [`RecordingRenderer`].

use proptest::prelude::*;
use serde_json::{json, Value};
use ttk_core::{
    approximate_basic_color, pretty_print, BasicColor, Command, CommandError, CommandMap,
    InputEvent, RecordingRenderer, Renderer, Rgb, TextAttribute, TtkError, ValidationError,
};

fn map(value: Value) -> CommandMap {
    match value {
        Value::Object(m) => m,
        other => panic!("expected object, got {other}"),
    }
}

// =============================================================================
// Color pairs
// =============================================================================

#[test]
fn first_color_pair_registration_wins() {
    let mut renderer = RecordingRenderer::default();
    renderer.initialize().unwrap();
    renderer
        .init_color_pair(1, Rgb::new(255, 0, 0), Rgb::new(0, 0, 0))
        .unwrap();
    renderer
        .init_color_pair(1, Rgb::new(0, 255, 0), Rgb::new(255, 255, 255))
        .unwrap();

    let pair = renderer.colors().get(1).unwrap();
    assert_eq!(pair.pair.fg, Rgb::new(255, 0, 0));
    assert_eq!(pair.pair.bg, Rgb::new(0, 0, 0));
}

#[test]
fn approximation_reference_points() {
    assert_eq!(approximate_basic_color(Rgb::new(255, 255, 0)), BasicColor::Yellow);
    assert_eq!(approximate_basic_color(Rgb::new(10, 10, 10)), BasicColor::Black);
    assert_eq!(approximate_basic_color(Rgb::new(220, 220, 220)), BasicColor::White);
}

// =============================================================================
// Serializer
// =============================================================================

#[test]
fn zero_size_rect_round_trips_unfilled() {
    let cmd = Command::draw_rect(0, 0, 0, 0);
    let parsed = Command::parse(&cmd.to_map()).unwrap();
    assert_eq!(parsed, cmd);
    assert!(matches!(parsed, Command::DrawRect { filled: false, .. }));
}

#[test]
fn parsed_rgb_is_a_typed_triple() {
    let parsed = Command::parse(&map(json!({
        "command_type": "init_color_pair",
        "pair_id": 5,
        "fg_color": [255, 128, 64],
        "bg_color": [0, 0, 0]
    })))
    .unwrap();
    match parsed {
        Command::InitColorPair { fg_color, .. } => assert_eq!(fg_color, Rgb::new(255, 128, 64)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn parse_errors_are_distinct() {
    assert!(matches!(
        Command::parse(&map(json!({"row": 1}))),
        Err(CommandError::MissingCommandType)
    ));
    assert!(matches!(
        Command::parse(&map(json!({"command_type": "blink"}))),
        Err(CommandError::UnknownCommandType(t)) if t == "blink"
    ));
    assert!(matches!(
        Command::parse(&map(json!({"command_type": "draw_text", "row": 0}))),
        Err(CommandError::MissingFields(_))
    ));
    assert!(matches!(
        Command::parse(&map(json!({"command_type": "move_cursor", "row": "0", "col": 0}))),
        Err(CommandError::WrongType { field: "row", .. })
    ));
}

#[test]
fn json_stream_replays_identically() {
    let mut source = RecordingRenderer::new(10, 20);
    source.initialize().unwrap();
    source.init_color_pair(3, Rgb::new(0, 200, 0), Rgb::BLACK).unwrap();
    source.clear();
    source.draw_rect(0, 0, 10, 20, 3, false).unwrap();
    source.draw_text(1, 1, "status: ok", 3, TextAttribute::BOLD).unwrap();
    source.refresh().unwrap();

    let wire: Vec<String> = source.commands().iter().map(Command::to_json_string).collect();

    let mut target = RecordingRenderer::new(10, 20);
    for line in &wire {
        Command::from_json_str(line).unwrap().apply(&mut target).unwrap();
    }
    assert_eq!(target.commands(), source.commands());
}

#[test]
fn replay_surfaces_validation_errors() {
    let bad = Command::draw_text(0, 0, "x").with_color_pair(999);
    let mut target = RecordingRenderer::default();
    let err = bad.apply(&mut target).unwrap_err();
    assert!(matches!(
        err,
        TtkError::Validation(ValidationError::ColorPairOutOfRange { value: 999 })
    ));
    assert!(err.to_string().contains("color_pair"));
}

#[test]
fn pretty_print_is_stable_for_both_forms() {
    let cmd = Command::draw_rect(0, 0, 10, 20).with_color_pair(2).with_filled(true);
    let expected = "draw_rect:\n  col: 0\n  color_pair: 2\n  filled: true\n  height: 10\n  row: 0\n  width: 20";
    assert_eq!(pretty_print(&cmd, 0), expected);
    assert_eq!(pretty_print(&cmd.to_map(), 0), expected);
}

// =============================================================================
// Input
// =============================================================================

#[test]
fn polling_without_input_returns_none() {
    let mut renderer = RecordingRenderer::default();
    assert_eq!(renderer.get_input(0).unwrap(), None);
    assert_eq!(renderer.get_event(0).unwrap(), None);
}

#[test]
fn blocking_wait_on_empty_script_closes() {
    let mut renderer = RecordingRenderer::default();
    assert_eq!(renderer.get_input(-1).unwrap(), Some(InputEvent::Close));
}

// =============================================================================
// Negative sizes
// =============================================================================

/// Every size-taking call, driven with one negative size.
fn sized_calls(r: &mut dyn Renderer, n: i32) -> Vec<ttk_core::Result<()>> {
    vec![
        r.draw_hline(1, 1, '-', n, 0),
        r.draw_vline(1, 1, '|', n, 0),
        r.draw_rect(1, 1, n, 3, 0, false),
        r.draw_rect(1, 1, 3, n, 0, true),
        r.clear_region(1, 1, n, 3),
        r.clear_region(1, 1, 3, n),
        r.refresh_region(1, 1, n, 3),
        r.refresh_region(1, 1, 3, n),
    ]
}

proptest! {
    #[test]
    fn negative_sizes_are_rejected_without_recording(n in i32::MIN..0) {
        let mut renderer = RecordingRenderer::new(5, 20);
        renderer.initialize().unwrap();
        let before = renderer.command_count();
        for result in sized_calls(&mut renderer, n) {
            let is_negative_dimension = matches!(
                result,
                Err(TtkError::Validation(ValidationError::NegativeDimension { value, .. }))
                    if value == i64::from(n)
            );
            prop_assert!(is_negative_dimension);
        }
        prop_assert_eq!(renderer.command_count(), before);
    }
}
