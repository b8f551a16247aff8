//! Property tests over the grid, action, history and export layers.

use proptest::prelude::*;
use tactile_core::action::{move_focus, paint_cell, set_focus};
use tactile_core::{
    load_canvas, CanvasError, CanvasSession, CanvasSnapshot, CanvasState, ColorMenuState,
    Direction, GridConfig, HistoryState, Position, PALETTE,
};

fn arb_config() -> impl Strategy<Value = GridConfig> {
    (1u32..=16, 1u32..=16).prop_map(|(width, height)| GridConfig { width, height })
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

fn arb_color() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(PALETTE.iter().map(|e| e.hex.to_string()).collect::<Vec<_>>()),
        "#[0-9a-fA-F]{6}",
        "#[0-9a-fA-F]{3}",
        prop::sample::select(vec!["red".to_string(), "Blue".to_string(), "grey".to_string()]),
    ]
}

/// Canvas with focus somewhere inside and some painted cells.
fn arb_canvas() -> impl Strategy<Value = CanvasState> {
    arb_config().prop_flat_map(|config| {
        let cell = (0..config.height as i32, 0..config.width as i32, arb_color());
        (
            Just(config),
            prop::collection::vec(cell, 0..20),
            0..config.height as i32,
            0..config.width as i32,
        )
            .prop_map(|(config, cells, row, col)| {
                let mut canvas = CanvasState::new(config).expect("config");
                for (r, c, color) in cells {
                    canvas = set_focus(&canvas, Position::new(r, c)).state;
                    canvas = paint_cell(&canvas, &color).state;
                }
                set_focus(&canvas, Position::new(row, col)).state
            })
    })
}

proptest! {
    #[test]
    fn prop_new_canvas_is_empty_at_origin(config in arb_config()) {
        let canvas = CanvasState::new(config).expect("valid");
        prop_assert_eq!(canvas.focus(), Position::new(0, 0));
        prop_assert!(canvas.is_empty());
    }

    #[test]
    fn prop_move_is_one_step_or_boundary(canvas in arb_canvas(), direction in arb_direction()) {
        let before = canvas.focus();
        let t = move_focus(&canvas, direction);
        if t.is_success() {
            let after = t.state.focus();
            let distance = (after.row - before.row).abs() + (after.col - before.col).abs();
            prop_assert_eq!(distance, 1);
            match direction {
                Direction::Up | Direction::Down => prop_assert_eq!(after.col, before.col),
                Direction::Left | Direction::Right => prop_assert_eq!(after.row, before.row),
            }
            prop_assert_eq!(t.state.cells(), canvas.cells());
        } else {
            prop_assert!(matches!(t.result.error(), Some(CanvasError::BoundaryReached(_))));
            prop_assert_eq!(&t.state, &canvas);
        }
    }

    #[test]
    fn prop_paint_is_idempotent(canvas in arb_canvas(), color in arb_color()) {
        let once = paint_cell(&canvas, &color).state;
        let twice = paint_cell(&once, &color).state;
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_export_round_trip(canvas in arb_canvas()) {
        let json = tactile_core::export_canvas(&canvas).to_json().expect("json");
        let loaded = load_canvas(&json).expect("load");
        prop_assert_eq!(loaded.config(), canvas.config());
        prop_assert_eq!(loaded.cells(), canvas.cells());
    }

    #[test]
    fn prop_k_paints_then_k_undos_restore(
        steps in prop::collection::vec((0..8i32, 0..8i32, arb_color()), 1..12)
    ) {
        let mut session =
            CanvasSession::new(GridConfig::new(8, 8).expect("config")).expect("session");
        let start = session.canvas().clone();
        for (row, col, color) in &steps {
            session.set_focus(Position::new(*row, *col));
            session.paint(color);
        }
        for _ in &steps {
            prop_assert!(session.undo().is_success());
        }
        prop_assert_eq!(session.canvas().cells(), start.cells());
        // Snapshots are taken right before each paint, after the focus jump.
        prop_assert_eq!(session.canvas().focus(), Position::new(steps[0].0, steps[0].1));

        let before = session.canvas().clone();
        let extra = session.undo();
        prop_assert_eq!(extra.error(), Some(&CanvasError::NothingToUndo));
        prop_assert_eq!(session.canvas(), &before);
    }

    #[test]
    fn prop_eviction_keeps_most_recent(max in 1usize..10) {
        let mut history = HistoryState::new(max);
        let canvas = CanvasState::new(GridConfig::new(2, 2).expect("config")).expect("canvas");
        for t in 0..=max as u64 {
            history.push_undo(CanvasSnapshot::capture_at(&canvas, t));
        }
        prop_assert_eq!(history.undo_len(), max);
        let mut current = canvas;
        let mut undone = 0;
        while history.can_undo() {
            current = history.undo(&current).state;
            undone += 1;
        }
        prop_assert_eq!(undone, max);
    }

    #[test]
    fn prop_undo_then_paint_invalidates_redo(color in arb_color(), other in arb_color()) {
        let mut session =
            CanvasSession::new(GridConfig::new(4, 4).expect("config")).expect("session");
        session.paint(&color);
        session.undo();
        session.move_focus(Direction::Right);
        session.paint(&other);
        let redo = session.redo();
        prop_assert_eq!(redo.error(), Some(&CanvasError::NothingToRedo));
    }

    #[test]
    fn prop_cancel_restores_color(
        start in 0usize..12,
        steps in prop::collection::vec(any::<bool>(), 0..30)
    ) {
        let color = tactile_core::Color::from_palette(start);
        let mut menu = ColorMenuState::new(color.clone()).open().state;
        for forward in steps {
            menu = if forward { menu.next().state } else { menu.prev().state };
        }
        let closed = menu.cancel().state;
        prop_assert_eq!(closed.selected_color(), &color);
        prop_assert!(!closed.is_open());
    }
}
