//! Property-based invariant tests for tools, commands and edit history.
//!
//! 1. Reverting an applied command restores the grid cell for cell.
//! 2. Undoing every edit restores the initial grid; redoing restores the final one.
//! 3. Flood fill only touches the seed's connected region.
//! 4. Magic fill replaces every cell sharing the seed id, and nothing else.
//! 5. Edits of one stroke merge into a command equal to painting in sequence.
//! 6. Smart path paint is deterministic and stays inside its 4x4 window.

use blockmap_core::{Block, GridBuffer, Layout, LayoutId, Layouts, SelectionPattern, TilesetPair};
use blockmap_editor::tools::{self, connected_region, ShiftEdge};
use blockmap_editor::{EditCommand, EditSource, Editor, NullSink, SnapshotEdit};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn grid_strategy() -> impl Strategy<Value = GridBuffer> {
    (1u32..=8, 1u32..=8).prop_flat_map(|(width, height)| {
        prop::collection::vec(0u16..4, (width * height) as usize)
            .prop_map(move |ids| GridBuffer::from_metatiles(width, height, ids).unwrap())
    })
}

fn brush_strategy() -> impl Strategy<Value = SelectionPattern> {
    (1u32..=3, 1u32..=3).prop_flat_map(|(width, height)| {
        prop::collection::vec(0u16..6, (width * height) as usize)
            .prop_map(move |ids| SelectionPattern::new(width, height, &ids).unwrap())
    })
}

#[derive(Debug, Clone)]
enum Op {
    Paint(i32, i32, u16),
    Flood(i32, i32, u16),
    Magic(i32, i32, u16),
    Shift(i32, i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i32..8, 0i32..8, 0u16..6).prop_map(|(x, y, id)| Op::Paint(x, y, id)),
        (0i32..8, 0i32..8, 0u16..6).prop_map(|(x, y, id)| Op::Flood(x, y, id)),
        (0i32..8, 0i32..8, 0u16..6).prop_map(|(x, y, id)| Op::Magic(x, y, id)),
        (-3i32..=3, -3i32..=3).prop_map(|(dx, dy)| Op::Shift(dx, dy)),
    ]
}

fn editor_with(grid: &GridBuffer) -> (Editor, LayoutId) {
    let mut layout = Layout::new(
        "Prop".to_string(),
        grid.width(),
        grid.height(),
        2,
        2,
        Block::new(0),
        TilesetPair::default(),
    );
    layout.blockdata = grid.clone();
    let mut editor = Editor::default();
    let id = editor.add_layout(layout);
    (editor, id)
}

fn blockdata(editor: &Editor, id: LayoutId) -> GridBuffer {
    editor.layout(id).unwrap().blockdata.clone()
}

fn run(editor: &mut Editor, id: LayoutId, op: &Op) {
    let result = match *op {
        Op::Paint(x, y, tile) => {
            editor.set_brush(SelectionPattern::single(tile));
            editor.paint(id, x, y, EditSource::User)
        }
        Op::Flood(x, y, tile) => {
            editor.set_brush(SelectionPattern::single(tile));
            editor.flood_fill(id, x, y, EditSource::User)
        }
        Op::Magic(x, y, tile) => {
            editor.set_brush(SelectionPattern::single(tile));
            editor.magic_fill(id, x, y, EditSource::User)
        }
        Op::Shift(dx, dy) => editor.shift(id, dx, dy, EditSource::User),
    };
    assert!(result.is_ok());
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Revert after apply
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn revert_after_apply_restores(
        grid in grid_strategy(),
        brush in brush_strategy(),
        x in -2i32..8,
        y in -2i32..8,
    ) {
        let mut layouts = Layouts::new();
        let mut layout = Layout::new(
            "Prop".to_string(),
            grid.width(),
            grid.height(),
            2,
            2,
            Block::new(0),
            TilesetPair::default(),
        );
        layout.blockdata = grid.clone();
        let id = layouts.insert(layout);

        let mut painted = grid.clone();
        tools::paint(&mut painted, x, y, &brush);
        let command = EditCommand::PaintMetatiles(
            SnapshotEdit::new(id, grid.snapshot(), painted.snapshot(), 1).unwrap(),
        );

        command.apply(&mut layouts, &mut NullSink);
        prop_assert_eq!(&layouts.get(id).unwrap().blockdata, &painted);
        command.revert(&mut layouts, &mut NullSink);
        prop_assert_eq!(&layouts.get(id).unwrap().blockdata, &grid);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Undo/redo round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn undo_redo_round_trip(
        grid in grid_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..12),
    ) {
        let (mut editor, id) = editor_with(&grid);
        for op in &ops {
            run(&mut editor, id, op);
        }
        let edited = blockdata(&editor, id);

        while editor.undo(id).unwrap() {}
        prop_assert_eq!(&blockdata(&editor, id), &grid);
        prop_assert!(!editor.has_unsaved_changes(id));

        while editor.redo(id).unwrap() {}
        prop_assert_eq!(&blockdata(&editor, id), &edited);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Flood fill containment
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn flood_fill_stays_in_region(
        grid in grid_strategy(),
        x in 0i32..8,
        y in 0i32..8,
        tile in 0u16..6,
    ) {
        prop_assume!(grid.contains(x, y));
        let region = connected_region(&grid, x, y);
        let mut filled = grid.clone();
        tools::flood_fill(&mut filled, x, y, &SelectionPattern::single(tile));

        for cy in 0..grid.height() as i32 {
            for cx in 0..grid.width() as i32 {
                if region.contains(&(cx, cy)) {
                    prop_assert_eq!(filled.get(cx, cy), tile);
                } else {
                    prop_assert_eq!(filled.get(cx, cy), grid.get(cx, cy));
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Magic fill totality
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn magic_fill_replaces_every_match(
        grid in grid_strategy(),
        x in 0i32..8,
        y in 0i32..8,
        tile in 0u16..6,
    ) {
        prop_assume!(grid.contains(x, y));
        let seed_id = grid.get(x, y);
        let mut filled = grid.clone();
        tools::magic_fill(&mut filled, x, y, &SelectionPattern::single(tile));

        for (index, &before) in grid.metatiles().iter().enumerate() {
            let after = filled.metatiles()[index];
            if before == seed_id {
                prop_assert_eq!(after, tile);
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Merged stroke equals sequential paints
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn merged_stroke_matches_sequential_paints(
        grid in grid_strategy(),
        dabs in prop::collection::vec((0i32..8, 0i32..8, 0u16..6), 1..10),
    ) {
        let (mut editor, id) = editor_with(&grid);
        let mut expected = grid.clone();

        editor.begin_stroke(dabs[0].0, dabs[0].1);
        for &(x, y, tile) in &dabs {
            let brush = SelectionPattern::single(tile);
            tools::paint(&mut expected, x, y, &brush);
            editor.set_brush(brush);
            editor.paint(id, x, y, EditSource::User).unwrap();
        }
        editor.end_stroke();

        prop_assert_eq!(&blockdata(&editor, id), &expected);
        prop_assert!(editor.history(id).unwrap().len() <= 1);

        editor.undo(id).unwrap();
        prop_assert_eq!(&blockdata(&editor, id), &grid);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Smart path determinism and locality
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn smart_path_is_deterministic_and_local(
        grid in grid_strategy(),
        x in -1i32..8,
        y in -1i32..8,
    ) {
        let ids: Vec<u16> = (0..9).collect();
        let brush = SelectionPattern::new(3, 3, &ids).unwrap();

        let mut first = grid.clone();
        let mut second = grid.clone();
        tools::paint_smart_path(&mut first, x, y, &brush);
        tools::paint_smart_path(&mut second, x, y, &brush);
        prop_assert_eq!(&first, &second);

        for cy in 0..grid.height() as i32 {
            for cx in 0..grid.width() as i32 {
                let inside = (x - 1..=x + 2).contains(&cx) && (y - 1..=y + 2).contains(&cy);
                if !inside {
                    prop_assert_eq!(first.get(cx, cy), grid.get(cx, cy));
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Wrapping shift is a permutation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wrapping_shift_round_trips(grid in grid_strategy(), dx in -9i32..=9, dy in -9i32..=9) {
        let mut shifted = grid.clone();
        tools::shift(&mut shifted, dx, dy, ShiftEdge::Wrap);
        tools::shift(&mut shifted, -dx, -dy, ShiftEdge::Wrap);
        prop_assert_eq!(&shifted, &grid);
    }
}
