// =====
// TESTS: 6
// =====
//
// Property-based invariants over generated mutation sequences.

use chat_viewport::{Entry, Strategy, Viewport, ViewportConfig};
use proptest::prelude::*;
use proptest::strategy::Strategy as _;

use crate::helpers::{fixed, focus_items, sized, text};

const WIDTH: u16 = 12;
const HEIGHT: u16 = 6;

/// Mirror of the viewport content as `(label, height)` pairs.
type Model = Vec<(String, u16)>;

/// One engine call. Indices are reduced modulo the current length.
#[derive(Debug, Clone)]
enum Op {
    Append(u16),
    Prepend(u16),
    Insert(usize, u16),
    Delete(usize),
    /// Same height, new content: exercises the in-place patch path.
    Relabel(usize),
    Resize(usize, u16),
    Scroll(isize),
}

fn op_strategy() -> impl proptest::strategy::Strategy<Value = Op> {
    prop_oneof![
        (0u16..4).prop_map(Op::Append),
        (0u16..4).prop_map(Op::Prepend),
        (any::<usize>(), 0u16..4).prop_map(|(i, h)| Op::Insert(i, h)),
        any::<usize>().prop_map(Op::Delete),
        any::<usize>().prop_map(Op::Relabel),
        (any::<usize>(), 0u16..4).prop_map(|(i, h)| Op::Resize(i, h)),
        (-10isize..=10).prop_map(Op::Scroll),
    ]
}

fn ops_strategy() -> impl proptest::strategy::Strategy<Value = Vec<Op>> {
    proptest::collection::vec(op_strategy(), 1..80)
}

fn build(config: ViewportConfig, model: &Model) -> Viewport {
    let items = model.iter().map(|(label, h)| fixed(label.clone(), *h));
    sized(Viewport::with_config(config, items), WIDTH, HEIGHT)
}

fn apply(op: &Op, step: usize, viewport: &mut Viewport, model: &mut Model) {
    let label = format!("m{step}");
    match *op {
        Op::Append(h) => {
            viewport.append_item(fixed(label.clone(), h));
            model.push((label, h));
        }
        Op::Prepend(h) => {
            viewport.prepend_item(fixed(label.clone(), h));
            model.insert(0, (label, h));
        }
        Op::Insert(i, h) => {
            let index = i % (model.len() + 1);
            viewport.insert_item(index, fixed(label.clone(), h));
            model.insert(index, (label, h));
        }
        Op::Delete(i) if !model.is_empty() => {
            let index = i % model.len();
            assert!(viewport.delete_item(index));
            model.remove(index);
        }
        Op::Relabel(i) if !model.is_empty() => {
            let index = i % model.len();
            let keep = model[index].1;
            assert!(viewport.update_item(index, fixed(label.clone(), keep)));
            model[index] = (label, keep);
        }
        Op::Resize(i, h) if !model.is_empty() => {
            let index = i % model.len();
            assert!(viewport.update_item(index, fixed(label.clone(), h)));
            model[index] = (label, h);
        }
        Op::Scroll(delta) => viewport.scroll_by(delta),
        Op::Delete(_) | Op::Relabel(_) | Op::Resize(..) => {}
    }
}

fn seed_model() -> Model {
    (0..5).map(|i| (format!("s{i}"), 2)).collect()
}

#[derive(Debug, Clone)]
enum FocusAction {
    Focus,
    Blur,
    Select(usize),
    Next(bool),
    Prev(bool),
    Clear,
}

fn focus_action_strategy() -> impl proptest::strategy::Strategy<Value = FocusAction> {
    prop_oneof![
        Just(FocusAction::Focus),
        Just(FocusAction::Blur),
        (0usize..10).prop_map(FocusAction::Select),
        any::<bool>().prop_map(FocusAction::Next),
        any::<bool>().prop_map(FocusAction::Prev),
        Just(FocusAction::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn incremental_patches_match_full_rebuild(gap in 0u16..=2, ops in ops_strategy()) {
        let config = ViewportConfig { gap, ..ViewportConfig::default() };
        let mut model = seed_model();
        let mut viewport = build(config, &model);

        for (step, op) in ops.iter().enumerate() {
            apply(op, step, &mut viewport, &mut model);
            let incremental = viewport.render();
            let mut rebuilt = build(config, &model);
            rebuilt.scroll_by(isize::try_from(viewport.offset()).unwrap());
            prop_assert_eq!(rebuilt.offset(), viewport.offset());
            prop_assert_eq!(rebuilt.total_height(), viewport.total_height());
            prop_assert_eq!(rebuilt.render(), incremental);
        }
    }

    #[test]
    fn positions_stay_contiguous(gap in 0u16..=3, ops in ops_strategy()) {
        let config = ViewportConfig { gap, ..ViewportConfig::default() };
        let mut model = Model::new();
        let mut viewport = sized(Viewport::with_config(config, Vec::<Entry>::new()), WIDTH, HEIGHT);
        let gap = usize::from(gap);

        for (step, op) in ops.iter().enumerate() {
            apply(op, step, &mut viewport, &mut model);
            let extents: Vec<_> =
                (0..viewport.len()).filter_map(|i| viewport.item_extent(i)).collect();
            prop_assert_eq!(extents.len(), model.len());
            for pair in extents.windows(2) {
                prop_assert_eq!(pair[1].start, pair[0].start + pair[0].height + gap);
            }
            for (extent, (_, height)) in extents.iter().zip(&model) {
                prop_assert_eq!(extent.height, usize::from(*height));
            }
            let expected_total = extents.last().map_or(0, |last| last.start + last.height);
            prop_assert_eq!(viewport.total_height(), expected_total);
        }
    }

    #[test]
    fn scroll_offset_stays_clamped(
        heights in proptest::collection::vec(0u16..5, 0..40),
        deltas in proptest::collection::vec(
            prop_oneof![
                -30isize..=30,
                Just(isize::MIN),
                Just(isize::MAX),
            ],
            1..60,
        ),
        lazy in any::<bool>(),
    ) {
        let strategy = if lazy { Strategy::lazy() } else { Strategy::Composited };
        let config = ViewportConfig { strategy, ..ViewportConfig::default() };
        let items = heights.iter().enumerate().map(|(i, h)| fixed(format!("i{i}"), *h));
        let mut viewport = sized(Viewport::with_config(config, items), WIDTH, HEIGHT);

        for delta in deltas {
            viewport.scroll_by(delta);
            viewport.render();
            let max = viewport.total_height().saturating_sub(usize::from(HEIGHT));
            prop_assert!(viewport.offset() <= max, "{} > {}", viewport.offset(), max);
        }

        viewport.set_size(WIDTH, u16::MAX);
        prop_assert_eq!(viewport.offset(), 0);
    }

    #[test]
    fn at_most_one_item_focused(
        actions in proptest::collection::vec(focus_action_strategy(), 1..80),
    ) {
        let (entries, flags) = focus_items(8);
        let mut viewport = sized(Viewport::new(entries), WIDTH, HEIGHT);

        for action in actions {
            match action {
                FocusAction::Focus => viewport.focus(),
                FocusAction::Blur => viewport.blur(),
                FocusAction::Select(i) => {
                    viewport.set_selected(i);
                }
                FocusAction::Next(wrap) => {
                    viewport.select_next(wrap);
                }
                FocusAction::Prev(wrap) => {
                    viewport.select_prev(wrap);
                }
                FocusAction::Clear => viewport.clear_selection(),
            }
            let focused: Vec<_> = (0..flags.len()).filter(|i| flags[*i].get()).collect();
            let expected = match (viewport.is_focused(), viewport.selected_index()) {
                (true, Some(selected)) => vec![selected],
                _ => Vec::new(),
            };
            prop_assert_eq!(focused, expected);
        }
    }

    #[test]
    fn reversed_drag_extracts_the_same_text(a in 0u16..20, b in 0u16..20, lazy in any::<bool>()) {
        let strategy = if lazy { Strategy::lazy() } else { Strategy::Composited };
        let config = ViewportConfig { strategy, ..ViewportConfig::default() };
        let mut viewport = sized(Viewport::with_config(config, [text("alpha beta gamma")]), 20, 3);
        viewport.render();

        viewport.handle_mouse_down(a, 0);
        viewport.handle_mouse_drag(b, 0);
        viewport.handle_mouse_up(b, 0);
        let forward = viewport.highlighted_text();

        viewport.clear_highlight();
        prop_assert_eq!(viewport.highlighted_text(), "");

        viewport.handle_mouse_down(b, 0);
        viewport.handle_mouse_drag(a, 0);
        viewport.handle_mouse_up(a, 0);
        prop_assert_eq!(viewport.highlighted_text(), forward);
    }
}

#[test]
fn highlight_covers_the_dragged_columns_only() {
    let mut viewport = sized(Viewport::new([text("alpha beta gamma")]), 20, 3);

    viewport.handle_mouse_down(6, 0);
    viewport.handle_mouse_drag(10, 0);
    viewport.handle_mouse_up(10, 0);
    pretty_assertions::assert_eq!(viewport.highlighted_text(), "beta");

    // press and release on one cell covers nothing
    viewport.handle_mouse_down(3, 0);
    viewport.handle_mouse_up(3, 0);
    pretty_assertions::assert_eq!(viewport.highlighted_text(), "");
}
