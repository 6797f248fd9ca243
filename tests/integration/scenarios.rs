// =====
// TESTS: 18
// =====
//
// End-to-end viewport scenarios driven through the public facade.

use chat_viewport::{MouseButton, Strategy, Viewport, ViewportConfig};
use pretty_assertions::assert_eq;

use crate::helpers::{fixed, focus_items, panel, shared, sized, text, two_line};

/// Both backends, with lazy estimates matching the one-line items used here.
fn both_strategies() -> [ViewportConfig; 2] {
    let lazy = Strategy::Lazy { overscan: 1, estimated_height: 1 };
    [ViewportConfig::default(), ViewportConfig { strategy: lazy, ..ViewportConfig::default() }]
}

// --- Growth and clamping ---

#[test]
fn append_growth_keeps_offset_at_top() {
    let mut viewport = sized(Viewport::new([fixed("a", 1)]), 10, 10);
    for i in 1..10 {
        let before = viewport.total_height();
        viewport.append_item(fixed(format!("a{i}"), 1));
        assert_eq!(viewport.total_height(), before + 1);
        assert_eq!(viewport.offset(), 0);
    }
    assert_eq!(viewport.total_height(), 10);
    assert!(viewport.at_top());
    assert!(viewport.at_bottom());
}

#[test]
fn scroll_to_bottom_then_delete_last_reclamps() {
    let items = (0..7).map(|i| fixed(format!("i{i}"), 1));
    let mut viewport = sized(Viewport::new(items), 10, 3);
    viewport.scroll_to_bottom();
    assert_eq!(viewport.offset(), 4);

    assert!(viewport.delete_item(6));
    assert_eq!(viewport.offset(), 3);
    assert_eq!(viewport.render(), "i3.0\ni4.0\ni5.0");
}

#[test]
fn shrinking_content_below_viewport_returns_to_top() {
    let items = (0..5).map(|i| fixed(format!("i{i}"), 2));
    let mut viewport = sized(Viewport::new(items), 10, 4);
    viewport.scroll_to_bottom();
    assert_eq!(viewport.offset(), 6);
    for _ in 0..4 {
        viewport.delete_item(0);
    }
    assert_eq!(viewport.offset(), 0);
    assert_eq!(viewport.render(), "i4.0\ni4.1");
}

#[test]
fn scroll_to_item_moves_minimum_distance() {
    let items = (0..10).map(|i| fixed(format!("i{i}"), 2));
    let mut viewport = sized(Viewport::new(items), 10, 5);

    // already fully visible: no-op
    assert!(viewport.scroll_to_item(1));
    assert_eq!(viewport.offset(), 0);

    // below: bottom edge aligns with the window bottom
    assert!(viewport.scroll_to_item(4));
    assert_eq!(viewport.offset(), 5);

    // above: top edge aligns with the window top
    assert!(viewport.scroll_to_item(1));
    assert_eq!(viewport.offset(), 2);

    assert!(!viewport.scroll_to_item(99));
    assert_eq!(viewport.offset(), 2);
}

// --- Gaps ---

#[test]
fn gap_rows_separate_items() {
    let config = ViewportConfig { gap: 1, ..ViewportConfig::default() };
    let items = [fixed("a", 1), fixed("b", 2), fixed("c", 1)];
    let mut viewport = sized(Viewport::with_config(config, items), 10, 10);
    assert_eq!(viewport.total_height(), 6);
    assert_eq!(viewport.item_extent(2).map(|e| e.start), Some(5));
    assert_eq!(viewport.render(), "a.0\n\nb.0\nb.1\n\nc.0");
}

// --- IDs ---

#[test]
fn update_by_id_keeps_id_and_resizes() {
    let items = [fixed("a", 1).with_id("a"), fixed("b", 1).with_id("b"), fixed("c", 1)];
    let mut viewport = sized(Viewport::new(items), 10, 10);
    assert!(viewport.update_item("b", fixed("B", 3)));
    assert_eq!(viewport.index_of("b"), Some(1));
    assert_eq!(viewport.total_height(), 5);
    assert_eq!(viewport.render(), "a.0\nB.0\nB.1\nB.2\nc.0");

    assert!(!viewport.update_item("missing", fixed("x", 1)));
    assert!(viewport.delete_item("a"));
    assert_eq!(viewport.index_of("b"), Some(0));
}

// --- Highlight ---

#[test]
fn cross_item_highlight_extracts_spanned_lines() {
    let items = [two_line("a"), two_line("b"), two_line("c")];
    let mut viewport = sized(Viewport::new(items), 20, 10);
    viewport.render();

    // item 0 line 1 is row 1; item 2 line 0 is row 4
    assert!(viewport.handle_mouse_down(0, 1));
    assert!(viewport.handle_mouse_drag(19, 4));
    assert!(viewport.handle_mouse_up(19, 4));
    assert_eq!(viewport.highlighted_text(), "a second\nb first\nb second\nc first");
    assert_eq!(viewport.selected_index(), Some(0));
}

#[test]
fn reversed_drag_highlights_same_text() {
    let items = [two_line("a"), two_line("b"), two_line("c")];
    let mut viewport = sized(Viewport::new(items), 20, 10);

    viewport.handle_mouse_down(19, 4);
    viewport.handle_mouse_drag(0, 1);
    viewport.handle_mouse_up(0, 1);
    assert_eq!(viewport.highlighted_text(), "a second\nb first\nb second\nc first");
}

#[test]
fn prepend_clears_highlight_but_append_keeps_it() {
    let mut viewport = sized(Viewport::new([text("hello world")]), 20, 5);
    viewport.handle_mouse_down(0, 0);
    viewport.handle_mouse_up(5, 0);
    assert_eq!(viewport.highlighted_text(), "hello");

    viewport.append_item(text("tail"));
    assert_eq!(viewport.highlighted_text(), "hello");

    viewport.prepend_item(text("head"));
    assert_eq!(viewport.highlighted_text(), "");
}

#[test]
fn wide_glyphs_extract_without_padding() {
    let mut viewport = sized(Viewport::new([text("日本語 ok")]), 20, 3);
    assert!(viewport.handle_mouse_down(0, 0));
    assert!(viewport.handle_mouse_up(19, 0));
    assert_eq!(viewport.highlighted_text(), "日本語 ok");
}

#[test]
fn highlight_spans_plain_items_too() {
    let items = [two_line("a"), fixed("mid", 1), two_line("c")];
    let mut viewport = sized(Viewport::new(items), 20, 10);
    viewport.render();

    assert!(viewport.handle_mouse_down(0, 0));
    assert!(viewport.handle_mouse_drag(19, 4));
    assert!(viewport.handle_mouse_up(19, 4));
    assert_eq!(viewport.highlighted_text(), "a first\na second\nmid.0\nc first\nc second");
}

#[test]
fn release_over_vanished_content_ends_gesture() {
    let mut viewport = sized(Viewport::new([fixed("a", 1)]), 10, 5);
    assert!(viewport.handle_mouse_down(0, 0));

    viewport.update_item(0, fixed("a", 0));
    assert!(!viewport.handle_mouse_up(0, 0));

    // content is back but the button was already released
    viewport.update_item(0, fixed("a", 1));
    assert!(!viewport.handle_mouse_drag(1, 0));
    assert_eq!(viewport.highlighted_text(), "");
}

// --- Selection ---

#[test]
fn deleting_selected_item_selects_successor() {
    let (entries, flags) = focus_items(3);
    let mut viewport = sized(Viewport::new(entries), 10, 5);
    viewport.focus();
    viewport.set_selected(1);
    assert!(flags[1].get());

    viewport.delete_item(1);
    assert_eq!(viewport.selected_index(), Some(1));
    assert!(flags[2].get());
    assert!(viewport.is_item_focused(1));

    viewport.delete_item(1);
    assert_eq!(viewport.selected_index(), Some(0));
    assert!(flags[0].get());
}

#[test]
fn focus_marker_is_redrawn() {
    let (entries, _flags) = focus_items(2);
    let mut viewport = sized(Viewport::new(entries), 10, 5);
    assert_eq!(viewport.render(), "p0\np1");
    viewport.set_selected(1);
    viewport.focus();
    assert_eq!(viewport.render(), "p0\np1*");
    viewport.blur();
    assert_eq!(viewport.render(), "p0\np1");
}

#[test]
fn select_ends_and_scroll_to_selected() {
    for config in both_strategies() {
        let (entries, _flags) = focus_items(5);
        let mut viewport = sized(Viewport::with_config(config, entries), 10, 3);
        viewport.render();

        assert!(viewport.select_last());
        assert_eq!(viewport.selected_index(), Some(4));
        assert!(viewport.selected_item().is_some());
        assert!(viewport.scroll_to_selected());
        assert_eq!(viewport.offset(), 2, "{:?}", config.strategy);
        assert_eq!(viewport.render(), "p2\np3\np4");

        assert!(viewport.select_first());
        assert!(!viewport.select_first());
        assert!(viewport.scroll_to_selected());
        assert_eq!(viewport.offset(), 0, "{:?}", config.strategy);

        viewport.clear_selection();
        assert!(viewport.selected_item().is_none());
        assert!(!viewport.scroll_to_selected());
    }
}

#[test]
fn invalidate_item_picks_up_new_height() {
    for config in both_strategies() {
        let (entry, lines) = shared("a", 2);
        let mut viewport = sized(Viewport::with_config(config, [entry, fixed("b", 1)]), 10, 5);
        assert_eq!(viewport.render(), "a.0\na.1\nb.0");

        lines.set(1);
        assert!(viewport.invalidate_item(0));
        assert_eq!(viewport.render(), "a.0\nb.0", "{:?}", config.strategy);
        assert_eq!(viewport.total_height(), 2);
        assert!(!viewport.invalidate_item(9));
    }
}

// --- Clicks ---

#[test]
fn click_on_non_clickable_item_is_ignored() {
    let mut viewport = sized(Viewport::new([fixed("a", 2)]), 10, 5);
    assert!(!viewport.handle_mouse_click(MouseButton::Right, 0, 0));
    assert!(!viewport.handle_mouse_click(MouseButton::Right, 0, 9));
}

#[test]
fn click_collapses_panel_and_content_reflows() {
    for config in both_strategies() {
        let mut viewport = sized(Viewport::with_config(config, [panel("p", 2), fixed("b", 2)]), 10, 10);
        assert_eq!(viewport.render(), "-p\n body1\n body2\nb.0\nb.1");
        assert_eq!(viewport.total_height(), 5);

        assert!(!viewport.handle_mouse_click(MouseButton::Left, 0, 0));
        assert!(!viewport.handle_mouse_click(MouseButton::Right, 0, 1));
        assert!(viewport.handle_mouse_click(MouseButton::Right, 0, 0));
        assert_eq!(viewport.render(), "+p\nb.0\nb.1", "{:?}", config.strategy);
        assert_eq!(viewport.total_height(), 3);
    }
}
