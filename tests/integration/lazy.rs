// =====
// TESTS: 6
// =====
//
// Estimate-then-measure strategy behind the same facade as the compositor.

use chat_viewport::{Strategy, Viewport, ViewportConfig};
use pretty_assertions::assert_eq;

use crate::helpers::{fixed, sized, text};

fn lazy_config(overscan: usize, estimated_height: u16) -> ViewportConfig {
    ViewportConfig {
        strategy: Strategy::Lazy { overscan, estimated_height },
        ..ViewportConfig::default()
    }
}

fn labels(rendered: &str) -> Vec<usize> {
    rendered
        .lines()
        .map(|line| line.trim_start_matches('i').trim_end_matches(".0").parse().unwrap())
        .collect()
}

#[test]
fn top_of_lazy_matches_composited() {
    let items = || (0..40).map(|i| fixed(format!("i{i}"), u16::try_from(i % 3 + 1).unwrap()));
    let mut lazy = sized(Viewport::with_config(lazy_config(2, 3), items()), 10, 8);
    let mut composited = sized(Viewport::new(items()), 10, 8);
    assert_eq!(lazy.render(), composited.render());
}

#[test]
fn scroll_to_bottom_shows_last_item() {
    let items = (0..50).map(|i| fixed(format!("i{i}"), 1));
    let mut viewport = sized(Viewport::with_config(lazy_config(1, 3), items), 10, 5);
    viewport.scroll_to_bottom();
    let rendered = viewport.render();
    assert_eq!(labels(&rendered), vec![45, 46, 47, 48, 49]);
    assert!(viewport.at_bottom());

    // settled: a second frame changes nothing
    let offset = viewport.offset();
    assert_eq!(viewport.render(), rendered);
    assert_eq!(viewport.offset(), offset);
}

#[test]
fn scrolling_up_keeps_rows_contiguous() {
    let items = (0..50).map(|i| fixed(format!("i{i}"), 1));
    let mut viewport = sized(Viewport::with_config(lazy_config(1, 3), items), 10, 5);
    viewport.scroll_to_bottom();
    viewport.render();

    for _ in 0..20 {
        viewport.scroll_by(-2);
        let shown = labels(&viewport.render());
        assert_eq!(shown.len(), 5);
        assert!(shown.windows(2).all(|pair| pair[1] == pair[0] + 1), "{shown:?}");
    }
    viewport.scroll_to_top();
    assert_eq!(labels(&viewport.render()), vec![0, 1, 2, 3, 4]);
}

#[test]
fn scroll_to_far_item_makes_it_visible() {
    let items = (0..60).map(|i| fixed(format!("i{i}"), 1));
    let mut viewport = sized(Viewport::with_config(lazy_config(2, 3), items), 10, 6);
    assert!(viewport.scroll_to_item(30));
    let shown = labels(&viewport.render());
    assert!(shown.contains(&30), "{shown:?}");
    assert!(viewport.visible_range().contains(&30));
}

#[test]
fn growing_tail_item_follows_bottom() {
    let items = (0..20).map(|i| fixed(format!("i{i}"), 1).with_id(format!("id{i}")));
    let mut viewport = sized(Viewport::with_config(lazy_config(2, 3), items), 10, 4);
    viewport.scroll_to_bottom();
    viewport.render();

    for lines in 2..6 {
        assert!(viewport.update_item("id19", fixed("tail", lines)));
        viewport.scroll_to_bottom();
        let rendered = viewport.render();
        assert_eq!(rendered.lines().last(), Some(format!("tail.{}", lines - 1).as_str()));
        assert!(viewport.at_bottom());
    }
}

#[test]
fn width_change_remeasures_wrapped_text() {
    let items = || (0..10).map(|i| text(&format!("message {i} wraps here")));
    let mut lazy = sized(Viewport::with_config(lazy_config(3, 1), items()), 30, 6);
    let mut composited = sized(Viewport::new(items()), 30, 6);
    assert_eq!(lazy.render(), composited.render());

    lazy.set_size(10, 6);
    composited.set_size(10, 6);
    assert_eq!(lazy.render(), composited.render());
    assert_eq!(lazy.item_extent(0).map(|e| e.height), Some(2));
}
