use opsgrid_lib::pagination::{
    DEFAULT_WINDOW_RADIUS, PageLink, compute_window, page_count,
};

#[test]
fn test_single_page_has_no_controls() {
    let window = compute_window(1, 1, DEFAULT_WINDOW_RADIUS);
    assert_eq!(window.pages, vec![1]);
    assert!(!window.has_prev);
    assert!(!window.has_next);
    assert!(!window.show_leading_ellipsis);
    assert!(!window.show_trailing_ellipsis);
    assert!(window.is_empty());
    assert!(window.links().is_empty());
}

#[test]
fn test_middle_window() {
    let window = compute_window(10, 20, 2);
    assert_eq!(window.pages, vec![8, 9, 10, 11, 12]);
    assert!(window.show_leading_ellipsis);
    assert!(window.show_trailing_ellipsis);
    assert!(window.has_prev);
    assert!(window.has_next);
    assert_eq!(window.window_start(), Some(8));
    assert_eq!(window.window_end(), Some(12));
}

#[test]
fn test_window_near_start_has_no_leading_gap() {
    let window = compute_window(3, 20, 2);
    assert_eq!(window.pages, vec![1, 2, 3, 4, 5]);
    assert!(!window.show_leading_ellipsis);
    assert!(window.show_trailing_ellipsis);

    // Start at 2: page 1 is adjacent, no ellipsis.
    let window = compute_window(4, 20, 2);
    assert_eq!(window.window_start(), Some(2));
    assert!(!window.show_leading_ellipsis);
}

#[test]
fn test_window_near_end() {
    let window = compute_window(18, 20, 2);
    assert_eq!(window.pages, vec![16, 17, 18, 19, 20]);
    assert!(!window.show_trailing_ellipsis);
    assert!(window.has_next);

    let window = compute_window(17, 20, 2);
    assert_eq!(window.window_end(), Some(19));
    assert!(!window.show_trailing_ellipsis);
}

#[test]
fn test_out_of_range_current_page_is_clamped() {
    let window = compute_window(0, 5, 2);
    assert_eq!(window.current_page, 1);
    assert!(!window.has_prev);

    let window = compute_window(99, 5, 2);
    assert_eq!(window.current_page, 5);
    assert_eq!(window.pages, vec![3, 4, 5]);
    assert!(!window.has_next);
}

#[test]
fn test_zero_pages_renders_nothing() {
    let window = compute_window(1, 0, 2);
    assert!(window.is_empty());
    assert!(!window.has_next);
    assert!(window.links().is_empty());
}

#[test]
fn test_links_include_edges_and_gaps() {
    let links = compute_window(10, 20, 2).links();
    assert_eq!(links.first(), Some(&PageLink::Prev));
    assert_eq!(links[1], PageLink::Page { number: 1, current: false });
    assert_eq!(links[2], PageLink::Ellipsis);
    assert!(links.contains(&PageLink::Page { number: 10, current: true }));
    assert_eq!(links[links.len() - 3], PageLink::Ellipsis);
    assert_eq!(links[links.len() - 2], PageLink::Page { number: 20, current: false });
    assert_eq!(links.last(), Some(&PageLink::Next));
}

#[test]
fn test_page_count() {
    assert_eq!(page_count(0, 20), 0);
    assert_eq!(page_count(20, 20), 1);
    assert_eq!(page_count(21, 20), 2);
    assert_eq!(page_count(5, 0), 5);
}
