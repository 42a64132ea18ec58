//! Pagination: deterministic slicing of an ordered item list into fixed-size
//! pages, plus keyboard assembly for paged list screens.

use crate::engine::action::Action;
use crate::engine::types::{Button, Keyboard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView {
    /// Clamped page index actually rendered.
    pub page: usize,
    pub start: usize,
    pub end: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Slice `[start, end)` of a list of `len` items. The requested page is
/// clamped to the last valid page so a stale index from session state never
/// produces an out-of-range slice; effective page size is at least 1.
pub fn paginate(len: usize, page: usize, page_size: usize) -> PageView {
    let page_size = page_size.max(1);
    let max_page = if len == 0 { 0 } else { (len - 1) / page_size };
    let page = page.min(max_page);
    let start = page * page_size;
    let end = (start + page_size).min(len);
    PageView {
        page,
        start,
        end,
        has_prev: start > 0,
        has_next: end < len,
    }
}

/// Standard paged list keyboard: one row per item on the page, a nav row with
/// Prev/Next only where a neighbour page exists, optional extra action rows,
/// and the mandatory Back row.
pub fn paginated_rows(
    items: Vec<Button>,
    view: PageView,
    extra_buttons: Vec<Button>,
    back: Button,
) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = items.into_iter().map(|b| vec![b]).collect();

    let mut nav_row = Vec::new();
    if view.has_prev {
        nav_row.push(Button::new("⬅️ Prev", Action::Page(view.page - 1)));
    }
    if view.has_next {
        nav_row.push(Button::new("Next ➡️", Action::Page(view.page + 1)));
    }
    if !nav_row.is_empty() {
        rows.push(nav_row);
    }

    for button in extra_buttons {
        rows.push(vec![button]);
    }
    rows.push(vec![back]);
    Keyboard::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_of_five_items_page_size_two() {
        let view = paginate(5, 0, 2);
        assert_eq!((view.start, view.end), (0, 2));
        assert!(!view.has_prev);
        assert!(view.has_next);
    }

    #[test]
    fn last_page_of_five_items_page_size_two() {
        let view = paginate(5, 2, 2);
        assert_eq!((view.start, view.end), (4, 5));
        assert!(view.has_prev);
        assert!(!view.has_next);
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        let view = paginate(5, 99, 2);
        assert_eq!(view.page, 2);
        assert_eq!((view.start, view.end), (4, 5));
    }

    #[test]
    fn pagination_is_idempotent_under_re_render() {
        let a = paginate(7, 1, 3);
        let b = paginate(7, 1, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_page_size_behaves_as_one() {
        let view = paginate(3, 1, 0);
        assert_eq!((view.start, view.end), (1, 2));
        assert!(view.has_prev);
        assert!(view.has_next);
    }

    #[test]
    fn empty_list_yields_empty_page() {
        let view = paginate(0, 4, 3);
        assert_eq!((view.start, view.end), (0, 0));
        assert!(!view.has_prev);
        assert!(!view.has_next);
    }

    #[test]
    fn nav_row_only_present_when_needed() {
        let kb = paginated_rows(
            vec![Button::noop("a"), Button::noop("b")],
            paginate(2, 0, 5),
            Vec::new(),
            Button::new("⬅️ Back", Action::MainMenu),
        );
        // Two item rows plus the Back row, no nav row.
        assert_eq!(kb.rows.len(), 3);
    }

    #[test]
    fn extras_sit_between_nav_and_back() {
        let kb = paginated_rows(
            vec![Button::noop("a")],
            paginate(5, 1, 1),
            vec![Button::new("✅ Confirm", Action::AbsenceConfirm)],
            Button::new("⬅️ Back", Action::MainMenu),
        );
        // item, nav, confirm, back
        assert_eq!(kb.rows.len(), 4);
        assert_eq!(kb.rows[1].len(), 2);
        assert_eq!(kb.rows[2][0].label, "✅ Confirm");
        assert_eq!(kb.rows[3][0].label, "⬅️ Back");
    }
}
