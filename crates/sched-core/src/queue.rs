//! Due-queue selection.

use crate::models::Schedulable;
use chrono::{DateTime, Utc};

/// Select the items due at `now`, most neglected first, capped at `limit`.
///
/// Ordering is ascending by due instant so the oldest overdue items surface
/// before anything that just came due. An empty result is the normal
/// caught-up state, not an error, and a `limit` smaller than the due count
/// silently caps the session.
pub fn select_due<T: Schedulable>(
    items: impl IntoIterator<Item = T>,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<T> {
    let mut due: Vec<T> = items
        .into_iter()
        .filter(|item| item.next_due_at().is_some_and(|at| at <= now))
        .collect();
    due.sort_by_key(|item| item.next_due_at());
    due.truncate(limit);
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReviewItem;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn item_due(offset_days: i64) -> ReviewItem {
        let mut item = ReviewItem::new_card("q", "a", t0());
        item.state.next_due_at = t0() + Duration::days(offset_days);
        item
    }

    #[test]
    fn test_overdue_first_and_future_excluded() {
        let items = vec![item_due(-1), item_due(1), item_due(-3)];
        let selected = select_due(items, t0(), 10);

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].state.next_due_at, t0() - Duration::days(3));
        assert_eq!(selected[1].state.next_due_at, t0() - Duration::days(1));
    }

    #[test]
    fn test_limit_caps_session() {
        let items = vec![item_due(-1), item_due(-3), item_due(-2)];
        let selected = select_due(items, t0(), 1);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].state.next_due_at, t0() - Duration::days(3));
    }

    #[test]
    fn test_due_exactly_now_is_included() {
        let selected = select_due(vec![item_due(0)], t0(), 10);
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_caught_up_returns_empty() {
        let selected = select_due(vec![item_due(2), item_due(5)], t0(), 10);
        assert!(selected.is_empty());
    }
}
