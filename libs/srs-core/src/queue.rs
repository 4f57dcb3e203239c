//! Due-set selection over a user's card collection.

use chrono::{DateTime, Utc};

use crate::types::{DueSet, FlashcardRef};

/// Select the cards eligible for review at `now`.
///
/// A card is due iff its `next_repeat` is at or before `now`. The result is
/// ordered most-overdue first (ascending due time, ties by ascending id) and
/// truncated to `limit` after sorting, so a bounded session always gets the
/// most overdue cards. Storage-agnostic: the caller supplies the collection.
pub fn select_due(
    mut cards: Vec<FlashcardRef>,
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> DueSet {
    cards.retain(|card| card.state.next_repeat <= now);
    cards.sort_by(|a, b| {
        a.state
            .next_repeat
            .cmp(&b.state.next_repeat)
            .then(a.id.cmp(&b.id))
    });
    if let Some(limit) = limit {
        cards.truncate(limit);
    }
    DueSet::new(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MemoryState;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn reference_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn card(id: i64, due: DateTime<Utc>) -> FlashcardRef {
        FlashcardRef {
            id,
            user_word_id: id * 10,
            state: MemoryState {
                next_repeat: due,
                ..MemoryState::new_card(due)
            },
        }
    }

    #[test]
    fn overdue_cards_come_first_and_future_cards_are_excluded() {
        let now = reference_time();
        let cards = vec![
            card(1, now + Duration::days(1)),
            card(2, now - Duration::days(1)),
            card(3, now - Duration::days(2)),
        ];

        let due = select_due(cards, now, None);

        let ids: Vec<i64> = due.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn card_due_exactly_now_is_included() {
        let now = reference_time();
        let due = select_due(vec![card(7, now)], now, None);
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn moving_a_due_date_into_the_past_makes_the_card_eligible() {
        let now = reference_time();
        let mut future = card(4, now + Duration::hours(2));
        assert!(select_due(vec![future.clone()], now, None).is_empty());

        future.state.next_repeat = now - Duration::hours(2);
        assert_eq!(select_due(vec![future], now, None).len(), 1);
    }

    #[test]
    fn selection_is_deterministic_regardless_of_input_order() {
        let now = reference_time();
        let cards = vec![
            card(5, now - Duration::days(3)),
            card(1, now - Duration::days(1)),
            card(9, now - Duration::days(2)),
            card(2, now - Duration::days(1)),
        ];
        let mut reversed = cards.clone();
        reversed.reverse();

        let a = select_due(cards, now, None);
        let b = select_due(reversed, now, None);

        assert_eq!(a, b);
        let ids: Vec<i64> = a.iter().map(|c| c.id).collect();
        // Same due time on cards 1 and 2: id breaks the tie.
        assert_eq!(ids, vec![5, 9, 1, 2]);
    }

    #[test]
    fn limit_keeps_the_most_overdue_cards() {
        let now = reference_time();
        let cards = vec![
            card(1, now - Duration::days(1)),
            card(2, now - Duration::days(5)),
            card(3, now - Duration::days(3)),
        ];

        let due = select_due(cards, now, Some(2));

        let ids: Vec<i64> = due.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn empty_collection_yields_empty_set_not_error() {
        let due = select_due(Vec::new(), reference_time(), Some(10));
        assert!(due.is_empty());
        assert_eq!(due.len(), 0);
    }
}
