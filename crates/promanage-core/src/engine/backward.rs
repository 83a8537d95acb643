//! Backward slot-filling for the two-week horizon.
//!
//! Candidates are taken in descending score order and each one is placed on
//! the latest free day at or before `min(deadline, horizon)`. Leaving earlier
//! days open keeps room for tighter deadlines that come later in the order.

use tracing::debug;

use super::ScheduledProject;

/// Fixed array of day slots, day 1 first.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotBoard {
    slots: Vec<Option<ScheduledProject>>,
}

impl SlotBoard {
    pub fn new(horizon: usize) -> Self {
        Self {
            slots: vec![None; horizon],
        }
    }

    pub fn horizon(&self) -> usize {
        self.slots.len()
    }

    /// Latest free day in `1..=min(deadline, horizon)`.
    pub fn latest_free_day(&self, deadline: usize) -> Option<usize> {
        let max_slot = deadline.min(self.horizon());
        (1..=max_slot).rev().find(|day| self.slots[day - 1].is_none())
    }

    /// Place the candidate and return its day, or hand it back if every day
    /// up to its deadline is taken.
    pub fn place(&mut self, candidate: ScheduledProject) -> Result<usize, ScheduledProject> {
        let deadline = candidate.project.effective_deadline(self.horizon());
        match self.latest_free_day(deadline) {
            Some(day) => {
                self.slots[day - 1] = Some(candidate);
                Ok(day)
            }
            None => Err(candidate),
        }
    }

    pub fn get(&self, day: usize) -> Option<&ScheduledProject> {
        day.checked_sub(1)
            .and_then(|i| self.slots.get(i))
            .and_then(Option::as_ref)
    }

    pub fn into_slots(self) -> Vec<Option<ScheduledProject>> {
        self.slots
    }
}

/// Greedy order: highest score first, then earlier deadline, then id.
pub(crate) fn greedy_order(candidates: &mut [ScheduledProject]) {
    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.project.deadline.cmp(&b.project.deadline))
            .then_with(|| a.project.id.cmp(&b.project.id))
    });
}

pub(super) fn select(
    mut candidates: Vec<ScheduledProject>,
    horizon: usize,
) -> (Vec<Option<ScheduledProject>>, Vec<ScheduledProject>) {
    greedy_order(&mut candidates);

    let mut board = SlotBoard::new(horizon);
    let mut unscheduled = Vec::new();
    for candidate in candidates {
        let id = candidate.project.id;
        match board.place(candidate) {
            Ok(day) => debug!(id, day, "placed"),
            Err(dropped) => {
                debug!(id, deadline = dropped.project.deadline, "no free day before deadline");
                unscheduled.push(dropped);
            }
        }
    }
    (board.into_slots(), unscheduled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::scored;
    use crate::engine::TWO_WEEK_DAYS;
    use proptest::prelude::*;

    fn day_ids(slots: &[Option<ScheduledProject>]) -> Vec<Option<i64>> {
        slots
            .iter()
            .map(|s| s.as_ref().map(|p| p.project.id))
            .collect()
    }

    /// Best total score over every subset that can be laid out without
    /// missing a deadline.
    fn brute_force_best(candidates: &[ScheduledProject], horizon: usize) -> f64 {
        let n = candidates.len();
        let mut best = 0.0;
        for mask in 0u32..(1 << n) {
            let mut chosen: Vec<&ScheduledProject> = (0..n)
                .filter(|i| mask & (1 << i) != 0)
                .map(|i| &candidates[i])
                .collect();
            chosen.sort_by_key(|p| p.project.deadline);
            let feasible = chosen
                .iter()
                .enumerate()
                .all(|(i, p)| i < p.project.effective_deadline(horizon));
            if feasible {
                let total: f64 = chosen.iter().map(|p| p.score).sum();
                if total > best {
                    best = total;
                }
            }
        }
        best
    }

    #[test]
    fn tighter_project_loses_its_only_day() {
        // {d:1,r:10}, {d:1,r:20}, {d:2,r:5}
        let candidates = vec![scored(1, 1, 10), scored(2, 1, 20), scored(3, 2, 5)];
        let (slots, unscheduled) = select(candidates, TWO_WEEK_DAYS);
        assert_eq!(slots.len(), TWO_WEEK_DAYS);
        assert_eq!(slots[0].as_ref().map(|p| p.project.id), Some(2));
        assert_eq!(slots[1].as_ref().map(|p| p.project.id), Some(3));
        assert!(slots[2..].iter().all(Option::is_none));
        assert_eq!(unscheduled.len(), 1);
        assert_eq!(unscheduled[0].project.id, 1);
        let revenue: i64 = slots.iter().flatten().map(|p| p.project.revenue).sum();
        assert_eq!(revenue, 25);
    }

    #[test]
    fn places_on_latest_free_day() {
        let mut board = SlotBoard::new(TWO_WEEK_DAYS);
        assert_eq!(board.place(scored(1, 4, 100)), Ok(4));
        assert_eq!(board.place(scored(2, 4, 90)), Ok(3));
        assert_eq!(board.place(scored(3, 30, 80)), Ok(10));
        assert_eq!(board.get(4).map(|p| p.project.id), Some(1));
        assert!(board.get(0).is_none());
        assert!(board.get(11).is_none());
    }

    #[test]
    fn earlier_days_stay_free_for_urgent_work() {
        let candidates = vec![scored(1, 3, 100), scored(2, 1, 60), scored(3, 2, 50)];
        let (slots, unscheduled) = select(candidates, TWO_WEEK_DAYS);
        assert_eq!(day_ids(&slots)[..3].to_vec(), vec![Some(2), Some(3), Some(1)]);
        assert!(unscheduled.is_empty());
    }

    #[test]
    fn empty_input_gives_free_board() {
        let (slots, unscheduled) = select(Vec::new(), TWO_WEEK_DAYS);
        assert_eq!(slots, vec![None; TWO_WEEK_DAYS]);
        assert!(unscheduled.is_empty());
    }

    #[test]
    fn matches_brute_force_on_fixed_case() {
        let candidates = vec![
            scored(1, 2, 100),
            scored(2, 1, 19),
            scored(3, 2, 27),
            scored(4, 1, 25),
            scored(5, 3, 15),
        ];
        let best = brute_force_best(&candidates, TWO_WEEK_DAYS);
        let (slots, _) = select(candidates, TWO_WEEK_DAYS);
        let total: f64 = slots.iter().flatten().map(|p| p.score).sum();
        assert_eq!(total, best);
        assert_eq!(total, 142.0);
    }

    proptest! {
        #[test]
        fn no_slot_collisions_and_deadlines_hold(
            rows in prop::collection::vec((1i64..15, 1i64..300), 0..30)
        ) {
            let candidates: Vec<_> = rows
                .iter()
                .enumerate()
                .map(|(i, (d, r))| scored(i as i64, *d, *r))
                .collect();
            let total = candidates.len();
            let (slots, unscheduled) = select(candidates, TWO_WEEK_DAYS);

            prop_assert_eq!(slots.len(), TWO_WEEK_DAYS);
            let mut seen = std::collections::HashSet::new();
            for (i, slot) in slots.iter().enumerate() {
                if let Some(p) = slot {
                    let day = i + 1;
                    prop_assert!(seen.insert(p.project.id));
                    prop_assert!(day as i64 <= p.project.deadline);
                    prop_assert!(day <= TWO_WEEK_DAYS);
                }
            }
            prop_assert_eq!(seen.len() + unscheduled.len(), total);
        }

        #[test]
        fn greedy_total_is_optimal(
            rows in prop::collection::vec((1i64..6, 1i64..100), 0..9)
        ) {
            let candidates: Vec<_> = rows
                .iter()
                .enumerate()
                .map(|(i, (d, r))| scored(i as i64, *d, *r))
                .collect();
            let best = brute_force_best(&candidates, 4);
            let (slots, _) = select(candidates, 4);
            let total: f64 = slots.iter().flatten().map(|p| p.score).sum();
            prop_assert_eq!(total, best);
        }
    }
}
