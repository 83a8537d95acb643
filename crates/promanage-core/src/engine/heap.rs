//! Capacity-bounded heap selection for the single-week horizon.
//!
//! Candidates arrive in `(deadline asc, score desc)` order. Each one competes
//! for `min(deadline, horizon)` pool places: while the pool is smaller than that
//! it is admitted outright, otherwise it must beat the weakest member.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tracing::debug;

use super::ScheduledProject;

/// What happened to a candidate offered to the pool.
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    /// A place before the candidate's deadline was still open.
    Admitted,
    /// The candidate displaced the weakest member, returned here.
    Replaced(ScheduledProject),
    /// The pool was full up to the deadline and the candidate, returned here,
    /// was not stronger than the weakest member.
    Discarded(ScheduledProject),
}

/// Pool member. Ordered by score; among equal scores the member offered later
/// is the weaker one, so eviction stays deterministic.
#[derive(Debug)]
struct PoolEntry {
    rank: usize,
    candidate: ScheduledProject,
}

impl Ord for PoolEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.candidate
            .score
            .total_cmp(&other.candidate.score)
            .then_with(|| other.rank.cmp(&self.rank))
    }
}

impl PartialOrd for PoolEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PoolEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PoolEntry {}

/// Min-ordered selection pool keyed by strategic score.
#[derive(Debug)]
pub struct SelectionPool {
    horizon: usize,
    heap: BinaryHeap<Reverse<PoolEntry>>,
    offered: usize,
}

impl SelectionPool {
    pub fn new(horizon: usize) -> Self {
        Self {
            horizon,
            heap: BinaryHeap::with_capacity(horizon),
            offered: 0,
        }
    }

    /// Offer the next candidate in admission order.
    pub fn offer(&mut self, candidate: ScheduledProject) -> Admission {
        let capacity = candidate.project.effective_deadline(self.horizon);
        let entry = PoolEntry {
            rank: self.offered,
            candidate,
        };
        self.offered += 1;

        if self.heap.len() < capacity {
            self.heap.push(Reverse(entry));
            return Admission::Admitted;
        }

        if let Some(mut weakest) = self.heap.peek_mut() {
            if entry.candidate.score > weakest.0.candidate.score {
                let evicted = std::mem::replace(&mut weakest.0, entry);
                return Admission::Replaced(evicted.candidate);
            }
        }
        Admission::Discarded(entry.candidate)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Member that the next contested candidate has to beat.
    pub fn weakest(&self) -> Option<&ScheduledProject> {
        self.heap.peek().map(|Reverse(entry)| &entry.candidate)
    }

    pub fn members(&self) -> impl Iterator<Item = &ScheduledProject> {
        self.heap.iter().map(|Reverse(entry)| &entry.candidate)
    }

    /// Members ordered for presentation: deadline ascending.
    pub fn into_sorted(self) -> Vec<ScheduledProject> {
        let mut members: Vec<_> = self
            .heap
            .into_iter()
            .map(|Reverse(entry)| entry.candidate)
            .collect();
        admission_order(&mut members);
        members
    }
}

/// Chronological admission order: deadline first, stronger score first
/// among equally urgent candidates, id as the last tie-break.
pub(crate) fn admission_order(candidates: &mut [ScheduledProject]) {
    candidates.sort_by(|a, b| {
        a.project
            .deadline
            .cmp(&b.project.deadline)
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| a.project.id.cmp(&b.project.id))
    });
}

pub(super) fn select(
    mut candidates: Vec<ScheduledProject>,
    horizon: usize,
) -> (Vec<Option<ScheduledProject>>, Vec<ScheduledProject>) {
    admission_order(&mut candidates);

    let mut pool = SelectionPool::new(horizon);
    let mut unscheduled = Vec::new();
    for candidate in candidates {
        let id = candidate.project.id;
        match pool.offer(candidate) {
            Admission::Admitted => debug!(id, pool = pool.len(), "admitted"),
            Admission::Replaced(evicted) => {
                debug!(id, evicted = evicted.project.id, "replaced weakest");
                unscheduled.push(evicted);
            }
            Admission::Discarded(rejected) => {
                debug!(id, "discarded, pool full up to deadline");
                unscheduled.push(rejected);
            }
        }
    }

    let mut slots: Vec<Option<ScheduledProject>> =
        pool.into_sorted().into_iter().map(Some).collect();
    slots.resize(horizon, None);
    (slots, unscheduled)
}
