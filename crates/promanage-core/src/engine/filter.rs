//! Candidate gate applied before any scoring.

use crate::project::Project;

/// Projects that may enter selection, plus how many were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub valid: Vec<Project>,
    pub dropped: usize,
}

/// Keep projects with `deadline > 0` and `revenue > 0`, in input order.
///
/// Invalid rows are dropped rather than rejected.
pub fn filter_candidates(projects: &[Project]) -> FilterOutcome {
    let valid: Vec<Project> = projects
        .iter()
        .filter(|p| p.is_schedulable())
        .cloned()
        .collect();
    FilterOutcome {
        dropped: projects.len() - valid.len(),
        valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::project;
    use proptest::prelude::*;

    #[test]
    fn keeps_order_of_valid_rows() {
        let input = vec![
            project(1, 3, 100),
            project(2, 0, 100),
            project(3, 1, 5),
            project(4, 2, -10),
            project(5, 7, 1),
        ];
        let outcome = filter_candidates(&input);
        let ids: Vec<i64> = outcome.valid.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
        assert_eq!(outcome.dropped, 2);
    }

    #[test]
    fn empty_input() {
        let outcome = filter_candidates(&[]);
        assert!(outcome.valid.is_empty());
        assert_eq!(outcome.dropped, 0);
    }

    proptest! {
        #[test]
        fn filtered_set_is_exactly_the_valid_rows(
            rows in prop::collection::vec((-3i64..12, -50i64..500), 0..40)
        ) {
            let input: Vec<Project> = rows
                .iter()
                .enumerate()
                .map(|(i, (d, r))| project(i as i64, *d, *r))
                .collect();
            let outcome = filter_candidates(&input);

            prop_assert!(outcome.valid.iter().all(|p| p.deadline > 0 && p.revenue > 0));
            for p in input.iter().filter(|p| p.deadline > 0 && p.revenue > 0) {
                prop_assert_eq!(outcome.valid.iter().filter(|v| v.id == p.id).count(), 1);
            }
            prop_assert_eq!(outcome.valid.len() + outcome.dropped, input.len());
        }
    }
}
