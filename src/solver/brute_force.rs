use crate::formula::{Assignment, Cnf, ClauseStatus};

use super::Solver;

/// Odometer over boolean tuples of a fixed length.
///
/// Yields `true` before `false` in every position, with the last position
/// toggling fastest, so the first tuple is all-`true` and the last is
/// all-`false`. A zero-length odometer yields exactly one empty tuple.
struct Tuples {
    next: Option<Vec<bool>>,
}

impl Tuples {
    fn new(len: usize) -> Self {
        Tuples {
            next: Some(vec![true; len]),
        }
    }
}

impl Iterator for Tuples {
    type Item = Vec<bool>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        // Advance with carry from the fastest (last) position.
        let mut successor = current.clone();
        let mut advanced = false;
        for value in successor.iter_mut().rev() {
            if *value {
                *value = false;
                advanced = true;
                break;
            }
            *value = true;
        }
        if advanced {
            self.next = Some(successor);
        }

        Some(current)
    }
}

/// Exhaustive enumeration over every total assignment of the active variables.
///
/// Slow but exact; useful as a reference oracle for the other solvers.
pub struct BruteForceSolver {
    formula: Cnf,
}

impl Solver for BruteForceSolver {
    fn new(formula: Cnf) -> Self {
        BruteForceSolver { formula }
    }

    fn solve(self) -> Option<Assignment> {
        // Only variables that actually occur in a clause are enumerated;
        // the search space is 2^|active|, not 2^num_variables, and
        // unconstrained variables stay out of the witness.
        let active = self.formula.active_variables();

        debug!(
            "brute force over {} active variables, {} clauses",
            active.len(),
            self.formula.num_clauses()
        );

        for tuple in Tuples::new(active.len()) {
            let mut assignment = Assignment::new(self.formula.num_variables());
            for (&variable, &value) in active.iter().zip(tuple.iter()) {
                assignment.set(variable, value);
            }

            let satisfied = self
                .formula
                .clauses()
                .iter()
                .all(|clause| clause.status(&assignment) == ClauseStatus::Satisfied);

            if satisfied {
                return Some(assignment);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::Tuples;

    #[test]
    fn tuples_count_and_order() {
        let tuples: Vec<_> = Tuples::new(3).collect();
        assert_eq!(tuples.len(), 8);
        assert_eq!(tuples[0], vec![true, true, true]);
        // Last position toggles fastest.
        assert_eq!(tuples[1], vec![true, true, false]);
        assert_eq!(tuples[2], vec![true, false, true]);
        assert_eq!(tuples[7], vec![false, false, false]);
    }

    #[test]
    fn empty_tuple_yields_once() {
        let tuples: Vec<_> = Tuples::new(0).collect();
        assert_eq!(tuples, vec![Vec::<bool>::new()]);
    }
}
