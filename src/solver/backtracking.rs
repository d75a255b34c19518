use crate::formula::{Assignment, Cnf, FormulaStatus};

use super::Solver;

/// Depth-first search over partial assignments with falsified-clause pruning.
///
/// Branches on the lowest-ID undecided variable, `true` before `false`; a
/// branch is abandoned the moment some clause has every literal decided and
/// none satisfied. Which witness is reported when several exist follows from
/// that fixed order.
pub struct BacktrackingSolver {
    formula: Cnf,
}

impl Solver for BacktrackingSolver {
    fn new(formula: Cnf) -> Self {
        BacktrackingSolver { formula }
    }

    fn solve(self) -> Option<Assignment> {
        fn solve_inner(formula: &Cnf, assignment: &mut Assignment) -> Option<Assignment> {
            match formula.status(assignment) {
                FormulaStatus::AllSatisfied => {
                    // A satisfying partial assignment is a valid terminal
                    // witness; undecided variables stay undecided.
                    return Some(assignment.clone());
                }
                FormulaStatus::SomeFalsified(index) => {
                    trace!("pruned: clause {} falsified", index);
                    return None;
                }
                FormulaStatus::Undecided => {}
            }

            // No undecided variable left while the formula is not yet
            // satisfied: fail upward.
            let variable = assignment.first_unassigned()?;

            assignment.set(variable, true);
            if let Some(solution) = solve_inner(formula, assignment) {
                return Some(solution);
            }
            assignment.unset(variable);

            assignment.set(variable, false);
            if let Some(solution) = solve_inner(formula, assignment) {
                return Some(solution);
            }
            assignment.unset(variable);

            None
        }

        debug!(
            "backtracking over {} variables, {} clauses",
            self.formula.num_variables(),
            self.formula.num_clauses()
        );

        let mut assignment = Assignment::new(self.formula.num_variables());
        solve_inner(&self.formula, &mut assignment)
    }
}
