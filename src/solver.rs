use std::{fmt::Display, str::FromStr};

use crate::formula::{Assignment, Cnf};
use crate::prelude::*;

mod backtracking;
mod brute_force;

pub use backtracking::BacktrackingSolver;
pub use brute_force::BruteForceSolver;

pub trait Solver {
    /// Creates a new solver instance.
    fn new(formula: Cnf) -> Self;

    /// Solves a CNF SAT problem with the solver.
    /// Returns `Some(Assignment)` if satisfiable, `None` otherwise.
    fn solve(self) -> Option<Assignment>;
}

#[derive(Debug, Snafu)]
pub enum MethodParseError {
    #[snafu(display("Unknown method '{}'", name))]
    UnknownMethod { name: String },
}

/// The available decision procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    BruteForce,
    Backtracking,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::BruteForce, Method::Backtracking];

    /// The label recorded in the results CSV.
    pub fn name(self) -> &'static str {
        match self {
            Method::BruteForce => "BruteForce",
            Method::Backtracking => "Backtracking",
        }
    }

    /// Runs the corresponding solver on the formula.
    pub fn solve_with(self, formula: Cnf) -> Option<Assignment> {
        match self {
            Method::BruteForce => BruteForceSolver::new(formula).solve(),
            Method::Backtracking => BacktrackingSolver::new(formula).solve(),
        }
    }
}

impl FromStr for Method {
    type Err = MethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brute-force" => Ok(Method::BruteForce),
            "backtracking" => Ok(Method::Backtracking),
            name => UnknownMethod {
                name: name.to_owned(),
            }
            .fail(),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
