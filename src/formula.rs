/*!
A module to represent conjunctive normal form formula and partial assignments.
*/

use std::{
    collections::BTreeSet, convert::TryInto, fmt::Display, num::NonZeroU32, str::FromStr,
};

use typed_index_collections::TiVec;

use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum VariableParseError {
    #[snafu(display("Failed to parse Variable ID"))]
    ParseIntError { source: std::num::ParseIntError },
    #[snafu(display(
        "Variable ID {} is out of range (must be within 1 to {})",
        num,
        Variable::MAX_VARIABLE_ID
    ))]
    RangeError { num: usize },
}

/// Newtype wrapper for variable ID.
/// Invariant: 0 < ID <= MAX_VARIABLE_ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Variable(NonZeroU32);

impl Variable {
    pub const MAX_VARIABLE_ID: usize = std::u32::MAX as usize;
}

impl Variable {
    /// The 1-based external ID, as it appears in input files.
    pub fn id(&self) -> usize {
        self.0.get() as usize
    }

    pub fn as_index(&self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// Creates a variable from a 1-based ID.
    /// Returns `None` if the ID is zero or too large.
    pub fn from_id(id: usize) -> Option<Self> {
        if id > Variable::MAX_VARIABLE_ID {
            return None;
        }
        Some(Variable(NonZeroU32::new(id.try_into().ok()?)?))
    }

    /// Creates a variable from a raw index.
    /// Returns `None` if the index is invalid.
    pub fn from_index(index: usize) -> Option<Self> {
        Variable::from_id(index.checked_add(1)?)
    }
}

impl FromStr for Variable {
    type Err = VariableParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num = s.parse::<usize>().context(ParseIntError)?;
        Variable::from_id(num).context(RangeError { num })
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    id: Variable,
    positive: bool,
}

impl Literal {
    pub fn new(id: Variable, positive: bool) -> Self {
        Literal { id, positive }
    }

    pub fn variable(&self) -> Variable {
        self.id
    }

    pub fn positive(&self) -> bool {
        self.positive
    }
}

impl FromStr for Literal {
    type Err = VariableParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (positive, id) = if let Some(rest) = s.strip_prefix('-') {
            (false, rest.parse()?)
        } else {
            (true, s.parse()?)
        };

        Ok(Literal { id, positive })
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", if self.positive { "" } else { "¬" }, self.id)
    }
}

/// Status of a single clause under a (possibly partial) assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseStatus {
    /// At least one literal is assigned with matching polarity.
    Satisfied,
    /// Every literal is assigned and none matches.
    Falsified,
    /// No satisfying literal yet, but at least one literal is unassigned.
    Undecided,
}

/// Disjunction of literals
#[derive(Debug, Clone)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(literals: Vec<Literal>) -> Self {
        Self { literals }
    }

    pub fn iter(&self) -> impl Iterator<Item = Literal> + '_ {
        self.literals.iter().copied()
    }

    /// Evaluates the clause against a partial assignment.
    /// A single satisfying literal suffices; remaining literals are skipped.
    pub fn status(&self, assignment: &Assignment) -> ClauseStatus {
        let mut undecided = false;

        for literal in self.iter() {
            match assignment.value(literal) {
                Some(true) => return ClauseStatus::Satisfied,
                Some(false) => {}
                None => undecided = true,
            }
        }

        if undecided {
            ClauseStatus::Undecided
        } else {
            // Note: this makes a zero-literal clause falsified, as it should be.
            ClauseStatus::Falsified
        }
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;

        let mut iter = self.literals.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for literal in iter {
            write!(f, " ∨ {}", literal)?;
        }

        write!(f, ")")?;

        Ok(())
    }
}

/// Typed index into a formula's clause list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClauseIdx(usize);

impl From<usize> for ClauseIdx {
    fn from(index: usize) -> Self {
        ClauseIdx(index)
    }
}

impl From<ClauseIdx> for usize {
    fn from(index: ClauseIdx) -> Self {
        index.0
    }
}

impl Display for ClauseIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a whole formula under a (possibly partial) assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaStatus {
    /// Every clause is satisfied; the assignment is a valid witness even if partial.
    AllSatisfied,
    /// The named clause is falsified; the assignment is dead regardless of
    /// the other clauses.
    SomeFalsified(ClauseIdx),
    Undecided,
}

/// Formula representation in Conjunctive Normal Form
#[derive(Debug, Clone)]
pub struct Cnf {
    num_variables: usize,
    clauses: TiVec<ClauseIdx, Clause>,
}

impl Cnf {
    pub fn new(num_variables: usize) -> Self {
        assert!(num_variables <= Variable::MAX_VARIABLE_ID);

        Cnf {
            num_variables,
            clauses: TiVec::new(),
        }
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &TiVec<ClauseIdx, Clause> {
        &self.clauses
    }

    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Evaluates the formula against a partial assignment.
    /// A falsified clause dominates: the scan stops at the first one.
    pub fn status(&self, assignment: &Assignment) -> FormulaStatus {
        let mut all_satisfied = true;

        for (index, clause) in self.clauses.iter_enumerated() {
            match clause.status(assignment) {
                ClauseStatus::Satisfied => {}
                ClauseStatus::Falsified => return FormulaStatus::SomeFalsified(index),
                ClauseStatus::Undecided => all_satisfied = false,
            }
        }

        if all_satisfied {
            FormulaStatus::AllSatisfied
        } else {
            FormulaStatus::Undecided
        }
    }

    /// Distinct variables that appear in at least one clause, ascending.
    ///
    /// This can be a strict subset of `1..=num_variables`; variables absent
    /// from every clause are unconstrained and never show up here.
    pub fn active_variables(&self) -> Vec<Variable> {
        let mut variables = BTreeSet::new();

        for clause in self.clauses.iter() {
            for literal in clause.iter() {
                variables.insert(literal.variable());
            }
        }

        variables.into_iter().collect()
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CNF with {} variables (", self.num_variables)?;

        let mut iter = self.clauses.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for clause in iter {
            write!(f, " ∧ {}", clause)?;
        }

        write!(f, ")")?;

        Ok(())
    }
}

/// A partial assignment of truth values to variables.
///
/// A variable is either decided (`Some`) or undecided (`None`); undecided is
/// never conflated with false. Solvers create one per search, mutate it on
/// their own call stack, and clone it only to capture a witness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<Option<bool>>,
}

impl Assignment {
    pub fn new(num_variables: usize) -> Self {
        Assignment {
            values: vec![None; num_variables],
        }
    }

    pub fn num_assigned(&self) -> usize {
        self.values.iter().filter(|value| value.is_some()).count()
    }

    pub fn get(&self, variable: Variable) -> Option<bool> {
        self.values[variable.as_index()]
    }

    /// The truth value of a literal, adjusted for polarity.
    /// `None` if the literal's variable is undecided.
    pub fn value(&self, literal: Literal) -> Option<bool> {
        let raw_assignment = self.values[literal.variable().as_index()];
        raw_assignment.map(|val| val ^ !literal.positive())
    }

    pub fn set(&mut self, variable: Variable, value: bool) {
        self.values[variable.as_index()] = Some(value);
    }

    pub fn unset(&mut self, variable: Variable) {
        self.values[variable.as_index()] = None;
    }

    /// The lowest-ID undecided variable, or `None` if every variable is decided.
    pub fn first_unassigned(&self) -> Option<Variable> {
        let index = self.values.iter().position(|value| value.is_none())?;
        Variable::from_index(index)
    }

    /// Decided `(variable, value)` pairs in ascending variable order.
    pub fn iter(&self) -> impl Iterator<Item = (Variable, bool)> + '_ {
        self.values.iter().enumerate().filter_map(|(index, value)| {
            value.map(|val| (Variable::from_index(index).unwrap(), val))
        })
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;

        let mut iter = self.iter();
        if let Some((variable, value)) = iter.next() {
            write!(f, "{}: {}", variable.id(), value)?;
        }
        for (variable, value) in iter {
            write!(f, ", {}: {}", variable.id(), value)?;
        }

        write!(f, "}}")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(id: usize) -> Variable {
        Variable::from_id(id).unwrap()
    }

    #[test]
    fn literal_parsing() {
        assert_eq!("3".parse::<Literal>().unwrap(), Literal::new(var(3), true));
        assert_eq!("-2".parse::<Literal>().unwrap(), Literal::new(var(2), false));
        assert!("0".parse::<Literal>().is_err());
        assert!("-0".parse::<Literal>().is_err());
    }

    #[test]
    fn clause_status_transitions() {
        let clause = Clause::new(vec![
            Literal::new(var(1), true),
            Literal::new(var(2), false),
        ]);

        let mut assignment = Assignment::new(2);
        assert_eq!(clause.status(&assignment), ClauseStatus::Undecided);

        assignment.set(var(1), false);
        assert_eq!(clause.status(&assignment), ClauseStatus::Undecided);

        assignment.set(var(2), false);
        assert_eq!(clause.status(&assignment), ClauseStatus::Satisfied);

        assignment.set(var(2), true);
        assert_eq!(clause.status(&assignment), ClauseStatus::Falsified);
    }

    #[test]
    fn empty_clause_is_falsified() {
        let clause = Clause::new(Vec::new());
        assert_eq!(clause.status(&Assignment::new(0)), ClauseStatus::Falsified);
    }

    #[test]
    fn falsified_clause_dominates_formula_status() {
        let mut formula = Cnf::new(2);
        formula.add_clause(Clause::new(vec![Literal::new(var(2), true)]));
        formula.add_clause(Clause::new(vec![Literal::new(var(1), false)]));

        let mut assignment = Assignment::new(2);
        assignment.set(var(1), true);

        assert_eq!(
            formula.status(&assignment),
            FormulaStatus::SomeFalsified(ClauseIdx::from(1))
        );
    }

    #[test]
    fn active_variables_skip_unused_ids() {
        let mut formula = Cnf::new(5);
        formula.add_clause(Clause::new(vec![
            Literal::new(var(4), false),
            Literal::new(var(2), true),
        ]));
        formula.add_clause(Clause::new(vec![Literal::new(var(4), true)]));

        assert_eq!(formula.active_variables(), vec![var(2), var(4)]);
    }

    #[test]
    fn assignment_display_lists_decided_pairs() {
        let mut assignment = Assignment::new(3);
        assert_eq!(assignment.to_string(), "{}");

        assignment.set(var(3), false);
        assignment.set(var(1), true);
        assert_eq!(assignment.to_string(), "{1: true, 3: false}");

        assignment.unset(var(1));
        assert_eq!(assignment.to_string(), "{3: false}");
    }
}
