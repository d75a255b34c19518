/*!
Parser for the multi-instance CNF text format.

Each instance is introduced by a marker line naming the instance, followed by
a problem line and one comma-separated clause per line:

```text
c <instance_id> <k> <status?>
p cnf <num_variables> <num_clauses>
1,2
-1,3
```

Tokens after the instance id on the marker line are metadata and are ignored.
*/

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::formula::{Clause, Cnf, Literal, VariableParseError};
use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("I/O error occurred while reading CNF file '{}'", path.display()))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse instance marker line '{}'", line))]
    MalformedMarker { line: String },
    #[snafu(display(
        "Expected problem line 'p cnf <num_variables> <num_clauses>', found '{}'",
        line
    ))]
    MalformedProblemDefinition { line: String },
    #[snafu(display("Instance {} has more than one problem definition", instance))]
    DuplicateProblemDefinition { instance: u32 },
    #[snafu(display("Instance {} has no problem definition", instance))]
    MissingProblemDefinition { instance: u32 },
    #[snafu(display("Line '{}' found before any instance marker", line))]
    LineOutsideInstance { line: String },
    #[snafu(display("Invalid literal found in clause '{}'", clause))]
    MalformedVariable {
        clause: String,
        source: VariableParseError,
    },
    #[snafu(display(
        "Variable {} in clause '{}' exceeds the declared count of {}",
        id,
        clause,
        num_variables
    ))]
    VariableOutOfRange {
        id: usize,
        clause: String,
        num_variables: usize,
    },
    #[snafu(display(
        "Instance {} declares {} clauses but lists {}",
        instance,
        expected,
        found
    ))]
    ClauseCountMismatch {
        instance: u32,
        expected: usize,
        found: usize,
    },
}

/// One problem from a multi-instance file.
#[derive(Debug, Clone)]
pub struct Instance {
    pub id: u32,
    pub formula: Cnf,
}

/// Parse a comma-separated line to a clause
fn parse_clause(line: &str) -> Result<Clause, Error> {
    let mut literals = Vec::new();

    for token in line.split(',') {
        let literal = token
            .trim()
            .parse::<Literal>()
            .with_context(|| MalformedVariable {
                clause: line.to_owned(),
            })?;
        literals.push(literal);
    }

    Ok(Clause::new(literals))
}

struct InstanceBuilder {
    id: u32,
    /// Formula under construction and the declared clause count,
    /// present once the problem line was seen.
    body: Option<(Cnf, usize)>,
}

impl InstanceBuilder {
    /// Starts a new instance from a marker line `c <id> ...`.
    fn from_marker(line: &str) -> Result<Self, Error> {
        let id = line
            .split_whitespace()
            .nth(1)
            .and_then(|token| token.parse::<u32>().ok())
            .context(MalformedMarker {
                line: line.to_owned(),
            })?;

        Ok(InstanceBuilder { id, body: None })
    }

    fn set_problem(&mut self, line: &str) -> Result<(), Error> {
        ensure!(
            self.body.is_none(),
            DuplicateProblemDefinition { instance: self.id }
        );

        let splitted = line.split_whitespace().collect::<Vec<_>>();

        ensure!(
            splitted.len() == 4 && splitted[0] == "p" && splitted[1] == "cnf",
            MalformedProblemDefinition {
                line: line.to_owned(),
            }
        );

        let (num_variables, num_clauses) =
            match (splitted[2].parse::<usize>(), splitted[3].parse::<usize>()) {
                (Ok(num_variables), Ok(num_clauses)) => (num_variables, num_clauses),
                _ => {
                    return MalformedProblemDefinition {
                        line: line.to_owned(),
                    }
                    .fail()
                }
            };

        self.body = Some((Cnf::new(num_variables), num_clauses));

        Ok(())
    }

    fn add_clause_line(&mut self, line: &str) -> Result<(), Error> {
        let instance = self.id;
        let (formula, _) = self
            .body
            .as_mut()
            .context(MissingProblemDefinition { instance })?;

        let clause = parse_clause(line)?;

        // The solvers assume in-range variables; this is the enforcement point.
        for literal in clause.iter() {
            ensure!(
                literal.variable().id() <= formula.num_variables(),
                VariableOutOfRange {
                    id: literal.variable().id(),
                    clause: line.to_owned(),
                    num_variables: formula.num_variables(),
                }
            );
        }

        formula.add_clause(clause);

        Ok(())
    }

    fn finish(self) -> Result<Instance, Error> {
        let instance = self.id;
        let (formula, expected) = self
            .body
            .context(MissingProblemDefinition { instance })?;

        ensure!(
            formula.num_clauses() == expected,
            ClauseCountMismatch {
                instance,
                expected,
                found: formula.num_clauses(),
            }
        );

        debug!(
            "parsed instance {}: {} variables, {} clauses",
            instance,
            formula.num_variables(),
            formula.num_clauses()
        );

        Ok(Instance {
            id: instance,
            formula,
        })
    }
}

/// Parses every instance from the multi-instance format.
pub fn parse_str(input: &str) -> Result<Vec<Instance>, Error> {
    let mut instances = Vec::new();
    let mut current: Option<InstanceBuilder> = None;

    for line in input.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with('c') {
            if let Some(builder) = current.take() {
                instances.push(builder.finish()?);
            }
            current = Some(InstanceBuilder::from_marker(trimmed)?);
        } else if trimmed.starts_with('p') {
            let builder = current.as_mut().context(LineOutsideInstance {
                line: trimmed.to_owned(),
            })?;
            builder.set_problem(trimmed)?;
        } else {
            let builder = current.as_mut().context(LineOutsideInstance {
                line: trimmed.to_owned(),
            })?;
            builder.add_clause_line(trimmed)?;
        }
    }

    if let Some(builder) = current.take() {
        instances.push(builder.finish()?);
    }

    Ok(instances)
}

/// Parses every instance from a multi-instance CNF file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Instance>, Error> {
    let path = path.as_ref();
    let input = fs::read_to_string(path).context(IoError {
        path: path.to_owned(),
    })?;

    parse_str(&input)
}
