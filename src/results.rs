/*!
Per-instance result records, the CSV writer, and the timing helper.
*/

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use crate::formula::Assignment;
use crate::prelude::*;
use crate::solver::Method;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("I/O error occurred while writing results to '{}'", path.display()))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub const CSV_HEADER: &str =
    "instance_id,n_vars,n_clauses,satisfiable,time_seconds,method,solution";

/// Outcome of one solver run on one instance.
#[derive(Debug, Clone)]
pub struct InstanceResult {
    pub instance_id: u32,
    pub n_vars: usize,
    pub n_clauses: usize,
    pub method: Method,
    pub time_seconds: f64,
    /// `Some(witness)` if satisfiable, `None` otherwise.
    pub solution: Option<Assignment>,
}

impl InstanceResult {
    /// Single-letter satisfiable flag, as recorded in the CSV.
    pub fn flag(&self) -> &'static str {
        if self.solution.is_some() {
            "S"
        } else {
            "U"
        }
    }

    fn solution_field(&self) -> String {
        let rendered = match &self.solution {
            Some(assignment) => assignment.to_string(),
            None => "{}".to_owned(),
        };
        quote_field(&rendered)
    }

    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.instance_id,
            self.n_vars,
            self.n_clauses,
            self.flag(),
            self.time_seconds,
            self.method.name(),
            self.solution_field(),
        )
    }
}

/// Double-quotes a CSV field when it contains a comma or a quote.
fn quote_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

fn write_rows(writer: &mut impl Write, results: &[InstanceResult]) -> std::io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for result in results {
        writeln!(writer, "{}", result.csv_row())?;
    }
    writer.flush()
}

/// Writes a header line and one row per result.
pub fn write_csv(path: impl AsRef<Path>, results: &[InstanceResult]) -> Result<(), Error> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path).context(IoError {
        path: path.to_owned(),
    })?);

    write_rows(&mut writer, results).context(IoError {
        path: path.to_owned(),
    })?;

    info!("wrote {} results to '{}'", results.len(), path.display());

    Ok(())
}

/// Runs `f` and returns its result together with elapsed wall time in seconds.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed().as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Variable;

    #[test]
    fn csv_row_for_unsat_result() {
        let result = InstanceResult {
            instance_id: 3,
            n_vars: 4,
            n_clauses: 10,
            method: Method::BruteForce,
            time_seconds: 0.25,
            solution: None,
        };

        assert_eq!(result.csv_row(), "3,4,10,U,0.25,BruteForce,{}");
    }

    #[test]
    fn csv_row_quotes_solution_with_commas() {
        let mut assignment = Assignment::new(2);
        assignment.set(Variable::from_id(1).unwrap(), true);
        assignment.set(Variable::from_id(2).unwrap(), false);

        let result = InstanceResult {
            instance_id: 4,
            n_vars: 2,
            n_clauses: 1,
            method: Method::Backtracking,
            time_seconds: 0.5,
            solution: Some(assignment),
        };

        assert_eq!(
            result.csv_row(),
            "4,2,1,S,0.5,Backtracking,\"{1: true, 2: false}\""
        );
    }
}
