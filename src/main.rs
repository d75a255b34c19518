use std::{env::args, path::Path};

use pretty_env_logger::formatted_builder;

use ksat::{
    parser::{self, parse_file, Instance},
    prelude::*,
    report::Report,
    results::{self, timed, write_csv, InstanceResult},
    solver::Method,
};

fn usage_string() -> String {
    format!(
        "Usage: {} <method> <command>

method: brute-force, backtracking

command:
    check <file_name> - solve every instance in the file and print SAT/UNSAT
    csv <file_name> <output_file> - solve every instance and write a timed results CSV",
        args().next().unwrap()
    )
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Unknown method '{}'\n\n{}", name, usage_string()))]
    UnknownMethod { name: String },
    #[snafu(display("Unknown command '{}'\n\n{}", name, usage_string()))]
    UnknownCommand { name: String },
    #[snafu(display("Failed to parse CNF"))]
    ParserError { source: parser::Error },
    #[snafu(display("Failed to write results"))]
    ResultsError { source: results::Error },
    #[snafu(display("Required argument does not exist\n\n{}", usage_string()))]
    MissingArgument,
}

fn check_command(method: Method, path: &Path) -> Result<(), Error> {
    let instances = parse_file(path).context(ParserError)?;

    for instance in instances {
        match method.solve_with(instance.formula) {
            Some(assignment) => println!("{} SAT {}", instance.id, assignment),
            None => println!("{} UNSAT", instance.id),
        }
    }

    Ok(())
}

fn csv_command(method: Method, path: &Path, output: &Path) -> Result<(), Error> {
    let instances = parse_file(path).context(ParserError)?;
    let mut results = Vec::with_capacity(instances.len());

    for Instance { id, formula } in instances {
        let n_vars = formula.num_variables();
        let n_clauses = formula.num_clauses();
        let (solution, time_seconds) = timed(|| method.solve_with(formula));

        results.push(InstanceResult {
            instance_id: id,
            n_vars,
            n_clauses,
            method,
            time_seconds,
            solution,
        });
    }

    write_csv(output, &results).context(ResultsError)?;

    Ok(())
}

fn dispatch_command(method: Method, args: Vec<String>) -> Result<(), Error> {
    match args.get(0).map(|s| s.as_str()) {
        Some("check") => {
            let path = args.get(1).context(MissingArgument)?;
            check_command(method, path.as_ref())?;
        }
        Some("csv") => {
            let path = args.get(1).context(MissingArgument)?;
            let output = args.get(2).context(MissingArgument)?;
            csv_command(method, path.as_ref(), output.as_ref())?;
        }
        Some(name) => UnknownCommand {
            name: name.to_owned(),
        }
        .fail()?,
        None => MissingArgument.fail()?,
    }

    Ok(())
}

fn init_logger() {
    let mut builder = formatted_builder();

    if let Ok(s) = ::std::env::var("RUST_LOG") {
        builder.parse_filters(&s);
    } else {
        if cfg!(debug_assertions) {
            builder.parse_filters("ksat=debug");
        } else {
            builder.parse_filters("ksat=warn");
        }
    }

    builder.try_init().expect("Failed to initialize the logger");
}

fn main() -> Result<(), Report> {
    init_logger();

    let mut args = args();

    // drop arg[0]
    args.next();

    // method name
    let method_name = args.next();
    let remaining: Vec<_> = args.collect();

    match method_name.as_deref() {
        Some(name) => match name.parse::<Method>() {
            Ok(method) => dispatch_command(method, remaining)?,
            Err(_) => UnknownMethod {
                name: name.to_owned(),
            }
            .fail()?,
        },
        None => {
            println!("{}", usage_string());
        }
    }

    Ok(())
}
