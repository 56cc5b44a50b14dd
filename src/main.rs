use std::{fs, path::PathBuf, process::ExitCode, time::Instant};

use anyhow::{Context, Result};
use catscript::{
    ast::ast::{Program, ProgramBody},
    compiler::{compiler::compile_program, machine::Machine},
    errors::errors::Error,
    format_error,
    interpreter::interpreter::Interpreter,
    parser::parser::{parse_expression_only, parse_program},
    transpiler::transpiler::transpile,
    type_checker::type_checker::{validate, validate_expression},
};
use clap::{Parser, ValueEnum};
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Interpret the AST directly
    Run,
    /// Lower to bytecode and execute it on the stack machine
    Bytecode,
    /// Print the equivalent JavaScript program
    Transpile,
    /// Only parse and validate
    Check,
}

#[derive(Parser, Debug)]
#[command(name = "catscript")]
#[command(about = "CatScript parser, validator and backends", long_about = None)]
struct Cli {
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[arg(short, long, value_enum, default_value = "run")]
    mode: Mode,

    /// Parse the whole input as a single expression
    #[arg(short, long)]
    expression: bool,

    /// With `--mode bytecode`, print the method listing instead of executing
    #[arg(long)]
    disassemble: bool,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("Reading {}", cli.input.display()))?;
    let file_name = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.input.display().to_string());

    let start = Instant::now();
    let program = match load_program(&source, &file_name, cli.expression) {
        Ok(program) => program,
        Err(diagnostics) => {
            for error in &diagnostics {
                eprint!("{}", format_error(error, &source));
            }
            eprintln!("{} error(s) in {}", diagnostics.len(), file_name);
            return Ok(ExitCode::FAILURE);
        }
    };
    info!("parsed and validated {} in {:?}", file_name, start.elapsed());

    let output = match cli.mode {
        Mode::Check => String::new(),
        Mode::Run => Interpreter::execute(&program).context("Interpreting program")?,
        Mode::Bytecode => {
            let bytecode = compile_program(&program).context("Lowering program")?;
            debug!("lowered {} methods", bytecode.order.len());
            if cli.disassemble {
                bytecode.to_string()
            } else {
                Machine::run(&bytecode).context("Executing bytecode")?
            }
        }
        Mode::Transpile => transpile(&program),
    };

    if !output.is_empty() {
        if output.ends_with('\n') {
            print!("{output}");
        } else {
            println!("{output}");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Parses and validates `source`, returning every diagnostic on failure.
fn load_program(source: &str, file_name: &str, expression: bool) -> Result<Program, Vec<Error>> {
    let program = if expression {
        let mut expr = parse_expression_only(source, file_name).map_err(|error| vec![error])?;
        validate_expression(&mut expr);
        Program {
            span: expr.span.clone(),
            body: ProgramBody::Expression(expr),
        }
    } else {
        let mut program = parse_program(source, file_name);
        validate(&mut program);
        program
    };

    let diagnostics = program.diagnostics();
    if diagnostics.is_empty() {
        Ok(program)
    } else {
        Err(diagnostics)
    }
}
