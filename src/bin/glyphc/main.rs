//! # glyphc
//!
//! This binary drives the code-generation core from the command line: it
//! reads a JSON-encoded program AST (produced by some out-of-scope
//! lexer/parser) and lowers it to textual LLVM IR.
extern crate glyphc;

mod cli;

use cli::*;

use std::{error::Error, fs};

use glyphc::ast::Program;
use log::{error, info};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::init();

    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    let Commands::Build(build_args) = args.command;

    let source = fs::read_to_string(&build_args.file)?;
    let program: Program = serde_json::from_str(&source)?;

    info!("loaded program with {} function(s)", program.functions.len());

    let ir = match glyphc::compile_program(&program) {
        Ok(ir) => ir,
        Err(codegen_error) => {
            error!("{codegen_error}");
            std::process::exit(-1);
        }
    };

    match build_args.output {
        Some(path) => fs::write(path, ir)?,
        None => println!("{ir}"),
    }

    Ok(())
}
