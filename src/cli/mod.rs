//! Command-line surface — make-style target list plus print modes.

use crate::core::{builder::Builder, error::MakeError, parser, Makefile};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "yunque",
    version,
    about = "Rust-native make — linear dependency resolution, deterministic recipe execution"
)]
pub struct Cli {
    /// Targets to build, in order; empty builds the default target
    pub targets: Vec<String>,

    /// Use FILE as the makefile instead of probing makefile/Makefile
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Pretty-print the parsed rule and variable database and exit
    #[arg(short = 'p', long = "print")]
    pub print: bool,

    /// With --print, dump the database as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the CLI: parse the makefile, then print or build.
pub fn run(cli: Cli) -> Result<(), MakeError> {
    if cli.targets.iter().any(|t| t.is_empty()) {
        return Err(MakeError::EmptyArgument);
    }

    let path = match cli.file {
        Some(ref file) => file.clone(),
        None => match find_makefile() {
            Some(path) => path,
            // The diagnostic depends on what was asked for, as in make.
            None if cli.targets.is_empty() => return Err(MakeError::NoMakefileFound),
            None => {
                return Err(MakeError::MissingRule {
                    target: cli.targets[0].clone(),
                })
            }
        },
    };
    let makefile = parser::parse_makefile(&path)?;

    if cli.print {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&makefile)?);
        } else {
            pretty_print(&makefile);
        }
        return Ok(());
    }

    let mut builder = Builder::new(&makefile);
    if cli.targets.is_empty() {
        let default = makefile
            .rules
            .default_target()
            .ok_or(MakeError::NoTargets)?
            .target
            .clone();
        return builder.build(&default);
    }
    for target in &cli.targets {
        builder.build(target)?;
    }
    Ok(())
}

/// Probe the working directory for `makefile`, then `Makefile`.
fn find_makefile() -> Option<PathBuf> {
    ["makefile", "Makefile"]
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Dump the parsed database: variables as `NAME = value`, rules as
/// `(target): [dep] …` followed by quoted recipe lines, all in file order.
fn pretty_print(makefile: &Makefile) {
    println!("# variables");
    for (name, value) in makefile.vars.iter() {
        println!("{name} = {value}");
    }
    println!("\n# rules");
    for rule in makefile.rules.iter().chain(makefile.rules.phony()) {
        print!("({}):", rule.target);
        for dep in &rule.deps {
            print!(" [{dep}]");
        }
        println!();
        for line in &rule.recipe {
            println!("'{}'", line.trim_start_matches(['\t', ' ']));
        }
    }
}
