use clap::{Args, Parser, builder::PossibleValuesParser};
use std::path::PathBuf;

use runtests_core::BackendRegistry;

fn interpreter_names() -> Vec<&'static str> {
    BackendRegistry::builtin().names()
}

/// Run JavaScript test cases against an external interpreter
#[derive(Parser, Debug)]
#[command(name = "runtests")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    /// Test files to run
    #[arg(required_unless_present = "list_interpreters")]
    pub files: Vec<PathBuf>,

    /// Interpreter to run the tests with (default: jsref)
    #[arg(long, ignore_case = true, value_parser = PossibleValuesParser::new(interpreter_names()))]
    pub interp: Option<String>,

    /// Path to the interpreter executable
    #[arg(long = "interp_path", visible_alias = "interp-path")]
    pub interp_path: Option<PathBuf>,

    /// Interpreter version to report instead of asking the interpreter
    #[arg(long = "interp_version", visible_alias = "interp-version")]
    pub interp_version: Option<String>,

    /// Timeout in seconds; 0 or less disables the timeout
    #[arg(long, allow_negative_numbers = true)]
    pub timeout: Option<i64>,

    /// Config file (default: nearest .runtests.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// List the available interpreters and exit
    #[arg(long)]
    pub list_interpreters: bool,

    /// Print the interpreter command lines without executing them
    #[arg(short, long)]
    pub dry_run: bool,

    /// Print one JSON result per line
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging and show output of tests that did not pass
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub jsref: JsRefArgs,

    #[command(flatten)]
    pub jsil: JsilArgs,

    #[command(flatten)]
    pub prelude: PreludeArgs,
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "JSRef Interpreter Options")]
pub struct JsRefArgs {
    /// Use the JSON parser (Esprima) when running tests
    #[arg(long)]
    pub jsonparser: bool,

    /// Run JSRef with the -no-parasite flag
    #[arg(long = "no_parasite", visible_alias = "no-parasite")]
    pub no_parasite: bool,

    /// Parser jar to pass to -jsparser
    #[arg(long)]
    pub parser: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "JSIL Interpreter Options")]
pub struct JsilArgs {
    /// Collect execution statistics
    #[arg(long)]
    pub stats: bool,

    /// Simplify the generated JSIL
    #[arg(long)]
    pub simp: bool,
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Prelude Options (jsref, mljsref, jsil)")]
pub struct PreludeArgs {
    /// Test prelude to load before every test
    #[arg(long = "test_prelude", visible_alias = "test-prelude")]
    pub test_prelude: Option<PathBuf>,

    /// Directory the built-in prelude and parser paths are relative to
    #[arg(long = "support_root", visible_alias = "support-root")]
    pub support_root: Option<PathBuf>,
}
