#![allow(clippy::needless_return)]

//! kiln is a dynamically typed, expression-oriented programming language
//! with first-class functions, lexical closures, and single-inheritance
//! classes with operator overloading via dunder methods. It is a
//! tree-walk interpreter with a hand-written Pratt expression parser.
//!
//! ## Scanning
//! The first step in the interpreter is scanning: converting a string of
//! characters into a list of tokens. The scanner is implemented in the
//! [`scanner`](scanner) module as a state machine over a two-token-lookahead
//! character iterator. Scan errors (an unterminated string, an unknown
//! character) are reported as soon as they are encountered via
//! [`SyntaxError`](error::SyntaxError); the scanner keeps going afterward so
//! later mistakes surface in the same pass.
//!
//! ## Parsing
//! The second step converts the token list into an abstract syntax tree. The
//! parser is implemented in the [`parser`](parser) module as a Pratt
//! expression parser driving a statement dispatcher. [`Expressions`](expr::Expr)
//! are pieces of code that produce a [`Value`](object::Value);
//! [`Statements`](stmt::Stmt) perform an action (a binding, a loop, a class
//! declaration) without being values themselves. Parser errors are also
//! [`SyntaxError`](error::SyntaxError)s, reported through the same
//! synchronize-and-continue strategy so a script with several mistakes
//! reports more than just the first.
//!
//! ## Interpreting
//! The final step evaluates the AST. The interpreter is implemented in the
//! [`interpreter`](interpreter) module as a tree-walk evaluator over an
//! [`Environment`](environment::Environment) chain. Built-in functions are
//! registered once, at interpreter construction, from the
//! [`builtins`](builtins) module. Runtime faults are reported as
//! [`SourceError`](error::SourceError) values wrapped in [`Value::Error`](object::Value::Error) —
//! there is no host-level panic path for an ordinary scripting mistake.
//!
//! If a script has no parse errors, evaluation always runs; a runtime fault
//! simply becomes the program's result rather than aborting the process.

use std::fs;
use std::process;

use log::debug;

pub mod ast;
pub mod builtins;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod flow;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::Reportable;
use interpreter::Interpreter;
use object::Value;
use parser::Parser;
use scanner::Scanner;
use stmt::Program;

/// Scans and parses `source`, returning the AST if both stages completed
/// without error. On failure, the scanner/parser have already reported
/// their own diagnostics via [`Reportable::throw`] and the sticky error
/// flags are left set for the caller to inspect with [`error::did_error`].
pub fn parse_source(source: &str) -> Option<Program> {
    let mut scanner = Scanner::new(source);
    let tokens = scanner.scan_tokens();
    debug!("scanned {} tokens", tokens.len());

    if error::did_error() {
        return None;
    }

    let mut parser = Parser::new(tokens);
    let program = parser.parse();

    if error::did_error() {
        return None;
    }

    Some(program)
}

/// Runs a complete program against a fresh interpreter and returns its
/// result value. This is the library's primary embedding surface: callers
/// that want structured `Value`s rather than a process exit code should use
/// this directly instead of going through [`Kiln`].
pub fn run_source(source: &str) -> Value {
    let mut interpreter = Interpreter::new();
    run_with(&mut interpreter, source)
}

/// Same as [`run_source`] but reuses an existing interpreter, so bindings
/// defined by one call are visible to the next — the shape a REPL needs.
pub fn run_with(interpreter: &mut Interpreter, source: &str) -> Value {
    match parse_source(source) {
        Some(program) => interpreter.interpret(&program),
        None => Value::Null,
    }
}

/// Owns a long-lived interpreter across multiple runs, for the CLI driver
/// and REPL. Each call to `run_file` is a fresh process invocation's worth
/// of state, but `run_prompt` (see `main.rs`) reuses one `Kiln` across every
/// line so `let`/`const`/`class` bindings persist between prompts.
pub struct Kiln {
    interpreter: Interpreter,
}

impl Kiln {
    pub fn new() -> Self {
        Kiln { interpreter: Interpreter::new() }
    }

    /// Reads and runs a script file, exiting the process with the
    /// traditional sysexits codes (64 usage, 65 data/parse error, 70
    /// runtime error) on failure, matching the convention of the evaluator
    /// this one was built from.
    pub fn run_file(&mut self, path: &str) {
        let contents = fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("kiln: cannot read '{path}': {e}");
            process::exit(64);
        });

        let result = run_with(&mut self.interpreter, &contents);

        if error::did_error() {
            process::exit(if error::did_runtime_error() { 70 } else { 65 });
        }

        if let Value::Error(source_error) = result {
            source_error.throw();
            process::exit(70);
        }
    }

    /// Runs one REPL line of input, printing the result unless it is
    /// `Null` (a bare statement has nothing interesting to show). Resets
    /// the sticky error flags afterward so one bad line doesn't poison the
    /// rest of the session.
    pub fn run_line(&mut self, source: &str) {
        let result = run_with(&mut self.interpreter, source);

        match &result {
            Value::Null => {}
            Value::Error(source_error) => source_error.throw(),
            other => println!("{}", other.inspect()),
        }

        error::reset_error();
    }
}

impl Default for Kiln {
    fn default() -> Self {
        Self::new()
    }
}
