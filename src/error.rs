use thiserror::Error;

use crate::token::Location;

/// The error taxonomy. Every runtime or parse fault is tagged with exactly
/// one of these; the message text is built by the site that raises it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("TypeMismatch")]
    TypeMismatch,
    #[error("AssignmentError")]
    Assignment,
    #[error("PropertyError")]
    Property,
    #[error("ClassError")]
    Class,
    #[error("InstantiationError")]
    Instantiation,
    #[error("RuntimeError")]
    Runtime,
    #[error("ParserError")]
    Parser,
}

/// A single raised error: its category, message, source position (when
/// known), and the stack of active call frames at the point it was raised.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}: {message}")]
pub struct SourceError {
    pub kind: ErrorKind,
    pub message: String,
    pub location: Option<Location>,
    pub frames: Vec<String>,
}

impl SourceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        SourceError { kind, message: message.into(), location: None, frames: Vec::new() }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn push_frame(mut self, frame: impl Into<String>) -> Self {
        self.frames.push(frame.into());
        self
    }

    /// Renders the error the way the top level of the program prints it:
    /// message, source position if known, then the call stack, innermost first.
    pub fn report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}: {}", self.kind, self.message));

        if let Some(location) = self.location {
            out.push_str(&format!(" (at {location})"));
        }

        for frame in &self.frames {
            out.push_str(&format!("\n  in {frame}"));
        }

        out
    }
}

static mut HAD_ERROR: bool = false;
static mut HAD_RUNTIME_ERROR: bool = false;

/// Checks if an error occurred during scanning, parsing, or interpreting.
pub fn did_error() -> bool {
    unsafe { HAD_ERROR || HAD_RUNTIME_ERROR }
}

/// Checks if an error occurred during runtime (as opposed to scanning/parsing).
pub fn did_runtime_error() -> bool {
    unsafe { HAD_RUNTIME_ERROR }
}

/// Resets the sticky error flags. Used between REPL entries so that one
/// bad line doesn't poison the rest of the session.
pub fn reset_error() {
    unsafe {
        HAD_ERROR = false;
        HAD_RUNTIME_ERROR = false;
    }
}

/// Every reportable fault implements this; `throw` prints the message and
/// sets the appropriate sticky flag so the CLI driver knows to set a
/// non-zero exit code.
pub trait Reportable {
    fn throw(&self);
}

/// A scan- or parse-time syntax error, reported as soon as it is produced.
#[derive(Debug, Clone)]
pub struct SyntaxError {
    pub location: Location,
    pub message: String,
}

impl Reportable for SyntaxError {
    fn throw(&self) {
        eprintln!("[{line}:{column}] ParserError: {message}",
            line = self.location.line,
            column = self.location.column,
            message = self.message);

        unsafe {
            HAD_ERROR = true;
        }
    }
}

impl Reportable for SourceError {
    fn throw(&self) {
        eprintln!("{}", self.report());

        unsafe {
            HAD_RUNTIME_ERROR = true;
        }
    }
}
