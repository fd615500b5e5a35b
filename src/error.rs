// ABOUTME: Error types for the reader, evaluator, and storage layer

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LispError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("{0} is unbound")]
    UnboundVariable(String),

    #[error("{0} is not a function")]
    NotAFunction(String),

    #[error("{function}: bad argument: {message}")]
    BadArgument { function: String, message: String },

    #[error("{function}: expected {expected} argument{}, got {actual}", if *expected == 1 { "" } else { "s" })]
    Arity {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("{0} table is full")]
    Capacity(&'static str),

    #[error("out of space")]
    OutOfSpace,

    #[error("io error: {0}")]
    Io(String),

    /// Not part of the §7 taxonomy: the `!TRACE`/`!NOTRACE` directives unwind
    /// to the REPL through the same mechanism as a real error, but print
    /// nothing. Kept as a `LispError` variant so every unwind path shares one
    /// `Result<Value, LispError>` propagation type.
    #[error("")]
    TraceToggle,
}

impl LispError {
    pub fn bad_argument(function: &str, message: impl Into<String>) -> Self {
        LispError::BadArgument {
            function: function.to_string(),
            message: message.into(),
        }
    }

    pub fn arity(function: &str, expected: usize, actual: usize) -> Self {
        LispError::Arity {
            function: function.to_string(),
            expected,
            actual,
        }
    }

    /// The `::<msg>` text the top-level REPL prints on an unwound error.
    pub fn message(&self) -> String {
        format!("{self}")
    }

    pub fn is_silent(&self) -> bool {
        matches!(self, LispError::TraceToggle)
    }
}

impl From<std::io::Error> for LispError {
    fn from(err: std::io::Error) -> Self {
        LispError::Io(err.to_string())
    }
}
