// ABOUTME: Error taxonomy for the parser's batch ParseErrors and the evaluator's EvalError

use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// A single parser diagnostic. The parser accumulates these in an
/// internal list and returns them alongside the (possibly partial)
/// program; it never short-circuits on the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        ParseError {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Evaluation-time error taxonomy (§7). `Display` renders the message
/// that gets wrapped into a `Value::Error` and threaded through the
/// evaluator like an exception — there is no local recovery in the
/// core language.
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    #[error("identifier not found: {0}")]
    UndefinedSymbol(String),

    #[error("{context}: expected {expected}, got {actual}")]
    TypeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    #[error("{function}: expected {expected} argument{s}, got {actual}", s = if *expected == 1 { "" } else { "s" })]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("index out of range: {index} (len {len})")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("name already bound: {0}")]
    NameCollision(String),

    #[error("value is not callable")]
    NotCallable,

    #[error("{0}")]
    Custom(String),
}

impl EvalError {
    pub fn type_error(context: &str, expected: &str, actual: &Value) -> Self {
        EvalError::TypeMismatch {
            context: context.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
        }
    }

    pub fn arity_error(function: &str, expected: usize, actual: usize) -> Self {
        EvalError::ArityMismatch {
            function: function.to_string(),
            expected,
            actual,
        }
    }

    /// Wraps this error as the runtime `Value::Error` the evaluator
    /// threads through `eval`.
    pub fn into_value(self) -> Value {
        Value::Error(self.to_string())
    }
}

impl From<EvalError> for Value {
    fn from(err: EvalError) -> Self {
        err.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_formats_with_line() {
        let err = ParseError::new(3, "unexpected token");
        assert_eq!(err.to_string(), "line 3: unexpected token");
    }

    #[test]
    fn eval_error_becomes_error_value() {
        let value: Value = EvalError::DivisionByZero.into();
        assert!(matches!(value, Value::Error(ref msg) if msg == "division by zero"));
    }
}
