use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Where in the script an evaluation error was raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, " (line {line}, column {column})"),
            (Some(line), None) => write!(f, " (line {line})"),
            _ => Ok(()),
        }
    }
}

/// Why a script run did not produce a derived column.
///
/// None of these are fatal: the engine and the store are left exactly as
/// they were before the failed call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    #[error("output column name must not be empty")]
    EmptyOutputName,

    #[error("output column name \"{0}\" is already used by a source column")]
    NameCollision(String),

    #[error("script error{position}: {message}")]
    Evaluation {
        message: String,
        position: SourcePosition,
    },

    #[error("script must return an array, got {0}")]
    WrongResultType(String),

    #[error("script returned an empty array")]
    EmptyResult,

    #[error("element {index} of the returned array is {type_name}, expected a number")]
    NonNumericElement { index: usize, type_name: String },

    #[error("script exceeded its budget of {0} operations")]
    BudgetExceeded(u64),

    #[error("script did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("script execution was cancelled")]
    Cancelled,
}

impl ScriptError {
    pub(crate) fn evaluation(message: impl Into<String>, position: SourcePosition) -> Self {
        ScriptError::Evaluation {
            message: message.into(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_message_includes_position_hint() {
        let err = ScriptError::evaluation(
            "Variable not found: foo",
            SourcePosition {
                line: Some(2),
                column: Some(8),
            },
        );
        assert_eq!(
            err.to_string(),
            "script error (line 2, column 8): Variable not found: foo"
        );
        let bare = ScriptError::evaluation("boom", SourcePosition::default());
        assert_eq!(bare.to_string(), "script error: boom");
    }
}
