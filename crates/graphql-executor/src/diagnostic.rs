//! Errors found while building a [`Schema`][crate::Schema]
//! or an [`ExecutableDocument`][crate::ExecutableDocument] from source text.

use crate::response::GraphQLError;
use crate::response::GraphQLLocation;
use std::fmt;

/// A single syntax or build error, with the location it was found at
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Diagnostic {
    pub message: String,
    pub location: Option<GraphQLLocation>,
}

/// All errors found in one source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticList {
    errors: Vec<Diagnostic>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, location: Option<GraphQLLocation>) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }

    pub fn to_graphql_error(&self) -> GraphQLError {
        GraphQLError::new(self.message.clone(), self.location)
    }
}

impl DiagnosticList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.errors.push(diagnostic)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter()
    }

    /// `Ok(value)` if no error was recorded, `Err(self)` otherwise
    pub(crate) fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for DiagnosticList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            match error.location {
                Some(GraphQLLocation { line, column }) => {
                    write!(f, "Error at {line}:{column}: {}", error.message)?
                }
                None => write!(f, "Error: {}", error.message)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for DiagnosticList {}

impl IntoIterator for DiagnosticList {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
