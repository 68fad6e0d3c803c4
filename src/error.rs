// Error types for the two stores. The UI layer turns these into one-line
// messages for the operator; none of them ends the menu loop.

use std::path::PathBuf;

use thiserror::Error;

/// Input rejected before any file is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },
    #[error("{field} is too long (at most {max} characters)")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} cannot contain spaces")]
    ContainsWhitespace { field: &'static str },
    #[error("weak password: use at least 6 characters and include a digit")]
    WeakPassword,
}

/// Failure reading or writing a record file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed record in '{}' at line {line}", path.display())]
    Malformed { path: PathBuf, line: usize },
    #[error("cannot encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("username '{0}' already exists, choose another")]
    DuplicateUsername(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ChangePasswordError {
    #[error("username or password incorrect")]
    NotFound,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
