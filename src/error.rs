use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FactorecError>;

/// Which identifier space an out-of-range id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    User,
    Item,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdKind::User => write!(f, "user"),
            IdKind::Item => write!(f, "item"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FactorecError {
    /// The rating source could not be opened or read.
    #[error("Rating source {path:?} is unavailable: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A record in the rating source is not four whitespace-separated integers.
    #[error("Malformed rating record in {path:?} at line {line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Empty rating set where a mean is required, or unusable configuration.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("{kind} id {id} is out of range (capacity {capacity})")]
    OutOfRangeIdentifier {
        kind: IdKind,
        id: usize,
        capacity: usize,
    },
}

impl FactorecError {
    pub fn invalid_input<S: Into<String>>(reason: S) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn source_unavailable<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn out_of_range(kind: IdKind, id: usize, capacity: usize) -> Self {
        Self::OutOfRangeIdentifier { kind, id, capacity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = FactorecError::out_of_range(IdKind::Item, 1700, 1700);
        assert_eq!(err.to_string(), "item id 1700 is out of range (capacity 1700)");
    }

    #[test]
    fn test_invalid_input_message() {
        let err = FactorecError::invalid_input("empty training set");
        assert_eq!(err.to_string(), "Invalid input: empty training set");
    }
}
