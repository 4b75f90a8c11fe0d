use std::fmt::{self, Display};

/// Errors produced when parsing wire names into model types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownShot(String),
    UnknownField(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownShot(name) => {
                write!(f, "unknown shot id: {name}")
            }
            ModelError::UnknownField(name) => {
                write!(f, "unknown contact field: {name}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
