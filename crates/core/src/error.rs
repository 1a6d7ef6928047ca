use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single violated field constraint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Payload rejected by the validator; holds every violation found
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Validation failed with {} violation(s)", .violations.len())]
pub struct ValidationFailed {
    pub violations: Vec<Violation>,
}

impl ValidationFailed {
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.field.as_str())
    }
}
