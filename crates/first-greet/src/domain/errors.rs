//! Domain Errors
//!
//! Error types for domain operations.

use serde::Serialize;
use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid dialogue: {0}")]
    Dialogue(#[from] DialogueError),

    /// Any failure talking to the voice platform: transport, auth,
    /// remote validation or not-found are not distinguished.
    #[error("External service error: {operation} failed: {message}")]
    ExternalService {
        operation: String,
        status: Option<u16>,
        message: String,
    },
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn external<O: AsRef<str>>(operation: O, message: impl Into<String>) -> Self {
        Self::ExternalService {
            operation: operation.as_ref().to_string(),
            status: None,
            message: message.into(),
        }
    }

    pub fn external_status<O: AsRef<str>>(
        operation: O,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::ExternalService {
            operation: operation.as_ref().to_string(),
            status: Some(status),
            message: message.into(),
        }
    }
}

/// Structural problems in a dialogue document
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DialogueError {
    #[error("dialogue has no states")]
    Empty,

    #[error("state '{0}' is declared more than once")]
    DuplicateState(String),

    #[error("starting state '{0}' is not declared")]
    UnknownStartingState(String),

    #[error("edge from '{from}' points at undeclared state '{to}'")]
    DanglingEdge { from: String, to: String },

    #[error("tool '{tool}' is declared more than once in state '{state}'")]
    DuplicateTool { state: String, tool: String },

    #[error("model temperature {0} is outside 0.0..=1.0")]
    TemperatureOutOfRange(f32),
}
