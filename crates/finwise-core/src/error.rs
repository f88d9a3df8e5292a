use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinwiseError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Numeric overflow in {context}")]
    Overflow { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FinwiseError {
    fn from(e: serde_json::Error) -> Self {
        FinwiseError::SerializationError(e.to_string())
    }
}
