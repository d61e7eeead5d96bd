//! Error types for the style engine.

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the style engine.
///
/// Hierarchy-resolution failure (a named ancestor/descendant/sibling that
/// does not exist) is deliberately *not* an error: it reads as a
/// non-matching selector and a skipped subscription.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed style-value map shape.
    #[error("invalid style value map: {message}")]
    Validation { message: String },

    /// Invalid value for a specific property.
    #[error("invalid value for property '{property}': {message}")]
    InvalidValue { property: String, message: String },

    /// Unparseable selector token.
    #[error("invalid selector '{token}': {message}")]
    SelectorSyntax { token: String, message: String },

    /// Style attribute text that is not valid JSON.
    #[error("failed to decode style attribute: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a map-shape validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a per-property value error.
    pub fn invalid_value(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            property: property.into(),
            message: message.into(),
        }
    }

    /// Create a selector syntax error.
    pub fn selector(token: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SelectorSyntax {
            token: token.into(),
            message: message.into(),
        }
    }
}
