//! Error Handling
//!
//! Error types for brush validation, the scene registry and the producer
//! boundary. Validation problems are recoverable at the call that introduced
//! the brush; `CompletelySolid` is the one fatal condition.

/// Reasons a brush loop is rejected before it can enter the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Line loop contains less than 3 vertices!")]
    TooFewVertices,

    #[error("Line loop contains a zero length line!")]
    ZeroLengthLine,

    #[error("Line loop contains a vertex with a non-finite coordinate!")]
    NonFiniteVertex,

    #[error("Line loop is not clockwise!")]
    WrongWinding,
}

#[derive(Debug, thiserror::Error)]
pub enum CsgError {
    #[error("Invalid brush: {0}")]
    InvalidBrush(#[from] ValidationError),

    #[error("No level is being built (call begin_level first)")]
    NoActiveLevel,

    #[error("Scene bounds: map is completely solid!")]
    CompletelySolid,

    #[error("Scene has not been merged yet")]
    NotMerged,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CsgError {
    /// Fatal errors end level generation; everything else can be retried by
    /// the producer with corrected data.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CsgError::CompletelySolid)
    }
}

pub type CsgResult<T> = Result<T, CsgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_verbatim() {
        assert_eq!(
            ValidationError::TooFewVertices.to_string(),
            "Line loop contains less than 3 vertices!"
        );
        assert_eq!(
            ValidationError::ZeroLengthLine.to_string(),
            "Line loop contains a zero length line!"
        );
        assert_eq!(ValidationError::WrongWinding.to_string(), "Line loop is not clockwise!");
        assert_eq!(
            ValidationError::NonFiniteVertex.to_string(),
            "Line loop contains a vertex with a non-finite coordinate!"
        );
    }

    #[test]
    fn test_only_solid_map_is_fatal() {
        assert!(CsgError::CompletelySolid.is_fatal());
        assert!(!CsgError::NoActiveLevel.is_fatal());
        assert!(!CsgError::from(ValidationError::ZeroLengthLine).is_fatal());
    }
}
