//! Error types for the ShapeLearn core.

/// A specialized `Result` type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the core data model.
///
/// Every generator is total over its validated input domain, so the only
/// failure left is a catalog miss.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The catalog has no descriptor for the requested number.
    #[error("Shape not defined for number {number}")]
    ShapeNotFound {
        /// The number that was looked up.
        number: i64,
    },
}

impl CoreError {
    /// Creates a new `ShapeNotFound` error.
    #[must_use]
    pub const fn shape_not_found(number: i64) -> Self {
        Self::ShapeNotFound { number }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_not_found_display() {
        let err = CoreError::shape_not_found(42);
        assert_eq!(err.to_string(), "Shape not defined for number 42");
    }
}
