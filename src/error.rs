use thiserror::Error;

/// Errors raised by a strict [`YieldCalculator`](crate::YieldCalculator).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum YieldError {
    /// The scenario selects a level the plant has no percentage for
    #[error("invalid input: plant '{plant}' has no '{level}' level for factor '{factor}'")]
    InvalidInput {
        /// Name of the plant being evaluated
        plant: String,
        /// Factor declared by both the plant and the scenario
        factor: String,
        /// Level label requested by the scenario
        level: String,
    },
}

/// Result type alias for yield calculations.
pub type Result<T> = std::result::Result<T, YieldError>;

impl YieldError {
    /// Creates a new invalid input error for a missing factor level.
    #[must_use]
    pub fn invalid_input<P, F, L>(plant: P, factor: F, level: L) -> Self
    where
        P: Into<String>,
        F: Into<String>,
        L: Into<String>,
    {
        Self::InvalidInput {
            plant: plant.into(),
            factor: factor.into(),
            level: level.into(),
        }
    }
}

/// Error returned when parsing an unknown [`MissingLevelPolicy`](crate::MissingLevelPolicy) name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid missing level policy: '{0}' (expected 'strict' or 'permissive')")]
pub struct ParsePolicyError(pub String);
