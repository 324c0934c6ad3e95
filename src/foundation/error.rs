/// Convenience result type used across the engine.
pub type TypesetResult<T> = Result<T, TypesetError>;

/// Fatal error taxonomy used by engine APIs.
///
/// Conditions that still leave a usable result (a tight fit, an overflowing
/// plan, malformed parentheses) are reported as [`Warning`] values inside the
/// successful result instead.
#[derive(thiserror::Error, Debug)]
pub enum TypesetError {
    /// Contradictory or out-of-range caller input (negative gaps, empty region, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The injected text measurement collaborator failed.
    #[error("measurement error: {0}")]
    Measure(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// A warning promoted to an error by a strict caller.
    #[error(transparent)]
    Warning(#[from] Warning),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TypesetError {
    /// Build a [`TypesetError::InvalidConfiguration`] value.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Build a [`TypesetError::Measure`] value.
    pub fn measure(msg: impl Into<String>) -> Self {
        Self::Measure(msg.into())
    }

    /// Build a [`TypesetError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Warning-level conditions surfaced alongside a usable result.
#[derive(thiserror::Error, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Unbalanced parentheses or a lead-in that runs into a line break.
    /// The offending characters were kept as plain text.
    #[error("malformed input at line {line}, column {column}: {reason}")]
    MalformedInput {
        /// Zero-based line index.
        line: usize,
        /// Zero-based character column within the line.
        column: usize,
        /// Short description.
        reason: String,
    },

    /// Fitting reached its floor without satisfying the box constraint.
    #[error("fit unattainable for block '{block}': stopped at floor {floor}")]
    FitUnattainable {
        /// Block identifier.
        block: String,
        /// Font size returned.
        floor: f64,
    },

    /// Uniform spread needs more vertical space than the region has.
    #[error("overflow: layout requires {required}px but region has {available}px")]
    Overflow {
        /// Total height consumed by blocks and gaps.
        required: f64,
        /// Region height.
        available: f64,
    },

    /// An exclusion nudge pushed the last block past the region bottom.
    #[error("exclusion overflow: block '{block}' ends {overshoot}px below the region")]
    ExclusionOverflow {
        /// Identifier of the last block.
        block: String,
        /// Distance past the region bottom.
        overshoot: f64,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
