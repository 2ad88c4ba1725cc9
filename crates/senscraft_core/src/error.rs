use thiserror::Error;

/// Errors raised by the scenario engines.
///
/// Precondition failures are reported before any scenario is produced.
/// Non-convergence of the iterative compromise methods is not an error; it
/// is surfaced through the result types instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensitivityError {
    /// A scalar or vector argument has an invalid value
    #[error("invalid `{name}`: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    /// Lengths or shapes of related arguments disagree
    #[error("shape mismatch for `{name}`: expected {expected}, got {actual}")]
    Shape {
        name: &'static str,
        expected: String,
        actual: String,
    },

    /// An index points outside the matrix or vector it addresses
    #[error("index {index} in `{name}` is out of range for size {size}")]
    Index {
        name: &'static str,
        index: usize,
        size: usize,
    },

    /// Criteria weights do not sum to one
    #[error("criteria weights should sum to 1, got {sum}")]
    WeightsSum { sum: f64 },

    /// A scenario could not be built for the given element
    #[error("calculation error, check elements in {iteration} index: {reason}")]
    Calculation { iteration: String, reason: String },

    /// The injected evaluation method failed
    #[error("evaluation method failed: {0}")]
    Evaluation(String),

    /// Requested weight distribution is not supported
    #[error("unknown distribution `{name}`, available: {}", allowed.join(", "))]
    UnknownDistribution {
        name: String,
        allowed: &'static [&'static str],
    },

    /// Distribution parameters were rejected
    #[error("invalid parameters for {distribution} distribution: {reason}")]
    InvalidDistribution {
        distribution: &'static str,
        reason: String,
    },

    /// A parameter name could not be resolved in the binding table
    #[error("no value bound to parameter `{0}`")]
    MissingBinding(String),
}

pub type Result<T> = std::result::Result<T, SensitivityError>;

impl SensitivityError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SensitivityError::InvalidValue {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn shape(
        name: &'static str,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        SensitivityError::Shape {
            name,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub(crate) fn calculation(iteration: impl ToString, reason: impl Into<String>) -> Self {
        SensitivityError::Calculation {
            iteration: iteration.to_string(),
            reason: reason.into(),
        }
    }
}
