use std::fmt;

/// Result type for qtrain operations
pub type Result<T> = std::result::Result<T, QtrainError>;

/// Main error type for the qtrain library
#[derive(Debug, Clone)]
pub enum QtrainError {
    /// Hyperparameter missing or outside its valid domain.
    /// Fatal: surfaced at construction, before any training happens.
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Sampling requested before the buffer holds enough transitions.
    /// Recoverable: `learn()` treats this as a no-op.
    InsufficientData {
        requested: usize,
        available: usize,
    },

    /// Action index outside `[0, action_dim)`
    InvalidAction {
        action: usize,
        action_dim: usize,
    },

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),

    /// Numerical computation errors
    NumericalError(String),
}

impl fmt::Display for QtrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QtrainError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            QtrainError::InsufficientData { requested, available } => {
                write!(
                    f,
                    "Insufficient data: requested batch of {}, buffer holds {}",
                    requested, available
                )
            }
            QtrainError::InvalidAction { action, action_dim } => {
                write!(f, "Invalid action {}: must be less than {}", action, action_dim)
            }
            QtrainError::IoError(msg) => write!(f, "IO error: {}", msg),
            QtrainError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            QtrainError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for QtrainError {}

impl From<std::io::Error> for QtrainError {
    fn from(err: std::io::Error) -> Self {
        QtrainError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for QtrainError {
    fn from(err: bincode::Error) -> Self {
        QtrainError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for QtrainError {
    fn from(err: serde_json::Error) -> Self {
        QtrainError::SerializationError(err.to_string())
    }
}

impl QtrainError {
    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        QtrainError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
