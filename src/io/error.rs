//! Error types and classification for generation, validation and export

use crate::settings::config::GenerationMode;
use std::fmt;
use std::path::PathBuf;

/// Coarse classification of failures, used by the orchestrator to report outcomes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A configuration field is out of range or a migration is impossible
    Config,
    /// A generation attempt could not produce output
    Generation,
    /// A produced tile set failed integrity validation
    Integrity,
    /// Wang borders are inconsistent and the strict border policy is active
    BorderIncompatibility,
    /// File system, codec or serialization failure
    Io,
    /// Operation requested in a state that does not allow it
    State,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Config => "config",
            Self::Generation => "generation",
            Self::Integrity => "integrity",
            Self::BorderIncompatibility => "border-incompatibility",
            Self::Io => "io",
            Self::State => "state",
        };
        f.write_str(name)
    }
}

/// Main error type for all generator operations
#[derive(Debug)]
pub enum GeneratorError {
    /// Configuration parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Settings cannot be migrated between the requested schema versions
    Migration {
        /// Schema version the settings were written with
        from: u32,
        /// Requested target schema version
        to: u32,
        /// Why the migration is impossible
        reason: String,
    },

    /// A mode needs an input the configuration does not provide
    MissingInput {
        /// Generation mode that required the input
        mode: GenerationMode,
        /// Name of the missing input
        input: &'static str,
    },

    /// A generation stage could not produce output
    Generation {
        /// Stage that failed
        stage: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Produced tile set failed integrity checks
    Integrity {
        /// Description of the violated invariant
        reason: String,
    },

    /// Wang tile borders fell below the consistency threshold under strict policy
    BorderIncompatibility {
        /// Measured border consistency ratio
        consistency: f32,
        /// Diagnostic text from the border validator
        details: String,
    },

    /// Operation is not allowed in the current orchestrator state
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// State the orchestrator was in
        state: String,
    },

    /// Failed to load a source image
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to write an image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed
    Serialization {
        /// Path of the document involved
        path: PathBuf,
        /// Underlying serde error
        source: serde_json::Error,
    },
}

impl GeneratorError {
    /// Classify the error into the orchestrator's taxonomy
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter { .. } | Self::Migration { .. } => ErrorKind::Config,
            Self::MissingInput { .. } | Self::Generation { .. } => ErrorKind::Generation,
            Self::Integrity { .. } => ErrorKind::Integrity,
            Self::BorderIncompatibility { .. } => ErrorKind::BorderIncompatibility,
            Self::InvalidState { .. } => ErrorKind::State,
            Self::ImageLoad { .. }
            | Self::ImageExport { .. }
            | Self::FileSystem { .. }
            | Self::Serialization { .. } => ErrorKind::Io,
        }
    }
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Migration { from, to, reason } => {
                write!(f, "Cannot migrate settings from v{from} to v{to}: {reason}")
            }
            Self::MissingInput { mode, input } => {
                write!(f, "Missing {input} for {} generation", mode.name())
            }
            Self::Generation { stage, reason } => {
                write!(f, "Generation failed in {stage}: {reason}")
            }
            Self::Integrity { reason } => {
                write!(f, "Tile set integrity check failed: {reason}")
            }
            Self::BorderIncompatibility {
                consistency,
                details,
            } => {
                write!(
                    f,
                    "Wang borders inconsistent (consistency {consistency:.2}): {details}"
                )
            }
            Self::InvalidState { operation, state } => {
                write!(f, "Cannot {operation} while generator is {state}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { path, source } => {
                write!(f, "JSON error for '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generator results
pub type Result<T> = std::result::Result<T, GeneratorError>;

impl From<image::ImageError> for GeneratorError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for GeneratorError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_json::Error> for GeneratorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            path: PathBuf::from("<memory>"),
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GeneratorError {
    GeneratorError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a generation stage error
pub fn generation_error(stage: &'static str, reason: &impl ToString) -> GeneratorError {
    GeneratorError::Generation {
        stage,
        reason: reason.to_string(),
    }
}

/// Create an integrity error
pub fn integrity_error(reason: &impl ToString) -> GeneratorError {
    GeneratorError::Integrity {
        reason: reason.to_string(),
    }
}
