//! Erros da camada de ambiente

use gsl_core::io::NpyError;
use gsl_core::traits::SensorError;
use std::path::PathBuf;
use thiserror::Error;

pub type EnvironmentResult<T> = Result<T, EnvironmentError>;

/// Erros do módulo de ambiente
#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("Invalid environment specification: {0}")]
    InvalidSpec(String),

    #[error("Occupancy grid shape {found:?} does not match the specification {expected:?} (z, x, y)")]
    GridShape { expected: [usize; 3], found: Vec<usize> },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse environment specification {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Occupancy grid artifact: {0}")]
    Npy(#[from] NpyError),
}

// Conversão para SensorError do core
impl From<EnvironmentError> for SensorError {
    fn from(err: EnvironmentError) -> Self {
        match err {
            EnvironmentError::InvalidSpec(msg) => SensorError::InvalidConfig(msg),
            err @ EnvironmentError::GridShape { .. } => SensorError::InvalidConfig(err.to_string()),
            err @ EnvironmentError::Io { .. } => SensorError::MissingData(err.to_string()),
            other => SensorError::ReadFailed(other.to_string()),
        }
    }
}
