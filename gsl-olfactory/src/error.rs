//! Erros específicos do módulo olfativo

use crate::types::{GasType, SensorModel};
use gsl_core::io::NpyError;
use gsl_core::traits::SensorError;
use gsl_environment::EnvironmentError;
use std::path::PathBuf;
use thiserror::Error;

pub type OlfactoryResult<T> = Result<T, OlfactoryError>;

#[derive(Debug, Error)]
pub enum OlfactoryError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No calibration entry for sensor model {model} and gas {gas}")]
    CalibrationNotFound { model: SensorModel, gas: GasType },

    #[error("Missing gas data for iteration {iteration}: {path}")]
    MissingSnapshot { iteration: u32, path: PathBuf },

    #[error("Malformed gas data for iteration {iteration}: {reason}")]
    SnapshotFormat { iteration: u32, reason: String },

    #[error("Gas data directory unavailable: {path}: {source}")]
    SnapshotDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No gas data iterations found in {0}")]
    NoSnapshots(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Gas data artifact: {0}")]
    Npy(#[from] NpyError),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}

// Conversão para SensorError do core
impl From<OlfactoryError> for SensorError {
    fn from(err: OlfactoryError) -> Self {
        match err {
            OlfactoryError::InvalidConfig(msg) => SensorError::InvalidConfig(msg),
            err @ OlfactoryError::CalibrationNotFound { .. } => SensorError::InvalidConfig(err.to_string()),
            err @ (OlfactoryError::MissingSnapshot { .. }
            | OlfactoryError::SnapshotDirectory { .. }
            | OlfactoryError::NoSnapshots(_)) => SensorError::MissingData(err.to_string()),
            OlfactoryError::Environment(env) => env.into(),
            other => SensorError::ReadFailed(other.to_string()),
        }
    }
}
