//! # Prelude - Re-exportações Convenientes
//!
//! Importação única para usar o GSL-Core:
//!
//! ```
//! use gsl_core::prelude::*;
//! ```

// Geometria
pub use crate::geometry::Point3;

// Traits fundamentais
pub use crate::traits::{
    GslComponent,
    Sensor,
    SensorError,
    SensorKind,
    Seconds,
};

// Agendamento por taxa
pub use crate::rate::{RateGate, RateLimited};

// I/O
pub use crate::io::npy::{NpyArray, NpyError, NpyResult};
