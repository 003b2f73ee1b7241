//! # 👃 gsl-olfactory - Sensor MOX Simulado
//!
//! Simula a resposta elétrica de um sensor de óxido metálico (MOX) montado em
//! um agente que percorre um campo de dispersão de gás pré-computado.
//!
//! ## Pipeline por tick
//!
//! | Etapa | Módulo | Quando |
//! |:------|:-------|:-------|
//! | Avanço `(filament_iter, update_iter)` | [`scheduler`] | todo tick |
//! | Carga de filamentos e cabeçalho | [`snapshot`] | `update_iter == 0` |
//! | Superposição de puffs gaussianos | [`concentration`] | `update_iter == 0` |
//! | Curva log-log + filtro transitório | [`response`] | todo tick |
//!
//! ## Exemplo
//!
//! ```rust
//! use gsl_olfactory::prelude::*;
//! use gsl_environment::{EnvironmentSpec, OccupancyGrid};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let header = IterationHeader { filament_moles: 8.3e-10, total_moles_all_gases: 4.09e-5 };
//! let source = MemorySource::new()
//!     .with_snapshot(Snapshot { iteration: 0, filaments: vec![], header })
//!     .with_snapshot(Snapshot {
//!         iteration: 1,
//!         filaments: vec![Filament::new(0, Point3::new(5.0, 5.0, 2.0), 20.0)],
//!         header,
//!     });
//!
//! let grid = Arc::new(OccupancyGrid::open(EnvironmentSpec::default())?);
//! let mut sensor = MoxSensor::new(MoxConfig::default(), Box::new(source), grid)?;
//!
//! let first = sensor.sense(Point3::new(5.0, 5.0, 2.0), 0.25)?;
//! assert_eq!(first.rs_r0, 21.0);
//!
//! let second = sensor.sense(Point3::new(5.0, 5.0, 2.0), 0.25)?;
//! assert!(second.gas_concentration > 0.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Módulos
//!
//! - [`types`] - Filamentos, cabeçalhos, leituras
//! - [`calibration`] - Tabelas de calibração por modelo e gás
//! - [`config`] - Configuração do sensor
//! - [`snapshot`] - Fontes de snapshots (diretório, memória)
//! - [`scheduler`] - Escalonador de iterações
//! - [`concentration`] - Estimador de concentração
//! - [`response`] - Modelo de resposta MOX
//! - [`mox`] - Fachada do sensor
//! - [`error`] - Tratamento de erros

pub mod calibration;
pub mod concentration;
pub mod config;
pub mod error;
pub mod mox;
pub mod response;
pub mod scheduler;
pub mod snapshot;
pub mod types;

pub use calibration::{CalibrationTables, LineLogLog, ModelCalibration, MoxCalibration};
pub use config::MoxConfig;
pub use error::{OlfactoryError, OlfactoryResult};
pub use mox::MoxSensor;
pub use response::MoxResponse;
pub use scheduler::{IterationScheduler, Tick};
pub use snapshot::{DirectorySource, MemorySource, SnapshotSource};
pub use types::{Filament, FilamentMarker, GasType, IterationHeader, MoxReading, SensorModel, Snapshot};

/// Tipos mais usados, para `use gsl_olfactory::prelude::*`
pub mod prelude {
    pub use crate::{
        CalibrationTables, DirectorySource, Filament, FilamentMarker, GasType, IterationHeader, MemorySource,
        MoxConfig, MoxReading, MoxSensor, OlfactoryError, OlfactoryResult, SensorModel, Snapshot, SnapshotSource,
    };
    pub use gsl_core::prelude::*;
}
