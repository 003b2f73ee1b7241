//! # 🌍 gsl-environment - Ambiente Voxelizado
//!
//! Descreve os obstáculos do cenário simulado e responde se um filamento de
//! gás "enxerga" o sensor.
//!
//! ## Componentes
//!
//! - [`EnvironmentSpec`] - origem, limites, número de células e aresta do voxel
//! - [`OccupancyGrid`] - volume `[z][x][y]` de flags de ocupação, imutável após
//!   a carga
//! - [`is_visible`] - teste de linha de visada por amostragem de pontos
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use gsl_environment::{EnvironmentSpec, OccupancyGrid, is_visible};
//! use gsl_core::Point3;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut grid = OccupancyGrid::open(EnvironmentSpec::default())?;
//! grid.set(10, 25, 25, true);
//!
//! let sensor = Point3::new(1.0, 1.0, 2.0);
//! let filament = Point3::new(3.0, 2.0, 2.0);
//! assert!(is_visible(&sensor, &filament, &grid));
//! # Ok(())
//! # }
//! ```
//!
//! ## Módulos
//!
//! - [`types`] - Especificação do ambiente
//! - [`grid`] - Grade de ocupação
//! - [`visibility`] - Linha de visada
//! - [`error`] - Tratamento de erros

pub mod error;
pub mod grid;
pub mod types;
pub mod visibility;

// Re-exportar tipos principais
pub use error::{EnvironmentError, EnvironmentResult};
pub use grid::OccupancyGrid;
pub use types::EnvironmentSpec;
pub use visibility::{LineOfSight, is_visible, sample_count};

#[cfg(test)]
mod tests;
