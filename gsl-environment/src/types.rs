//! Especificação do ambiente voxelizado

use crate::error::{EnvironmentError, EnvironmentResult};
use gsl_core::Point3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Especificação geométrica do ambiente.
///
/// Acompanha a grade de ocupação como documento YAML:
///
/// ```yaml
/// env_min: [0.0, 0.0, 0.0]
/// env_max: [10.0, 10.0, 10.0]
/// num_cells: [50, 50, 50]
/// cell_size: 0.2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    /// Canto mínimo do volume (m)
    pub env_min: [f64; 3],
    /// Canto máximo do volume (m)
    pub env_max: [f64; 3],
    /// Número de células por eixo (x, y, z)
    pub num_cells: [f64; 3],
    /// Aresta de cada voxel (m)
    pub cell_size: f64,
}

impl Default for EnvironmentSpec {
    fn default() -> Self {
        Self {
            env_min: [0.0, 0.0, 0.0],
            env_max: [10.0, 10.0, 10.0],
            num_cells: [50.0, 50.0, 50.0],
            cell_size: 0.2,
        }
    }
}

impl EnvironmentSpec {
    /// Parse de um documento YAML
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Carrega e valida a especificação de um arquivo
    pub fn from_file<P: AsRef<Path>>(path: P) -> EnvironmentResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| EnvironmentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec = Self::from_yaml_str(&content).map_err(|source| EnvironmentError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        spec.validate()?;
        Ok(spec)
    }

    /// Verifica consistência da especificação
    pub fn validate(&self) -> EnvironmentResult<()> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(EnvironmentError::InvalidSpec(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }

        for axis in 0..3 {
            let (min, max) = (self.env_min[axis], self.env_max[axis]);
            if !(min.is_finite() && max.is_finite() && max > min) {
                return Err(EnvironmentError::InvalidSpec(format!(
                    "env_max must exceed env_min on axis {axis} ({min} .. {max})"
                )));
            }

            let n = self.num_cells[axis];
            if !(n >= 1.0 && n.fract() == 0.0) {
                return Err(EnvironmentError::InvalidSpec(format!(
                    "num_cells must be a positive integer on axis {axis}, got {n}"
                )));
            }
        }

        for axis in self.extent_mismatches() {
            warn!(
                axis,
                env_min = self.env_min[axis],
                env_max = self.env_max[axis],
                num_cells = self.num_cells[axis],
                cell_size = self.cell_size,
                "env_min + num_cells * cell_size disagrees with env_max; voxel lookups will be shifted"
            );
        }

        Ok(())
    }

    /// Eixos em que `env_min + num_cells * cell_size` difere de `env_max`
    /// por mais de meia célula
    pub fn extent_mismatches(&self) -> Vec<usize> {
        (0..3)
            .filter(|&axis| {
                let spanned = self.env_min[axis] + self.num_cells[axis] * self.cell_size;
                (spanned - self.env_max[axis]).abs() > 0.5 * self.cell_size
            })
            .collect()
    }

    /// Número de células por eixo `(x, y, z)`
    pub fn cells(&self) -> [usize; 3] {
        self.num_cells.map(|n| n as usize)
    }

    /// Forma esperada do array de ocupação, indexado `[z][x][y]`
    pub fn grid_shape(&self) -> [usize; 3] {
        let [nx, ny, nz] = self.cells();
        [nz, nx, ny]
    }

    /// Índice de voxel `(x, y, z)` de um ponto, sem verificação de limites
    #[inline]
    pub fn voxel_of(&self, p: &Point3) -> [i64; 3] {
        [
            ((p.x - self.env_min[0]) / self.cell_size).floor() as i64,
            ((p.y - self.env_min[1]) / self.cell_size).floor() as i64,
            ((p.z - self.env_min[2]) / self.cell_size).floor() as i64,
        ]
    }

    /// Ponto dentro da caixa `[env_min, env_max]`?
    pub fn contains(&self, p: &Point3) -> bool {
        let c = p.to_array();
        (0..3).all(|i| c[i] >= self.env_min[i] && c[i] <= self.env_max[i])
    }
}
