//! Grade de ocupação 3D
//!
//! Volume fixo de flags de ocupação indexado `[z][x][y]`, carregado uma vez na
//! construção do sensor e compartilhado somente leitura (via `Arc`) por todas
//! as consultas de visibilidade.

use crate::error::{EnvironmentError, EnvironmentResult};
use crate::types::EnvironmentSpec;
use gsl_core::Point3;
use gsl_core::io::NpyArray;
use std::path::Path;
use tracing::info;

/// Grade de ocupação voxelizada
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    spec: EnvironmentSpec,
    /// Dimensões `(nz, nx, ny)`
    shape: [usize; 3],
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Grade totalmente livre para a especificação dada
    pub fn open(spec: EnvironmentSpec) -> EnvironmentResult<Self> {
        spec.validate()?;
        let shape = spec.grid_shape();
        let cells = vec![false; shape.iter().product()];
        Ok(Self { spec, shape, cells })
    }

    /// Constrói a grade a partir de um array `(nz, nx, ny)`; todo valor não
    /// nulo é ocupado
    pub fn from_npy(array: &NpyArray, spec: EnvironmentSpec) -> EnvironmentResult<Self> {
        spec.validate()?;
        let expected = spec.grid_shape();
        if array.shape() != expected {
            return Err(EnvironmentError::GridShape {
                expected,
                found: array.shape().to_vec(),
            });
        }
        let cells = array.values()?.iter().map(|v| *v != 0.0).collect();
        Ok(Self {
            spec,
            shape: expected,
            cells,
        })
    }

    /// Carrega o array `.npy` da grade e o documento YAML de especificação
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(grid_path: P, spec_path: Q) -> EnvironmentResult<Self> {
        let spec = EnvironmentSpec::from_file(spec_path)?;
        let array = NpyArray::open(grid_path.as_ref())?;
        let grid = Self::from_npy(&array, spec)?;

        info!(
            path = %grid_path.as_ref().display(),
            shape = ?grid.shape,
            occupied = grid.occupied_count(),
            "Loaded occupancy grid"
        );
        Ok(grid)
    }

    pub fn spec(&self) -> &EnvironmentSpec {
        &self.spec
    }

    /// Dimensões `(nz, nx, ny)`
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn cell_size(&self) -> f64 {
        self.spec.cell_size
    }

    #[inline]
    fn offset(&self, z: usize, x: usize, y: usize) -> Option<usize> {
        let [nz, nx, ny] = self.shape;
        (z < nz && x < nx && y < ny).then(|| (z * nx + x) * ny + y)
    }

    /// Voxel `[z][x][y]` ocupado? Fora da grade retorna `None`.
    #[inline]
    pub fn get(&self, z: usize, x: usize, y: usize) -> Option<bool> {
        self.offset(z, x, y).map(|i| self.cells[i])
    }

    /// Marca um voxel; retorna `false` se estiver fora da grade
    pub fn set(&mut self, z: usize, x: usize, y: usize, occupied: bool) -> bool {
        match self.offset(z, x, y) {
            Some(i) => {
                self.cells[i] = occupied;
                true
            }
            None => false,
        }
    }

    /// O voxel que contém o ponto bloqueia a passagem?
    ///
    /// Pontos fora do volume mapeado são tratados como bloqueados.
    #[inline]
    pub fn blocks(&self, p: &Point3) -> bool {
        let [x, y, z] = self.spec.voxel_of(p);
        if x < 0 || y < 0 || z < 0 {
            return true;
        }
        self.get(z as usize, x as usize, y as usize).unwrap_or(true)
    }

    /// Número de voxels ocupados
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Exporta como array `.npy` `(nz, nx, ny)` com 0.0 / 1.0
    pub fn to_npy(&self) -> EnvironmentResult<NpyArray> {
        let values = self.cells.iter().map(|c| if *c { 1.0 } else { 0.0 }).collect();
        Ok(NpyArray::from_values(self.shape.to_vec(), values)?)
    }
}
