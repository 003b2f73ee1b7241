//! Teste de linha de visada entre dois pontos
//!
//! Teste grosseiro por amostragem de pontos (não é um percurso exato de
//! voxels): o segmento é amostrado em `ceil(distância / cell_size) + 1`
//! pontos igualmente espaçados, incluindo as extremidades. O `+1` evita pular
//! uma célula quando a distância cai exatamente num múltiplo da aresta.

use crate::grid::OccupancyGrid;
use gsl_core::Point3;

/// Número de amostras usadas para o segmento `from → to`
#[inline]
pub fn sample_count(from: &Point3, to: &Point3, cell_size: f64) -> usize {
    (from.distance(to) / cell_size).ceil() as usize + 1
}

/// `true` se todas as amostras do segmento caem em espaço livre
pub fn is_visible(from: &Point3, to: &Point3, grid: &OccupancyGrid) -> bool {
    let samples = sample_count(from, to, grid.cell_size());
    from.linspace(to, samples).all(|p| !grid.blocks(&p))
}

/// Consulta de visibilidade usada pelo estimador de concentração
pub trait LineOfSight {
    fn is_visible(&self, from: &Point3, to: &Point3) -> bool;
}

impl LineOfSight for OccupancyGrid {
    #[inline]
    fn is_visible(&self, from: &Point3, to: &Point3) -> bool {
        is_visible(from, to, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EnvironmentSpec;

    fn grid() -> OccupancyGrid {
        OccupancyGrid::open(EnvironmentSpec {
            env_min: [0.0, 0.0, 0.0],
            env_max: [2.0, 2.0, 1.0],
            num_cells: [20.0, 20.0, 10.0],
            cell_size: 0.1,
        })
        .unwrap()
    }

    #[test]
    fn test_sample_count_formula() {
        let a = Point3::new(0.0, 0.0, 0.0);
        assert_eq!(sample_count(&a, &a, 0.1), 1);
        assert_eq!(sample_count(&a, &Point3::new(0.5, 0.0, 0.0), 0.2), 4);
        assert_eq!(sample_count(&a, &Point3::new(0.4, 0.0, 0.0), 0.2), 3);
    }

    #[test]
    fn test_free_grid_is_visible_both_ways() {
        let grid = grid();
        let a = Point3::new(0.15, 0.15, 0.15);
        let b = Point3::new(1.85, 1.45, 0.85);
        assert!(is_visible(&a, &b, &grid));
        assert_eq!(is_visible(&a, &b, &grid), is_visible(&b, &a, &grid));
        assert!(grid.is_visible(&a, &a));
    }

    #[test]
    fn test_wall_blocks_line_of_sight() {
        let mut grid = grid();
        // parede em x ∈ [0.9, 1.2), toda a seção y/z
        for z in 0..10 {
            for x in 9..=11 {
                for y in 0..20 {
                    grid.set(z, x, y, true);
                }
            }
        }
        let a = Point3::new(0.5, 1.0, 0.5);
        let b = Point3::new(1.5, 1.0, 0.5);
        assert!(!is_visible(&a, &b, &grid));
        assert!(!is_visible(&b, &a, &grid));

        let c = Point3::new(0.2, 0.2, 0.5);
        assert!(is_visible(&a, &c, &grid));
    }

    #[test]
    fn test_occupied_endpoint_is_not_visible() {
        let mut grid = grid();
        grid.set(5, 5, 5, true);
        let inside = Point3::new(0.55, 0.55, 0.55);
        assert!(!is_visible(&inside, &inside, &grid));
        assert!(!is_visible(&Point3::new(1.5, 1.5, 0.5), &inside, &grid));
    }

    #[test]
    fn test_leaving_the_volume_blocks() {
        let grid = grid();
        let a = Point3::new(1.0, 1.0, 0.5);
        let b = Point3::new(1.0, 1.0, 1.5);
        assert!(!is_visible(&a, &b, &grid));
    }
}
