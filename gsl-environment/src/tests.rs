//! Testes integrados do módulo gsl-environment

use crate::*;
use gsl_core::Point3;
use gsl_core::io::NpyArray;
use gsl_core::traits::SensorError;

// ═══════════════════════════════════════════════════════════════════════════════
// TESTES DE INTEGRAÇÃO - artefatos em disco
// ═══════════════════════════════════════════════════════════════════════════════

const SPEC_YAML: &str = "\
env_min: [0.0, 0.0, 0.0]
env_max: [4.0, 2.0, 1.0]
num_cells: [20, 10, 5]
cell_size: 0.2
";

/// Grade `(5, 20, 10)` com uma parede nos voxels x = 9..=11 (x ∈ [1.8, 2.4))
fn wall_grid_array() -> NpyArray {
    let (nz, nx, ny) = (5, 20, 10);
    let mut values = vec![0.0; nz * nx * ny];
    for z in 0..nz {
        for x in 9..=11 {
            for y in 0..ny {
                values[(z * nx + x) * ny + y] = 1.0;
            }
        }
    }
    NpyArray::from_values(vec![nz, nx, ny], values).unwrap()
}

#[test]
fn test_load_grid_from_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let grid_path = dir.path().join("env_grid.npy");
    let spec_path = dir.path().join("env_head.txt");
    wall_grid_array().write(&grid_path).unwrap();
    std::fs::write(&spec_path, SPEC_YAML).unwrap();

    let grid = OccupancyGrid::load(&grid_path, &spec_path).unwrap();
    assert_eq!(grid.shape(), [5, 20, 10]);
    assert_eq!(grid.occupied_count(), 150);

    let left = Point3::new(1.0, 1.0, 0.5);
    let right = Point3::new(3.0, 1.0, 0.5);
    assert!(!is_visible(&left, &right, &grid));
    assert!(is_visible(&left, &Point3::new(0.3, 0.3, 0.3), &grid));
}

#[test]
fn test_load_rejects_mismatched_grid() {
    let dir = tempfile::tempdir().unwrap();
    let grid_path = dir.path().join("env_grid.npy");
    let spec_path = dir.path().join("env_head.txt");
    NpyArray::from_values(vec![20, 10, 5], vec![0.0; 1000])
        .unwrap()
        .write(&grid_path)
        .unwrap();
    std::fs::write(&spec_path, SPEC_YAML).unwrap();

    let err = OccupancyGrid::load(&grid_path, &spec_path).unwrap_err();
    assert!(matches!(err, EnvironmentError::GridShape { .. }));
    assert!(matches!(SensorError::from(err), SensorError::InvalidConfig(_)));
}

#[test]
fn test_load_missing_grid_is_configuration_failure() {
    let dir = tempfile::tempdir().unwrap();
    let spec_path = dir.path().join("env_head.txt");
    std::fs::write(&spec_path, SPEC_YAML).unwrap();

    let err = OccupancyGrid::load(dir.path().join("missing.npy"), &spec_path).unwrap_err();
    assert!(matches!(err, EnvironmentError::Npy(_)));
}

#[test]
fn test_malformed_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let spec_path = dir.path().join("env_head.txt");
    std::fs::write(&spec_path, "env_min: [0.0, 0.0]\ncell_size: fast\n").unwrap();

    let err = EnvironmentSpec::from_file(&spec_path).unwrap_err();
    assert!(matches!(err, EnvironmentError::Yaml { .. }));
}

#[test]
fn test_symmetry_on_free_grid() {
    let grid = OccupancyGrid::open(EnvironmentSpec::default()).unwrap();
    let points = [
        Point3::new(0.1, 0.1, 0.1),
        Point3::new(9.9, 9.9, 9.9),
        Point3::new(5.0, 0.2, 7.3),
        Point3::new(2.2, 8.8, 0.4),
    ];
    for a in &points {
        for b in &points {
            assert_eq!(is_visible(a, b, &grid), is_visible(b, a, &grid));
            assert!(is_visible(a, b, &grid));
        }
    }
}
