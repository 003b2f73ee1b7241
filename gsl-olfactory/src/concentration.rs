//! # Estimador de concentração
//!
//! Superposição de puffs gaussianos 3D. Um filamento só contribui se a
//! posição consultada está a menos de `sigma * 5 / 100` metros do seu centro
//! e há linha de visada entre os dois pontos.
//!
//! ```text
//! d_cm  = 100 · |p − c|
//! mol   = (n_fil / (√(8π³) · σ³)) · exp(−d_cm² / (2σ²))
//! ppm   = mol / n_total · 10⁶
//! ```

use crate::types::{Filament, IterationHeader};
use gsl_core::Point3;
use gsl_environment::LineOfSight;
use std::f64::consts::PI;

/// Partes por milhão
const PPM: f64 = 1_000_000.0;

/// Contribuição de um filamento em ppm, sem os testes de alcance e visada
#[inline]
pub fn filament_contribution(position: &Point3, filament: &Filament, header: &IterationHeader) -> f64 {
    let distance_cm = 100.0 * position.distance(&filament.position);
    let sigma = filament.sigma;
    let moles_per_cm3 = (header.filament_moles / ((8.0 * PI.powi(3)).sqrt() * sigma.powi(3)))
        * (-distance_cm.powi(2) / (2.0 * sigma.powi(2))).exp();
    moles_per_cm3 / header.total_moles_all_gases * PPM
}

/// O filamento está dentro do raio de corte? (estrito)
#[inline]
pub fn in_range(position: &Point3, filament: &Filament) -> bool {
    position.distance_sqr(&filament.position) < filament.limit_distance().powi(2)
}

/// Concentração total em `position` (ppm)
pub fn estimate<V: LineOfSight + ?Sized>(
    position: &Point3,
    filaments: &[Filament],
    header: &IterationHeader,
    grid: &V,
) -> f64 {
    filaments
        .iter()
        .filter(|f| in_range(position, f) && grid.is_visible(position, &f.position))
        .map(|f| filament_contribution(position, f, header))
        .sum()
}
