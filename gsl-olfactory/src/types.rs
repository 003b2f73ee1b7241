//! Tipos de dados olfativos

use gsl_core::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Modelo de sensor MOX (curva de calibração)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SensorModel {
    Tgs2620,
    Tgs2600,
    Tgs2611,
    Tgs2610,
    Tgs2612,
}

impl SensorModel {
    /// Todos os modelos, na ordem das tabelas de calibração
    pub const ALL: [SensorModel; 5] = [
        SensorModel::Tgs2620,
        SensorModel::Tgs2600,
        SensorModel::Tgs2611,
        SensorModel::Tgs2610,
        SensorModel::Tgs2612,
    ];

    /// Índice numérico nas tabelas de calibração
    pub fn index(&self) -> usize {
        match self {
            SensorModel::Tgs2620 => 0,
            SensorModel::Tgs2600 => 1,
            SensorModel::Tgs2611 => 2,
            SensorModel::Tgs2610 => 3,
            SensorModel::Tgs2612 => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Nome comercial do modelo
    pub fn name(&self) -> &'static str {
        match self {
            SensorModel::Tgs2620 => "TGS2620",
            SensorModel::Tgs2600 => "TGS2600",
            SensorModel::Tgs2611 => "TGS2611",
            SensorModel::Tgs2610 => "TGS2610",
            SensorModel::Tgs2612 => "TGS2612",
        }
    }
}

impl fmt::Display for SensorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gás alvo (coluna da tabela de calibração)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GasType {
    Ethanol,
    Methane,
    Hydrogen,
}

impl GasType {
    pub const ALL: [GasType; 3] = [GasType::Ethanol, GasType::Methane, GasType::Hydrogen];

    pub fn index(&self) -> usize {
        match self {
            GasType::Ethanol => 0,
            GasType::Methane => 1,
            GasType::Hydrogen => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            GasType::Ethanol => "ethanol",
            GasType::Methane => "methane",
            GasType::Hydrogen => "hydrogen",
        }
    }
}

impl fmt::Display for GasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Um puff discreto da simulação de dispersão
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Filament {
    pub id: i64,
    /// Centro do puff (m)
    pub position: Point3,
    /// Raio de espalhamento gaussiano (escala em cm)
    pub sigma: f64,
}

impl Filament {
    pub fn new(id: i64, position: Point3, sigma: f64) -> Self {
        Self { id, position, sigma }
    }

    /// Raio além do qual o filamento é ignorado (m)
    #[inline]
    pub fn limit_distance(&self) -> f64 {
        self.sigma * 5.0 / 100.0
    }
}

/// Metadados escalares de uma iteração de dispersão
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationHeader {
    /// Moles do gás alvo liberados por filamento
    pub filament_moles: f64,
    /// Moles de todos os gases por cm³
    pub total_moles_all_gases: f64,
}

/// Filamentos e cabeçalho de uma iteração
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub iteration: u32,
    pub filaments: Vec<Filament>,
    pub header: IterationHeader,
}

/// Leitura do sensor MOX em um tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MoxReading {
    /// Resistência do sensor (Ω)
    pub sensor_output: f64,
    /// Concentração do gás alvo (ppm)
    pub gas_concentration: f64,
    /// Razão RS/R0 calibrada (antes do filtro transitório)
    pub rs_r0: f64,
}

/// Marcador de depuração para desenhar um filamento ativo
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilamentMarker {
    pub position: Point3,
    pub size: f64,
}

impl FilamentMarker {
    /// Escala de desenho aplicada ao sigma
    pub const SIZE_PER_SIGMA: f64 = 0.15;

    pub fn from_filament(filament: &Filament) -> Self {
        Self {
            position: filament.position,
            size: Self::SIZE_PER_SIGMA * filament.sigma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_model_index() {
        for (i, model) in SensorModel::ALL.iter().enumerate() {
            assert_eq!(model.index(), i);
            assert_eq!(SensorModel::from_index(i), Some(*model));
        }
        assert_eq!(SensorModel::from_index(5), None);
        assert_eq!(SensorModel::Tgs2611.to_string(), "TGS2611");
    }

    #[test]
    fn test_gas_type_index() {
        assert_eq!(GasType::from_index(1), Some(GasType::Methane));
        assert_eq!(GasType::Hydrogen.index(), 2);
        assert_eq!(GasType::from_index(3), None);
        assert_eq!(GasType::Ethanol.to_string(), "ethanol");
    }

    #[test]
    fn test_limit_distance() {
        let f = Filament::new(0, Point3::ORIGIN, 20.0);
        assert_eq!(f.limit_distance(), 1.0);
    }

    #[test]
    fn test_marker_size() {
        let f = Filament::new(3, Point3::new(1.0, 2.0, 3.0), 10.0);
        let m = FilamentMarker::from_filament(&f);
        assert_eq!(m.position, f.position);
        assert!((m.size - 1.5).abs() < 1e-12);
    }
}
