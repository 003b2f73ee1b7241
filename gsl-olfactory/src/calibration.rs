//! # Tabelas de calibração MOX
//!
//! Constantes por modelo de sensor e por gás, extraídas de datasheets e
//! ajuste de curvas:
//!
//! - `sensitivity_air` - RS/R0 em ar limpo (linha de base)
//! - `lineloglog` - coeficientes `(A, B)` de `RS/R0 = A · concentração^B`
//! - `tau` - constantes de tempo `(subida, descida)` em segundos
//! - `R0` - resistência base em Ω
//!
//! A tabela é global ao processo e imutável: pode ser instalada uma única vez
//! no início ([`CalibrationTables::install`]); a primeira leitura via
//! [`CalibrationTables::global`] congela a tabela embutida se nada foi
//! instalado.

use crate::error::{OlfactoryError, OlfactoryResult};
use crate::types::{GasType, SensorModel};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

static GLOBAL_TABLES: OnceCell<CalibrationTables> = OnceCell::new();

/// Coeficientes de uma reta no espaço log-log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineLogLog {
    pub a: f64,
    pub b: f64,
}

/// Calibração completa de um modelo de sensor
#[derive(Debug, Clone, PartialEq)]
pub struct ModelCalibration {
    pub sensitivity_air: f64,
    pub r0: f64,
    pub tau_rise: f64,
    pub tau_decay: f64,
    pub lineloglog: BTreeMap<GasType, LineLogLog>,
}

/// Constantes resolvidas para um par `(modelo, gás)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoxCalibration {
    pub model: SensorModel,
    pub gas: GasType,
    pub sensitivity_air: f64,
    pub a: f64,
    pub b: f64,
    pub tau_rise: f64,
    pub tau_decay: f64,
    pub r0: f64,
}

/// Tabelas de calibração de todos os modelos conhecidos
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationTables {
    models: BTreeMap<SensorModel, ModelCalibration>,
}

impl CalibrationTables {
    /// Tabela embutida: TGS2620, TGS2600, TGS2611, TGS2610, TGS2612 ×
    /// etanol, metano, hidrogênio
    pub fn builtin() -> Self {
        const SENSITIVITY_AIR: [f64; 5] = [21.0, 1.0, 8.8, 10.3, 19.5];
        const R0: [f64; 5] = [3000.0, 50000.0, 3740.0, 3740.0, 4500.0];
        const TAU: [(f64, f64); 5] = [(2.96, 15.71), (4.8, 18.75), (3.44, 6.35), (3.44, 6.35), (3.44, 6.35)];
        const LINELOGLOG: [[(f64, f64); 3]; 5] = [
            [(62.32, -0.7155), (120.6, -0.4877), (24.45, -0.5546)],
            [(0.6796, -0.3196), (1.018, -0.07284), (0.6821, -0.3532)],
            [(51.11, -0.3658), (38.46, -0.4289), (41.3, -0.3614)],
            [(106.1, -0.5008), (63.91, -0.5372), (66.78, -0.5175)],
            [(31.35, -0.09115), (146.2, -0.5916), (19.5, 0.0)],
        ];

        let models = SensorModel::ALL
            .iter()
            .map(|model| {
                let m = model.index();
                let lineloglog = GasType::ALL
                    .iter()
                    .map(|gas| {
                        let (a, b) = LINELOGLOG[m][gas.index()];
                        (*gas, LineLogLog { a, b })
                    })
                    .collect();
                let calibration = ModelCalibration {
                    sensitivity_air: SENSITIVITY_AIR[m],
                    r0: R0[m],
                    tau_rise: TAU[m].0,
                    tau_decay: TAU[m].1,
                    lineloglog,
                };
                (*model, calibration)
            })
            .collect();

        Self { models }
    }

    /// Tabela vazia, para montagem manual
    pub fn empty() -> Self {
        Self { models: BTreeMap::new() }
    }

    /// Insere ou substitui a calibração de um modelo
    pub fn with_model(mut self, model: SensorModel, calibration: ModelCalibration) -> Self {
        self.models.insert(model, calibration);
        self
    }

    pub fn model(&self, model: SensorModel) -> Option<&ModelCalibration> {
        self.models.get(&model)
    }

    /// Resolve as constantes de um par `(modelo, gás)`
    pub fn lookup(&self, model: SensorModel, gas: GasType) -> OlfactoryResult<MoxCalibration> {
        let not_found = || OlfactoryError::CalibrationNotFound { model, gas };
        let entry = self.models.get(&model).ok_or_else(not_found)?;
        let curve = entry.lineloglog.get(&gas).ok_or_else(not_found)?;

        Ok(MoxCalibration {
            model,
            gas,
            sensitivity_air: entry.sensitivity_air,
            a: curve.a,
            b: curve.b,
            tau_rise: entry.tau_rise,
            tau_decay: entry.tau_decay,
            r0: entry.r0,
        })
    }

    /// Parse de tabelas em TOML.
    ///
    /// ```toml
    /// [TGS2620]
    /// sensitivity_air = 21.0
    /// r0 = 3000.0
    /// tau_rise = 2.96
    /// tau_decay = 15.71
    ///
    /// [TGS2620.lineloglog]
    /// ethanol = { a = 62.32, b = -0.7155 }
    /// ```
    pub fn from_toml_str(content: &str) -> OlfactoryResult<Self> {
        let raw: BTreeMap<String, RawModel> = toml::from_str(content)
            .map_err(|e| OlfactoryError::InvalidConfig(format!("Failed to parse calibration tables: {e}")))?;

        let mut models = BTreeMap::new();
        for (model_name, raw_model) in raw {
            let model = SensorModel::from_str(&model_name)?;
            let mut lineloglog = BTreeMap::new();
            for (gas_name, curve) in raw_model.lineloglog {
                lineloglog.insert(GasType::from_str(&gas_name)?, curve);
            }
            let calibration = ModelCalibration {
                sensitivity_air: raw_model.sensitivity_air,
                r0: raw_model.r0,
                tau_rise: raw_model.tau_rise,
                tau_decay: raw_model.tau_decay,
                lineloglog,
            };
            calibration.validate(model)?;
            models.insert(model, calibration);
        }

        Ok(Self { models })
    }

    /// Carrega tabelas de um arquivo TOML
    pub fn from_file<P: AsRef<Path>>(path: P) -> OlfactoryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| OlfactoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Instala a tabela global do processo. Falha se já houver uma.
    pub fn install(tables: CalibrationTables) -> OlfactoryResult<&'static CalibrationTables> {
        GLOBAL_TABLES
            .set(tables)
            .map_err(|_| OlfactoryError::InvalidConfig("Calibration tables are already initialized".into()))?;
        Ok(Self::global())
    }

    /// Tabela global do processo (a embutida, se nenhuma foi instalada)
    pub fn global() -> &'static CalibrationTables {
        GLOBAL_TABLES.get_or_init(CalibrationTables::builtin)
    }
}

impl ModelCalibration {
    fn validate(&self, model: SensorModel) -> OlfactoryResult<()> {
        let positive = [
            ("sensitivity_air", self.sensitivity_air),
            ("r0", self.r0),
            ("tau_rise", self.tau_rise),
            ("tau_decay", self.tau_decay),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(OlfactoryError::InvalidConfig(format!(
                    "{model}: {name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawModel {
    sensitivity_air: f64,
    r0: f64,
    tau_rise: f64,
    tau_decay: f64,
    #[serde(default)]
    lineloglog: BTreeMap<String, LineLogLog>,
}

impl FromStr for SensorModel {
    type Err = OlfactoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SensorModel::ALL
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| OlfactoryError::InvalidConfig(format!("Unknown sensor model '{s}'")))
    }
}

impl FromStr for GasType {
    type Err = OlfactoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GasType::ALL
            .iter()
            .find(|g| g.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| OlfactoryError::InvalidConfig(format!("Unknown gas type '{s}'")))
    }
}
