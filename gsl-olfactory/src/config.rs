//! Configuração do sensor MOX
//!
//! Lida de TOML. Todos os campos têm valor padrão, de modo que um documento
//! vazio produz um sensor TGS2620 para etanol a 4 Hz com snapshots a cada
//! 0.5 s.

use crate::error::{OlfactoryError, OlfactoryResult};
use crate::types::{GasType, SensorModel};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Opções reconhecidas pelo sensor MOX
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoxConfig {
    /// Curva de calibração
    pub sensor_model: SensorModel,
    /// Coluna de gás na tabela de calibração
    pub gas_type: GasType,
    /// Taxa de amostragem (Hz)
    pub update_rate: f64,
    /// Intervalo entre snapshots de dispersão (s)
    pub gas_data_time_step: f64,
    pub gas_data_start_iter: u32,
    /// Última iteração, inclusiva (0 = detectar no diretório)
    pub gas_data_stop_iter: u32,
    /// Registrar marcadores de depuração dos filamentos
    pub draw: bool,
}

impl Default for MoxConfig {
    fn default() -> Self {
        Self {
            sensor_model: SensorModel::Tgs2620,
            gas_type: GasType::Ethanol,
            update_rate: 4.0,
            gas_data_time_step: 0.5,
            gas_data_start_iter: 0,
            gas_data_stop_iter: 0,
            draw: false,
        }
    }
}

impl MoxConfig {
    /// Parse de uma configuração em TOML
    pub fn from_str(content: &str) -> OlfactoryResult<Self> {
        toml::from_str(content)
            .map_err(|e| OlfactoryError::InvalidConfig(format!("Failed to parse MOX configuration: {}", e)))
    }

    /// Carrega a configuração de um arquivo
    pub fn from_file(path: &Path) -> OlfactoryResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| OlfactoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Serializa para TOML
    pub fn to_toml_string(&self) -> OlfactoryResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| OlfactoryError::InvalidConfig(format!("Failed to serialize MOX configuration: {}", e)))
    }

    /// `true` se a última iteração deve ser descoberta na fonte de snapshots
    pub fn auto_stop(&self) -> bool {
        self.gas_data_stop_iter == 0
    }

    /// Ticks do sensor por snapshot de dispersão
    pub fn ticks_per_gas_iter(&self) -> f64 {
        self.gas_data_time_step * self.update_rate
    }

    /// `floor(gas_data_time_step * update_rate) - 1`
    pub fn updates_per_gas_iter(&self) -> u32 {
        (self.ticks_per_gas_iter().floor() as u32).saturating_sub(1)
    }

    /// A taxa do sensor é múltipla inteira da taxa dos snapshots?
    ///
    /// Caso contrário o escalonador acumula deriva.
    pub fn is_rate_aligned(&self) -> bool {
        let ticks = self.ticks_per_gas_iter();
        (ticks - ticks.round()).abs() < 1e-9
    }

    pub fn validate(&self) -> OlfactoryResult<()> {
        if !(self.update_rate.is_finite() && self.update_rate > 0.0) {
            return Err(OlfactoryError::InvalidConfig(format!(
                "update_rate must be positive, got {}",
                self.update_rate
            )));
        }
        if !(self.gas_data_time_step.is_finite() && self.gas_data_time_step > 0.0) {
            return Err(OlfactoryError::InvalidConfig(format!(
                "gas_data_time_step must be positive, got {}",
                self.gas_data_time_step
            )));
        }
        if self.ticks_per_gas_iter().floor() < 1.0 {
            return Err(OlfactoryError::InvalidConfig(format!(
                "update_rate ({} Hz) is too low for gas_data_time_step ({} s): at least one sensor tick per gas iteration is required",
                self.update_rate, self.gas_data_time_step
            )));
        }
        if !self.auto_stop() && self.gas_data_start_iter > self.gas_data_stop_iter {
            return Err(OlfactoryError::InvalidConfig(format!(
                "gas_data_start_iter ({}) is after gas_data_stop_iter ({})",
                self.gas_data_start_iter, self.gas_data_stop_iter
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = MoxConfig::from_str("").unwrap();
        assert_eq!(config, MoxConfig::default());
        assert_eq!(config.updates_per_gas_iter(), 1);
        assert!(config.auto_stop());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
sensor_model = "TGS2611"
gas_type = "methane"
update_rate = 10.0
gas_data_time_step = 1.0
gas_data_start_iter = 300
gas_data_stop_iter = 305
draw = true
"#;
        let config = MoxConfig::from_str(toml).unwrap();
        assert_eq!(config.sensor_model, SensorModel::Tgs2611);
        assert_eq!(config.gas_type, GasType::Methane);
        assert_eq!(config.updates_per_gas_iter(), 9);
        assert_eq!((config.gas_data_start_iter, config.gas_data_stop_iter), (300, 305));
        assert!(config.draw);
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        assert!(MoxConfig::from_str("sensor_model = \"MQ135\"").is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = MoxConfig::default();
        config.update_rate = 0.0;
        assert!(config.validate().is_err());

        let mut config = MoxConfig::default();
        config.update_rate = 1.0;
        config.gas_data_time_step = 0.5;
        assert!(config.validate().is_err());

        let mut config = MoxConfig::default();
        config.gas_data_start_iter = 10;
        config.gas_data_stop_iter = 5;
        assert!(config.validate().is_err());

        config.gas_data_stop_iter = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rate_alignment() {
        let mut config = MoxConfig::default();
        assert!(config.is_rate_aligned());
        config.update_rate = 5.0;
        config.gas_data_time_step = 0.3;
        assert!(!config.is_rate_aligned());
        assert_eq!(config.updates_per_gas_iter(), 0);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = MoxConfig {
            gas_type: GasType::Hydrogen,
            gas_data_stop_iter: 42,
            ..MoxConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(MoxConfig::from_str(&text).unwrap(), config);
    }
}
