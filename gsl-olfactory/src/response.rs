//! # Modelo de resposta MOX
//!
//! Converte concentração em resistência do sensor:
//!
//! 1. curva de calibração `RS/R0 = A · c^B` (reta no espaço log-log),
//!    limitada ao valor em ar limpo e a um piso positivo;
//! 2. resposta transitória de primeira ordem com constantes de tempo
//!    assimétricas (subida quando a resistência cai, descida quando sobe).
//!
//! A primeira chamada apenas inicializa o filtro na linha de base do ar.

use crate::calibration::MoxCalibration;
use gsl_core::Seconds;

/// Piso de RS/R0
pub const MIN_RS_R0: f64 = 0.01;

/// Estado do filtro passa-baixa do sensor
#[derive(Debug, Clone, PartialEq)]
pub struct MoxResponse {
    calibration: MoxCalibration,
    first_reading: bool,
    previous_sensor_output: f64,
}

impl MoxResponse {
    pub fn new(calibration: MoxCalibration) -> Self {
        Self {
            calibration,
            first_reading: true,
            previous_sensor_output: 0.0,
        }
    }

    pub fn calibration(&self) -> &MoxCalibration {
        &self.calibration
    }

    /// Ainda não houve leitura desde a construção ou o último `reset`
    pub fn is_first_reading(&self) -> bool {
        self.first_reading
    }

    /// Saída filtrada anterior (RS/R0)
    pub fn previous_sensor_output(&self) -> f64 {
        self.previous_sensor_output
    }

    /// RS/R0 de equilíbrio para a concentração dada
    pub fn steady_state_ratio(&self, concentration: f64) -> f64 {
        let air = self.calibration.sensitivity_air;
        let mut rs_r0 = if concentration == 0.0 {
            air
        } else {
            self.calibration.a * concentration.powf(self.calibration.b)
        };

        if rs_r0 > air {
            rs_r0 = air;
        }
        let resistance_variation = air - rs_r0;
        rs_r0 = air - resistance_variation;
        if rs_r0 <= 0.0 {
            rs_r0 = MIN_RS_R0;
        }
        rs_r0
    }

    /// Um passo do modelo: retorna `(saída em Ω, RS/R0)`
    pub fn respond(&mut self, dt: Seconds, concentration: f64) -> (f64, f64) {
        let cal = self.calibration;

        if self.first_reading {
            let rs_r0 = cal.sensitivity_air;
            self.previous_sensor_output = rs_r0;
            self.first_reading = false;
            return (rs_r0 * cal.r0, rs_r0);
        }

        let rs_r0 = self.steady_state_ratio(concentration);
        let tau = if rs_r0 < self.previous_sensor_output {
            cal.tau_rise
        } else {
            cal.tau_decay
        };

        let alpha = dt / (tau + dt);
        let sensor_output = alpha * rs_r0 + (1.0 - alpha) * self.previous_sensor_output;
        self.previous_sensor_output = sensor_output;

        (sensor_output * cal.r0, rs_r0)
    }

    /// Volta ao estado não inicializado
    pub fn reset(&mut self) {
        self.first_reading = true;
        self.previous_sensor_output = 0.0;
    }
}
