//! # 🎯 Traits - Abstrações Fundamentais do GSL
//!
//! Define a família polimórfica de sensores simulados. Um sensor recebe, a cada
//! tick, a posição do agente e o tempo decorrido, e devolve uma leitura
//! imutável.
//!
//! | Trait | Papel |
//! |:------|:------|
//! | [`GslComponent`] | Identidade, versão, prontidão |
//! | [`Sensor`] | Ciclo de vida `update` / `reset` / `state` |
//!
//! O despacho é feito por trait object (`Box<dyn Sensor<Reading = R>>`) ou pela
//! tag explícita [`SensorKind`].

use crate::geometry::Point3;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

// ═══════════════════════════════════════════════════════════════════════════════
// TIPOS COMUNS
// ═══════════════════════════════════════════════════════════════════════════════

/// Tempo em segundos
pub type Seconds = f64;

/// Tag da variante de sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    /// Sensor de óxido metálico (MOX)
    Mox,
}

impl SensorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Mox => "MOX",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRAIT BASE
// ═══════════════════════════════════════════════════════════════════════════════

/// Trait base para qualquer componente GSL.
pub trait GslComponent: Send + Debug {
    /// Nome único do componente (para logs e debug)
    fn name(&self) -> &str;

    /// Versão do componente
    fn version(&self) -> &str {
        "2026.1.16"
    }

    /// Componente está pronto para uso?
    fn is_ready(&self) -> bool {
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SENSORES
// ═══════════════════════════════════════════════════════════════════════════════

/// Erro de sensor
#[derive(Debug, Clone, thiserror::Error)]
pub enum SensorError {
    #[error("Sensor not initialized")]
    NotInitialized,
    #[error("Sensor read failed: {0}")]
    ReadFailed(String),
    #[error("Configuration invalid: {0}")]
    InvalidConfig(String),
    #[error("Missing precomputed data: {0}")]
    MissingData(String),
}

/// Sensor simulado acoplado a um agente móvel.
///
/// O chamador externo dirige um loop de passo fixo e chama [`Sensor::update`]
/// uma vez por tick. Entre execuções independentes de um mesmo experimento,
/// o chamador deve chamar [`Sensor::reset`].
///
/// # Exemplo
///
/// ```
/// use gsl_core::prelude::*;
///
/// #[derive(Debug, Default)]
/// struct Odometer {
///     travelled: f64,
///     last: Option<Point3>,
/// }
///
/// impl GslComponent for Odometer {
///     fn name(&self) -> &str { "odometer" }
/// }
///
/// impl Sensor for Odometer {
///     type Reading = f64;
///
///     fn kind(&self) -> SensorKind { SensorKind::Mox }
///     fn update_rate(&self) -> f64 { 10.0 }
///
///     fn update(&mut self, position: Point3, _dt: Seconds) -> Result<f64, SensorError> {
///         if let Some(last) = self.last {
///             self.travelled += last.distance(&position);
///         }
///         self.last = Some(position);
///         Ok(self.travelled)
///     }
///
///     fn reset(&mut self) { *self = Self::default(); }
///     fn state(&self) -> f64 { self.travelled }
/// }
///
/// let mut odo = Odometer::default();
/// odo.update(Point3::new(0.0, 0.0, 0.0), 0.1).unwrap();
/// assert_eq!(odo.update(Point3::new(1.0, 0.0, 0.0), 0.1).unwrap(), 1.0);
/// ```
pub trait Sensor: GslComponent {
    /// Registro imutável produzido a cada atualização
    type Reading: Clone + Debug;

    /// Variante do sensor
    fn kind(&self) -> SensorKind;

    /// Taxa de amostragem em Hz
    fn update_rate(&self) -> f64;

    /// Executa um tick do sensor na posição dada, com `dt` segundos desde o
    /// tick anterior
    fn update(&mut self, position: Point3, dt: Seconds) -> Result<Self::Reading, SensorError>;

    /// Restaura o estado inicial (entre execuções repetidas)
    fn reset(&mut self);

    /// Cópia da última leitura
    fn state(&self) -> Self::Reading;
}

impl<S: Sensor + ?Sized> GslComponent for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn version(&self) -> &str {
        (**self).version()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

impl<S: Sensor + ?Sized> Sensor for Box<S> {
    type Reading = S::Reading;

    fn kind(&self) -> SensorKind {
        (**self).kind()
    }

    fn update_rate(&self) -> f64 {
        (**self).update_rate()
    }

    fn update(&mut self, position: Point3, dt: Seconds) -> Result<Self::Reading, SensorError> {
        (**self).update(position, dt)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn state(&self) -> Self::Reading {
        (**self).state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Counter {
        ticks: u32,
    }

    impl GslComponent for Counter {
        fn name(&self) -> &str {
            "counter"
        }
    }

    impl Sensor for Counter {
        type Reading = u32;

        fn kind(&self) -> SensorKind {
            SensorKind::Mox
        }

        fn update_rate(&self) -> f64 {
            1.0
        }

        fn update(&mut self, _position: Point3, _dt: Seconds) -> Result<u32, SensorError> {
            self.ticks += 1;
            Ok(self.ticks)
        }

        fn reset(&mut self) {
            self.ticks = 0;
        }

        fn state(&self) -> u32 {
            self.ticks
        }
    }

    #[test]
    fn test_boxed_sensor_dispatch() {
        let mut sensor: Box<dyn Sensor<Reading = u32>> = Box::new(Counter::default());
        assert_eq!(sensor.name(), "counter");
        assert_eq!(sensor.kind(), SensorKind::Mox);
        sensor.update(Point3::ORIGIN, 1.0).unwrap();
        sensor.update(Point3::ORIGIN, 1.0).unwrap();
        assert_eq!(sensor.state(), 2);
        sensor.reset();
        assert_eq!(sensor.state(), 0);
    }

    #[test]
    fn test_sensor_kind_display() {
        assert_eq!(SensorKind::Mox.to_string(), "MOX");
        assert_eq!(SensorKind::Mox.as_str(), "MOX");
    }
}
