//! # ⏱️ Rate gate - desacoplamento entre passo físico e taxa do sensor
//!
//! O simulador externo avança em passos físicos pequenos (centenas de Hz),
//! enquanto o sensor amostra a poucos Hz. [`RateGate`] acumula o tempo
//! decorrido e só libera um tick quando o período `1 / update_rate` foi
//! atingido, entregando ao sensor o tempo acumulado como seu `dt`.

use crate::geometry::Point3;
use crate::traits::{GslComponent, Sensor, SensorError, SensorKind, Seconds};

/// Acumulador de tempo que dispara a cada `1 / rate` segundos
#[derive(Debug, Clone, PartialEq)]
pub struct RateGate {
    period: Seconds,
    accumulated: Seconds,
}

impl RateGate {
    /// Cria gate para uma taxa em Hz.
    ///
    /// Taxas não positivas resultam em período zero: todo tick dispara.
    pub fn new(rate_hz: f64) -> Self {
        let period = if rate_hz > 0.0 { 1.0 / rate_hz } else { 0.0 };
        Self { period, accumulated: 0.0 }
    }

    /// Período em segundos
    pub fn period(&self) -> Seconds {
        self.period
    }

    /// Tempo acumulado desde o último disparo
    pub fn accumulated(&self) -> Seconds {
        self.accumulated
    }

    /// Soma `dt` e retorna o tempo acumulado se o período foi atingido
    pub fn tick(&mut self, dt: Seconds) -> Option<Seconds> {
        self.accumulated += dt;
        if self.accumulated >= self.period {
            let elapsed = self.accumulated;
            self.accumulated = 0.0;
            Some(elapsed)
        } else {
            None
        }
    }

    /// Zera o acumulador
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

/// Sensor envolvido por um [`RateGate`] na sua própria taxa de amostragem.
///
/// `update` retorna `Ok(None)` nos passos físicos em que o sensor não amostra.
#[derive(Debug)]
pub struct RateLimited<S: Sensor> {
    sensor: S,
    gate: RateGate,
}

impl<S: Sensor> RateLimited<S> {
    pub fn new(sensor: S) -> Self {
        let gate = RateGate::new(sensor.update_rate());
        Self { sensor, gate }
    }

    /// Avança um passo físico de `dt` segundos
    pub fn update(&mut self, position: Point3, dt: Seconds) -> Result<Option<S::Reading>, SensorError> {
        match self.gate.tick(dt) {
            Some(elapsed) => self.sensor.update(position, elapsed).map(Some),
            None => Ok(None),
        }
    }

    /// Reseta o gate e o sensor envolvido
    pub fn reset(&mut self) {
        self.gate.reset();
        self.sensor.reset();
    }

    /// Última leitura do sensor
    pub fn state(&self) -> S::Reading {
        self.sensor.state()
    }

    pub fn kind(&self) -> SensorKind {
        self.sensor.kind()
    }

    pub fn name(&self) -> &str {
        self.sensor.name()
    }

    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    pub fn inner(&self) -> &S {
        &self.sensor
    }

    pub fn into_inner(self) -> S {
        self.sensor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        dts: Vec<f64>,
    }

    impl GslComponent for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }
    }

    impl Sensor for Recorder {
        type Reading = usize;

        fn kind(&self) -> SensorKind {
            SensorKind::Mox
        }

        fn update_rate(&self) -> f64 {
            4.0
        }

        fn update(&mut self, _position: Point3, dt: Seconds) -> Result<usize, SensorError> {
            self.dts.push(dt);
            Ok(self.dts.len())
        }

        fn reset(&mut self) {
            self.dts.clear();
        }

        fn state(&self) -> usize {
            self.dts.len()
        }
    }

    #[test]
    fn test_gate_fires_at_period() {
        let mut gate = RateGate::new(4.0);
        assert_eq!(gate.period(), 0.25);
        assert_eq!(gate.tick(0.125), None);
        assert_eq!(gate.tick(0.125), Some(0.25));
        assert_eq!(gate.accumulated(), 0.0);
    }

    #[test]
    fn test_gate_passes_accumulated_time() {
        let mut gate = RateGate::new(2.0);
        assert_eq!(gate.tick(0.375), None);
        assert_eq!(gate.tick(0.25), Some(0.625));
    }

    #[test]
    fn test_gate_zero_rate_always_fires() {
        let mut gate = RateGate::new(0.0);
        assert_eq!(gate.tick(0.001), Some(0.001));
    }

    #[test]
    fn test_rate_limited_sensor() {
        let mut limited = RateLimited::new(Recorder::default());
        let mut fired = 0;
        for _ in 0..16 {
            if limited.update(Point3::ORIGIN, 0.0625).unwrap().is_some() {
                fired += 1;
            }
        }
        assert_eq!(fired, 4);
        assert!(limited.inner().dts.iter().all(|dt| *dt == 0.25));

        limited.update(Point3::ORIGIN, 0.0625).unwrap();
        limited.reset();
        assert_eq!(limited.state(), 0);
        assert_eq!(limited.gate().accumulated(), 0.0);
    }
}
