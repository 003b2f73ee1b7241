//! Sensor MOX simulado
//!
//! Cada tick executa, nesta ordem: avanço do escalonador, recarga do snapshot
//! e recálculo da concentração (apenas quando `update_iter == 0`), e resposta
//! do sensor. Entre recargas a última concentração calculada é mantida, mesmo
//! que a posição do agente mude.

use crate::calibration::{CalibrationTables, MoxCalibration};
use crate::concentration;
use crate::config::MoxConfig;
use crate::error::OlfactoryResult;
use crate::response::MoxResponse;
use crate::scheduler::IterationScheduler;
use crate::snapshot::SnapshotSource;
use crate::types::{FilamentMarker, MoxReading, Snapshot};
use gsl_core::prelude::*;
use gsl_environment::OccupancyGrid;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Sensor de óxido metálico acoplado a um agente móvel
#[derive(Debug)]
pub struct MoxSensor {
    name: String,
    config: MoxConfig,
    scheduler: IterationScheduler,
    response: MoxResponse,
    source: Box<dyn SnapshotSource>,
    grid: Arc<OccupancyGrid>,
    gas_concentration: f64,
    state: MoxReading,
    markers: Vec<FilamentMarker>,
}

impl MoxSensor {
    /// Cria o sensor com as tabelas de calibração globais do processo
    pub fn new(config: MoxConfig, source: Box<dyn SnapshotSource>, grid: Arc<OccupancyGrid>) -> OlfactoryResult<Self> {
        Self::with_calibration(config, CalibrationTables::global(), source, grid)
    }

    /// Cria o sensor com tabelas de calibração explícitas
    pub fn with_calibration(
        config: MoxConfig,
        tables: &CalibrationTables,
        source: Box<dyn SnapshotSource>,
        grid: Arc<OccupancyGrid>,
    ) -> OlfactoryResult<Self> {
        config.validate()?;
        let calibration = tables.lookup(config.sensor_model, config.gas_type)?;

        let iter_stop = if config.auto_stop() {
            source.last_iteration()?
        } else {
            config.gas_data_stop_iter
        };
        let scheduler =
            IterationScheduler::new(config.gas_data_start_iter, iter_stop, config.updates_per_gas_iter())?;

        if !config.is_rate_aligned() {
            warn!(
                update_rate = config.update_rate,
                gas_data_time_step = config.gas_data_time_step,
                "Sensor rate is not an integer multiple of the gas data rate; iterations will drift"
            );
        }

        info!(
            model = %config.sensor_model,
            gas = %config.gas_type,
            iter_start = scheduler.iter_start(),
            iter_stop = scheduler.iter_stop(),
            updates_per_gas_iter = scheduler.updates_per_gas_iter(),
            "MOX sensor ready"
        );

        Ok(Self {
            name: format!("MOX {} ({})", config.sensor_model, config.gas_type),
            config,
            scheduler,
            response: MoxResponse::new(calibration),
            source,
            grid,
            gas_concentration: 0.0,
            state: MoxReading::default(),
            markers: Vec::new(),
        })
    }

    /// Executa um tick na posição dada
    ///
    /// Se a recarga do snapshot falhar, o escalonador não avança: a chamada
    /// seguinte tenta a mesma iteração de novo.
    pub fn sense(&mut self, position: Point3, dt: Seconds) -> OlfactoryResult<MoxReading> {
        let mut scheduler = self.scheduler.clone();
        let tick = scheduler.advance(dt);

        if tick.reload {
            let snapshot = self.source.load(tick.iteration)?;
            debug!(
                iteration = snapshot.iteration,
                filaments = snapshot.filaments.len(),
                "Loaded gas data"
            );
            if self.config.draw {
                self.record_markers(&snapshot);
            }
            self.gas_concentration = concentration::estimate(
                &position,
                &snapshot.filaments,
                &snapshot.header,
                &*self.grid,
            );
        }
        self.scheduler = scheduler;
        if tick.wrapped {
            debug!(iteration = tick.iteration, "Gas data wrapped to first iteration");
        }

        let (sensor_output, rs_r0) = self.response.respond(dt, self.gas_concentration);
        self.state = MoxReading {
            sensor_output,
            gas_concentration: self.gas_concentration,
            rs_r0,
        };

        trace!(
            time = self.scheduler.time_total(),
            iteration = tick.iteration,
            update_iter = tick.update_iter,
            sensor_output,
            gas_concentration = self.gas_concentration,
            rs_r0,
            "MOX reading"
        );
        Ok(self.state)
    }

    fn record_markers(&mut self, snapshot: &Snapshot) {
        self.markers.clear();
        self.markers.extend(snapshot.filaments.iter().map(FilamentMarker::from_filament));
        for marker in &self.markers {
            trace!(
                x = marker.position.x,
                y = marker.position.y,
                z = marker.position.z,
                size = marker.size,
                "Filament marker"
            );
        }
    }

    pub fn config(&self) -> &MoxConfig {
        &self.config
    }

    pub fn calibration(&self) -> &MoxCalibration {
        self.response.calibration()
    }

    pub fn scheduler(&self) -> &IterationScheduler {
        &self.scheduler
    }

    /// Tempo total simulado desde a construção ou o último `reset`
    pub fn time_total(&self) -> Seconds {
        self.scheduler.time_total()
    }

    /// Marcadores dos filamentos da última recarga (vazio se `draw = false`)
    pub fn filament_markers(&self) -> &[FilamentMarker] {
        &self.markers
    }

    pub fn grid(&self) -> &Arc<OccupancyGrid> {
        &self.grid
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IMPLEMENTAÇÃO DOS TRAITS DO CORE
// ═══════════════════════════════════════════════════════════════════════════════

impl GslComponent for MoxSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }
}

impl Sensor for MoxSensor {
    type Reading = MoxReading;

    fn kind(&self) -> SensorKind {
        SensorKind::Mox
    }

    fn update_rate(&self) -> f64 {
        self.config.update_rate
    }

    fn update(&mut self, position: Point3, dt: Seconds) -> Result<MoxReading, SensorError> {
        Ok(self.sense(position, dt)?)
    }

    fn reset(&mut self) {
        self.scheduler.reset();
        self.response.reset();
        self.gas_concentration = 0.0;
        self.state = MoxReading::default();
        self.markers.clear();
    }

    fn state(&self) -> MoxReading {
        self.state
    }
}
