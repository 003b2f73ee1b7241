//! # Escalonador de iterações
//!
//! Reconcilia dois relógios: a taxa do sensor (`update_rate`) e o passo fixo
//! em que os snapshots de dispersão foram gerados (`gas_data_time_step`).
//! Cada snapshot é reutilizado por `updates_per_gas_iter + 1` ticks do sensor.
//!
//! ```text
//!  novo snapshot                 novo snapshot                 volta ao início
//!  ||-------|-------|-------||-------|-------|-------|| ... ||-------|-------||
//!  start  update  update   start+1  update  update           stop   update
//! ```
//!
//! Estados `(filament_iter, update_iter)`:
//!
//! - `filament_iter ∈ [iter_start, iter_stop]`
//! - `update_iter ∈ [0, updates_per_gas_iter]`
//! - um recarregamento ocorre exatamente quando `update_iter == 0`

use crate::error::{OlfactoryError, OlfactoryResult};
use gsl_core::Seconds;

/// Resultado de um avanço do escalonador
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Os dados da iteração precisam ser (re)carregados
    pub reload: bool,
    /// Iteração corrente
    pub iteration: u32,
    /// Sub-iteração corrente
    pub update_iter: u32,
    /// O avanço voltou de `iter_stop` para `iter_start`
    pub wrapped: bool,
}

/// Contadores de iteração e sub-iteração
#[derive(Debug, Clone, PartialEq)]
pub struct IterationScheduler {
    iter_start: u32,
    iter_stop: u32,
    updates_per_gas_iter: u32,
    filament_iter: u32,
    update_iter: u32,
    time_total: Seconds,
}

impl IterationScheduler {
    pub fn new(iter_start: u32, iter_stop: u32, updates_per_gas_iter: u32) -> OlfactoryResult<Self> {
        if iter_start > iter_stop {
            return Err(OlfactoryError::InvalidConfig(format!(
                "iteration range is empty: start {iter_start} > stop {iter_stop}"
            )));
        }
        Ok(Self {
            iter_start,
            iter_stop,
            updates_per_gas_iter,
            filament_iter: iter_start,
            update_iter: 0,
            time_total: 0.0,
        })
    }

    /// Avança um tick de `dt` segundos
    pub fn advance(&mut self, dt: Seconds) -> Tick {
        self.time_total += dt;

        let at_end = self.update_iter == self.updates_per_gas_iter;
        let wrapped = self.filament_iter == self.iter_stop && at_end;
        if wrapped {
            self.update_iter = 0;
            self.filament_iter = self.iter_start;
        } else if !at_end {
            self.update_iter += 1;
        } else {
            self.update_iter = 0;
            self.filament_iter += 1;
        }

        Tick {
            reload: self.update_iter == 0,
            iteration: self.filament_iter,
            update_iter: self.update_iter,
            wrapped,
        }
    }

    /// Volta a `(iter_start, 0)` e zera o tempo total
    pub fn reset(&mut self) {
        self.filament_iter = self.iter_start;
        self.update_iter = 0;
        self.time_total = 0.0;
    }

    pub fn iter_start(&self) -> u32 {
        self.iter_start
    }

    pub fn iter_stop(&self) -> u32 {
        self.iter_stop
    }

    pub fn updates_per_gas_iter(&self) -> u32 {
        self.updates_per_gas_iter
    }

    /// `(filament_iter, update_iter)` correntes
    pub fn position(&self) -> (u32, u32) {
        (self.filament_iter, self.update_iter)
    }

    /// Tempo total desde a construção ou o último `reset`
    pub fn time_total(&self) -> Seconds {
        self.time_total
    }
}
