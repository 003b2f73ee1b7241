//! # 🌀 GSL-Core
//!
//! Núcleo compartilhado da simulação de sensores de gás (GSL - *Gas Source
//! Localization*).
//!
//! > *"Trait no core, implementação no módulo."*
//!
//! ## O que vive aqui
//!
//! 1. **Geometria** - [`Point3`], o ponto 3D em metros usado por todas as camadas
//! 2. **Traits** - [`GslComponent`] e [`Sensor`], a família polimórfica de sensores
//! 3. **Rate gate** - [`RateGate`] e [`RateLimited`], que desacoplam o passo
//!    físico externo da taxa de amostragem do sensor
//! 4. **I/O** - codec NPY para os artefatos pré-computados (filamentos,
//!    cabeçalhos de iteração e grade de ocupação)
//!
//! As implementações concretas vivem nos crates específicos
//! (`gsl-environment`, `gsl-olfactory`).
//!
//! ## Quick Start
//!
//! ```
//! use gsl_core::prelude::*;
//!
//! let a = Point3::new(0.0, 0.0, 0.0);
//! let b = Point3::new(3.0, 4.0, 0.0);
//! assert_eq!(a.distance(&b), 5.0);
//!
//! let mut gate = RateGate::new(4.0);
//! assert_eq!(gate.tick(0.1), None);
//! assert!(gate.tick(0.2).is_some());
//! ```

pub mod geometry;
pub mod io;
pub mod prelude;
pub mod rate;
pub mod traits;

pub use geometry::Point3;
pub use rate::{RateGate, RateLimited};
pub use traits::{GslComponent, Seconds, Sensor, SensorError, SensorKind};
