//! # 📁 I/O - Artefatos pré-computados
//!
//! Os dados de dispersão (filamentos, cabeçalhos por iteração) e a grade de
//! ocupação são produzidos externamente como arrays NumPy (`.npy`). Este
//! módulo os lê sem depender de Python.
//!
//! ```ignore
//! use gsl_core::io::npy::NpyArray;
//!
//! let grid = NpyArray::open("occupancy/env_grid.npy")?;
//! println!("shape = {:?}", grid.shape());
//! ```

pub mod npy;

pub use npy::{NpyArray, NpyError, NpyResult};
