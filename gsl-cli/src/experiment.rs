//! Arquivo de experimento (TOML)
//!
//! ```toml
//! calibration = "calibration.toml"   # opcional
//!
//! [environment]
//! gas_data_dir = "gas_data/0"
//! grid = "occupancy/grid.npy"         # opcional: sem grade, tudo livre
//! grid_spec = "occupancy/spec.yaml"
//!
//! [mox]
//! sensor_model = "TGS2620"
//! gas_type = "ethanol"
//! update_rate = 4.0
//!
//! [trajectory]
//! waypoints = [[1.0, 1.0, 2.0], [9.0, 9.0, 2.0]]
//! speed = 0.5
//! physics_dt = 0.01
//! duration = 60.0
//! runs = 2
//! ```
//!
//! Caminhos relativos são resolvidos a partir do diretório do arquivo.

use anyhow::{Context, Result, bail};
use gsl_environment::{EnvironmentSpec, OccupancyGrid};
use gsl_olfactory::MoxConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    /// Tabelas de calibração a instalar antes de criar o sensor
    #[serde(default)]
    pub calibration: Option<PathBuf>,

    pub environment: EnvironmentPaths,

    #[serde(default)]
    pub mox: MoxConfig,

    pub trajectory: TrajectoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentPaths {
    pub gas_data_dir: PathBuf,
    #[serde(default)]
    pub grid: Option<PathBuf>,
    pub grid_spec: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    pub waypoints: Vec<[f64; 3]>,

    /// Velocidade ao longo da polilinha (m/s)
    #[serde(default = "default_speed")]
    pub speed: f64,

    /// Passo do loop físico (s)
    #[serde(default = "default_physics_dt")]
    pub physics_dt: f64,

    /// Duração de cada execução (s)
    pub duration: f64,

    /// Execuções repetidas com o mesmo sensor
    #[serde(default = "default_runs")]
    pub runs: u32,
}

fn default_speed() -> f64 {
    0.5
}

fn default_physics_dt() -> f64 {
    0.01
}

fn default_runs() -> u32 {
    1
}

impl Experiment {
    /// Parse de um experimento em TOML
    pub fn from_str(content: &str) -> Result<Self> {
        let experiment: Self = toml::from_str(content).context("Failed to parse experiment file")?;
        experiment.validate()?;
        Ok(experiment)
    }

    /// Carrega o experimento e resolve caminhos relativos ao arquivo
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let mut experiment = Self::from_str(&content)?;
        if let Some(base) = path.parent() {
            experiment.resolve_paths(base);
        }
        Ok(experiment)
    }

    fn validate(&self) -> Result<()> {
        let t = &self.trajectory;
        if t.waypoints.is_empty() {
            bail!("trajectory.waypoints must not be empty");
        }
        if !(t.physics_dt.is_finite() && t.physics_dt > 0.0) {
            bail!("trajectory.physics_dt must be positive, got {}", t.physics_dt);
        }
        if !(t.duration.is_finite() && t.duration >= 0.0) {
            bail!("trajectory.duration must be non-negative, got {}", t.duration);
        }
        self.mox.validate().context("Invalid [mox] section")?;
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.environment.gas_data_dir);
        resolve(&mut self.environment.grid_spec);
        if let Some(grid) = self.environment.grid.as_mut() {
            resolve(grid);
        }
        if let Some(calibration) = self.calibration.as_mut() {
            resolve(calibration);
        }
    }

    /// Carrega a grade de ocupação (ou uma grade livre se não houver arquivo)
    pub fn load_grid(&self) -> Result<OccupancyGrid> {
        let env = &self.environment;
        let grid = match &env.grid {
            Some(grid) => OccupancyGrid::load(grid, &env.grid_spec)
                .with_context(|| format!("Failed to load occupancy grid {}", grid.display()))?,
            None => {
                let spec = EnvironmentSpec::from_file(&env.grid_spec)
                    .with_context(|| format!("Failed to load grid spec {}", env.grid_spec.display()))?;
                OccupancyGrid::open(spec)?
            }
        };
        Ok(grid)
    }

    /// Número de passos físicos por execução
    pub fn steps_per_run(&self) -> usize {
        (self.trajectory.duration / self.trajectory.physics_dt).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsl_olfactory::{GasType, SensorModel};

    const MINIMAL: &str = r#"
[environment]
gas_data_dir = "gas_data"
grid_spec = "spec.yaml"

[trajectory]
waypoints = [[1.0, 1.0, 2.0], [9.0, 9.0, 2.0]]
duration = 10.0
"#;

    #[test]
    fn test_minimal_experiment() {
        let experiment = Experiment::from_str(MINIMAL).unwrap();
        assert_eq!(experiment.mox, MoxConfig::default());
        assert_eq!(experiment.trajectory.runs, 1);
        assert_eq!(experiment.trajectory.physics_dt, 0.01);
        assert_eq!(experiment.steps_per_run(), 1000);
        assert!(experiment.environment.grid.is_none());
        assert!(experiment.calibration.is_none());
    }

    #[test]
    fn test_mox_section() {
        let content = format!("{MINIMAL}\n[mox]\nsensor_model = \"TGS2610\"\ngas_type = \"hydrogen\"\nupdate_rate = 2.0\n");
        let experiment = Experiment::from_str(&content).unwrap();
        assert_eq!(experiment.mox.sensor_model, SensorModel::Tgs2610);
        assert_eq!(experiment.mox.gas_type, GasType::Hydrogen);
        assert_eq!(experiment.mox.update_rate, 2.0);
    }

    #[test]
    fn test_invalid_sections_are_rejected() {
        let content = MINIMAL.replace("duration = 10.0", "duration = 10.0\nphysics_dt = 0.0");
        assert!(Experiment::from_str(&content).is_err());

        let content = MINIMAL.replace("[[1.0, 1.0, 2.0], [9.0, 9.0, 2.0]]", "[]");
        assert!(Experiment::from_str(&content).is_err());

        let content = format!("{MINIMAL}\n[mox]\nupdate_rate = 0.5\n");
        assert!(Experiment::from_str(&content).is_err());
    }

    #[test]
    fn test_paths_resolve_against_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("experiment.toml");
        std::fs::write(&path, MINIMAL).unwrap();

        let experiment = Experiment::from_file(&path).unwrap();
        assert_eq!(experiment.environment.gas_data_dir, dir.path().join("gas_data"));
        assert_eq!(experiment.environment.grid_spec, dir.path().join("spec.yaml"));
    }
}
