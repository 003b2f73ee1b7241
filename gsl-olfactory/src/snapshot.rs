//! # Fontes de snapshots de dispersão
//!
//! Cada iteração da simulação de dispersão é um par de artefatos
//! pré-computados: os filamentos (`iteration_<N>_fil.npy`, `(F, 5)` com
//! colunas `id, x, y, z, sigma`) e o cabeçalho (`iteration_<N>_head.npy`).
//!
//! O sensor não conhece o sistema de arquivos: recebe um [`SnapshotSource`]
//! injetado. [`DirectorySource`] lê de um diretório; [`MemorySource`] guarda
//! snapshots sintéticos.

use crate::error::{OlfactoryError, OlfactoryResult};
use crate::types::{Filament, IterationHeader, Snapshot};
use gsl_core::Point3;
use gsl_core::io::NpyArray;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Campo do cabeçalho com os moles do gás alvo por filamento
pub const HEAD_FILAMENT_MOLES: &str = "filament_num_moles_of_gas";
/// Campo do cabeçalho com os moles de todos os gases por cm³
pub const HEAD_TOTAL_MOLES: &str = "num_moles_all_gases_in_cm3";

/// Colunas por filamento: `id, x, y, z, sigma`
const FILAMENT_COLUMNS: usize = 5;

/// Resolve e carrega snapshots por índice de iteração
pub trait SnapshotSource: Send + Debug {
    /// Carrega os filamentos e o cabeçalho da iteração.
    ///
    /// Uma iteração inexistente é [`OlfactoryError::MissingSnapshot`].
    fn load(&mut self, iteration: u32) -> OlfactoryResult<Snapshot>;

    /// Maior índice de iteração disponível
    fn last_iteration(&self) -> OlfactoryResult<u32>;
}

impl<S: SnapshotSource + ?Sized> SnapshotSource for Box<S> {
    fn load(&mut self, iteration: u32) -> OlfactoryResult<Snapshot> {
        (**self).load(iteration)
    }

    fn last_iteration(&self) -> OlfactoryResult<u32> {
        (**self).last_iteration()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIRETÓRIO
// ═══════════════════════════════════════════════════════════════════════════════

/// Snapshots em `.npy` sob um diretório
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Abre o diretório; falha se ele não existir
    pub fn new<P: AsRef<Path>>(dir: P) -> OlfactoryResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        let meta = std::fs::metadata(&dir).map_err(|source| OlfactoryError::SnapshotDirectory {
            path: dir.clone(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(OlfactoryError::SnapshotDirectory {
                path: dir,
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn filament_path(&self, iteration: u32) -> PathBuf {
        self.dir.join(format!("iteration_{iteration}_fil.npy"))
    }

    pub fn header_path(&self, iteration: u32) -> PathBuf {
        self.dir.join(format!("iteration_{iteration}_head.npy"))
    }

    fn open(&self, iteration: u32, path: PathBuf) -> OlfactoryResult<NpyArray> {
        if !path.is_file() {
            return Err(OlfactoryError::MissingSnapshot { iteration, path });
        }
        Ok(NpyArray::open(&path)?)
    }
}

impl SnapshotSource for DirectorySource {
    fn load(&mut self, iteration: u32) -> OlfactoryResult<Snapshot> {
        let filaments = self.open(iteration, self.filament_path(iteration))?;
        let header = self.open(iteration, self.header_path(iteration))?;

        Ok(Snapshot {
            iteration,
            filaments: filaments_from_npy(iteration, &filaments)?,
            header: header_from_npy(iteration, &header)?,
        })
    }

    fn last_iteration(&self) -> OlfactoryResult<u32> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| OlfactoryError::SnapshotDirectory {
            path: self.dir.clone(),
            source,
        })?;

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name();
                let name = name.to_str()?;
                if name.starts_with("iteration_") {
                    first_number(name)
                } else {
                    None
                }
            })
            .max()
            .ok_or_else(|| OlfactoryError::NoSnapshots(self.dir.clone()))
    }
}

/// Primeira sequência de dígitos do nome
fn first_number(name: &str) -> Option<u32> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let digits: String = name[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Converte um array `(F, 5)` em filamentos. Um array vazio é aceito.
pub fn filaments_from_npy(iteration: u32, array: &NpyArray) -> OlfactoryResult<Vec<Filament>> {
    let format_error = |reason: String| OlfactoryError::SnapshotFormat { iteration, reason };

    if array.is_empty() {
        return Ok(Vec::new());
    }
    let values = array
        .values()
        .map_err(|_| format_error("filament array must be a plain float array".into()))?;
    match array.shape() {
        [_, FILAMENT_COLUMNS] => {}
        shape => return Err(format_error(format!("filament array has shape {shape:?}, expected (F, 5)"))),
    }

    Ok(values
        .chunks_exact(FILAMENT_COLUMNS)
        .map(|row| Filament::new(row[0] as i64, Point3::new(row[1], row[2], row[3]), row[4]))
        .collect())
}

/// Lê o cabeçalho: array estruturado (primeiro registro) ou `[moles, total]`
pub fn header_from_npy(iteration: u32, array: &NpyArray) -> OlfactoryResult<IterationHeader> {
    let format_error = |reason: String| OlfactoryError::SnapshotFormat { iteration, reason };

    let (filament_moles, total_moles_all_gases) = if array.is_structured() {
        let moles = array.field(HEAD_FILAMENT_MOLES)?.first().copied();
        let total = array.field(HEAD_TOTAL_MOLES)?.first().copied();
        moles.zip(total).ok_or_else(|| format_error("header has no records".into()))?
    } else {
        match array.values()? {
            [moles, total, ..] => (*moles, *total),
            _ => return Err(format_error("header must hold at least two values".into())),
        }
    };

    Ok(IterationHeader {
        filament_moles,
        total_moles_all_gases,
    })
}

/// Serializa filamentos como array `(F, 5)`
pub fn filaments_to_npy(filaments: &[Filament]) -> OlfactoryResult<NpyArray> {
    let values = filaments
        .iter()
        .flat_map(|f| [f.id as f64, f.position.x, f.position.y, f.position.z, f.sigma])
        .collect();
    Ok(NpyArray::from_values(vec![filaments.len(), FILAMENT_COLUMNS], values)?)
}

/// Serializa o cabeçalho como array estruturado de um registro
pub fn header_to_npy(header: &IterationHeader) -> OlfactoryResult<NpyArray> {
    Ok(NpyArray::from_records(vec![
        (HEAD_FILAMENT_MOLES.to_string(), vec![header.filament_moles]),
        (HEAD_TOTAL_MOLES.to_string(), vec![header.total_moles_all_gases]),
    ])?)
}

/// Grava um snapshot no layout lido por [`DirectorySource`]
pub fn write_snapshot<P: AsRef<Path>>(dir: P, snapshot: &Snapshot) -> OlfactoryResult<()> {
    let dir = dir.as_ref();
    let n = snapshot.iteration;
    filaments_to_npy(&snapshot.filaments)?.write(dir.join(format!("iteration_{n}_fil.npy")))?;
    header_to_npy(&snapshot.header)?.write(dir.join(format!("iteration_{n}_head.npy")))?;
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// MEMÓRIA
// ═══════════════════════════════════════════════════════════════════════════════

/// Snapshots sintéticos em memória
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    snapshots: BTreeMap<u32, Snapshot>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona (ou substitui) um snapshot
    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.insert(snapshot);
        self
    }

    pub fn insert(&mut self, snapshot: Snapshot) {
        self.snapshots.insert(snapshot.iteration, snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl SnapshotSource for MemorySource {
    fn load(&mut self, iteration: u32) -> OlfactoryResult<Snapshot> {
        self.snapshots
            .get(&iteration)
            .cloned()
            .ok_or_else(|| OlfactoryError::MissingSnapshot {
                iteration,
                path: PathBuf::from(format!("memory://iteration_{iteration}")),
            })
    }

    fn last_iteration(&self) -> OlfactoryResult<u32> {
        self.snapshots
            .keys()
            .next_back()
            .copied()
            .ok_or_else(|| OlfactoryError::NoSnapshots(PathBuf::from("memory://")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> IterationHeader {
        IterationHeader {
            filament_moles: 8.3e-10,
            total_moles_all_gases: 4.09e-5,
        }
    }

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("iteration_305_fil.npy"), Some(305));
        assert_eq!(first_number("iteration_7_head.npy"), Some(7));
        assert_eq!(first_number("iteration_fil.npy"), None);
    }

    #[test]
    fn test_filaments_from_npy() {
        let array = NpyArray::from_values(
            vec![2, 5],
            vec![0.0, 1.0, 2.0, 0.5, 10.0, 1.0, 3.0, 2.5, 0.75, 12.0],
        )
        .unwrap();
        let filaments = filaments_from_npy(4, &array).unwrap();
        assert_eq!(filaments.len(), 2);
        assert_eq!(filaments[1].id, 1);
        assert_eq!(filaments[1].position, Point3::new(3.0, 2.5, 0.75));
        assert_eq!(filaments[1].sigma, 12.0);
    }

    #[test]
    fn test_empty_filament_array() {
        let array = NpyArray::from_values(vec![0, 5], vec![]).unwrap();
        assert!(filaments_from_npy(1, &array).unwrap().is_empty());
    }

    #[test]
    fn test_filament_shape_is_checked() {
        let array = NpyArray::from_values(vec![2, 4], vec![0.0; 8]).unwrap();
        let err = filaments_from_npy(9, &array).unwrap_err();
        assert!(matches!(err, OlfactoryError::SnapshotFormat { iteration: 9, .. }));
    }

    #[test]
    fn test_header_from_structured_and_plain() {
        let structured = header_to_npy(&header()).unwrap();
        assert_eq!(header_from_npy(0, &structured).unwrap(), header());

        let plain = NpyArray::from_values(vec![2], vec![8.3e-10, 4.09e-5]).unwrap();
        assert_eq!(header_from_npy(0, &plain).unwrap(), header());

        let short = NpyArray::from_values(vec![1], vec![1.0]).unwrap();
        assert!(header_from_npy(0, &short).is_err());
    }

    #[test]
    fn test_memory_source() {
        let snapshot = Snapshot {
            iteration: 12,
            filaments: vec![Filament::new(0, Point3::ORIGIN, 10.0)],
            header: header(),
        };
        let mut source = MemorySource::new().with_snapshot(snapshot.clone());
        assert_eq!(source.last_iteration().unwrap(), 12);
        assert_eq!(source.load(12).unwrap(), snapshot);
        assert!(matches!(
            source.load(13),
            Err(OlfactoryError::MissingSnapshot { iteration: 13, .. })
        ));
        assert!(MemorySource::new().last_iteration().is_err());
    }
}
