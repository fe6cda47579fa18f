use std::collections::BTreeSet;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::derive::{derive_ratios, join_sections};
use super::error::DataError;
use super::mineralogy::parse_mineralogy;
use super::model::{Diagnostic, LoadedDataset, RawTable, SampleId};
use super::reference::{concat_references, parse_reference_rows};
use super::reshape::reshape_chemical;
use super::schema::files;

// ---------------------------------------------------------------------------
// CSV ingestion
// ---------------------------------------------------------------------------

/// Read a CSV file into a [`RawTable`]: header row as column names, every
/// other row as string cells. No interpretation beyond CSV parsing.
pub fn read_raw_table(path: &Path) -> Result<RawTable, DataError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => DataError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => DataError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    read_raw_from(path, file)
}

/// Same as [`read_raw_table`] over any reader; `path` is only used in errors.
pub fn read_raw_from<R: Read>(path: &Path, reader: R) -> Result<RawTable, DataError> {
    let parse_err = |source: csv::Error| DataError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(parse_err)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(parse_err)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

// ---------------------------------------------------------------------------
// Input locations
// ---------------------------------------------------------------------------

/// The five fixed input files inside one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub reference: [PathBuf; 2],
    pub mineralogy: [PathBuf; 2],
    pub chemical: PathBuf,
}

impl InputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        InputPaths {
            reference: [dir.join(files::REFERENCE_S1), dir.join(files::REFERENCE_S2)],
            mineralogy: [dir.join(files::MINERALOGY_S1), dir.join(files::MINERALOGY_S2)],
            chemical: dir.join(files::CHEMICAL),
        }
    }
}

// ---------------------------------------------------------------------------
// Memoizing loader
// ---------------------------------------------------------------------------

/// Runs the pipeline at most once and hands out the cached result.
///
/// Built once at startup and shared by reference with every consumer; the
/// inputs are static files, so the cache is never invalidated.
#[derive(Debug)]
pub struct DatasetLoader {
    data_dir: PathBuf,
    paths: InputPaths,
    annotated: BTreeSet<SampleId>,
    cache: OnceLock<LoadedDataset>,
}

impl DatasetLoader {
    pub fn new(data_dir: impl Into<PathBuf>, annotated: BTreeSet<SampleId>) -> Self {
        let data_dir = data_dir.into();
        DatasetLoader {
            paths: InputPaths::in_dir(&data_dir),
            data_dir,
            annotated,
            cache: OnceLock::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn annotated(&self) -> &BTreeSet<SampleId> {
        &self.annotated
    }

    /// The loaded dataset, running the pipeline on first use.
    pub fn load(&self) -> &LoadedDataset {
        self.cache.get_or_init(|| {
            log::info!("Loading dataset from {}", self.data_dir.display());
            run_pipeline(&self.paths, &self.annotated)
        })
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run every stage once. Failures become diagnostics and absent tables;
/// this function never fails.
pub fn run_pipeline(paths: &InputPaths, annotated: &BTreeSet<SampleId>) -> LoadedDataset {
    let mut diagnostics = Vec::new();

    // ---- Reference tables (both sections, concatenated) ----
    let mut parts = Vec::new();
    for (section, path) in (1u8..).zip(&paths.reference) {
        let Some(raw) = read_or_report(path, &mut diagnostics) else {
            continue;
        };
        match parse_reference_rows(section, &raw, &mut diagnostics) {
            Ok(rows) => parts.push(rows),
            Err(e) => diagnostics.push(Diagnostic::error(e.to_string())),
        }
    }
    let reference = if parts.is_empty() {
        None
    } else {
        Some(concat_references(parts, &mut diagnostics))
    };

    // ---- Mineralogy (one table per section, never merged) ----
    let [mineralogy_s1, mineralogy_s2] = [1u8, 2u8].map(|section| {
        let path = &paths.mineralogy[usize::from(section - 1)];
        let raw = read_or_report(path, &mut diagnostics)?;
        parse_mineralogy(section, &raw, &mut diagnostics)
            .map_err(|e| diagnostics.push(Diagnostic::error(e.to_string())))
            .ok()
    });

    // ---- Chemical contents ----
    let chemical = read_or_report(&paths.chemical, &mut diagnostics).and_then(|raw| {
        reshape_chemical(&raw, &mut diagnostics)
            .map_err(|e| diagnostics.push(Diagnostic::error(e.to_string())))
            .ok()
    });

    // ---- Join and derived ratios ----
    let joined = match &chemical {
        Some(chem) => {
            if reference.is_none() {
                diagnostics.push(Diagnostic::warning(
                    "No reference table available; every chemical sample is labelled 'unknown'",
                ));
            }
            Some(join_sections(chem, reference.as_ref(), &mut diagnostics))
        }
        None => {
            diagnostics.push(Diagnostic::warning(
                "Chemical table unavailable; section join and ratio view skipped",
            ));
            None
        }
    };
    let ratios = joined
        .as_ref()
        .and_then(|j| derive_ratios(j, annotated, &mut diagnostics));

    log::info!(
        "Loaded: {} reference rows, {}/{} mineralogy rows, {} chemical samples, {} ratio samples, {} diagnostics",
        reference.as_ref().map_or(0, |r| r.len()),
        mineralogy_s1.as_ref().map_or(0, |m| m.len()),
        mineralogy_s2.as_ref().map_or(0, |m| m.len()),
        chemical.as_ref().map_or(0, |c| c.len()),
        ratios.as_ref().map_or(0, |r| r.len()),
        diagnostics.len()
    );

    LoadedDataset {
        reference,
        mineralogy_s1,
        mineralogy_s2,
        chemical,
        joined,
        ratios,
        diagnostics,
    }
}

fn read_or_report(path: &Path, diagnostics: &mut Vec<Diagnostic>) -> Option<RawTable> {
    match read_raw_table(path) {
        Ok(raw) => {
            log::debug!("Read {} rows from {}", raw.rows.len(), path.display());
            Some(raw)
        }
        Err(e) => {
            diagnostics.push(Diagnostic::error(e.to_string()));
            None
        }
    }
}
