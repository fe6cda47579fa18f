use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;

/// Integer identifier of one ceramic fragment.
pub type SampleId = i64;

// ---------------------------------------------------------------------------
// Diagnostics – the soft half of the error model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// A human-readable note produced while loading, shown in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        let message = message.into();
        log::warn!("{message}");
        Diagnostic {
            severity: Severity::Warning,
            message,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        log::error!("{message}");
        Diagnostic {
            severity: Severity::Error,
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

// ---------------------------------------------------------------------------
// SectionLabel – join outcome for one sample
// ---------------------------------------------------------------------------

/// Excavation section a sample belongs to, or `Unknown` when the sample has
/// no reference row. Sections sort before `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionLabel {
    Section(u8),
    Unknown,
}

impl fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionLabel::Section(n) => write!(f, "Section {n}"),
            SectionLabel::Unknown => write!(f, "unknown"),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – ingestion output, no interpretation
// ---------------------------------------------------------------------------

/// A CSV file as read from disk: header row plus string records.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Typed tables
// ---------------------------------------------------------------------------

/// One row of the reference-and-description tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleReference {
    pub sample_id: SampleId,
    pub section: u8,
    pub stratigraphic_unit: String,
    pub kind: String,
    pub sub_type: String,
}

/// Both sections' reference rows, concatenated, unique by sample id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    pub rows: Vec<SampleReference>,
}

impl ReferenceTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Index rows by sample id. Ids are unique after normalisation.
    pub fn by_id(&self) -> HashMap<SampleId, &SampleReference> {
        self.rows.iter().map(|r| (r.sample_id, r)).collect()
    }
}

/// A sample with one nullable measurement per column of its table.
/// `None` means the value is missing (blank or "not detected"), never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    pub sample_id: SampleId,
    pub values: Vec<Option<f64>>,
}

/// Semi-quantitative mineral percentages for one section.
#[derive(Debug, Clone, PartialEq)]
pub struct MineralogyTable {
    pub section: u8,
    pub minerals: Vec<String>,
    pub rows: Vec<MeasurementRow>,
}

impl MineralogyTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Chemical contents in sample-major orientation: one row per sample, one
/// column per element or oxide (majors in %, traces in mg/kg).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChemicalTable {
    pub elements: Vec<String>,
    pub rows: Vec<MeasurementRow>,
}

impl ChemicalTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Measurement of `element` for `sample_id`, if both exist and the value is present.
    #[cfg(test)]
    pub fn value(&self, sample_id: SampleId, element: &str) -> Option<f64> {
        let idx = super::schema::find_column(&self.elements, element)?;
        self.rows
            .iter()
            .find(|r| r.sample_id == sample_id)
            .and_then(|r| r.values[idx])
    }
}

/// The chemical table turned back into the paper's orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementMajorTable {
    pub sample_ids: Vec<SampleId>,
    /// `(element, one value per entry of sample_ids)`
    pub rows: Vec<(String, Vec<Option<f64>>)>,
}

// ---------------------------------------------------------------------------
// Joined and derived views
// ---------------------------------------------------------------------------

/// A chemical row with its section metadata attached.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedSample {
    pub sample_id: SampleId,
    pub section: SectionLabel,
    pub reference: Option<SampleReference>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinedTable {
    pub elements: Vec<String>,
    pub rows: Vec<JoinedSample>,
}

impl JoinedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Sc-normalised ratios of one sample. Each ratio is present only when its
/// numerator is; the sample itself is only built when Sc is positive.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRatios {
    pub sample_id: SampleId,
    pub section: SectionLabel,
    pub fe_norm: Option<f64>,
    pub k_norm: Option<f64>,
    pub na_norm: Option<f64>,
    /// Called out on the chart regardless of section.
    pub annotated: bool,
}

/// Which Sc-normalised ratio to read from a [`SampleRatios`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioKind {
    Fe,
    K,
    Na,
}

impl RatioKind {
    pub const ALL: [RatioKind; 3] = [RatioKind::Fe, RatioKind::K, RatioKind::Na];

    pub fn label(self) -> &'static str {
        match self {
            RatioKind::Fe => "Fe2O3 / Sc",
            RatioKind::K => "K2O / Sc",
            RatioKind::Na => "Na2O / Sc",
        }
    }

    pub fn get(self, ratios: &SampleRatios) -> Option<f64> {
        match self {
            RatioKind::Fe => ratios.fe_norm,
            RatioKind::K => ratios.k_norm,
            RatioKind::Na => ratios.na_norm,
        }
    }
}

/// Ratios grouped by section for comparative plotting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatioSet {
    pub groups: BTreeMap<SectionLabel, Vec<SampleRatios>>,
}

impl RatioSet {
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub fn get(&self, sample_id: SampleId) -> Option<&SampleRatios> {
        self.groups
            .values()
            .flatten()
            .find(|r| r.sample_id == sample_id)
    }
}

// ---------------------------------------------------------------------------
// LoadedDataset – everything the presentation layer consumes
// ---------------------------------------------------------------------------

/// Result of one pipeline run. Any table may be absent; `diagnostics`
/// explains why.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedDataset {
    pub reference: Option<ReferenceTable>,
    pub mineralogy_s1: Option<MineralogyTable>,
    pub mineralogy_s2: Option<MineralogyTable>,
    pub chemical: Option<ChemicalTable>,
    pub joined: Option<JoinedTable>,
    pub ratios: Option<RatioSet>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadedDataset {
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity >= Severity::Warning)
            .count()
    }
}
