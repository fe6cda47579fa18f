/// File and column names of the published ditch tables.
/// Single source of truth for the loader and the views.

// ── Input files ─────────────────────────────────────────────────────────────
pub mod files {
    pub const REFERENCE_S1: &str = "reference_and_description_section_1.csv";
    pub const REFERENCE_S2: &str = "reference_and_description_section_2.csv";
    pub const MINERALOGY_S1: &str = "semi-quantitative_mineralogical_composition_section_1.csv";
    pub const MINERALOGY_S2: &str = "semi-quantitative_mineralogical_composition_section_2.csv";
    pub const CHEMICAL: &str = "chemical_contents.csv";
}

// ── Reference and description columns ───────────────────────────────────────
pub mod reference {
    pub const SAMPLE_REFERENCE: &str = "Sample Reference";
    pub const SU: &str = "SU";
    pub const TYPE: &str = "Type";
    pub const SUB_TYPE: &str = "Sub-Type";
    pub const SECTION: &str = "Section";
}

// ── Mineralogy columns ──────────────────────────────────────────────────────
pub mod mineralogy {
    pub const SAMPLE: &str = "Sample";
}

// ── Chemical contents ───────────────────────────────────────────────────────
pub mod chemical {
    pub const ELEMENT: &str = "Element";

    pub const SC: &str = "Sc";
    pub const FE2O3: &str = "Fe2O3";
    pub const K2O: &str = "K2O";
    pub const NA2O: &str = "Na2O";
}

/// Find a column by name, ignoring surrounding whitespace and ASCII case.
pub fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}
