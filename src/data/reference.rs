use std::collections::HashSet;

use super::error::DataError;
use super::model::{Diagnostic, RawTable, ReferenceTable, SampleReference};
use super::parse::{parse_sample_id, parse_section};
use super::schema::{find_column, reference};

/// Parse one section's reference-and-description table.
///
/// `file_section` is the section the file stands for; it is used when the
/// `Section` column is absent or unreadable. Rows whose sample reference is
/// not an integer are dropped with a warning.
pub fn parse_reference_rows(
    file_section: u8,
    raw: &RawTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<SampleReference>, DataError> {
    let file = raw.path.display();
    let id_idx = find_column(&raw.headers, reference::SAMPLE_REFERENCE)
        .ok_or_else(|| DataError::missing_column(&raw.path, reference::SAMPLE_REFERENCE))?;
    let su_idx = find_column(&raw.headers, reference::SU);
    let type_idx = find_column(&raw.headers, reference::TYPE);
    let sub_type_idx = find_column(&raw.headers, reference::SUB_TYPE);
    let section_idx = find_column(&raw.headers, reference::SECTION);

    if section_idx.is_none() {
        diagnostics.push(Diagnostic::warning(format!(
            "{file}: no '{}' column; assuming section {file_section}",
            reference::SECTION
        )));
    }

    let text = |row: &[String], idx: Option<usize>| -> String {
        idx.and_then(|i| row.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let mut out = Vec::with_capacity(raw.rows.len());
    for (row_no, row) in raw.rows.iter().enumerate() {
        let id_cell = row.get(id_idx).map(String::as_str).unwrap_or("");
        let Some(sample_id) = parse_sample_id(id_cell) else {
            diagnostics.push(Diagnostic::warning(format!(
                "{file}: row {}: sample reference '{id_cell}' is not an integer; row dropped",
                row_no + 1
            )));
            continue;
        };

        let section = match section_idx.and_then(|i| row.get(i)) {
            Some(cell) => parse_section(cell).unwrap_or_else(|| {
                diagnostics.push(Diagnostic::warning(format!(
                    "{file}: sample {sample_id}: section '{cell}' unreadable; assuming {file_section}"
                )));
                file_section
            }),
            None => file_section,
        };

        out.push(SampleReference {
            sample_id,
            section,
            stratigraphic_unit: text(row, su_idx),
            kind: text(row, type_idx),
            sub_type: text(row, sub_type_idx),
        });
    }
    Ok(out)
}

/// Concatenate per-section reference rows, preserving order.
///
/// A sample id seen again keeps its first row; later ones are dropped with
/// a warning so the join never sees more than one match.
pub fn concat_references(
    parts: Vec<Vec<SampleReference>>,
    diagnostics: &mut Vec<Diagnostic>,
) -> ReferenceTable {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    for reference in parts.into_iter().flatten() {
        if seen.insert(reference.sample_id) {
            rows.push(reference);
        } else {
            diagnostics.push(Diagnostic::warning(format!(
                "Sample {} has more than one reference row; keeping the first (section {} row dropped)",
                reference.sample_id, reference.section
            )));
        }
    }
    ReferenceTable { rows }
}
