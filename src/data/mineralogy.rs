use std::collections::HashSet;

use super::error::DataError;
use super::model::{Diagnostic, MeasurementRow, MineralogyTable, RawTable};
use super::parse::{Measurement, parse_measurement, parse_sample_id};
use super::schema::{find_column, mineralogy};

/// Parse a semi-quantitative mineralogical composition table.
///
/// The `Sample` column becomes the integer key; every other column is a
/// mineral percentage. Percentages outside 0..=100 are kept as missing.
pub fn parse_mineralogy(
    section: u8,
    raw: &RawTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<MineralogyTable, DataError> {
    let file = raw.path.display();
    let sample_idx = find_column(&raw.headers, mineralogy::SAMPLE)
        .ok_or_else(|| DataError::missing_column(&raw.path, mineralogy::SAMPLE))?;

    let mineral_cols: Vec<usize> = (0..raw.headers.len()).filter(|&i| i != sample_idx).collect();
    let minerals = mineral_cols.iter().map(|&i| raw.headers[i].clone()).collect();

    let mut rows = Vec::with_capacity(raw.rows.len());
    let mut seen = HashSet::new();
    for (row_no, row) in raw.rows.iter().enumerate() {
        let id_cell = row.get(sample_idx).map(String::as_str).unwrap_or("");
        let Some(sample_id) = parse_sample_id(id_cell) else {
            diagnostics.push(Diagnostic::warning(format!(
                "{file}: row {}: sample '{id_cell}' is not an integer; row dropped",
                row_no + 1
            )));
            continue;
        };
        if !seen.insert(sample_id) {
            diagnostics.push(Diagnostic::warning(format!(
                "{file}: sample {sample_id} appears more than once; keeping the first row"
            )));
            continue;
        }

        let values = mineral_cols
            .iter()
            .map(|&col| {
                let cell = row.get(col).map(String::as_str).unwrap_or("");
                let mineral = &raw.headers[col];
                match parse_measurement(cell) {
                    Measurement::Present(v) if (0.0..=100.0).contains(&v) => Some(v),
                    Measurement::Present(v) => {
                        diagnostics.push(Diagnostic::warning(format!(
                            "{file}: sample {sample_id}, {mineral}: {v} is outside 0-100 %; treated as missing"
                        )));
                        None
                    }
                    Measurement::Invalid => {
                        diagnostics.push(Diagnostic::warning(format!(
                            "{file}: sample {sample_id}, {mineral}: '{cell}' is not a number; treated as missing"
                        )));
                        None
                    }
                    Measurement::NotDetected | Measurement::Blank => None,
                }
            })
            .collect();

        rows.push(MeasurementRow { sample_id, values });
    }

    Ok(MineralogyTable {
        section,
        minerals,
        rows,
    })
}
