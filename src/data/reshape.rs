use std::collections::HashSet;

use super::error::DataError;
use super::model::{ChemicalTable, Diagnostic, ElementMajorTable, MeasurementRow, RawTable};
use super::parse::{Measurement, parse_measurement, parse_sample_id};
use super::schema::chemical;

// ---------------------------------------------------------------------------
// Element-major → sample-major
// ---------------------------------------------------------------------------

/// Transpose the raw chemical table (rows = elements, columns = samples)
/// into one row per sample with one nullable value per element.
///
/// * First column holds the element/oxide symbol.
/// * Remaining headers are sample ids; non-integer headers are dropped.
/// * Duplicate sample ids or element names keep the first occurrence.
///
/// Every dropped or coerced item is reported in `diagnostics`.
pub fn reshape_chemical(
    raw: &RawTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<ChemicalTable, DataError> {
    if raw.headers.is_empty() {
        return Err(DataError::missing_column(&raw.path, chemical::ELEMENT));
    }
    let file = raw.path.display();

    // ---- Element rows (become columns) ----
    let mut elements = Vec::new();
    let mut element_rows = Vec::new();
    let mut seen_elements = HashSet::new();
    for (row_no, row) in raw.rows.iter().enumerate() {
        let name = row.first().map(|s| s.trim()).unwrap_or("");
        if name.is_empty() {
            diagnostics.push(Diagnostic::warning(format!(
                "{file}: row {} has no element name; dropped",
                row_no + 1
            )));
            continue;
        }
        if !seen_elements.insert(name.to_ascii_lowercase()) {
            diagnostics.push(Diagnostic::warning(format!(
                "{file}: element '{name}' listed more than once; keeping the first row"
            )));
            continue;
        }
        elements.push(name.to_string());
        element_rows.push(row);
    }

    // ---- Sample columns (become rows) ----
    let mut rows = Vec::new();
    let mut seen_samples = HashSet::new();
    for (col, header) in raw.headers.iter().enumerate().skip(1) {
        let Some(sample_id) = parse_sample_id(header) else {
            diagnostics.push(Diagnostic::warning(format!(
                "{file}: column '{header}' is not a sample id; dropped"
            )));
            continue;
        };
        if !seen_samples.insert(sample_id) {
            diagnostics.push(Diagnostic::warning(format!(
                "{file}: sample {sample_id} appears more than once; keeping the first column"
            )));
            continue;
        }

        let values = element_rows
            .iter()
            .zip(&elements)
            .map(|(row, element)| {
                let cell = row.get(col).map(String::as_str).unwrap_or("");
                let parsed = parse_measurement(cell);
                if parsed == Measurement::Invalid {
                    diagnostics.push(Diagnostic::warning(format!(
                        "{file}: sample {sample_id}, {element}: '{cell}' is not a number; treated as missing"
                    )));
                }
                parsed.value()
            })
            .collect();

        rows.push(MeasurementRow { sample_id, values });
    }

    log::debug!(
        "Reshaped {}: {} elements x {} samples",
        raw.path.display(),
        elements.len(),
        rows.len()
    );

    Ok(ChemicalTable { elements, rows })
}

// ---------------------------------------------------------------------------
// Sample-major → element-major
// ---------------------------------------------------------------------------

impl ChemicalTable {
    /// Re-transpose into the orientation the chemical contents are published in.
    pub fn to_element_major(&self) -> ElementMajorTable {
        let sample_ids = self.rows.iter().map(|r| r.sample_id).collect();
        let rows = self
            .elements
            .iter()
            .enumerate()
            .map(|(idx, element)| {
                let values = self.rows.iter().map(|r| r.values[idx]).collect();
                (element.clone(), values)
            })
            .collect();
        ElementMajorTable { sample_ids, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_raw_from;
    use proptest::prelude::*;
    use std::path::Path;

    fn raw(csv: &str) -> RawTable {
        read_raw_from(Path::new("chemical_contents.csv"), csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_not_detected_becomes_missing() {
        let mut diags = Vec::new();
        let table = reshape_chemical(&raw("Element,101,102\nSc,5.0,not detected\n"), &mut diags).unwrap();

        assert_eq!(table.elements, vec!["Sc".to_string()]);
        assert_eq!(
            table.rows,
            vec![
                MeasurementRow { sample_id: 101, values: vec![Some(5.0)] },
                MeasurementRow { sample_id: 102, values: vec![None] },
            ]
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_percent_majors_and_traces() {
        let mut diags = Vec::new();
        let table = reshape_chemical(
            &raw("Element,163,183\nFe2O3,6.2%,5.8%\nK2O,3.9%,not detected\nSc,14,12.5\n"),
            &mut diags,
        )
        .unwrap();

        assert_eq!(table.value(163, "Fe2O3"), Some(6.2));
        assert_eq!(table.value(163, "K2O"), Some(3.9));
        assert_eq!(table.value(183, "K2O"), None);
        assert_eq!(table.value(183, "Sc"), Some(12.5));
    }

    #[test]
    fn test_non_numeric_header_and_duplicate_sample_dropped() {
        let mut diags = Vec::new();
        let table = reshape_chemical(
            &raw("Element,Unit,101,101,102\nSc,mg/kg,5,6,7\n"),
            &mut diags,
        )
        .unwrap();

        let ids: Vec<_> = table.rows.iter().map(|r| r.sample_id).collect();
        assert_eq!(ids, vec![101, 102]);
        assert_eq!(table.value(101, "Sc"), Some(5.0));
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_invalid_cell_is_missing_with_warning() {
        let mut diags = Vec::new();
        let table = reshape_chemical(&raw("Element,101\nSc,abc\n"), &mut diags).unwrap();

        assert_eq!(table.rows[0].values, vec![None]);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("abc"));
    }

    #[test]
    fn test_duplicate_element_keeps_first() {
        let mut diags = Vec::new();
        let table = reshape_chemical(&raw("Element,101\nSc,5\nsc,9\n"), &mut diags).unwrap();

        assert_eq!(table.elements.len(), 1);
        assert_eq!(table.value(101, "Sc"), Some(5.0));
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_header_only_table() {
        let mut diags = Vec::new();
        let table = reshape_chemical(&raw("Element,101,102\n"), &mut diags).unwrap();
        assert!(table.elements.is_empty());
        assert_eq!(table.len(), 2);
    }

    fn cell_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            (0.0f64..1000.0).prop_map(|v| format!("{v}")),
            (0.0f64..100.0).prop_map(|v| format!("{v}%")),
            Just("not detected".to_string()),
        ]
    }

    proptest! {
        #[test]
        fn prop_retranspose_restores_detected_cells(
            grid in (1usize..5, 1usize..6).prop_flat_map(|(n_el, n_s)| {
                prop::collection::vec(prop::collection::vec(cell_strategy(), n_s), n_el)
            })
        ) {
            let n_samples = grid[0].len();
            let mut csv = String::from("Element");
            for s in 0..n_samples {
                csv.push_str(&format!(",{}", 100 + s));
            }
            csv.push('\n');
            for (e, row) in grid.iter().enumerate() {
                csv.push_str(&format!("E{e},{}\n", row.join(",")));
            }

            let mut diags = Vec::new();
            let table = reshape_chemical(&raw(&csv), &mut diags).unwrap();
            let back = table.to_element_major();

            prop_assert_eq!(back.sample_ids, (0..n_samples as i64).map(|s| 100 + s).collect::<Vec<_>>());
            for (e, row) in grid.iter().enumerate() {
                prop_assert_eq!(&back.rows[e].0, &format!("E{e}"));
                for (s, cell) in row.iter().enumerate() {
                    let expected = parse_measurement(cell).value();
                    prop_assert_eq!(back.rows[e].1[s], expected);
                    if cell == "not detected" {
                        prop_assert_eq!(back.rows[e].1[s], None);
                    }
                }
            }
        }
    }
}
