use std::collections::{BTreeMap, BTreeSet};

use super::model::{
    ChemicalTable, Diagnostic, JoinedSample, JoinedTable, RatioSet, ReferenceTable, SampleId,
    SampleRatios, SectionLabel,
};
use super::schema::{chemical, find_column};

/// Left-join the chemical table with the reference table on sample id.
///
/// Every chemical row survives. A row without a reference match is labelled
/// [`SectionLabel::Unknown`]; reference ids are unique, so at most one row
/// can match.
pub fn join_sections(
    chemical: &ChemicalTable,
    reference: Option<&ReferenceTable>,
    diagnostics: &mut Vec<Diagnostic>,
) -> JoinedTable {
    let index = reference.map(ReferenceTable::by_id).unwrap_or_default();

    let rows: Vec<JoinedSample> = chemical
        .rows
        .iter()
        .map(|row| {
            let matched = index.get(&row.sample_id).copied();
            JoinedSample {
                sample_id: row.sample_id,
                section: matched.map_or(SectionLabel::Unknown, |r| SectionLabel::Section(r.section)),
                reference: matched.cloned(),
                values: row.values.clone(),
            }
        })
        .collect();

    let unmatched: Vec<String> = rows
        .iter()
        .filter(|r| r.section == SectionLabel::Unknown)
        .map(|r| r.sample_id.to_string())
        .collect();
    if reference.is_some() && !unmatched.is_empty() {
        diagnostics.push(Diagnostic::warning(format!(
            "{} chemical sample(s) without a reference row, labelled 'unknown': {}",
            unmatched.len(),
            unmatched.join(", ")
        )));
    }

    JoinedTable {
        elements: chemical.elements.clone(),
        rows,
    }
}

/// Compute Fe2O3/Sc, K2O/Sc and Na2O/Sc per sample, grouped by section.
///
/// A sample is included only when Sc is present, finite and strictly
/// positive and at least one numerator is present. Returns `None` (with a
/// warning) when one of the four columns is absent from the table.
pub fn derive_ratios(
    joined: &JoinedTable,
    annotated: &BTreeSet<SampleId>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<RatioSet> {
    let column = |name: &str| find_column(&joined.elements, name);
    let (Some(sc), Some(fe), Some(k), Some(na)) = (
        column(chemical::SC),
        column(chemical::FE2O3),
        column(chemical::K2O),
        column(chemical::NA2O),
    ) else {
        diagnostics.push(Diagnostic::warning(format!(
            "Chemical table lacks one of {}, {}, {}, {}; ratio view skipped",
            chemical::SC,
            chemical::FE2O3,
            chemical::K2O,
            chemical::NA2O
        )));
        return None;
    };

    let mut groups: BTreeMap<SectionLabel, Vec<SampleRatios>> = BTreeMap::new();
    let mut excluded = 0usize;
    for row in &joined.rows {
        let divisor = match row.values[sc] {
            Some(v) if v.is_finite() && v > 0.0 => v,
            _ => {
                excluded += 1;
                continue;
            }
        };
        let ratio = |idx: usize| row.values[idx].map(|v| v / divisor);
        let ratios = SampleRatios {
            sample_id: row.sample_id,
            section: row.section,
            fe_norm: ratio(fe),
            k_norm: ratio(k),
            na_norm: ratio(na),
            annotated: annotated.contains(&row.sample_id),
        };
        if ratios.fe_norm.is_none() && ratios.k_norm.is_none() && ratios.na_norm.is_none() {
            excluded += 1;
            continue;
        }
        groups.entry(row.section).or_default().push(ratios);
    }

    if excluded > 0 {
        log::info!("{excluded} sample(s) excluded from Sc-normalised ratios");
    }
    for id in annotated {
        if !groups.values().flatten().any(|r| r.sample_id == *id) {
            diagnostics.push(Diagnostic::warning(format!(
                "Annotated sample {id} has no Sc-normalised ratios to call out"
            )));
        }
    }

    Some(RatioSet { groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{MeasurementRow, SampleReference};

    fn reference(id: SampleId, section: u8) -> SampleReference {
        SampleReference {
            sample_id: id,
            section,
            stratigraphic_unit: String::new(),
            kind: String::new(),
            sub_type: String::new(),
        }
    }

    fn chemical(rows: Vec<(SampleId, [Option<f64>; 4])>) -> ChemicalTable {
        ChemicalTable {
            elements: vec!["Sc".into(), "Fe2O3".into(), "K2O".into(), "Na2O".into()],
            rows: rows
                .into_iter()
                .map(|(sample_id, v)| MeasurementRow { sample_id, values: v.to_vec() })
                .collect(),
        }
    }

    #[test]
    fn test_join_labels_unmatched_as_unknown() {
        let refs = ReferenceTable {
            rows: vec![reference(101, 1), reference(102, 1), reference(201, 2)],
        };
        let chem = chemical(vec![
            (101, [Some(5.0), Some(10.0), None, None]),
            (999, [Some(5.0), Some(10.0), None, None]),
        ]);
        let mut diags = Vec::new();
        let joined = join_sections(&chem, Some(&refs), &mut diags);

        assert_eq!(joined.rows.len(), 2);
        assert_eq!(joined.rows[0].sample_id, 101);
        assert_eq!(joined.rows[0].section, SectionLabel::Section(1));
        assert_eq!(joined.rows[1].sample_id, 999);
        assert_eq!(joined.rows[1].section, SectionLabel::Unknown);
        assert!(joined.rows[1].reference.is_none());
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_join_without_reference() {
        let chem = chemical(vec![(101, [Some(5.0), None, None, None])]);
        let mut diags = Vec::new();
        let joined = join_sections(&chem, None, &mut diags);
        assert_eq!(joined.rows[0].section, SectionLabel::Unknown);
    }

    #[test]
    fn test_ratio_requires_positive_sc() {
        let refs = ReferenceTable { rows: vec![reference(1, 1), reference(2, 1), reference(3, 2)] };
        let chem = chemical(vec![
            (1, [Some(5.0), Some(10.0), Some(2.5), None]),
            (2, [Some(0.0), Some(10.0), Some(2.5), Some(1.0)]),
            (3, [None, Some(10.0), Some(2.5), Some(1.0)]),
            (4, [Some(-1.0), Some(10.0), None, None]),
        ]);
        let mut diags = Vec::new();
        let joined = join_sections(&chem, Some(&refs), &mut diags);
        let ratios = derive_ratios(&joined, &BTreeSet::new(), &mut diags).unwrap();

        assert_eq!(joined.len(), 4);
        assert_eq!(ratios.len(), 1);
        let r = ratios.get(1).unwrap();
        assert_eq!(r.fe_norm, Some(2.0));
        assert_eq!(r.k_norm, Some(0.5));
        assert_eq!(r.na_norm, None);
        assert!(ratios.get(2).is_none());
        assert!(ratios.get(3).is_none());
    }

    #[test]
    fn test_ratios_grouped_and_annotated() {
        let refs = ReferenceTable { rows: vec![reference(163, 1), reference(183, 2)] };
        let chem = chemical(vec![
            (163, [Some(10.0), Some(5.0), Some(3.0), Some(1.0)]),
            (183, [Some(12.0), Some(6.0), Some(2.4), Some(1.2)]),
            (500, [Some(11.0), Some(5.5), Some(2.2), Some(1.1)]),
        ]);
        let annotated = BTreeSet::from([163, 183]);
        let mut diags = Vec::new();
        let joined = join_sections(&chem, Some(&refs), &mut diags);
        let ratios = derive_ratios(&joined, &annotated, &mut diags).unwrap();

        let keys: Vec<_> = ratios.groups.keys().copied().collect();
        assert_eq!(
            keys,
            vec![SectionLabel::Section(1), SectionLabel::Section(2), SectionLabel::Unknown]
        );
        assert!(ratios.get(163).unwrap().annotated);
        assert!(ratios.get(183).unwrap().annotated);
        assert!(!ratios.get(500).unwrap().annotated);
    }

    #[test]
    fn test_missing_column_skips_ratios() {
        let chem = ChemicalTable {
            elements: vec!["Sc".into(), "Fe2O3".into()],
            rows: vec![MeasurementRow { sample_id: 1, values: vec![Some(1.0), Some(2.0)] }],
        };
        let mut diags = Vec::new();
        let joined = join_sections(&chem, None, &mut diags);
        assert!(derive_ratios(&joined, &BTreeSet::new(), &mut diags).is_none());
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_unmatched_annotation_warns() {
        let chem = chemical(vec![(1, [Some(1.0), Some(1.0), Some(1.0), Some(1.0)])]);
        let mut diags = Vec::new();
        let joined = join_sections(&chem, None, &mut diags);
        let ratios = derive_ratios(&joined, &BTreeSet::from([163]), &mut diags).unwrap();
        assert_eq!(ratios.len(), 1);
        assert_eq!(diags.len(), 1);
    }
}
