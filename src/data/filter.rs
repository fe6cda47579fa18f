use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::model::{JoinedSample, JoinedTable};

// ---------------------------------------------------------------------------
// Filterable attributes of a joined sample
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    Section,
    Type,
    SubType,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [Attribute::Section, Attribute::Type, Attribute::SubType];

    /// Value of this attribute for a sample. `None` when the sample has no
    /// reference row or the cell is blank.
    pub fn value_of(self, sample: &JoinedSample) -> Option<String> {
        let non_blank = |s: &str| (!s.is_empty()).then(|| s.to_string());
        match self {
            Attribute::Section => Some(sample.section.to_string()),
            Attribute::Type => sample.reference.as_ref().and_then(|r| non_blank(&r.kind)),
            Attribute::SubType => sample.reference.as_ref().and_then(|r| non_blank(&r.sub_type)),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Section => "Section",
            Attribute::Type => "Type",
            Attribute::SubType => "Sub-Type",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per attribute
// ---------------------------------------------------------------------------

/// Per-attribute selection state: attribute → set of selected values.
/// A missing attribute means "no filter"; an empty set hides everything.
pub type FilterState = BTreeMap<Attribute, BTreeSet<Option<String>>>;

/// Sorted unique values of every attribute across the joined table.
pub fn unique_values(joined: &JoinedTable) -> FilterState {
    let mut unique = FilterState::new();
    for attr in Attribute::ALL {
        let values = joined.rows.iter().map(|s| attr.value_of(s)).collect();
        unique.insert(attr, values);
    }
    unique
}

/// Initialise a [`FilterState`] with all values selected (i.e., show everything).
pub fn init_filter_state(joined: &JoinedTable) -> FilterState {
    unique_values(joined)
}

/// Return indices of joined samples that pass all active filters.
pub fn filtered_indices(joined: &JoinedTable, filters: &FilterState) -> Vec<usize> {
    joined
        .rows
        .iter()
        .enumerate()
        .filter(|(_, sample)| {
            filters
                .iter()
                .all(|(attr, selected)| selected.contains(&attr.value_of(sample)))
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{SampleReference, SectionLabel};

    fn sample(id: i64, reference: Option<(u8, &str)>) -> JoinedSample {
        JoinedSample {
            sample_id: id,
            section: reference.map_or(SectionLabel::Unknown, |(s, _)| SectionLabel::Section(s)),
            reference: reference.map(|(section, kind)| SampleReference {
                sample_id: id,
                section,
                stratigraphic_unit: String::new(),
                kind: kind.to_string(),
                sub_type: String::new(),
            }),
            values: Vec::new(),
        }
    }

    fn table() -> JoinedTable {
        JoinedTable {
            elements: Vec::new(),
            rows: vec![
                sample(1, Some((1, "Bowl"))),
                sample(2, Some((2, "Jar"))),
                sample(3, None),
            ],
        }
    }

    #[test]
    fn test_all_selected_shows_everything() {
        let joined = table();
        let filters = init_filter_state(&joined);
        assert_eq!(filtered_indices(&joined, &filters), vec![0, 1, 2]);
    }

    #[test]
    fn test_deselect_value() {
        let joined = table();
        let mut filters = init_filter_state(&joined);
        filters
            .get_mut(&Attribute::Type)
            .unwrap()
            .remove(&Some("Jar".to_string()));
        assert_eq!(filtered_indices(&joined, &filters), vec![0, 2]);

        filters.get_mut(&Attribute::Type).unwrap().remove(&None);
        assert_eq!(filtered_indices(&joined, &filters), vec![0]);
    }

    #[test]
    fn test_empty_selection_hides_all() {
        let joined = table();
        let mut filters = init_filter_state(&joined);
        filters.insert(Attribute::Section, BTreeSet::new());
        assert!(filtered_indices(&joined, &filters).is_empty());
    }

    #[test]
    fn test_unique_values() {
        let unique = unique_values(&table());
        let sections: Vec<_> = unique[&Attribute::Section].iter().cloned().collect();
        assert_eq!(
            sections,
            vec![
                Some("Section 1".to_string()),
                Some("Section 2".to_string()),
                Some("unknown".to_string())
            ]
        );
        assert!(unique[&Attribute::SubType].contains(&None));
        assert_eq!(unique[&Attribute::SubType].len(), 1);
    }
}
