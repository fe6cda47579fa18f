use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::filter::{Attribute, FilterState, filtered_indices, init_filter_state, unique_values};
use crate::data::loader::DatasetLoader;
use crate::data::model::{LoadedDataset, RatioKind, SampleId, SectionLabel};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which page the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Reference,
    Mineralogy,
    Chemistry,
    Ratios,
}

impl View {
    pub const ALL: [View; 4] = [View::Reference, View::Mineralogy, View::Chemistry, View::Ratios];

    pub fn label(self) -> &'static str {
        match self {
            View::Reference => "Reference",
            View::Mineralogy => "Mineralogy",
            View::Chemistry => "Chemistry",
            View::Ratios => "Sc ratios",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Memoizing loader; the dataset is read once per loader.
    pub loader: Arc<DatasetLoader>,

    pub view: View,

    /// Per-attribute filter selections.
    pub filters: FilterState,

    /// Indices into the joined table passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Colour and marker per section group.
    pub section_colors: ColorMap<SectionLabel>,

    /// Ratio plotted on each axis of the scatter.
    pub x_ratio: RatioKind,
    pub y_ratio: RatioKind,

    /// Show the chemical table with elements as rows.
    pub element_major: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(loader: Arc<DatasetLoader>) -> Self {
        let mut state = Self {
            loader,
            view: View::Reference,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            section_colors: ColorMap::default(),
            x_ratio: RatioKind::Fe,
            y_ratio: RatioKind::K,
            element_major: false,
            status_message: None,
        };
        state.reset_for_dataset();
        state
    }

    pub fn dataset(&self) -> &LoadedDataset {
        self.loader.load()
    }

    /// Swap in a loader for another data directory.
    pub fn set_loader(&mut self, loader: Arc<DatasetLoader>) {
        self.loader = loader;
        self.reset_for_dataset();
    }

    /// Initialise filters and colours from the (possibly freshly loaded) dataset.
    fn reset_for_dataset(&mut self) {
        let loader = Arc::clone(&self.loader);
        let ds = loader.load();

        match &ds.joined {
            Some(joined) => {
                self.filters = init_filter_state(joined);
                self.visible_indices = (0..joined.len()).collect();
                let sections = unique_sections(ds);
                self.section_colors = ColorMap::new(&sections);
            }
            None => {
                self.filters = FilterState::default();
                self.visible_indices = Vec::new();
                self.section_colors = ColorMap::default();
            }
        }

        let n_warnings = ds.warning_count();
        self.status_message = (n_warnings > 0).then(|| format!("{n_warnings} load warning(s)"));
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self) {
        let loader = Arc::clone(&self.loader);
        if let Some(joined) = &loader.load().joined {
            self.visible_indices = filtered_indices(joined, &self.filters);
        }
    }

    /// Sample ids of the visible joined rows.
    pub fn visible_sample_ids(&self) -> HashSet<SampleId> {
        let Some(joined) = &self.dataset().joined else {
            return HashSet::new();
        };
        self.visible_indices
            .iter()
            .map(|&i| joined.rows[i].sample_id)
            .collect()
    }

    /// Toggle a single value in an attribute's filter.
    pub fn toggle_filter_value(&mut self, attr: Attribute, value: &Option<String>) {
        let selected = self.filters.entry(attr).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Select all values of an attribute.
    pub fn select_all(&mut self, attr: Attribute) {
        let loader = Arc::clone(&self.loader);
        if let Some(joined) = &loader.load().joined {
            if let Some(all_vals) = unique_values(joined).remove(&attr) {
                self.filters.insert(attr, all_vals);
                self.refilter();
            }
        }
    }

    /// Deselect all values of an attribute.
    pub fn select_none(&mut self, attr: Attribute) {
        self.filters.insert(attr, BTreeSet::new());
        self.refilter();
    }
}

/// Section groups present in the dataset, sections first, `Unknown` last.
fn unique_sections(ds: &LoadedDataset) -> Vec<SectionLabel> {
    let mut sections: BTreeSet<SectionLabel> = BTreeSet::new();
    if let Some(joined) = &ds.joined {
        sections.extend(joined.rows.iter().map(|r| r.section));
    }
    sections.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::files;

    fn loader_with_data() -> (tempfile::TempDir, Arc<DatasetLoader>) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(files::REFERENCE_S1),
            "Sample Reference,SU,Type,Sub-Type,Section\n1,[1],Bowl,,1\n2,[1],Jar,,1\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(files::CHEMICAL),
            "Element,1,2,3\nSc,10,10,10\nFe2O3,5,6,7\nK2O,1,2,3\nNa2O,1,1,1\n",
        )
        .unwrap();
        let loader = Arc::new(DatasetLoader::new(dir.path(), BTreeSet::new()));
        (dir, loader)
    }

    #[test]
    fn test_state_initialises_from_dataset() {
        let (_dir, loader) = loader_with_data();
        let state = AppState::new(loader);

        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.visible_sample_ids(), HashSet::from([1, 2, 3]));
        // Missing section-2 and mineralogy files are reported.
        assert!(state.status_message.is_some());
    }

    #[test]
    fn test_filter_toggling() {
        let (_dir, loader) = loader_with_data();
        let mut state = AppState::new(loader);

        state.toggle_filter_value(Attribute::Section, &Some("unknown".to_string()));
        assert_eq!(state.visible_sample_ids(), HashSet::from([1, 2]));

        state.select_none(Attribute::Type);
        assert!(state.visible_indices.is_empty());

        state.select_all(Attribute::Type);
        state.toggle_filter_value(Attribute::Section, &Some("unknown".to_string()));
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(Arc::new(DatasetLoader::new(dir.path(), BTreeSet::new())));
        assert!(state.visible_indices.is_empty());
        assert!(state.visible_sample_ids().is_empty());
    }
}
