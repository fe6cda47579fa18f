use std::fmt;
use std::path::Path;

use crate::data::model::{LoadedDataset, MineralogyTable, RatioKind, SectionLabel};
use crate::ui::tables::fmt_value;

/// Plain-text report of a loaded dataset, printed by `--summary`.
pub struct Summary<'a> {
    pub data_dir: &'a Path,
    pub dataset: &'a LoadedDataset,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ds = self.dataset;
        writeln!(f, "Data directory: {}", self.data_dir.display())?;

        match &ds.reference {
            Some(r) => writeln!(f, "Reference:             {} samples", r.len())?,
            None => writeln!(f, "Reference:             unavailable")?,
        }
        mineralogy_line(f, 1, ds.mineralogy_s1.as_ref())?;
        mineralogy_line(f, 2, ds.mineralogy_s2.as_ref())?;
        match &ds.chemical {
            Some(c) => writeln!(
                f,
                "Chemical contents:     {} samples x {} elements",
                c.len(),
                c.elements.len()
            )?,
            None => writeln!(f, "Chemical contents:     unavailable")?,
        }
        if let Some(joined) = &ds.joined {
            let unknown = joined
                .rows
                .iter()
                .filter(|r| r.section == SectionLabel::Unknown)
                .count();
            writeln!(f, "Joined:                {} samples ({unknown} unknown section)", joined.len())?;
        }

        match &ds.ratios {
            Some(ratios) => {
                writeln!(f)?;
                writeln!(f, "Sc-normalised ratios ({} samples, * = call-out):", ratios.len())?;
                for (section, samples) in &ratios.groups {
                    writeln!(f, "  {section} ({} samples)", samples.len())?;
                    for s in samples {
                        let mark = if s.annotated { "*" } else { " " };
                        write!(f, "    {:>6}{mark}", s.sample_id)?;
                        for kind in RatioKind::ALL {
                            write!(f, "  {} = {:<10}", kind.label(), fmt_ratio(kind.get(s)))?;
                        }
                        writeln!(f)?;
                    }
                }
            }
            None => writeln!(f, "Sc-normalised ratios:  unavailable")?,
        }

        if !ds.diagnostics.is_empty() {
            writeln!(f)?;
            writeln!(f, "Diagnostics:")?;
            for diag in &ds.diagnostics {
                writeln!(f, "  {diag}")?;
            }
        }
        Ok(())
    }
}

fn mineralogy_line(f: &mut fmt::Formatter<'_>, section: u8, table: Option<&MineralogyTable>) -> fmt::Result {
    match table {
        Some(m) => writeln!(
            f,
            "Mineralogy section {section}:  {} samples x {} minerals",
            m.len(),
            m.minerals.len()
        ),
        None => writeln!(f, "Mineralogy section {section}:  unavailable"),
    }
}

fn fmt_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => fmt_value(None),
    }
}
