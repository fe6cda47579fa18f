//! Startup configuration: built-in defaults, an optional TOML file, then
//! command-line flags, each layer overriding the previous one.
//!
//! ```toml
//! # sherds.toml
//! [data]
//! dir = "./data/ditch1"
//!
//! [annotations]
//! samples = [163, 183]
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::data::model::SampleId;

pub const DEFAULT_DATA_DIR: &str = "./data/ditch1";
pub const DEFAULT_ANNOTATED: [SampleId; 2] = [163, 183];

/// Rusty Sherds - ceramic fragment analysis dashboard
#[derive(Debug, Parser)]
#[command(name = "rusty-sherds")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the five CSV tables
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Sample ids to call out on the ratio chart (repeatable or comma-separated)
    #[arg(short, long, value_name = "ID", value_delimiter = ',')]
    pub annotate: Vec<SampleId>,

    /// Print a text summary of the loaded tables and exit without a window
    #[arg(long)]
    pub summary: bool,
}

/// Root structure of the TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub data: DataSection,
    #[serde(default)]
    pub annotations: AnnotationSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSection {
    /// Directory holding the five CSV tables.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotationSection {
    /// Sample ids called out on the ratio chart.
    pub samples: Option<Vec<SampleId>>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

/// Effective settings after all layers are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub annotated_samples: BTreeSet<SampleId>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            annotated_samples: BTreeSet::from(DEFAULT_ANNOTATED),
        }
    }
}

impl DashboardConfig {
    /// Resolve defaults, the `--config` file (if given) and CLI flags.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::layered(file, cli))
    }

    fn layered(file: FileConfig, cli: &Cli) -> Self {
        let mut config = Self::default();
        if let Some(dir) = file.data.dir {
            config.data_dir = dir;
        }
        if let Some(samples) = file.annotations.samples {
            config.annotated_samples = samples.into_iter().collect();
        }
        if let Some(dir) = &cli.data_dir {
            config.data_dir = dir.clone();
        }
        if !cli.annotate.is_empty() {
            config.annotated_samples = cli.annotate.iter().copied().collect();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("rusty-sherds").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::resolve(&cli(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.annotated_samples, BTreeSet::from([163, 183]));
    }

    #[test]
    fn test_parse_file_config() {
        let toml = r#"
            [data]
            dir = "/srv/ditch2"

            [annotations]
            samples = [7, 11]
        "#;
        let file = FileConfig::from_str(toml).unwrap();
        let config = DashboardConfig::layered(file, &cli(&[]));
        assert_eq!(config.data_dir, PathBuf::from("/srv/ditch2"));
        assert_eq!(config.annotated_samples, BTreeSet::from([7, 11]));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig::from_str("[data]\ndir = \"/srv/ditch2\"\n").unwrap();
        let config = DashboardConfig::layered(file, &cli(&["--data-dir", "/tmp/x", "--annotate", "1,2", "-a", "3"]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/x"));
        assert_eq!(config.annotated_samples, BTreeSet::from([1, 2, 3]));
    }

    #[test]
    fn test_empty_annotation_list_in_file() {
        let file = FileConfig::from_str("[annotations]\nsamples = []\n").unwrap();
        let config = DashboardConfig::layered(file, &cli(&[]));
        assert!(config.annotated_samples.is_empty());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(FileConfig::from_str("[data]\ndirectory = \"x\"\n").is_err());
    }

    #[test]
    fn test_config_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sherds.toml");
        std::fs::write(&path, "[annotations]\nsamples = [42]\n").unwrap();

        let config = DashboardConfig::resolve(&cli(&["--config", path.to_str().unwrap()])).unwrap();
        assert_eq!(config.annotated_samples, BTreeSet::from([42]));

        let missing = dir.path().join("missing.toml");
        assert!(DashboardConfig::resolve(&cli(&["-c", missing.to_str().unwrap()])).is_err());
    }
}
