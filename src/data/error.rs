use std::path::PathBuf;

/// Errors raised while reading one input table.
///
/// None of these are fatal to the application: the loader turns each one
/// into a [`Diagnostic`](super::model::Diagnostic) and carries on with the
/// table marked as unavailable.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// The CSV file does not exist
    #[error("Missing input file: {}", .path.display())]
    MissingFile { path: PathBuf },

    /// Ragged rows, invalid UTF-8 or any other CSV-level failure
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A column the table cannot be interpreted without
    #[error("{}: missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// Any other I/O failure while opening the file
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DataError {
    pub fn missing_column(path: impl Into<PathBuf>, column: &str) -> Self {
        DataError::MissingColumn {
            path: path.into(),
            column: column.to_string(),
        }
    }
}
