//! CSV loading and saving through polars.
//!
//! Files are UTF-8, comma separated, with a header row. Missing values are
//! written as empty fields and read back as absent.

use crate::dataset::Dataset;
use crate::error::{Result, ResultExt};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info};

/// Read a CSV file into a [`Dataset`].
///
/// Column types are inferred by polars from every row; text columns that are
/// mostly numeric are left to the type inference pass.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();

    let df = CsvReadOptions::default()
        .with_infer_schema_length(None)
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Opening '{}'", path.display()))?
        .finish()
        .context(format!("Parsing '{}'", path.display()))?;

    debug!("Loaded {} with shape {:?}", path.display(), df.shape());
    Dataset::from_dataframe(&df)
}

/// Write a [`Dataset`] to a CSV file, creating parent directories as needed.
pub fn write_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut df = dataset.to_dataframe()?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context(format!("Writing '{}'", path.display()))?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}
