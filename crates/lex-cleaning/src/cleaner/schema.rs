//! Column name normalization and renaming.

use crate::dataset::Dataset;
use crate::error::{CleaningError, Result};
use crate::types::{ColumnRename, NameCollision, SchemaReport};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, warn};

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex: whitespace run"));

static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("Invalid regex: disallowed chars"));

/// Normalizes and renames dataset columns.
pub struct SchemaNormalizer;

impl SchemaNormalizer {
    /// Normalize a single column name.
    ///
    /// Steps, in order: trim, collapse whitespace runs to `_`, drop every
    /// character outside `[A-Za-z0-9_]`, lowercase, and prefix `_` when the
    /// result starts with a digit. The function is idempotent.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// assert_eq!(SchemaNormalizer::normalize_name(" User Name! "), "user_name");
    /// assert_eq!(SchemaNormalizer::normalize_name("2cost"), "_2cost");
    /// ```
    pub fn normalize_name(name: &str) -> String {
        let underscored = WHITESPACE_RUN.replace_all(name.trim(), "_");
        let filtered = DISALLOWED_CHARS.replace_all(&underscored, "");
        let mut normalized = filtered.to_ascii_lowercase();
        if normalized.starts_with(|c: char| c.is_ascii_digit()) {
            normalized.insert(0, '_');
        }
        normalized
    }

    /// Normalize every column name in place.
    ///
    /// Columns whose names normalize to the same string are all kept under
    /// that name; each clash is reported so the caller can resolve it.
    pub fn normalize_schema(dataset: &mut Dataset) -> SchemaReport {
        let mut report = SchemaReport::default();
        let mut first_seen: HashMap<String, String> = HashMap::new();

        for index in 0..dataset.width() {
            let original = dataset.columns()[index].name().to_string();
            let normalized = Self::normalize_name(&original);

            match first_seen.get(&normalized) {
                Some(first) if *first != original => {
                    warn!(
                        "Columns '{}' and '{}' both normalize to '{}'",
                        first, original, normalized
                    );
                    report.collisions.push(NameCollision {
                        normalized: normalized.clone(),
                        first: first.clone(),
                        second: original.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    first_seen.insert(normalized.clone(), original.clone());
                }
            }

            if normalized != original {
                debug!("Renamed column '{}' -> '{}'", original, normalized);
                dataset.column_at_mut(index).set_name(normalized.clone());
                report.renamed.push(ColumnRename {
                    from: original,
                    to: normalized,
                });
            }
        }

        report
    }

    /// Rename the first column called `from` to `to`.
    ///
    /// `to` is used verbatim. An empty name, or a name held by another column,
    /// is refused.
    pub fn rename_column(dataset: &mut Dataset, from: &str, to: &str) -> Result<ColumnRename> {
        let index = dataset.require_index(from)?;
        Self::rename_column_at(dataset, index, to)
    }

    /// Rename the column at `index`. Useful when names are duplicated.
    pub fn rename_column_at(dataset: &mut Dataset, index: usize, to: &str) -> Result<ColumnRename> {
        let Some(column) = dataset.columns().get(index) else {
            return Err(CleaningError::ColumnNotFound(format!("#{}", index)));
        };
        let from = column.name().to_string();

        if to.trim().is_empty() {
            return Err(CleaningError::InvalidUserInput {
                column: from,
                reason: "new column name cannot be empty".to_string(),
            });
        }

        let taken = dataset
            .columns()
            .iter()
            .enumerate()
            .any(|(i, c)| i != index && c.name() == to);
        if taken {
            return Err(CleaningError::InvalidUserInput {
                column: from,
                reason: format!("a column named '{}' already exists", to),
            });
        }

        dataset.column_at_mut(index).set_name(to);
        debug!("Renamed column '{}' -> '{}'", from, to);

        Ok(ColumnRename {
            from,
            to: to.to_string(),
        })
    }
}
