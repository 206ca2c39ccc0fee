//! The in-memory tabular dataset every cleaning operation works on.
//!
//! A [`Dataset`] is an ordered list of named [`Column`]s of equal length. Each
//! column declares a [`ColumnType`] and holds one [`Cell`] per row. Missing
//! values are the explicit [`Cell::Absent`] marker, never an empty string or a
//! zero.
//!
//! Engine operations receive `&mut Dataset` and either apply completely or
//! leave the dataset untouched. Row `i` always refers to the same logical
//! record in every column.

mod frame;

use crate::error::{CleaningError, Result};
use crate::utils::is_integral;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers.
    Integer,
    /// Floating point numbers.
    Float,
    /// Free text or categorical labels.
    Text,
    /// True/false values.
    Boolean,
    /// No type could be established (e.g. every value is missing).
    Unresolved,
}

impl ColumnType {
    /// Integer and float columns are both numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Human-readable type name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Unresolved => "unresolved",
        }
    }

    /// Whether a cell may be stored in a column of this type.
    fn accepts(&self, cell: &Cell) -> bool {
        match (self, cell) {
            (_, Cell::Absent) => true,
            (Self::Integer, Cell::Number(n)) => is_integral(*n),
            (Self::Float, Cell::Number(n)) => !n.is_nan(),
            (Self::Text, Cell::Text(_)) => true,
            (Self::Boolean, Cell::Bool(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A single value of a column, or the explicit missing marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
    Absent,
}

impl Cell {
    /// Build a cell from an optional number. NaN is treated as missing.
    pub fn from_number(value: Option<f64>) -> Self {
        match value {
            Some(n) if !n.is_nan() => Self::Number(n),
            _ => Self::Absent,
        }
    }

    /// Build a cell from optional text.
    pub fn from_text(value: Option<&str>) -> Self {
        value.map_or(Self::Absent, |s| Self::Text(s.to_string()))
    }

    /// Build a cell from an optional boolean.
    pub fn from_bool(value: Option<bool>) -> Self {
        value.map_or(Self::Absent, Self::Bool)
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Canonical text form of the value, `None` for [`Cell::Absent`].
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Absent => None,
        }
    }

    /// Hashable identity of the cell, used for row comparisons.
    pub(crate) fn key(&self) -> CellKey<'_> {
        match self {
            // -0.0 and 0.0 compare equal, so they must hash equal too
            Self::Number(n) if *n == 0.0 => CellKey::Number(0.0f64.to_bits()),
            Self::Number(n) => CellKey::Number(n.to_bits()),
            Self::Text(s) => CellKey::Text(s.as_str()),
            Self::Bool(b) => CellKey::Bool(*b),
            Self::Absent => CellKey::Absent,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Some(text) => f.write_str(&text),
            None => f.write_str("null"),
        }
    }
}

/// Borrowed, hashable view of a [`Cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CellKey<'a> {
    Number(u64),
    Text(&'a str),
    Bool(bool),
    Absent,
}

/// A named, typed sequence of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    dtype: ColumnType,
    cells: Vec<Cell>,
}

impl Column {
    /// Create a column from raw cells. Cell kinds are checked when the column
    /// is placed in a [`Dataset`].
    pub fn new(name: impl Into<String>, dtype: ColumnType, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            dtype,
            cells,
        }
    }

    /// Create a float column; `None` and NaN become [`Cell::Absent`].
    pub fn float(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let cells = values.into_iter().map(Cell::from_number).collect();
        Self::new(name, ColumnType::Float, cells)
    }

    /// Create an integer column.
    pub fn integer(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        let cells = values
            .into_iter()
            .map(|v| Cell::from_number(v.map(|i| i as f64)))
            .collect();
        Self::new(name, ColumnType::Integer, cells)
    }

    /// Create a text column.
    pub fn text(name: impl Into<String>, values: Vec<Option<&str>>) -> Self {
        let cells = values.into_iter().map(Cell::from_text).collect();
        Self::new(name, ColumnType::Text, cells)
    }

    /// Create a boolean column.
    pub fn boolean(name: impl Into<String>, values: Vec<Option<bool>>) -> Self {
        let cells = values.into_iter().map(Cell::from_bool).collect();
        Self::new(name, ColumnType::Boolean, cells)
    }

    /// Create a column of `len` missing values with no resolved type.
    pub fn unresolved(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, ColumnType::Unresolved, vec![Cell::Absent; len])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> ColumnType {
        self.dtype
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of [`Cell::Absent`] cells.
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_absent()).count()
    }

    /// Number of present (non-absent) cells.
    pub fn present_count(&self) -> usize {
        self.len() - self.missing_count()
    }

    /// Present numeric values in row order.
    pub fn present_numbers(&self) -> Vec<f64> {
        self.cells.iter().filter_map(Cell::as_number).collect()
    }

    /// Present text values in row order.
    pub fn present_texts(&self) -> Vec<&str> {
        self.cells.iter().filter_map(Cell::as_text).collect()
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replace the cells and type in one step so both always agree.
    pub(crate) fn replace_contents(&mut self, dtype: ColumnType, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.cells.len());
        self.dtype = dtype;
        self.cells = cells;
    }

    /// First cell that does not fit the declared type, with its row.
    fn first_mismatch(&self) -> Option<(usize, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .find(|(_, cell)| !self.dtype.accepts(cell))
    }
}

/// Rectangular collection of equally long columns.
///
/// Deserialization goes through [`Dataset::new`], so ragged or mistyped
/// input is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    columns: Vec<Column>,
}

#[derive(Deserialize)]
struct RawDataset {
    columns: Vec<Column>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = CleaningError;

    fn try_from(raw: RawDataset) -> Result<Self> {
        Dataset::new(raw.columns)
    }
}

static_assertions::assert_impl_all!(Dataset: Send, Sync);

impl Dataset {
    /// Build a dataset, checking that all columns have the same length and
    /// that every cell fits its column's type.
    ///
    /// Duplicate column names are allowed; name lookups resolve to the first
    /// match.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let height = first.len();
            if let Some(ragged) = columns.iter().find(|c| c.len() != height) {
                return Err(CleaningError::InvalidDataset(format!(
                    "column '{}' has {} rows, expected {}",
                    ragged.name(),
                    ragged.len(),
                    height
                )));
            }
        }

        for column in &columns {
            if let Some((row, cell)) = column.first_mismatch() {
                return Err(CleaningError::InvalidDataset(format!(
                    "column '{}' is {} but row {} holds {:?}",
                    column.name(),
                    column.dtype(),
                    row,
                    cell
                )));
            }
        }

        Ok(Self { columns })
    }

    /// A dataset with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// First column with the given name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Position of the first column with the given name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Like [`Dataset::column_index`] but reports a missing column as an error.
    pub fn require_index(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| CleaningError::ColumnNotFound(name.to_string()))
    }

    /// The cells of row `index`, one per column.
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.height() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.cells()[index]).collect())
    }

    /// Total number of absent cells.
    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// `true` for each row that does not repeat an earlier row in every column.
    pub(crate) fn first_occurrence_mask(&self) -> Vec<bool> {
        let height = self.height();
        let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(height);
        (0..height)
            .map(|row| {
                let key: Vec<CellKey<'_>> = self
                    .columns
                    .iter()
                    .map(|column| column.cells[row].key())
                    .collect();
                seen.insert(key)
            })
            .collect()
    }

    pub(crate) fn column_at_mut(&mut self, index: usize) -> &mut Column {
        &mut self.columns[index]
    }

    /// Keep only the rows whose mask entry is `true`, in every column at once.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.height());
        for column in &mut self.columns {
            let mut mask = keep.iter();
            column.cells.retain(|_| *mask.next().unwrap_or(&false));
        }
    }

    /// Remove columns by position. Positions must be valid.
    pub(crate) fn remove_columns(&mut self, indices: &[usize]) {
        let mut position = 0;
        self.columns.retain(|_| {
            let keep = !indices.contains(&position);
            position += 1;
            keep
        });
    }
}
