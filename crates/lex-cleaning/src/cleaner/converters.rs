//! Cell-level conversion functions used by the type corrector.

use crate::config::TargetType;
use crate::dataset::{Cell, ColumnType};
use crate::utils::{is_integral, is_numeric_literal, parse_boolean_token, parse_numeric_literal};

/// Why a single cell could not be cast.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CastFailure {
    pub row: usize,
    pub value: String,
    pub reason: &'static str,
}

/// Lowercase every text cell; other cells are copied unchanged.
pub(crate) fn lowercase_cells(cells: &[Cell]) -> Vec<Cell> {
    cells
        .iter()
        .map(|cell| match cell {
            Cell::Text(s) => Cell::Text(s.to_lowercase()),
            other => other.clone(),
        })
        .collect()
}

/// `(numeric, present)`: how many present text cells parse as numbers, out of
/// how many present cells.
pub(crate) fn count_numeric_cells(cells: &[Cell]) -> (usize, usize) {
    let mut numeric = 0;
    let mut present = 0;
    for cell in cells {
        match cell {
            Cell::Absent => {}
            Cell::Text(s) => {
                present += 1;
                if is_numeric_literal(s) {
                    numeric += 1;
                }
            }
            Cell::Number(_) => {
                present += 1;
                numeric += 1;
            }
            Cell::Bool(_) => present += 1,
        }
    }
    (numeric, present)
}

/// Parse text cells as numbers; unparseable values become absent.
///
/// Returns the new cells, the resulting numeric type, and how many present
/// values were discarded. The type is [`ColumnType::Integer`] only when
/// nothing was discarded and every parsed value is whole.
pub(crate) fn coerce_to_numeric(cells: &[Cell]) -> (Vec<Cell>, ColumnType, usize) {
    let mut discarded = 0;
    let coerced: Vec<Cell> = cells
        .iter()
        .map(|cell| match cell {
            Cell::Absent => Cell::Absent,
            Cell::Number(n) => Cell::Number(*n),
            Cell::Text(s) => match parse_numeric_literal(s) {
                Some(n) => Cell::Number(n),
                None => {
                    discarded += 1;
                    Cell::Absent
                }
            },
            Cell::Bool(_) => {
                discarded += 1;
                Cell::Absent
            }
        })
        .collect();

    let all_integral = coerced
        .iter()
        .filter_map(Cell::as_number)
        .all(is_integral);
    let dtype = if discarded == 0 && all_integral {
        ColumnType::Integer
    } else {
        ColumnType::Float
    };

    (coerced, dtype, discarded)
}

/// Cast every cell to `target`, stopping at the first cell that cannot be cast.
pub(crate) fn cast_cells(cells: &[Cell], target: TargetType) -> Result<Vec<Cell>, CastFailure> {
    cells
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            cast_cell(cell, target).map_err(|reason| CastFailure {
                row,
                value: cell.to_string(),
                reason,
            })
        })
        .collect()
}

/// Column type produced by a cast to `target`.
pub(crate) fn target_column_type(target: TargetType) -> ColumnType {
    match target {
        TargetType::Integer => ColumnType::Integer,
        TargetType::Float => ColumnType::Float,
        TargetType::Text => ColumnType::Text,
        TargetType::Boolean => ColumnType::Boolean,
    }
}

fn cast_cell(cell: &Cell, target: TargetType) -> Result<Cell, &'static str> {
    match target {
        TargetType::Integer => to_integer(cell),
        TargetType::Float => to_float(cell),
        TargetType::Text => Ok(cell.render().map_or(Cell::Absent, Cell::Text)),
        TargetType::Boolean => to_boolean(cell),
    }
}

fn to_integer(cell: &Cell) -> Result<Cell, &'static str> {
    match cell {
        Cell::Absent => Err("missing values cannot be stored as integers"),
        Cell::Number(n) if is_integral(n.trunc()) => Ok(Cell::Number(n.trunc())),
        Cell::Number(_) => Err("value is outside the integer range"),
        Cell::Bool(b) => Ok(Cell::Number(if *b { 1.0 } else { 0.0 })),
        Cell::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(|i| Cell::Number(i as f64))
            .map_err(|_| "not an integer literal"),
    }
}

fn to_float(cell: &Cell) -> Result<Cell, &'static str> {
    match cell {
        Cell::Absent => Ok(Cell::Absent),
        Cell::Number(n) => Ok(Cell::Number(*n)),
        Cell::Bool(b) => Ok(Cell::Number(if *b { 1.0 } else { 0.0 })),
        Cell::Text(s) => parse_numeric_literal(s)
            .map(Cell::Number)
            .ok_or("not a numeric literal"),
    }
}

fn to_boolean(cell: &Cell) -> Result<Cell, &'static str> {
    match cell {
        Cell::Absent => Ok(Cell::Absent),
        Cell::Number(n) => Ok(Cell::Bool(*n != 0.0)),
        Cell::Bool(b) => Ok(Cell::Bool(*b)),
        Cell::Text(s) => parse_boolean_token(s)
            .map(Cell::Bool)
            .ok_or("not a boolean token"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[Option<&str>]) -> Vec<Cell> {
        values.iter().map(|v| Cell::from_text(*v)).collect()
    }

    #[test]
    fn test_lowercase_cells() {
        let cells = lowercase_cells(&[Cell::Text("MiXeD".to_string()), Cell::Number(1.0)]);
        assert_eq!(cells, vec![Cell::Text("mixed".to_string()), Cell::Number(1.0)]);
    }

    #[test]
    fn test_count_numeric_cells_ignores_absent() {
        let cells = texts(&[Some("1"), Some("x"), None, Some("2.5")]);
        assert_eq!(count_numeric_cells(&cells), (2, 3));
    }

    #[test]
    fn test_coerce_to_numeric_integer_column() {
        let (cells, dtype, discarded) = coerce_to_numeric(&texts(&[Some("1"), None, Some(" 7 ")]));
        assert_eq!(dtype, ColumnType::Integer);
        assert_eq!(discarded, 0);
        assert_eq!(cells, vec![Cell::Number(1.0), Cell::Absent, Cell::Number(7.0)]);
    }

    #[test]
    fn test_coerce_to_numeric_discards_bad_values() {
        let (cells, dtype, discarded) = coerce_to_numeric(&texts(&[Some("1"), Some("oops")]));
        assert_eq!(dtype, ColumnType::Float);
        assert_eq!(discarded, 1);
        assert_eq!(cells[1], Cell::Absent);
    }

    #[test]
    fn test_cast_to_integer() {
        let cells = vec![Cell::Number(2.9), Cell::Bool(true), Cell::Text("-4".to_string())];
        assert_eq!(
            cast_cells(&cells, TargetType::Integer).unwrap(),
            vec![Cell::Number(2.0), Cell::Number(1.0), Cell::Number(-4.0)]
        );
    }

    #[test]
    fn test_cast_to_integer_rejects_absent_and_fractions() {
        let failure = cast_cells(&[Cell::Number(1.0), Cell::Absent], TargetType::Integer)
            .unwrap_err();
        assert_eq!(failure.row, 1);
        assert_eq!(failure.value, "null");

        assert!(cast_cells(&[Cell::Text("3.5".to_string())], TargetType::Integer).is_err());
    }

    #[test]
    fn test_cast_to_integer_rejects_out_of_range() {
        let failure = cast_cells(&[Cell::Number(7.0), Cell::Number(1e20)], TargetType::Integer)
            .unwrap_err();
        assert_eq!(failure.row, 1);
        assert_eq!(failure.reason, "value is outside the integer range");

        let failure = cast_cells(&[Cell::Number(f64::NEG_INFINITY)], TargetType::Integer)
            .unwrap_err();
        assert_eq!(failure.row, 0);
    }

    #[test]
    fn test_cast_to_float_keeps_absent() {
        let cells = texts(&[Some("1.5"), None]);
        assert_eq!(
            cast_cells(&cells, TargetType::Float).unwrap(),
            vec![Cell::Number(1.5), Cell::Absent]
        );
        assert!(cast_cells(&texts(&[Some("abc")]), TargetType::Float).is_err());
    }

    #[test]
    fn test_cast_to_text() {
        let cells = vec![Cell::Number(3.0), Cell::Bool(false), Cell::Absent];
        assert_eq!(
            cast_cells(&cells, TargetType::Text).unwrap(),
            vec![
                Cell::Text("3".to_string()),
                Cell::Text("false".to_string()),
                Cell::Absent
            ]
        );
    }

    #[test]
    fn test_cast_to_boolean() {
        let cells = vec![Cell::Number(0.0), Cell::Number(2.0), Cell::Text("Yes".to_string())];
        assert_eq!(
            cast_cells(&cells, TargetType::Boolean).unwrap(),
            vec![Cell::Bool(false), Cell::Bool(true), Cell::Bool(true)]
        );
        let failure = cast_cells(&texts(&[Some("maybe")]), TargetType::Boolean).unwrap_err();
        assert_eq!(failure.reason, "not a boolean token");
    }
}
