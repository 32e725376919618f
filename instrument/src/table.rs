//! Column-oriented storage for recorded events.

use std::collections::{BTreeMap, HashMap};

/// One scalar value captured from an event field.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    U64(u64),
    I64(i64),
    F64(f64),
    Bool(bool),
    Str(String),
}

/// A column of typed values.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedColumn {
    U64(Vec<u64>),
    I64(Vec<i64>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl TypedColumn {
    /// A column of the cell's type holding `rows` default values.
    fn defaults_like(cell: &Cell, rows: usize) -> Self {
        match cell {
            Cell::U64(_) => TypedColumn::U64(vec![0; rows]),
            Cell::I64(_) => TypedColumn::I64(vec![0; rows]),
            Cell::F64(_) => TypedColumn::F64(vec![0.0; rows]),
            Cell::Bool(_) => TypedColumn::Bool(vec![false; rows]),
            Cell::Str(_) => TypedColumn::Str(vec![String::new(); rows]),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TypedColumn::U64(v) => v.len(),
            TypedColumn::I64(v) => v.len(),
            TypedColumn::F64(v) => v.len(),
            TypedColumn::Bool(v) => v.len(),
            TypedColumn::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a value. A cell of the wrong type appends the column default
    /// so rows stay aligned.
    fn push(&mut self, cell: Cell) {
        match (self, cell) {
            (TypedColumn::U64(v), Cell::U64(x)) => v.push(x),
            (TypedColumn::I64(v), Cell::I64(x)) => v.push(x),
            (TypedColumn::F64(v), Cell::F64(x)) => v.push(x),
            (TypedColumn::Bool(v), Cell::Bool(x)) => v.push(x),
            (TypedColumn::Str(v), Cell::Str(x)) => v.push(x),
            (col, _) => col.pad_to(col.len() + 1),
        }
    }

    fn pad_to(&mut self, rows: usize) {
        let missing = rows.saturating_sub(self.len());
        match self {
            TypedColumn::U64(v) => v.extend(std::iter::repeat_n(0, missing)),
            TypedColumn::I64(v) => v.extend(std::iter::repeat_n(0, missing)),
            TypedColumn::F64(v) => v.extend(std::iter::repeat_n(0.0, missing)),
            TypedColumn::Bool(v) => v.extend(std::iter::repeat_n(false, missing)),
            TypedColumn::Str(v) => v.extend(std::iter::repeat_n(String::new(), missing)),
        }
    }

    /// Render every value as a string key, for grouping.
    fn keys(&self) -> Vec<String> {
        match self {
            TypedColumn::U64(v) => v.iter().map(|x| x.to_string()).collect(),
            TypedColumn::I64(v) => v.iter().map(|x| x.to_string()).collect(),
            TypedColumn::F64(v) => v.iter().map(|x| x.to_string()).collect(),
            TypedColumn::Bool(v) => v.iter().map(|x| x.to_string()).collect(),
            TypedColumn::Str(v) => v.clone(),
        }
    }
}

/// Rows of one event target. Columns appear the first time a field is seen
/// and are back-filled with defaults for earlier rows.
#[derive(Debug, Clone, Default)]
pub struct DynamicTable {
    pub columns: HashMap<String, TypedColumn>,
    pub row_count: usize,
}

impl DynamicTable {
    /// Append one row. Columns the row does not mention get a default value.
    pub fn push_row(&mut self, row: Vec<(String, Cell)>) {
        for (name, cell) in row {
            let rows = self.row_count;
            self.columns
                .entry(name)
                .or_insert_with(|| TypedColumn::defaults_like(&cell, rows))
                .push(cell);
        }
        self.row_count += 1;
        for col in self.columns.values_mut() {
            col.pad_to(self.row_count);
        }
    }

    pub fn u64s(&self, column: &str) -> Option<&[u64]> {
        match self.columns.get(column)? {
            TypedColumn::U64(v) => Some(v),
            _ => None,
        }
    }

    pub fn f64s(&self, column: &str) -> Option<&[f64]> {
        match self.columns.get(column)? {
            TypedColumn::F64(v) => Some(v),
            _ => None,
        }
    }

    pub fn bools(&self, column: &str) -> Option<&[bool]> {
        match self.columns.get(column)? {
            TypedColumn::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn strs(&self, column: &str) -> Option<&[String]> {
        match self.columns.get(column)? {
            TypedColumn::Str(v) => Some(v),
            _ => None,
        }
    }

    /// How many rows carry each distinct value of `column`.
    pub fn value_counts(&self, column: &str) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        if let Some(col) = self.columns.get(column) {
            for key in col.keys() {
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Every table recorded so far, keyed by tracing target.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub tables: HashMap<String, DynamicTable>,
}

impl Recorder {
    pub fn table(&self, target: &str) -> Option<&DynamicTable> {
        self.tables.get(target)
    }

    /// Number of events seen for `target` (0 if none).
    pub fn rows(&self, target: &str) -> usize {
        self.table(target).map_or(0, |t| t.row_count)
    }

    /// Value counts of `column` within `target`, e.g. deaths by cause.
    pub fn count_by(&self, target: &str, column: &str) -> BTreeMap<String, usize> {
        self.table(target)
            .map(|t| t.value_counts(column))
            .unwrap_or_default()
    }

    pub(crate) fn push(&mut self, target: &str, row: Vec<(String, Cell)>) {
        self.tables
            .entry(target.to_string())
            .or_default()
            .push_row(row);
    }
}
