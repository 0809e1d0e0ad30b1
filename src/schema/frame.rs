//! Columnar batch of feature rows, the unit the schema enforcer casts.

use super::ColumnType;
use crate::error::SchemaError;
use crate::features::TransactionFeatures;
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Cells as decoded from JSON, not yet typed
    Raw(Vec<Value>),
    /// Untyped numeric output of the assembler
    Float64(Vec<f64>),
    Int8(Vec<i8>),
    Float32(Vec<f32>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Raw(v) => v.len(),
            Column::Float64(v) => v.len(),
            Column::Int8(v) => v.len(),
            Column::Float32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared type, if the column has already been cast.
    pub fn dtype(&self) -> Option<ColumnType> {
        match self {
            Column::Int8(_) => Some(ColumnType::Int8),
            Column::Float32(_) => Some(ColumnType::Float32),
            Column::Raw(_) | Column::Float64(_) => None,
        }
    }

    fn cell(&self, row: usize) -> Value {
        match self {
            Column::Raw(v) => v[row].clone(),
            Column::Float64(v) => float_value(v[row]),
            Column::Int8(v) => Value::from(v[row]),
            Column::Float32(v) => float_value(v[row] as f64),
        }
    }

    /// Cast every cell to `dtype`; the first failing cell aborts the cast.
    pub fn cast(&self, name: &str, dtype: ColumnType) -> Result<Column, SchemaError> {
        match (self, dtype) {
            (Column::Int8(_), ColumnType::Int8) | (Column::Float32(_), ColumnType::Float32) => {
                Ok(self.clone())
            }
            (Column::Int8(v), ColumnType::Float32) => {
                Ok(Column::Float32(v.iter().map(|&x| x as f32).collect()))
            }
            (Column::Float32(v), ColumnType::Int8) => v
                .iter()
                .enumerate()
                .map(|(row, &x)| to_int8(name, row, x as f64))
                .collect::<Result<Vec<_>, _>>()
                .map(Column::Int8),
            (Column::Float64(v), ColumnType::Int8) => v
                .iter()
                .enumerate()
                .map(|(row, &x)| to_int8(name, row, x))
                .collect::<Result<Vec<_>, _>>()
                .map(Column::Int8),
            (Column::Float64(v), ColumnType::Float32) => {
                Ok(Column::Float32(v.iter().map(|&x| x as f32).collect()))
            }
            (Column::Raw(v), _) => {
                let numbers = v
                    .iter()
                    .enumerate()
                    .map(|(row, cell)| numeric_cell(name, row, cell, dtype))
                    .collect::<Result<Vec<_>, _>>()?;
                Column::Float64(numbers).cast(name, dtype)
            }
        }
    }
}

fn float_value(x: f64) -> Value {
    Number::from_f64(x).map(Value::Number).unwrap_or(Value::Null)
}

fn cast_error(name: &str, row: usize, value: String, dtype: ColumnType) -> SchemaError {
    SchemaError::Cast {
        column: name.to_string(),
        row,
        value,
        dtype: dtype.as_str(),
    }
}

fn numeric_cell(name: &str, row: usize, cell: &Value, dtype: ColumnType) -> Result<f64, SchemaError> {
    match cell {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| cast_error(name, row, n.to_string(), dtype)),
        Value::Bool(b) => Ok(*b as u8 as f64),
        other => Err(cast_error(name, row, other.to_string(), dtype)),
    }
}

fn to_int8(name: &str, row: usize, x: f64) -> Result<i8, SchemaError> {
    let fits = x.is_finite() && x.fract() == 0.0 && x >= i8::MIN as f64 && x <= i8::MAX as f64;
    if !fits {
        return Err(cast_error(name, row, x.to_string(), ColumnType::Int8));
    }
    Ok(x as i8)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureFrame {
    rows: usize,
    columns: Vec<(String, Column)>,
}

impl FeatureFrame {
    /// Columns in schema order. The label column exists only if every row carries it.
    pub fn from_features(rows: &[TransactionFeatures]) -> Result<Self, SchemaError> {
        let with_label = rows.iter().filter(|r| r.is_fraud.is_some()).count();
        if with_label != 0 && with_label != rows.len() {
            return Err(SchemaError::LabelMismatch {
                with_label,
                rows: rows.len(),
            });
        }
        let mut columns: Vec<(String, Column)> = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            for (j, (name, value)) in row.column_values().into_iter().enumerate() {
                if i == 0 {
                    columns.push((name.to_string(), Column::Float64(Vec::with_capacity(rows.len()))));
                }
                if let Column::Float64(cells) = &mut columns[j].1 {
                    cells.push(value);
                }
            }
        }
        Ok(Self {
            rows: rows.len(),
            columns,
        })
    }

    /// Batch of one.
    pub fn single(row: &TransactionFeatures) -> Self {
        let columns = row
            .column_values()
            .into_iter()
            .map(|(name, value)| (name.to_string(), Column::Float64(vec![value])))
            .collect();
        Self { rows: 1, columns }
    }

    /// Columns are the union of keys in first-seen order; every row must carry every column.
    pub fn from_json_rows(rows: &[Map<String, Value>]) -> Result<Self, SchemaError> {
        let mut names: Vec<&String> = Vec::new();
        for row in rows {
            for key in row.keys() {
                if !names.contains(&key) {
                    names.push(key);
                }
            }
        }
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let cells: Vec<Value> = rows.iter().filter_map(|r| r.get(name).cloned()).collect();
            if cells.len() != rows.len() {
                return Err(SchemaError::RaggedColumn {
                    column: name.clone(),
                    expected: rows.len(),
                    actual: cells.len(),
                });
            }
            columns.push((name.clone(), Column::Raw(cells)));
        }
        Ok(Self {
            rows: rows.len(),
            columns,
        })
    }

    pub(super) fn from_parts(rows: usize, columns: Vec<(String, Column)>) -> Self {
        Self { rows, columns }
    }

    pub(super) fn columns(&self) -> &[(String, Column)] {
        &self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// One JSON object per row, columns in frame order.
    pub fn to_rows(&self) -> Vec<Map<String, Value>> {
        (0..self.rows)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|(name, col)| (name.clone(), col.cell(row)))
                    .collect()
            })
            .collect()
    }
}
