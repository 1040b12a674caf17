use serde_json::Value;
use thiserror::Error;

use crate::domain::entity::{EntityKind, FieldKind, FieldSpec};
use crate::domain::record::RawRecord;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("field unavailable: {field}")]
    FieldUnavailable { field: &'static str },
    #[error("field {field}: expected {expected}, found {found}")]
    TypeMismatch {
        field: &'static str,
        expected: FieldKind,
        found: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl FieldValue {
    pub fn to_cell(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(value) => value.clone(),
            FieldValue::Integer(value) => value.to_string(),
            FieldValue::Float(value) => float_cell(*value),
            FieldValue::Bool(value) => value.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

// Integral floats keep their `.0` so the cell still reads back as a float.
fn float_cell(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// One record projected onto the ordered field set of its entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    entity: EntityKind,
    values: Vec<FieldValue>,
    author_ref: Option<String>,
}

impl Projection {
    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.entity
            .fields()
            .iter()
            .position(|spec| spec.name == field)
            .and_then(|idx| self.values.get(idx))
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(FieldValue::as_text)
    }

    pub fn author_ref(&self) -> Option<&str> {
        self.author_ref.as_deref()
    }

    pub fn set_author_ref(&mut self, author_ref: Option<String>) {
        self.author_ref = author_ref;
    }

    /// Cells in header order; entities carrying an author reference end with it,
    /// empty when the author did not resolve.
    pub fn cells(&self) -> Vec<String> {
        let mut cells: Vec<String> = self.values.iter().map(FieldValue::to_cell).collect();
        if self.entity.carries_author_ref() {
            cells.push(self.author_ref.clone().unwrap_or_default());
        }
        cells
    }
}

/// Reads `fields` off `record`. A missing record maps every field to empty.
pub fn project_fields(
    record: Option<&RawRecord>,
    fields: &[FieldSpec],
) -> Result<Vec<(&'static str, FieldValue)>, ProjectionError> {
    let Some(record) = record else {
        return Ok(fields.iter().map(|spec| (spec.name, FieldValue::Empty)).collect());
    };
    let mut projected = Vec::with_capacity(fields.len());
    for spec in fields {
        let raw = record
            .attr(spec.name)
            .ok_or(ProjectionError::FieldUnavailable { field: spec.name })?;
        projected.push((spec.name, convert(spec, raw)?));
    }
    Ok(projected)
}

pub fn project(record: &RawRecord, entity: EntityKind) -> Result<Projection, ProjectionError> {
    let values = project_fields(Some(record), entity.fields())?
        .into_iter()
        .map(|(_, value)| value)
        .collect();
    Ok(Projection {
        entity,
        values,
        author_ref: None,
    })
}

fn convert(spec: &FieldSpec, raw: &Value) -> Result<FieldValue, ProjectionError> {
    if raw.is_null() {
        return Ok(FieldValue::Empty);
    }
    let converted = match spec.kind {
        FieldKind::Text => raw.as_str().map(|value| FieldValue::Text(value.to_string())),
        FieldKind::Bool => raw.as_bool().map(FieldValue::Bool),
        FieldKind::Float => raw.as_f64().map(FieldValue::Float),
        FieldKind::Integer => raw.as_i64().map(FieldValue::Integer).or_else(|| {
            raw.as_f64()
                .filter(|value| value.fract() == 0.0)
                .map(|value| FieldValue::Integer(value as i64))
        }),
        FieldKind::Timestamp => raw
            .as_i64()
            .map(FieldValue::Integer)
            .or_else(|| raw.as_f64().map(FieldValue::Float)),
    };
    converted.ok_or(ProjectionError::TypeMismatch {
        field: spec.name,
        expected: spec.kind,
        found: json_type(raw),
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
