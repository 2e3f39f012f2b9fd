//! Student and staff records: sequential ids, create, patch, delete.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{Employee, Student, Teacher};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} fields must be a JSON object")]
    NotAnObject { kind: &'static str },

    #[error("invalid {kind} fields: {source}")]
    InvalidFields {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl DirectoryError {
    pub fn code(&self) -> &'static str {
        match self {
            DirectoryError::NotFound { .. } => "not_found",
            DirectoryError::NotAnObject { .. } | DirectoryError::InvalidFields { .. } => {
                "bad_params"
            }
        }
    }
}

pub trait Record: Serialize + DeserializeOwned {
    const KIND: &'static str;
    const ID_PREFIX: &'static str;
    const ID_WIDTH: usize;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

impl Record for Student {
    const KIND: &'static str = "student";
    const ID_PREFIX: &'static str = "S";
    const ID_WIDTH: usize = 3;

    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Record for Teacher {
    const KIND: &'static str = "teacher";
    const ID_PREFIX: &'static str = "T";
    const ID_WIDTH: usize = 2;

    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Record for Employee {
    const KIND: &'static str = "employee";
    const ID_PREFIX: &'static str = "E";
    const ID_WIDTH: usize = 2;

    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

/// `prefix` + (largest numeric suffix + 1), zero padded to `width`.
/// Ids with a non-numeric suffix, or one too large to increment, are skipped.
pub fn next_sequential_id<'a, I>(prefix: &str, width: usize, ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let next = ids
        .into_iter()
        .filter_map(|id| id.strip_prefix(prefix))
        .filter_map(|n| n.parse::<u64>().ok()?.checked_add(1))
        .max()
        .unwrap_or(1);
    format!("{}{:0width$}", prefix, next, width = width)
}

pub fn next_id<R: Record>(records: &[R]) -> String {
    next_sequential_id(R::ID_PREFIX, R::ID_WIDTH, records.iter().map(Record::id))
}

pub fn search<'a, R: Record>(records: &'a [R], term: Option<&str>) -> Vec<&'a R> {
    records
        .iter()
        .filter(|r| crate::hostel::text_matches(r.name(), term))
        .collect()
}

fn fields_object<R: Record>(fields: &Value) -> Result<Map<String, Value>, DirectoryError> {
    fields
        .as_object()
        .cloned()
        .ok_or(DirectoryError::NotAnObject { kind: R::KIND })
}

fn decode<R: Record>(obj: Map<String, Value>) -> Result<R, DirectoryError> {
    serde_json::from_value(Value::Object(obj))
        .map_err(|source| DirectoryError::InvalidFields { kind: R::KIND, source })
}

/// Any `id` in `fields` is ignored; the next sequential id is used.
pub fn create<'a, R: Record>(records: &'a mut Vec<R>, fields: &Value) -> Result<&'a R, DirectoryError> {
    let mut obj = fields_object::<R>(fields)?;
    obj.insert("id".to_string(), Value::String(next_id(records)));
    let record = decode::<R>(obj)?;
    let idx = records.len();
    records.push(record);
    Ok(&records[idx])
}

/// Shallow merge of `patch` over the stored record. The id cannot change.
pub fn update<'a, R: Record>(
    records: &'a mut [R],
    id: &str,
    patch: &Value,
) -> Result<&'a R, DirectoryError> {
    let patch = fields_object::<R>(patch)?;
    let idx = records
        .iter()
        .position(|r| r.id() == id)
        .ok_or_else(|| DirectoryError::NotFound {
            kind: R::KIND,
            id: id.to_string(),
        })?;

    let current = serde_json::to_value(&records[idx])
        .map_err(|source| DirectoryError::InvalidFields { kind: R::KIND, source })?;
    let mut merged = match current {
        Value::Object(m) => m,
        _ => return Err(DirectoryError::NotAnObject { kind: R::KIND }),
    };
    for (k, v) in patch {
        if k != "id" {
            merged.insert(k, v);
        }
    }
    records[idx] = decode::<R>(merged)?;
    Ok(&records[idx])
}

pub fn remove<R: Record>(records: &mut Vec<R>, id: &str) -> Result<R, DirectoryError> {
    let idx = records
        .iter()
        .position(|r| r.id() == id)
        .ok_or_else(|| DirectoryError::NotFound {
            kind: R::KIND,
            id: id.to_string(),
        })?;
    Ok(records.remove(idx))
}
