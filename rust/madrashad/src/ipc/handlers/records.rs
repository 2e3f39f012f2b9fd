//! List/create/update for any directory record. Params are keyed by the
//! record kind: `students.update` takes `studentId` and `patch`,
//! `teachers.create` takes a `teacher` object, and so on.

use serde_json::json;

use crate::directory::{self, Record};
use crate::ipc::helpers::{get_optional_str, get_required_object, get_required_str, to_json, HandlerErr};

pub fn id_key<R: Record>() -> String {
    format!("{}Id", R::KIND)
}

pub fn list<R: Record>(records: &[R], params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let hits = directory::search(records, get_optional_str(params, "search"));
    Ok(json!({ "items": to_json(&hits)?, "total": records.len() }))
}

pub fn create<R: Record>(records: &mut Vec<R>, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let fields = get_required_object(params, R::KIND)?;
    let created = directory::create(records, fields)?;
    tracing::info!(kind = R::KIND, id = created.id(), "record created");
    to_json(created)
}

pub fn update<R: Record>(records: &mut [R], params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, &id_key::<R>())?;
    let patch = get_required_object(params, "patch")?;
    let updated = directory::update(records, &id, patch)?;
    tracing::info!(kind = R::KIND, id = %id, "record updated");
    to_json(updated)
}

/// Looks the record up before a delete so a missing id reports `not_found`
/// rather than `confirmation_required`.
pub fn require_existing<R: Record>(records: &[R], params: &serde_json::Value) -> Result<String, HandlerErr> {
    let id = get_required_str(params, &id_key::<R>())?;
    if records.iter().any(|r| r.id() == id) {
        Ok(id)
    } else {
        Err(directory::DirectoryError::NotFound { kind: R::KIND, id }.into())
    }
}
