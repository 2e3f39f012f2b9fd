use serde_json::json;
use std::collections::BTreeSet;

use crate::config::Config;
use crate::directory::{self, Record};
use crate::ipc::handlers::records;
use crate::ipc::helpers::{require_confirmation, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::{Employee, Teacher};

/// Removing a staff member drops any warden flag they held.
fn staff_delete<R: Record>(
    records: &mut Vec<R>,
    wardens: &mut BTreeSet<String>,
    config: &Config,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let staff_id = records::require_existing::<R>(records, params)?;
    let is_warden = wardens.contains(&staff_id);
    let id_key = records::id_key::<R>();
    require_confirmation(
        config,
        params,
        json!({ id_key: staff_id, "isWarden": is_warden }),
    )?;

    directory::remove(records, &staff_id)?;
    wardens.remove(&staff_id);
    tracing::info!(kind = R::KIND, id = %staff_id, was_warden = is_warden, "staff deleted");
    Ok(json!({ "deleted": staff_id, "wardenRemoved": is_warden }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let school = &mut state.school;
    let params = &req.params;
    let result = match req.method.as_str() {
        "teachers.list" => records::list(&school.teachers, params),
        "teachers.create" => records::create(&mut school.teachers, params),
        "teachers.update" => records::update(&mut school.teachers, params),
        "teachers.delete" => staff_delete::<Teacher>(
            &mut school.teachers,
            &mut school.warden_ids,
            &state.config,
            params,
        ),
        "employees.list" => records::list(&school.employees, params),
        "employees.create" => records::create(&mut school.employees, params),
        "employees.update" => records::update(&mut school.employees, params),
        "employees.delete" => staff_delete::<Employee>(
            &mut school.employees,
            &mut school.warden_ids,
            &state.config,
            params,
        ),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
