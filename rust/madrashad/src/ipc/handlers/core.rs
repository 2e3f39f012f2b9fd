use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    let school = &state.school;
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "seed": state.config.seed,
            "counts": {
                "students": school.students.len(),
                "teachers": school.teachers.len(),
                "employees": school.employees.len(),
                "rooms": school.rooms.len(),
                "wardens": school.warden_ids.len()
            },
            "allocation": {
                "enforceCapacity": state.config.allocation.enforce_capacity,
                "rosterConflicts": state.config.allocation.roster_conflicts
            },
            "confirmDeletes": state.config.confirm_deletes
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        _ => None,
    }
}
