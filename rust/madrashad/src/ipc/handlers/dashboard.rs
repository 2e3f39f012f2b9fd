use serde_json::json;

use crate::hostel;
use crate::ipc::helpers::{respond, to_json, HandlerErr};
use crate::ipc::types::{AppState, Request};

/// Headline counts for the landing page. The hostel block reads the same
/// summary as `hostel.overview`.
fn summary(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let school = &state.school;
    let hostel = hostel::hostel_summary(&school.students, &school.rooms);
    Ok(json!({
        "totalStudents": school.students.len(),
        "totalTeachers": school.teachers.len(),
        "totalEmployees": school.employees.len(),
        "totalWardens": school.warden_ids.len(),
        "hostel": to_json(&hostel)?
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.summary" => Some(respond(&req.id, summary(state))),
        _ => None,
    }
}
