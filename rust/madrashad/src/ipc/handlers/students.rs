use serde_json::json;

use crate::directory;
use crate::hostel;
use crate::ipc::handlers::records;
use crate::ipc::helpers::{require_confirmation, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::Student;

/// Deleting a student also strips the id from whichever room held it.
fn students_delete(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let school = &mut state.school;
    let student_id = records::require_existing::<Student>(&school.students, params)?;
    let room = hostel::room_of(&school.rooms, &student_id);
    require_confirmation(
        &state.config,
        params,
        json!({
            "studentId": student_id,
            "releasesRoomId": room.map(|r| r.id.as_str()),
            "releasesRoomNumber": room.map(|r| r.room_number.as_str())
        }),
    )?;

    directory::remove(&mut school.students, &student_id)?;
    let released_from = hostel::remove_student_from_roster(&mut school.rooms, &student_id);
    tracing::info!(student_id = %student_id, released_from = ?released_from, "student deleted");
    Ok(json!({ "deleted": student_id, "releasedFromRoomId": released_from }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "students.list" => records::list(&state.school.students, &req.params),
        "students.create" => records::create(&mut state.school.students, &req.params),
        "students.update" => records::update(&mut state.school.students, &req.params),
        "students.delete" => students_delete(state, &req.params),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
