use serde_json::json;

use crate::hostel::{self, UnassignedStudent};
use crate::ipc::helpers::{
    get_optional_str, get_required_str, require_confirmation, respond, to_json, HandlerErr,
};
use crate::ipc::types::{AppState, Request};

/// Room cards plus the unassigned list, as the hostel page shows them.
fn overview(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let school = &state.school;
    let rooms: Vec<_> = school
        .rooms
        .iter()
        .map(|room| hostel::room_occupancy(room, &school.students))
        .collect();
    let unassigned: Vec<UnassignedStudent> = hostel::unassigned_eligible(&school.students, &school.rooms)
        .into_iter()
        .map(UnassignedStudent::from)
        .collect();
    Ok(json!({
        "summary": to_json(&hostel::hostel_summary(&school.students, &school.rooms))?,
        "rooms": to_json(&rooms)?,
        "unassigned": to_json(&unassigned)?
    }))
}

fn unassigned(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let school = &state.school;
    let students: Vec<UnassignedStudent> = hostel::unassigned_eligible(&school.students, &school.rooms)
        .into_iter()
        .map(UnassignedStudent::from)
        .collect();
    Ok(json!({ "students": to_json(&students)? }))
}

fn allocation_get(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let school = &state.school;
    let table = hostel::allocation_table(
        &school.students,
        &school.rooms,
        get_optional_str(params, "search"),
    );
    to_json(&table)
}

fn allocation_assign(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let room_id = get_required_str(params, "roomId")?;
    let school = &mut state.school;
    let assignment = state.config.allocation.assign(
        &mut school.rooms,
        &school.students,
        &student_id,
        &room_id,
    )?;
    tracing::info!(
        student_id = %student_id,
        from = ?assignment.from_room_id,
        to = %room_id,
        "student assigned"
    );
    to_json(&assignment)
}

/// Removing a student who holds no bed is a no-op and needs no confirmation.
fn allocation_remove(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let school = &mut state.school;
    if let Some(room) = hostel::room_of(&school.rooms, &student_id) {
        require_confirmation(
            &state.config,
            params,
            json!({
                "studentId": student_id,
                "roomId": room.id,
                "roomNumber": room.room_number
            }),
        )?;
    }

    let released_from = hostel::remove_student_from_roster(&mut school.rooms, &student_id);
    if let Some(room_id) = &released_from {
        tracing::info!(student_id = %student_id, room_id = %room_id, "student removed from room");
    }
    Ok(json!({ "studentId": student_id, "releasedFromRoomId": released_from }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "hostel.overview" => overview(state),
        "hostel.unassigned" => unassigned(state),
        "hostel.allocation.get" => allocation_get(state, &req.params),
        "hostel.allocation.assign" => allocation_assign(state, &req.params),
        "hostel.allocation.remove" => allocation_remove(state, &req.params),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
