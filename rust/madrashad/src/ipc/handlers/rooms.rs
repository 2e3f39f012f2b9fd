use serde_json::json;

use crate::hostel;
use crate::ipc::helpers::{
    get_optional_str, get_required_str, get_required_u32, get_string_list, require_confirmation,
    respond, to_json, HandlerErr,
};
use crate::ipc::types::{AppState, Request};

fn rooms_list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let school = &state.school;
    let rooms: Vec<_> = hostel::search_rooms(&school.rooms, get_optional_str(params, "search"))
        .into_iter()
        .map(|room| hostel::room_occupancy(room, &school.students))
        .collect();
    Ok(json!({ "rooms": to_json(&rooms)? }))
}

/// Picker for the assign dialog. No spare bed anywhere is reported with a
/// message, not an error.
fn rooms_available(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let school = &state.school;
    let rooms: Vec<_> = hostel::available_rooms(&school.rooms)
        .into_iter()
        .map(|room| hostel::room_occupancy(room, &school.students))
        .collect();
    let message = rooms
        .is_empty()
        .then_some("no rooms with spare capacity");
    Ok(json!({ "rooms": to_json(&rooms)?, "message": message }))
}

fn rooms_create(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let room_number = get_required_str(params, "roomNumber")?;
    let capacity = get_required_u32(params, "capacity")?;
    let rooms = &mut state.school.rooms;
    let room_id = hostel::add_room(rooms, &room_number, capacity)?;
    let room = hostel::find_room(rooms, &room_id)?;
    tracing::info!(room_id = %room_id, room_number = %room.room_number, capacity, "room created");
    to_json(room)
}

fn rooms_update(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let room_id = get_required_str(params, "roomId")?;
    let room_number = get_required_str(params, "roomNumber")?;
    let capacity = get_required_u32(params, "capacity")?;
    let school = &mut state.school;
    hostel::redefine_room(&mut school.rooms, &room_id, &room_number, capacity)?;

    let room = hostel::find_room(&school.rooms, &room_id)?;
    if room.student_ids.len() > room.capacity as usize {
        tracing::warn!(
            room_id = %room_id,
            occupants = room.student_ids.len(),
            capacity,
            "room capacity now below occupancy"
        );
    }
    to_json(&hostel::room_occupancy(room, &school.students))
}

/// Occupants are released back to the unassigned pool, not rehoused.
fn rooms_delete(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let room_id = get_required_str(params, "roomId")?;
    let school = &mut state.school;
    let room = hostel::find_room(&school.rooms, &room_id)?;
    require_confirmation(
        &state.config,
        params,
        json!({
            "roomId": room.id,
            "roomNumber": room.room_number,
            "releasesStudentIds": room.student_ids
        }),
    )?;

    let Some(removed) = hostel::delete_room(&mut school.rooms, &room_id) else {
        return Err(hostel::AllocationError::RoomNotFound { room_id }.into());
    };
    tracing::info!(
        room_id = %removed.id,
        released = removed.student_ids.len(),
        "room deleted"
    );
    Ok(json!({
        "deleted": removed.id,
        "releasedStudentIds": removed.student_ids
    }))
}

fn roster_get(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let room_id = get_required_str(params, "roomId")?;
    let school = &state.school;
    let candidates = hostel::roster_candidates(&school.students, &school.rooms, &room_id)?;
    to_json(&candidates)
}

fn roster_set(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let room_id = get_required_str(params, "roomId")?;
    let student_ids = get_string_list(params, "studentIds")?;
    let school = &mut state.school;
    let change = state.config.allocation.set_roster(
        &mut school.rooms,
        &school.students,
        &room_id,
        student_ids,
    )?;
    tracing::info!(
        room_id = %room_id,
        added = change.added.len(),
        removed = change.removed.len(),
        moved = change.moved.len(),
        "roster saved"
    );

    let room = hostel::find_room(&school.rooms, &room_id)?;
    Ok(json!({
        "change": to_json(&change)?,
        "room": to_json(&hostel::room_occupancy(room, &school.students))?
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "hostel.rooms.list" => rooms_list(state, &req.params),
        "hostel.rooms.available" => rooms_available(state),
        "hostel.rooms.create" => rooms_create(state, &req.params),
        "hostel.rooms.update" => rooms_update(state, &req.params),
        "hostel.rooms.delete" => rooms_delete(state, &req.params),
        "hostel.rooms.roster.get" => roster_get(state, &req.params),
        "hostel.rooms.roster.set" => roster_set(state, &req.params),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
