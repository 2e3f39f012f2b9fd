use serde::Serialize;
use serde_json::json;

use crate::hostel::text_matches;
use crate::ipc::helpers::{
    get_optional_str, get_required_str, get_string_list, respond, to_json, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{StaffMember, StaffType};
use crate::wardens;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StaffRow<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    staff_type: StaffType,
    role: &'a str,
    phone: &'a str,
    email: &'a str,
    is_warden: bool,
}

fn rows<'a>(staff: Vec<&'a dyn StaffMember>, state: &AppState) -> Vec<StaffRow<'a>> {
    staff
        .into_iter()
        .map(|s| StaffRow {
            id: s.id(),
            name: s.name(),
            staff_type: s.staff_type(),
            role: s.role_label(),
            phone: s.phone(),
            email: s.email(),
            is_warden: state.school.warden_ids.contains(s.id()),
        })
        .collect()
}

fn wardens_list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let school = &state.school;
    let search = get_optional_str(params, "search");
    let roster: Vec<_> = wardens::warden_roster(&school.warden_ids, &school.teachers, &school.employees)
        .into_iter()
        .filter(|s| text_matches(s.name(), search))
        .collect();
    Ok(json!({ "wardens": to_json(&rows(roster, state))? }))
}

fn wardens_pool(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let school = &state.school;
    let pool = wardens::eligible_warden_pool(&school.teachers, &school.employees);
    Ok(json!({ "staff": to_json(&rows(pool, state))? }))
}

fn wardens_toggle(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let staff_id = get_required_str(params, "staffId")?;
    let school = &mut state.school;
    let is_warden = wardens::toggle_checked(
        &mut school.warden_ids,
        &school.teachers,
        &school.employees,
        &staff_id,
    )?;
    tracing::info!(staff_id = %staff_id, is_warden, "warden toggled");
    Ok(json!({ "staffId": staff_id, "isWarden": is_warden }))
}

fn wardens_set(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let staff_ids = get_string_list(params, "staffIds")?;
    let school = &mut state.school;
    wardens::replace_wardens(
        &mut school.warden_ids,
        &school.teachers,
        &school.employees,
        &staff_ids,
    )?;
    tracing::info!(count = school.warden_ids.len(), "wardens replaced");
    Ok(json!({ "wardenIds": school.warden_ids }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "hostel.wardens.list" => wardens_list(state, &req.params),
        "hostel.wardens.pool" => wardens_pool(state),
        "hostel.wardens.toggle" => wardens_toggle(state, &req.params),
        "hostel.wardens.set" => wardens_set(state, &req.params),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
