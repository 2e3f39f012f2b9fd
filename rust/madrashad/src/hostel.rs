//! Hostel room allocation.
//!
//! The student -> room relation lives only in each room's `student_ids`.
//! A student id appears in at most one roster. Every view in this module is
//! recomputed from the rosters on demand and never cached.
//!
//! The plain functions (`assign_student_to_room`, `set_room_roster`, ...) are
//! the raw relation edits and perform no policy checks. `AllocationPolicy`
//! wraps them with capacity, eligibility and uniqueness enforcement. IPC
//! assignments and roster saves always go through the policy.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

use crate::model::{Room, Student, StudentType};

const HIGH_OCCUPANCY_PERCENT: f64 = 75.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("room not found: {room_id}")]
    RoomNotFound { room_id: String },

    #[error("student not found: {student_id}")]
    StudentNotFound { student_id: String },

    #[error("student {student_id} is not a residential or lillah boarding student")]
    NotEligible { student_id: String },

    #[error("room {room_number} holds at most {capacity} students (requested {requested})")]
    CapacityExceeded {
        room_id: String,
        room_number: String,
        capacity: u32,
        requested: usize,
    },

    #[error("student {student_id} is already allocated to room {room_number}")]
    AlreadyAssignedElsewhere {
        student_id: String,
        room_id: String,
        room_number: String,
    },

    #[error("student {student_id} appears more than once in a roster")]
    DuplicateStudent { student_id: String },

    #[error("room capacity must be at least 1")]
    InvalidCapacity,

    #[error("room number must not be empty")]
    EmptyRoomNumber,
}

impl AllocationError {
    pub fn code(&self) -> &'static str {
        match self {
            AllocationError::RoomNotFound { .. } | AllocationError::StudentNotFound { .. } => {
                "not_found"
            }
            AllocationError::NotEligible { .. } => "not_eligible",
            AllocationError::CapacityExceeded { .. } => "capacity_exceeded",
            AllocationError::AlreadyAssignedElsewhere { .. } => "already_assigned_elsewhere",
            AllocationError::DuplicateStudent { .. } => "duplicate_student",
            AllocationError::InvalidCapacity => "invalid_capacity",
            AllocationError::EmptyRoomNumber => "bad_params",
        }
    }
}

pub fn allocated_ids(rooms: &[Room]) -> HashSet<&str> {
    rooms
        .iter()
        .flat_map(|r| r.student_ids.iter().map(String::as_str))
        .collect()
}

pub fn room_of<'a>(rooms: &'a [Room], student_id: &str) -> Option<&'a Room> {
    rooms.iter().find(|r| r.contains(student_id))
}

pub fn find_room<'a>(rooms: &'a [Room], room_id: &str) -> Result<&'a Room, AllocationError> {
    rooms
        .iter()
        .find(|r| r.id == room_id)
        .ok_or_else(|| AllocationError::RoomNotFound {
            room_id: room_id.to_string(),
        })
}

pub fn eligible_for_hostel(students: &[Student]) -> Vec<&Student> {
    students
        .iter()
        .filter(|s| s.student_type.is_hostel_eligible())
        .collect()
}

/// The one "needs a room" list. Dashboard, overview and allocation table all
/// read it from here.
pub fn unassigned_eligible<'a>(students: &'a [Student], rooms: &[Room]) -> Vec<&'a Student> {
    let allocated = allocated_ids(rooms);
    students
        .iter()
        .filter(|s| s.student_type.is_hostel_eligible() && !allocated.contains(s.id.as_str()))
        .collect()
}

pub fn eligible_student<'a>(
    students: &'a [Student],
    student_id: &str,
) -> Result<&'a Student, AllocationError> {
    let student = students
        .iter()
        .find(|s| s.id == student_id)
        .ok_or_else(|| AllocationError::StudentNotFound {
            student_id: student_id.to_string(),
        })?;
    if !student.student_type.is_hostel_eligible() {
        return Err(AllocationError::NotEligible {
            student_id: student_id.to_string(),
        });
    }
    Ok(student)
}

pub fn verify_unique_allocation(rooms: &[Room]) -> Result<(), AllocationError> {
    let mut holder: HashMap<&str, &Room> = HashMap::new();
    for room in rooms {
        for id in &room.student_ids {
            if let Some(prev) = holder.insert(id.as_str(), room) {
                if prev.id == room.id {
                    return Err(AllocationError::DuplicateStudent {
                        student_id: id.clone(),
                    });
                }
                return Err(AllocationError::AlreadyAssignedElsewhere {
                    student_id: id.clone(),
                    room_id: prev.id.clone(),
                    room_number: prev.room_number.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Replaces one room's roster. Other rooms are untouched, so a caller that
/// passes a student held elsewhere breaks uniqueness.
pub fn set_room_roster(rooms: &mut [Room], room_id: &str, student_ids: Vec<String>) -> bool {
    match rooms.iter_mut().find(|r| r.id == room_id) {
        Some(room) => {
            room.student_ids = student_ids;
            true
        }
        None => false,
    }
}

/// Strips the student from every roster, then appends it to the target.
/// No capacity check.
pub fn assign_student_to_room(rooms: &mut [Room], student_id: &str, target_room_id: &str) {
    remove_student_from_roster(rooms, student_id);
    if let Some(room) = rooms.iter_mut().find(|r| r.id == target_room_id) {
        room.student_ids.push(student_id.to_string());
    }
}

/// Returns the room the student was released from, if any.
pub fn remove_student_from_roster(rooms: &mut [Room], student_id: &str) -> Option<String> {
    let mut released_from = None;
    for room in rooms.iter_mut() {
        let before = room.student_ids.len();
        room.student_ids.retain(|id| id != student_id);
        if room.student_ids.len() != before && released_from.is_none() {
            released_from = Some(room.id.clone());
        }
    }
    released_from
}

/// Occupants are not migrated; they fall back to unassigned.
pub fn delete_room(rooms: &mut Vec<Room>, room_id: &str) -> Option<Room> {
    let idx = rooms.iter().position(|r| r.id == room_id)?;
    Some(rooms.remove(idx))
}

/// Text order for room numbers: case-folded first, then byte order as the
/// tie-break. Not numeric, so "20" sorts after "101".
pub fn compare_room_numbers(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Appends an empty room and stable-sorts the collection by room number.
pub fn create_room(rooms: &mut Vec<Room>, room_number: &str, capacity: u32) -> String {
    let id = format!("HR-{}", Uuid::new_v4());
    rooms.push(Room {
        id: id.clone(),
        room_number: room_number.to_string(),
        capacity,
        student_ids: Vec::new(),
    });
    rooms.sort_by(|a, b| compare_room_numbers(&a.room_number, &b.room_number));
    id
}

/// Roster untouched even when the new capacity is below occupancy.
pub fn update_room_definition(
    rooms: &mut [Room],
    room_id: &str,
    room_number: &str,
    capacity: u32,
) -> bool {
    match rooms.iter_mut().find(|r| r.id == room_id) {
        Some(room) => {
            room.room_number = room_number.to_string();
            room.capacity = capacity;
            true
        }
        None => false,
    }
}

pub fn validate_room_definition(room_number: &str, capacity: u32) -> Result<&str, AllocationError> {
    let number = room_number.trim();
    if number.is_empty() {
        return Err(AllocationError::EmptyRoomNumber);
    }
    if capacity == 0 {
        return Err(AllocationError::InvalidCapacity);
    }
    Ok(number)
}

pub fn add_room(
    rooms: &mut Vec<Room>,
    room_number: &str,
    capacity: u32,
) -> Result<String, AllocationError> {
    let number = validate_room_definition(room_number, capacity)?;
    Ok(create_room(rooms, number, capacity))
}

pub fn redefine_room(
    rooms: &mut [Room],
    room_id: &str,
    room_number: &str,
    capacity: u32,
) -> Result<(), AllocationError> {
    let number = validate_room_definition(room_number, capacity)?;
    if update_room_definition(rooms, room_id, number, capacity) {
        Ok(())
    } else {
        Err(AllocationError::RoomNotFound {
            room_id: room_id.to_string(),
        })
    }
}

/// What the roster editor does with a student another room already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterConflicts {
    #[default]
    Reject,
    Move,
    /// Leave the other roster alone. Can break uniqueness.
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationPolicy {
    pub enforce_capacity: bool,
    pub roster_conflicts: RosterConflicts,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            enforce_capacity: true,
            roster_conflicts: RosterConflicts::Reject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub student_id: String,
    pub from_room_id: Option<String>,
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovedStudent {
    pub student_id: String,
    pub from_room_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterChange {
    pub room_id: String,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub moved: Vec<MovedStudent>,
}

impl AllocationPolicy {
    /// Assign or move one student. Re-assigning to the room that already
    /// holds the student moves it to the end of that roster.
    pub fn assign(
        &self,
        rooms: &mut [Room],
        students: &[Student],
        student_id: &str,
        room_id: &str,
    ) -> Result<Assignment, AllocationError> {
        eligible_student(students, student_id)?;
        let target = find_room(rooms, room_id)?;
        // A student already in the target keeps its bed, even in an
        // over-capacity room.
        if self.enforce_capacity && !target.contains(student_id) && !target.has_spare_bed() {
            return Err(AllocationError::CapacityExceeded {
                room_id: target.id.clone(),
                room_number: target.room_number.clone(),
                capacity: target.capacity,
                requested: target.beds_taken() + 1,
            });
        }

        let from_room_id = room_of(rooms, student_id).map(|r| r.id.clone());
        assign_student_to_room(rooms, student_id, room_id);
        Ok(Assignment {
            student_id: student_id.to_string(),
            from_room_id,
            room_id: room_id.to_string(),
        })
    }

    /// Batch roster commit from the manage-room editor.
    ///
    /// Students already in this room are kept as-is. Newly added ones must
    /// be eligible, and a roster may only grow while it stays within
    /// capacity; shrinking an over-capacity room is always allowed.
    pub fn set_roster(
        &self,
        rooms: &mut [Room],
        students: &[Student],
        room_id: &str,
        student_ids: Vec<String>,
    ) -> Result<RosterChange, AllocationError> {
        let room = find_room(rooms, room_id)?;
        let current = room.student_ids.clone();
        let capacity = room.capacity;
        let room_number = room.room_number.clone();

        let mut seen = HashSet::new();
        for id in &student_ids {
            if !seen.insert(id.as_str()) {
                return Err(AllocationError::DuplicateStudent {
                    student_id: id.clone(),
                });
            }
        }

        let added: Vec<String> = student_ids
            .iter()
            .filter(|id| !current.contains(id))
            .cloned()
            .collect();
        let removed: Vec<String> = current
            .iter()
            .filter(|id| !student_ids.contains(id))
            .cloned()
            .collect();

        for id in &added {
            eligible_student(students, id)?;
        }
        if self.enforce_capacity && !added.is_empty() && student_ids.len() > capacity as usize {
            return Err(AllocationError::CapacityExceeded {
                room_id: room_id.to_string(),
                room_number,
                capacity,
                requested: student_ids.len(),
            });
        }

        let mut moved = Vec::new();
        for id in &added {
            let Some(other) = rooms.iter().find(|r| r.id != room_id && r.contains(id)) else {
                continue;
            };
            match self.roster_conflicts {
                RosterConflicts::Reject => {
                    return Err(AllocationError::AlreadyAssignedElsewhere {
                        student_id: id.clone(),
                        room_id: other.id.clone(),
                        room_number: other.room_number.clone(),
                    });
                }
                RosterConflicts::Move => moved.push(MovedStudent {
                    student_id: id.clone(),
                    from_room_id: other.id.clone(),
                }),
                RosterConflicts::Ignore => {
                    tracing::warn!(
                        student_id = %id,
                        room_id = %other.id,
                        "student left in another roster"
                    );
                }
            }
        }

        for m in &moved {
            for other in rooms.iter_mut().filter(|r| r.id != room_id) {
                other.student_ids.retain(|id| *id != m.student_id);
            }
        }
        set_room_roster(rooms, room_id, student_ids);

        Ok(RosterChange {
            room_id: room_id.to_string(),
            added,
            removed,
            moved,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomStatus {
    Available,
    Full,
    OverCapacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OccupancyLevel {
    Normal,
    High,
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occupant<'a> {
    pub id: &'a str,
    pub name: &'a str,
}

impl<'a> From<&'a Student> for Occupant<'a> {
    fn from(s: &'a Student) -> Self {
        Occupant {
            id: &s.id,
            name: &s.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOccupancy<'a> {
    pub room_id: &'a str,
    pub room_number: &'a str,
    pub capacity: u32,
    pub occupied: usize,
    pub beds_taken: usize,
    pub percentage: f64,
    pub status: RoomStatus,
    pub level: OccupancyLevel,
    pub occupants: Vec<Occupant<'a>>,
}

/// Occupants in roster order. Ids that are not eligible students (unknown,
/// or regular by data error) are not listed in `occupants` or `occupied`, but
/// still take a bed: `status`, `percentage` and `level` follow `beds_taken`,
/// the same count the assign picker and the capacity checks use.
pub fn room_occupancy<'a>(room: &'a Room, students: &'a [Student]) -> RoomOccupancy<'a> {
    let occupants: Vec<Occupant<'a>> = room
        .student_ids
        .iter()
        .filter_map(|id| students.iter().find(|s| s.id == *id))
        .filter(|s| s.student_type.is_hostel_eligible())
        .map(Occupant::from)
        .collect();
    let occupied = occupants.len();
    let beds_taken = room.beds_taken();
    let percentage = if room.capacity > 0 {
        beds_taken as f64 / f64::from(room.capacity) * 100.0
    } else {
        0.0
    };
    let status = match beds_taken.cmp(&(room.capacity as usize)) {
        Ordering::Less => RoomStatus::Available,
        Ordering::Equal => RoomStatus::Full,
        Ordering::Greater => RoomStatus::OverCapacity,
    };
    let level = if percentage >= 100.0 {
        OccupancyLevel::Full
    } else if percentage > HIGH_OCCUPANCY_PERCENT {
        OccupancyLevel::High
    } else {
        OccupancyLevel::Normal
    };

    RoomOccupancy {
        room_id: &room.id,
        room_number: &room.room_number,
        capacity: room.capacity,
        occupied,
        beds_taken,
        percentage,
        status,
        level,
        occupants,
    }
}

/// Rooms the assign picker may offer: roster strictly below capacity.
pub fn available_rooms(rooms: &[Room]) -> Vec<&Room> {
    rooms.iter().filter(|r| r.has_spare_bed()).collect()
}

pub fn search_rooms<'a>(rooms: &'a [Room], term: Option<&str>) -> Vec<&'a Room> {
    rooms
        .iter()
        .filter(|r| text_matches(&r.room_number, term))
        .collect()
}

/// Case-insensitive substring match; an empty term matches everything.
pub fn text_matches(text: &str, term: Option<&str>) -> bool {
    match term.map(str::trim) {
        None | Some("") => true,
        Some(t) => text.to_lowercase().contains(&t.to_lowercase()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterCandidates<'a> {
    pub room_id: &'a str,
    pub room_number: &'a str,
    pub capacity: u32,
    pub can_add: bool,
    pub assigned: Vec<Occupant<'a>>,
    pub available: Vec<Occupant<'a>>,
}

pub fn roster_candidates<'a>(
    students: &'a [Student],
    rooms: &'a [Room],
    room_id: &str,
) -> Result<RosterCandidates<'a>, AllocationError> {
    let room = find_room(rooms, room_id)?;
    let occupancy = room_occupancy(room, students);
    let available = unassigned_eligible(students, rooms)
        .into_iter()
        .map(Occupant::from)
        .collect();
    Ok(RosterCandidates {
        room_id: &room.id,
        room_number: &room.room_number,
        capacity: room.capacity,
        can_add: room.has_spare_bed(),
        assigned: occupancy.occupants,
        available,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocatedStudent<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub student_type: StudentType,
    pub room_id: &'a str,
    pub room_number: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignedStudent<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub student_type: StudentType,
}

impl<'a> From<&'a Student> for UnassignedStudent<'a> {
    fn from(s: &'a Student) -> Self {
        UnassignedStudent {
            id: &s.id,
            name: &s.name,
            student_type: s.student_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationTable<'a> {
    pub allocated: Vec<AllocatedStudent<'a>>,
    pub unassigned: Vec<UnassignedStudent<'a>>,
}

pub fn allocation_table<'a>(
    students: &'a [Student],
    rooms: &'a [Room],
    search: Option<&str>,
) -> AllocationTable<'a> {
    let allocated = eligible_for_hostel(students)
        .into_iter()
        .filter(|s| text_matches(&s.name, search))
        .filter_map(|s| {
            room_of(rooms, &s.id).map(|room| AllocatedStudent {
                id: &s.id,
                name: &s.name,
                student_type: s.student_type,
                room_id: &room.id,
                room_number: &room.room_number,
            })
        })
        .collect();
    let unassigned = unassigned_eligible(students, rooms)
        .into_iter()
        .filter(|s| text_matches(&s.name, search))
        .map(UnassignedStudent::from)
        .collect();
    AllocationTable {
        allocated,
        unassigned,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostelSummary {
    pub total_rooms: usize,
    pub total_capacity: u64,
    pub students_in_hostel: usize,
    pub unassigned_students: usize,
}

pub fn hostel_summary(students: &[Student], rooms: &[Room]) -> HostelSummary {
    let allocated = allocated_ids(rooms);
    let students_in_hostel = eligible_for_hostel(students)
        .iter()
        .filter(|s| allocated.contains(s.id.as_str()))
        .count();
    HostelSummary {
        total_rooms: rooms.len(),
        total_capacity: rooms.iter().map(|r| u64::from(r.capacity)).sum(),
        students_in_hostel,
        unassigned_students: unassigned_eligible(students, rooms).len(),
    }
}
