//! Hostel warden roster: a flat set of staff ids, no capacity.

use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::{Employee, StaffMember, Teacher};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WardenError {
    #[error("staff member not found: {staff_id}")]
    StaffNotFound { staff_id: String },

    #[error("staff member {staff_id} is not residential")]
    NotResidential { staff_id: String },
}

impl WardenError {
    pub fn code(&self) -> &'static str {
        match self {
            WardenError::StaffNotFound { .. } => "not_found",
            WardenError::NotResidential { .. } => "not_eligible",
        }
    }
}

/// Teachers first, then employees.
pub fn all_staff<'a>(
    teachers: &'a [Teacher],
    employees: &'a [Employee],
) -> impl Iterator<Item = &'a dyn StaffMember> {
    teachers
        .iter()
        .map(|t| t as &dyn StaffMember)
        .chain(employees.iter().map(|e| e as &dyn StaffMember))
}

pub fn find_staff<'a>(
    teachers: &'a [Teacher],
    employees: &'a [Employee],
    staff_id: &str,
) -> Option<&'a dyn StaffMember> {
    all_staff(teachers, employees).find(|s| s.id() == staff_id)
}

/// Adds if absent, removes if present. Returns whether the id is now a warden.
pub fn toggle_warden(wardens: &mut BTreeSet<String>, staff_id: &str) -> bool {
    if wardens.remove(staff_id) {
        false
    } else {
        wardens.insert(staff_id.to_string());
        true
    }
}

pub fn eligible_warden_pool<'a>(
    teachers: &'a [Teacher],
    employees: &'a [Employee],
) -> Vec<&'a dyn StaffMember> {
    all_staff(teachers, employees)
        .filter(|s| s.is_residential())
        .collect()
}

pub fn warden_roster<'a>(
    wardens: &BTreeSet<String>,
    teachers: &'a [Teacher],
    employees: &'a [Employee],
) -> Vec<&'a dyn StaffMember> {
    all_staff(teachers, employees)
        .filter(|s| wardens.contains(s.id()))
        .collect()
}

fn ensure_eligible(
    teachers: &[Teacher],
    employees: &[Employee],
    staff_id: &str,
) -> Result<(), WardenError> {
    let staff = find_staff(teachers, employees, staff_id).ok_or_else(|| {
        WardenError::StaffNotFound {
            staff_id: staff_id.to_string(),
        }
    })?;
    if !staff.is_residential() {
        return Err(WardenError::NotResidential {
            staff_id: staff_id.to_string(),
        });
    }
    Ok(())
}

/// Toggle that refuses to flag non-residential staff. Unflagging is always
/// allowed so a stale id can be cleared.
pub fn toggle_checked(
    wardens: &mut BTreeSet<String>,
    teachers: &[Teacher],
    employees: &[Employee],
    staff_id: &str,
) -> Result<bool, WardenError> {
    if !wardens.contains(staff_id) {
        ensure_eligible(teachers, employees, staff_id)?;
    }
    Ok(toggle_warden(wardens, staff_id))
}

/// Bulk save from the warden picker. All ids are checked before the set is
/// replaced.
pub fn replace_wardens(
    wardens: &mut BTreeSet<String>,
    teachers: &[Teacher],
    employees: &[Employee],
    staff_ids: &[String],
) -> Result<(), WardenError> {
    for id in staff_ids {
        ensure_eligible(teachers, employees, id)?;
    }
    *wardens = staff_ids.iter().cloned().collect();
    Ok(())
}
