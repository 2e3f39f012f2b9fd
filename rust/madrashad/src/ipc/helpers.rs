use serde::Serialize;
use serde_json::{json, Value};

use crate::directory::DirectoryError;
use crate::hostel::AllocationError;
use crate::ipc::error::{err, ok};
use crate::config::Config;
use crate::wardens::WardenError;

#[derive(Debug)]
pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        HandlerErr {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<AllocationError> for HandlerErr {
    fn from(e: AllocationError) -> Self {
        let details = match &e {
            AllocationError::RoomNotFound { room_id } => Some(json!({ "roomId": room_id })),
            AllocationError::StudentNotFound { student_id }
            | AllocationError::NotEligible { student_id }
            | AllocationError::DuplicateStudent { student_id } => {
                Some(json!({ "studentId": student_id }))
            }
            AllocationError::CapacityExceeded {
                room_id,
                room_number,
                capacity,
                requested,
            } => Some(json!({
                "roomId": room_id,
                "roomNumber": room_number,
                "capacity": capacity,
                "requested": requested
            })),
            AllocationError::AlreadyAssignedElsewhere {
                student_id,
                room_id,
                room_number,
            } => Some(json!({
                "studentId": student_id,
                "roomId": room_id,
                "roomNumber": room_number
            })),
            AllocationError::InvalidCapacity | AllocationError::EmptyRoomNumber => None,
        };
        HandlerErr {
            code: e.code(),
            message: e.to_string(),
            details,
        }
    }
}

impl From<WardenError> for HandlerErr {
    fn from(e: WardenError) -> Self {
        let staff_id = match &e {
            WardenError::StaffNotFound { staff_id } | WardenError::NotResidential { staff_id } => {
                staff_id.clone()
            }
        };
        HandlerErr {
            code: e.code(),
            message: e.to_string(),
            details: Some(json!({ "staffId": staff_id })),
        }
    }
}

impl From<DirectoryError> for HandlerErr {
    fn from(e: DirectoryError) -> Self {
        HandlerErr {
            code: e.code(),
            message: e.to_string(),
            details: None,
        }
    }
}

pub fn respond(id: &str, result: Result<Value, HandlerErr>) -> Value {
    match result {
        Ok(v) => ok(id, v),
        Err(e) => {
            tracing::warn!(request_id = %id, code = e.code, "{}", e.message);
            e.response(id)
        }
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<Value, HandlerErr> {
    serde_json::to_value(value).map_err(|e| HandlerErr {
        code: "internal",
        message: e.to_string(),
        details: None,
    })
}

pub fn get_required_str(params: &Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn get_optional_str<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

pub fn get_required_u32(params: &Value, key: &str) -> Result<u32, HandlerErr> {
    let v = params
        .get(key)
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))?;
    v.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| HandlerErr::bad_params(format!("{} must be a non-negative integer", key)))
}

pub fn get_required_object<'a>(params: &'a Value, key: &str) -> Result<&'a Value, HandlerErr> {
    match params.get(key) {
        Some(v) if v.is_object() => Ok(v),
        Some(_) => Err(HandlerErr::bad_params(format!("{} must be an object", key))),
        None => Err(HandlerErr::bad_params(format!("missing {}", key))),
    }
}

pub fn get_string_list(params: &Value, key: &str) -> Result<Vec<String>, HandlerErr> {
    let arr = params
        .get(key)
        .and_then(|v| v.as_array())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))?;
    arr.iter()
        .map(|v| {
            v.as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| HandlerErr::bad_params(format!("{} must contain strings", key)))
        })
        .collect()
}

/// Destructive requests carry `"confirm": true` unless the check is turned
/// off. `effect` describes what the request would do and is echoed back.
pub fn require_confirmation(
    config: &Config,
    params: &Value,
    effect: Value,
) -> Result<(), HandlerErr> {
    if !config.confirm_deletes {
        return Ok(());
    }
    if params.get("confirm").and_then(|v| v.as_bool()) == Some(true) {
        return Ok(());
    }
    Err(HandlerErr {
        code: "confirmation_required",
        message: "resend with confirm: true to proceed".to_string(),
        details: Some(effect),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_gate_follows_config() {
        let mut config = Config::default();
        let effect = json!({ "roomId": "HR01" });

        let e = require_confirmation(&config, &json!({}), effect.clone()).expect_err("gated");
        assert_eq!(e.code, "confirmation_required");
        assert_eq!(e.details, Some(effect.clone()));
        assert!(require_confirmation(&config, &json!({ "confirm": "yes" }), effect.clone()).is_err());
        assert!(require_confirmation(&config, &json!({ "confirm": true }), effect.clone()).is_ok());

        config.confirm_deletes = false;
        assert!(require_confirmation(&config, &json!({}), effect).is_ok());
    }

    #[test]
    fn capacity_error_carries_room_details() {
        let e: HandlerErr = AllocationError::CapacityExceeded {
            room_id: "HR01".into(),
            room_number: "101".into(),
            capacity: 4,
            requested: 5,
        }
        .into();
        assert_eq!(e.code, "capacity_exceeded");
        let details = e.details.expect("details");
        assert_eq!(details["roomNumber"], "101");
        assert_eq!(details["requested"], 5);
    }

    #[test]
    fn param_helpers_reject_wrong_types() {
        let params = json!({ "capacity": -1, "ids": ["S001", 2], "n": "x" });
        assert_eq!(get_required_u32(&params, "capacity").expect_err("negative").code, "bad_params");
        assert!(get_string_list(&params, "ids").is_err());
        assert!(get_required_str(&params, "missing").is_err());
        assert_eq!(get_optional_str(&params, "n"), Some("x"));
        assert_eq!(
            get_required_u32(&json!({ "capacity": 6 }), "capacity").expect("u32"),
            6
        );
    }
}
