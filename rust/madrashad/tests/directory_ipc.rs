mod test_support;

use serde_json::json;
use test_support::{ids, request_err, request_ok, spawn_sidecar};

#[test]
fn students_crud_and_delete_releases_room() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.create",
        json!({
            "student": {
                "name": "Hasan Mahmud",
                "department": "Hifz",
                "class": "Noorani",
                "section": "B",
                "guardianName": "Mahmud Hasan",
                "guardianPhone": "01700000009",
                "admissionDate": "2024-02-11",
                "studentType": "Residential",
                "tuitionFee": 1500,
                "hostelFee": 2000
            }
        }),
    );
    assert_eq!(created["id"], "S006");

    let unassigned = request_ok(&mut stdin, &mut reader, "2", "hostel.unassigned", json!({}));
    assert_eq!(ids(&unassigned["students"]), ["S006"]);

    let updated = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "students.update",
        json!({ "studentId": "S006", "patch": { "studentType": "Regular" } }),
    );
    assert_eq!(updated["studentType"], "Regular");
    let unassigned = request_ok(&mut stdin, &mut reader, "4", "hostel.unassigned", json!({}));
    assert!(ids(&unassigned["students"]).is_empty());

    let _ = request_err(
        &mut stdin,
        &mut reader,
        "5",
        "students.update",
        json!({ "studentId": "S006", "patch": { "admissionDate": "11/02/2024" } }),
        "bad_params",
    );

    let listed = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "students.list",
        json!({ "search": "hasan" }),
    );
    assert_eq!(ids(&listed["items"]), ["S006"]);
    assert_eq!(listed["total"], 6);

    let pending = request_err(
        &mut stdin,
        &mut reader,
        "7",
        "students.delete",
        json!({ "studentId": "S001" }),
        "confirmation_required",
    );
    assert_eq!(pending["details"]["releasesRoomId"], "HR01");

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "students.delete",
        json!({ "studentId": "S001", "confirm": true }),
    );
    assert_eq!(deleted["releasedFromRoomId"], "HR01");

    let roster = request_ok(
        &mut stdin,
        &mut reader,
        "9",
        "hostel.rooms.roster.get",
        json!({ "roomId": "HR01" }),
    );
    assert!(ids(&roster["assigned"]).is_empty());

    let _ = request_err(
        &mut stdin,
        &mut reader,
        "10",
        "students.delete",
        json!({ "studentId": "S001", "confirm": true }),
        "not_found",
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn staff_crud_and_delete_drops_warden_flag() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let teacher = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "teachers.create",
        json!({
            "teacher": {
                "name": "Hafez Nurul Islam",
                "subjectId": "SUB01",
                "phone": "01800000004",
                "email": "nurul@example.com",
                "joiningDate": "2023-07-01",
                "type": "Residential",
                "baseSalary": 18000
            }
        }),
    );
    assert_eq!(teacher["id"], "T04");

    let employee = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "employees.update",
        json!({ "employeeId": "E01", "patch": { "salary": 16000 } }),
    );
    assert_eq!(employee["salary"], 16000);
    assert_eq!(employee["role"], "Accountant");

    let _ = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "teachers.create",
        json!({ "teacher": "not an object" }),
        "bad_params",
    );

    let pending = request_err(
        &mut stdin,
        &mut reader,
        "4",
        "employees.delete",
        json!({ "employeeId": "E02" }),
        "confirmation_required",
    );
    assert_eq!(pending["details"]["isWarden"], true);

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "employees.delete",
        json!({ "employeeId": "E02", "confirm": true }),
    );
    assert_eq!(deleted["wardenRemoved"], true);

    let wardens = request_ok(&mut stdin, &mut reader, "6", "hostel.wardens.list", json!({}));
    assert_eq!(ids(&wardens["wardens"]), ["T01"]);

    let employees = request_ok(&mut stdin, &mut reader, "7", "employees.list", json!({}));
    assert_eq!(ids(&employees["items"]), ["E01"]);

    drop(stdin);
    let _ = child.wait();
}
