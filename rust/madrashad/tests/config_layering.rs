mod test_support;

use serde_json::json;
use test_support::{ids, request_ok, spawn_sidecar_with_env, temp_dir};

#[test]
fn config_file_and_env_shape_the_running_daemon() {
    let dir = temp_dir("madrasha-config");
    let path = dir.join("madrasha.toml");
    std::fs::write(
        &path,
        "confirm_deletes = false\n\n[allocation]\nenforce_capacity = false\n",
    )
    .expect("write config");

    let path_str = path.to_string_lossy().to_string();
    let (mut child, mut stdin, mut reader) =
        spawn_sidecar_with_env(&[("MADRASHA_CONFIG", path_str.as_str())]);

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(health["confirmDeletes"], false);
    assert_eq!(health["allocation"]["enforceCapacity"], false);
    assert_eq!(health["seed"], "sample");

    // No confirmation round-trip when the check is off.
    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "hostel.rooms.delete",
        json!({ "roomId": "HR04" }),
    );
    assert_eq!(deleted["deleted"], "HR04");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "hostel.rooms.update",
        json!({ "roomId": "HR01", "roomNumber": "101", "capacity": 1 }),
    );
    // Capacity enforcement off: a full room still accepts students.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "hostel.allocation.assign",
        json!({ "studentId": "S004", "roomId": "HR01" }),
    );
    let roster = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "hostel.rooms.roster.get",
        json!({ "roomId": "HR01" }),
    );
    assert_eq!(ids(&roster["assigned"]), ["S001", "S004"]);

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn empty_seed_starts_with_no_records() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar_with_env(&[("MADRASHA_SEED", "empty")]);

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(health["seed"], "empty");
    assert_eq!(health["counts"]["students"], 0);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "hostel.rooms.create",
        json!({ "roomNumber": "1", "capacity": 3 }),
    );
    assert_eq!(created["capacity"], 3);

    let summary = request_ok(&mut stdin, &mut reader, "3", "dashboard.summary", json!({}));
    assert_eq!(summary["hostel"]["totalRooms"], 1);
    assert_eq!(summary["hostel"]["totalCapacity"], 3);
    assert_eq!(summary["hostel"]["unassignedStudents"], 0);

    drop(stdin);
    let _ = child.wait();
}
