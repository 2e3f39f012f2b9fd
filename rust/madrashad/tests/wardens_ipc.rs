mod test_support;

use serde_json::json;
use test_support::{ids, request_err, request_ok, spawn_sidecar};

#[test]
fn pool_roster_toggle_and_bulk_set() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let pool = request_ok(&mut stdin, &mut reader, "1", "hostel.wardens.pool", json!({}));
    assert_eq!(ids(&pool["staff"]), ["T01", "T03", "E02"]);
    assert_eq!(pool["staff"][2]["role"], "Security Guard");
    assert_eq!(pool["staff"][1]["isWarden"], false);

    let list = request_ok(&mut stdin, &mut reader, "2", "hostel.wardens.list", json!({}));
    assert_eq!(ids(&list["wardens"]), ["T01", "E02"]);
    assert_eq!(list["wardens"][0]["role"], "Teacher");

    let searched = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "hostel.wardens.list",
        json!({ "search": "rahim" }),
    );
    assert_eq!(ids(&searched["wardens"]), ["E02"]);

    let toggled = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "hostel.wardens.toggle",
        json!({ "staffId": "T03" }),
    );
    assert_eq!(toggled["isWarden"], true);
    let toggled = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "hostel.wardens.toggle",
        json!({ "staffId": "T01" }),
    );
    assert_eq!(toggled["isWarden"], false);

    let list = request_ok(&mut stdin, &mut reader, "6", "hostel.wardens.list", json!({}));
    assert_eq!(ids(&list["wardens"]), ["T03", "E02"]);

    let _ = request_err(
        &mut stdin,
        &mut reader,
        "7",
        "hostel.wardens.toggle",
        json!({ "staffId": "T02" }),
        "not_eligible",
    );
    let _ = request_err(
        &mut stdin,
        &mut reader,
        "8",
        "hostel.wardens.toggle",
        json!({ "staffId": "T77" }),
        "not_found",
    );

    let rejected = request_err(
        &mut stdin,
        &mut reader,
        "9",
        "hostel.wardens.set",
        json!({ "staffIds": ["T01", "E01"] }),
        "not_eligible",
    );
    assert_eq!(rejected["details"]["staffId"], "E01");
    let list = request_ok(&mut stdin, &mut reader, "10", "hostel.wardens.list", json!({}));
    assert_eq!(ids(&list["wardens"]), ["T03", "E02"]);

    let set = request_ok(
        &mut stdin,
        &mut reader,
        "11",
        "hostel.wardens.set",
        json!({ "staffIds": ["E02", "T01"] }),
    );
    assert_eq!(set["wardenIds"], json!(["E02", "T01"]));
    let list = request_ok(&mut stdin, &mut reader, "12", "hostel.wardens.list", json!({}));
    assert_eq!(ids(&list["wardens"]), ["T01", "E02"]);

    drop(stdin);
    let _ = child.wait();
}
