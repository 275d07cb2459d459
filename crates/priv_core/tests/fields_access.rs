use priv_core::error::FieldErrorCode;
use priv_core::fields::{self, FieldValue};
use priv_core::savedata::Savedata;

mod common;

fn sample() -> Savedata {
    Savedata::parse(&common::sample_bytes(0)).unwrap()
}

#[test]
fn get_resolves_symbolic_values() {
    let save = sample();
    assert_eq!(fields::get(&save, "ship").unwrap(), FieldValue::Str("Tarsus".into()));
    assert_eq!(fields::get(&save, "location").unwrap(), FieldValue::Str("Hector".into()));
    assert_eq!(fields::get(&save, "credits").unwrap(), FieldValue::Int(20_000));
    assert_eq!(fields::get(&save, "shields").unwrap(), FieldValue::Int(2));
    assert_eq!(
        fields::get(&save, "scanner").unwrap(),
        FieldValue::Str("Iris Mk III".into())
    );
    // The engine descriptor sits past the 8-byte "ENERGY" type tag.
    assert_eq!(fields::get(&save, "engine").unwrap(), FieldValue::Str("Mk2".into()));
}

#[test]
fn location_reads_ship_blob_byte_two() {
    let mut save = sample();
    // Byte 1 of the SHIP blob is always zero on real saves; the docked base
    // id follows it.
    save.blobs.insert(0, vec![2, 0, 15, 1, 0, 1, 0]);
    assert_eq!(save.ship(), Some(2));
    assert_eq!(save.location(), Some(15));
    assert_eq!(fields::get(&save, "location").unwrap(), FieldValue::Str("Hector".into()));

    fields::set(&mut save, "location", "Oakham").unwrap();
    assert_eq!(save.blobs[&0], vec![2, 0, 36, 1, 0, 1, 0]);
}

#[test]
fn scanner_ids_index_the_grid_from_zero() {
    let mut save = sample();
    let info = save
        .equipment_mut()
        .unwrap()
        .get_mut(&["FITE", "TRGT", "INFO"])
        .unwrap();
    info.data = b"TARGETNG".to_vec();
    info.data.push(60);
    assert_eq!(fields::get(&save, "scanner").unwrap(), FieldValue::Str("Iris Mk I".into()));

    fields::set(&mut save, "scanner", "B.S. Omni").unwrap();
    let info = save.equipment().unwrap().get(&["FITE", "TRGT", "INFO"]).unwrap();
    assert_eq!(info.data[8], 60 + 8);
}

#[test]
fn field_names_match_fuzzily() {
    let save = sample();
    // Case and punctuation are forgiven; prefixes work when unique.
    assert_eq!(fields::get(&save, "SHIP").unwrap(), FieldValue::Str("Tarsus".into()));
    assert_eq!(fields::get(&save, "cargo_capacity").unwrap(), FieldValue::Int(50));
    assert_eq!(fields::get(&save, "cred").unwrap(), FieldValue::Int(20_000));
}

#[test]
fn unknown_field_is_an_error_not_a_sentinel() {
    let save = sample();
    let err = fields::get(&save, "warp drive").unwrap_err();
    assert_eq!(err.code, FieldErrorCode::NoSuchField);
}

#[test]
fn absent_record_reads_as_nonexistent() {
    let mut save = sample();
    let equipment = save.equipment_mut().unwrap();
    equipment.subforms.retain(|f| f.name != "TRGT");
    equipment.records.pop(); // drop the matching placeholder
    assert_eq!(fields::get(&save, "scanner").unwrap(), FieldValue::Nonexistent);
}

#[test]
fn set_accepts_symbolic_and_numeric_values() {
    let mut save = sample();
    fields::set(&mut save, "ship", "Galaxy").unwrap();
    assert_eq!(fields::get(&save, "ship").unwrap(), FieldValue::Str("Galaxy".into()));
    fields::set(&mut save, "credits", "999999").unwrap();
    assert_eq!(save.credits(), Some(999_999));
    fields::set(&mut save, "shields", "5").unwrap();
    assert_eq!(fields::get(&save, "shields").unwrap(), FieldValue::Int(5));
}

#[test]
fn set_rejects_bad_values() {
    let mut save = sample();
    let err = fields::set(&mut save, "credits", "lots").unwrap_err();
    assert_eq!(err.code, FieldErrorCode::BadValue);
    let err = fields::set(&mut save, "cargo capacity", "300").unwrap_err();
    assert_eq!(err.code, FieldErrorCode::BadValue);
}

#[test]
fn string_fields_respect_slot_length() {
    let mut save = sample();
    fields::set(&mut save, "callsign", "Maverick").unwrap();
    assert_eq!(save.callsign(), "Maverick");
    let err = fields::set(&mut save, "callsign", "A name far too long for the slot").unwrap_err();
    assert_eq!(err.code, FieldErrorCode::TooLong);
}

#[test]
fn gun_edits_update_add_and_remove() {
    let mut save = sample();
    // Mount 2 ("Left") currently holds gun 5 (Laser).
    fields::set(&mut save, "guns", "left:tachyon").unwrap();
    assert_eq!(save.guns(), vec![(2, 7), (3, 5)]);
    fields::set(&mut save, "guns", "Right outer:mass driver").unwrap();
    assert_eq!(save.guns(), vec![(2, 7), (3, 5), (4, 3)]);
    fields::set(&mut save, "guns", "right:empty").unwrap();
    assert_eq!(save.guns(), vec![(2, 7), (4, 3)]);
}

#[test]
fn ambiguous_gun_value_lists_candidates() {
    let mut save = sample();
    let err = fields::set(&mut save, "guns", "lef:laser").unwrap_err();
    assert_eq!(err.code, FieldErrorCode::AmbiguousMatch);
    assert!(err.message.contains("Left outer"));
}

#[test]
fn missing_guns_record_is_synthesized_on_write() {
    let mut save = sample();
    let weap = save
        .equipment_mut()
        .unwrap()
        .parent_form_mut(&["FITE", "WEAP", "GUNS"])
        .unwrap();
    weap.records.retain(|r| r.name != "GUNS");

    fields::set(&mut save, "guns", "left:laser").unwrap();
    assert_eq!(save.guns(), vec![(2, 5)]);
}

#[test]
fn set_on_a_missing_unsynthesizable_record_fails() {
    let mut save = sample();
    let equipment = save.equipment_mut().unwrap();
    equipment.subforms.retain(|f| f.name != "SHLD");
    equipment.records.pop();
    let err = fields::set(&mut save, "shields", "3").unwrap_err();
    assert_eq!(err.code, FieldErrorCode::FieldNotFound);
}

#[test]
fn sanity_fix_strips_guns_on_impossible_mounts() {
    let mut save = sample();
    // Mount 10 exists only on the Galaxy; the fixture flies a Tarsus.
    fields::set(&mut save, "guns", "Bottom 1:laser").unwrap();
    let repairs = fields::sanity_fix(&mut save);
    assert_eq!(repairs.len(), 1);
    assert_eq!(save.guns(), vec![(2, 5), (3, 5)]);
    assert!(fields::sanity_fix(&mut save).is_empty());
}
