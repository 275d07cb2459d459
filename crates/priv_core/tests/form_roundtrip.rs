use priv_core::error::DecodeError;
use priv_core::form::{Form, Record};
use priv_core::reader::SaveCursor;

mod common;

#[test]
fn single_record_form_encodes_to_known_bytes() {
    let mut form = Form::new("ABCD");
    form.push_record(Record::new("WXYZ", vec![1, 2, 3]));

    let bytes = form.to_bytes();
    let mut expected = b"FORM".to_vec();
    expected.extend_from_slice(&16u32.to_be_bytes());
    expected.extend_from_slice(b"ABCD");
    expected.extend_from_slice(b"WXYZ");
    expected.extend_from_slice(&3u32.to_be_bytes());
    expected.extend_from_slice(&[1, 2, 3, 3]); // footer repeats the last byte
    assert_eq!(bytes, expected);
    assert_eq!(bytes.len(), 24);
}

#[test]
fn decode_encode_is_byte_stable_for_well_formed_input() {
    let bytes = common::equipment_form().to_bytes();
    let mut cur = SaveCursor::new(&bytes);
    let parsed = Form::parse(&mut cur).unwrap();
    assert_eq!(cur.remaining(), 0);
    assert_eq!(parsed.to_bytes(), bytes);
}

#[test]
fn nested_forms_three_levels_deep_roundtrip() {
    let mut inner = Form::new("INNR");
    inner.push_record(Record::new("LEAF", vec![7]));

    let mut middle = Form::new("MIDL");
    middle.push_subform(inner);
    middle.push_record(Record::new("MREC", vec![1, 2]));

    let mut outer = Form::new("OUTR");
    outer.push_subform(middle);

    let bytes = outer.to_bytes();
    let parsed = Form::parse(&mut SaveCursor::new(&bytes)).unwrap();

    assert_eq!(parsed.subforms.len(), 1);
    assert_eq!(parsed.subforms[0].name, "MIDL");
    assert_eq!(parsed.subforms[0].subforms[0].name, "INNR");
    assert_eq!(parsed.subforms[0].subforms[0].records[0].data, vec![7]);
    // Lengths are recomputed, so a second encode reproduces the bytes.
    assert_eq!(parsed.to_bytes(), bytes);
}

#[test]
fn nested_record_length_tracks_edits() {
    let mut inner = Form::new("INNR");
    inner.push_record(Record::new("LEAF", vec![7]));
    let mut outer = Form::new("OUTR");
    outer.push_subform(inner);

    let before = outer.to_bytes();
    outer.subforms[0].records[0].data = vec![7, 8, 9, 10];
    let after = outer.to_bytes();
    assert_eq!(after.len(), before.len() + 3);

    let parsed = Form::parse(&mut SaveCursor::new(&after)).unwrap();
    assert_eq!(parsed.subforms[0].records[0].data, vec![7, 8, 9, 10]);
}

#[test]
fn bad_magic_reports_what_was_found() {
    let bytes = b"FROM\0\0\0\x04ABCD";
    let err = Form::parse(&mut SaveCursor::new(bytes)).unwrap_err();
    assert_eq!(
        err,
        DecodeError::BadMagic {
            offset: 0,
            expected: "FORM".to_string(),
            found: "FROM".to_string(),
        }
    );
}

#[test]
fn lying_declared_length_lands_in_footer() {
    // Declares 30 body bytes but only a 4-byte name and one whole record
    // exist; the truncated trailing record becomes footer, verbatim.
    let mut bytes = b"FORM".to_vec();
    bytes.extend_from_slice(&30u32.to_be_bytes());
    bytes.extend_from_slice(b"ABCD");
    bytes.extend_from_slice(b"RCRD");
    bytes.extend_from_slice(&2u32.to_be_bytes());
    bytes.extend_from_slice(&[5, 6]);
    bytes.extend_from_slice(b"TRNC"); // record header cut short

    let form = Form::parse(&mut SaveCursor::new(&bytes)).unwrap();
    assert_eq!(form.records.len(), 1);
    assert_eq!(form.records[0].name, "RCRD");
    assert_eq!(form.footer, b"TRNC");
}

#[test]
fn malformed_nested_form_demotes_to_footer() {
    // The nested FORM record's payload is too short to be a form body.
    let mut bytes = b"FORM".to_vec();
    bytes.extend_from_slice(&14u32.to_be_bytes());
    bytes.extend_from_slice(b"ABCD");
    bytes.extend_from_slice(b"FORM");
    bytes.extend_from_slice(&2u32.to_be_bytes());
    bytes.extend_from_slice(&[1, 2]);

    let form = Form::parse(&mut SaveCursor::new(&bytes)).unwrap();
    assert!(form.records.is_empty());
    assert!(form.subforms.is_empty());
    assert_eq!(form.footer.len(), 10);
}

#[test]
fn form_prefixes_never_panic() {
    let bytes = common::equipment_form().to_bytes();
    for cut in 0..bytes.len() {
        let _ = Form::parse(&mut SaveCursor::new(&bytes[..cut]));
    }
    // Prefixes too short for even the header always fail.
    for cut in 0..12 {
        assert!(Form::parse(&mut SaveCursor::new(&bytes[..cut])).is_err());
    }
}
