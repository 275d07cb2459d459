use crate::error::EncodeError;

// Append-only emit helpers. The whole file is rebuilt in memory, so these
// all write into a Vec rather than an io::Write.

pub fn put_u16_le(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn put_u32_le(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn put_u32_be(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

pub fn put_tag(out: &mut Vec<u8>, tag: &str) {
    out.extend_from_slice(tag.as_bytes());
}

/// Write a variable-length string into a fixed-length slot, null-padded.
/// The terminator counts against the slot, so `s.len() + 1 <= slot_len`.
pub fn put_padded_string(out: &mut Vec<u8>, s: &str, slot_len: usize) -> Result<(), EncodeError> {
    if s.len() + 1 > slot_len {
        return Err(EncodeError::new(format!(
            "string {s:?} does not fit a {slot_len}-byte slot"
        )));
    }
    out.extend_from_slice(s.as_bytes());
    out.resize(out.len() + (slot_len - s.len()), 0);
    Ok(())
}
