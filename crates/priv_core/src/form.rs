use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::reader::SaveCursor;
use crate::writer::{put_tag, put_u32_be};

/// One tagged record inside a form: 4-byte name, big-endian u32 length,
/// payload, and an extra footer byte when the payload length is odd.
///
/// The footer is kept from decode for inspection but is always recomputed on
/// encode: it mirrors the first byte of the next sibling's name, or
/// duplicates the record's own last payload byte when there is no next
/// sibling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub data: Vec<u8>,
    pub footer: Option<u8>,
}

impl Record {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
            footer: None,
        }
    }

    fn parse(cur: &mut SaveCursor) -> Result<Record, DecodeError> {
        let name = cur.read_tag()?;
        let length = cur.read_u32_be()? as usize;
        let data = cur.read_bytes(length)?.to_vec();
        let footer = if length % 2 == 1 {
            Some(cur.read_u8()?)
        } else {
            None
        };
        Ok(Record { name, data, footer })
    }

    /// Bytes this record occupies on disk, header and footer included.
    fn parsed_len(&self) -> usize {
        8 + self.data.len() + usize::from(self.footer.is_some())
    }
}

/// An IFF-style container: `FORM`, big-endian u32 length, 4-byte name, then
/// a run of records. A record named `FORM` is itself a nested form;
/// `records` and `subforms` stay in lock-step so the placeholder record and
/// its parsed form can be matched up by order.
///
/// `footer` holds declared bytes that no record claimed. It is preserved
/// verbatim and never interpreted; some shipped saves declare lengths past
/// the data that actually exists, and the unclaimed tail lands here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub name: String,
    pub records: Vec<Record>,
    pub subforms: Vec<Form>,
    pub footer: Vec<u8>,
}

impl Form {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
            subforms: Vec::new(),
            footer: Vec::new(),
        }
    }

    /// Decode a top-level form at the cursor.
    pub fn parse(cur: &mut SaveCursor) -> Result<Form, DecodeError> {
        cur.expect_tag(b"FORM")?;
        let declared = cur.read_u32_be()? as usize;
        Self::parse_body(cur, declared)
    }

    /// Decode a form body (name plus record run) of `declared` bytes.
    ///
    /// Recovery is local: when a record or nested form runs out of bytes,
    /// the loop stops, the unread remainder of the declared range becomes
    /// the footer, and the error does not propagate to sibling chunks.
    fn parse_body(cur: &mut SaveCursor, declared: usize) -> Result<Form, DecodeError> {
        let mut form = Form::new(cur.read_tag()?);
        let mut consumed = 4usize;

        while consumed + 8 <= declared {
            let mark = cur.position();
            let record = match Record::parse(cur) {
                Ok(r) => r,
                Err(DecodeError::Truncated { .. }) => {
                    // Lying length: the form declared more than is there.
                    cur.seek_to(mark)?;
                    break;
                }
                Err(e) => return Err(e),
            };

            if record.name == "FORM" {
                let mut sub = SaveCursor::new(&record.data);
                match Form::parse_body(&mut sub, record.data.len()) {
                    Ok(subform) => {
                        consumed += record.parsed_len();
                        form.records.push(record);
                        form.subforms.push(subform);
                        continue;
                    }
                    Err(_) => {
                        // Malformed nested form: demote it and everything
                        // after it to footer bytes.
                        cur.seek_to(mark)?;
                        break;
                    }
                }
            }

            consumed += record.parsed_len();
            form.records.push(record);
        }

        if consumed < declared {
            form.footer = cur.read_at_most(declared - consumed).to_vec();
        }
        Ok(form)
    }

    /// Encode, recomputing every length and footer byte from current
    /// content. Nested forms are re-emitted from their parsed `subforms`
    /// entry, never from the stale placeholder payload.
    pub fn write(&self, out: &mut Vec<u8>) {
        put_tag(out, "FORM");
        let body = self.body_bytes();
        put_u32_be(out, body.len() as u32);
        out.extend_from_slice(&body);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }

    pub fn encoded_len(&self) -> usize {
        8 + self.body_len()
    }

    fn body_len(&self) -> usize {
        let mut subforms = self.subforms.iter();
        let mut len = 4 + self.footer.len();
        for record in &self.records {
            let payload_len = if record.name == "FORM" {
                match subforms.next() {
                    Some(sub) => sub.body_len(),
                    None => record.data.len(),
                }
            } else {
                record.data.len()
            };
            len += 8 + payload_len + payload_len % 2;
        }
        len
    }

    fn body_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        put_tag(&mut out, &self.name);

        let mut subforms = self.subforms.iter();
        let payloads: Vec<Vec<u8>> = self
            .records
            .iter()
            .map(|record| {
                if record.name == "FORM" {
                    match subforms.next() {
                        Some(sub) => sub.body_bytes(),
                        // Lock-step broken by a hand-built tree; fall back
                        // to the raw payload rather than dropping bytes.
                        None => record.data.clone(),
                    }
                } else {
                    record.data.clone()
                }
            })
            .collect();

        for (i, payload) in payloads.iter().enumerate() {
            put_tag(&mut out, &self.records[i].name);
            put_u32_be(&mut out, payload.len() as u32);
            out.extend_from_slice(payload);
            if payload.len() % 2 == 1 {
                let pad = match self.records.get(i + 1) {
                    Some(next) => next.name.as_bytes().first().copied().unwrap_or(0),
                    None => payload.last().copied().unwrap_or(0),
                };
                out.push(pad);
            }
        }

        out.extend_from_slice(&self.footer);
        out
    }

    /// Look up a record by a path of names. A single-element path names a
    /// record of this form; longer paths descend into the subform matching
    /// the head. A head equal to this form's own name is accepted and
    /// skipped, so both `["FITE", "AFTB"]` and `["AFTB"]` reach the same
    /// record on a form named `FITE`.
    pub fn get(&self, path: &[&str]) -> Option<&Record> {
        match path {
            [] => None,
            [name] => self.records.iter().find(|r| r.name == *name),
            [head, rest @ ..] => {
                if let Some(sub) = self.subforms.iter().find(|f| f.name == *head) {
                    return sub.get(rest);
                }
                if *head == self.name {
                    return self.get(rest);
                }
                None
            }
        }
    }

    pub fn get_mut(&mut self, path: &[&str]) -> Option<&mut Record> {
        match path {
            [] => None,
            [name] => self.records.iter_mut().find(|r| r.name == *name),
            [head, rest @ ..] => {
                if self.subforms.iter().any(|f| f.name == *head) {
                    let sub = self.subforms.iter_mut().find(|f| f.name == *head);
                    return sub.and_then(|f| f.get_mut(rest));
                }
                if *head == self.name {
                    return self.get_mut(rest);
                }
                None
            }
        }
    }

    /// The subform that would hold the record at `path`, for callers that
    /// need to synthesize a missing record in place.
    pub fn parent_form_mut(&mut self, path: &[&str]) -> Option<&mut Form> {
        match path {
            [] => None,
            [_] => Some(self),
            [head, rest @ ..] => {
                if self.subforms.iter().any(|f| f.name == *head) {
                    let sub = self.subforms.iter_mut().find(|f| f.name == *head);
                    return sub.and_then(|f| f.parent_form_mut(rest));
                }
                if *head == self.name {
                    return self.parent_form_mut(rest);
                }
                None
            }
        }
    }

    /// Append a record plus, when it is a nested form, its subform, keeping
    /// the two lists in lock-step.
    pub fn push_record(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn push_subform(&mut self, sub: Form) {
        self.records.push(Record::new("FORM", Vec::new()));
        self.subforms.push(sub);
    }
}
