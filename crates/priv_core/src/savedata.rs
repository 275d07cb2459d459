use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};
use crate::form::Form;
use crate::header::{
    self, CHUNK_CALLSIGN, CHUNK_EQUIPMENT, CHUNK_FLAGS, CHUNK_MISSION_BASE, CHUNK_MISSIONS,
    CHUNK_NAME, CHUNK_PLOT, CHUNK_SCORE, CHUNK_SHIP, ChunkType, Header,
};
use crate::reader::{self, SaveCursor};
use crate::writer::{put_padded_string, put_u16_le, put_u32_le};

/// Which game wrote (or should read) a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameVariant {
    Privateer,
    RighteousFire,
}

impl GameVariant {
    /// Variant implied by the file name: the base game saves `.SAV`, the
    /// expansion saves `.PRS`.
    pub fn from_extension(path: &Path) -> Option<GameVariant> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("SAV") {
            Some(GameVariant::Privateer)
        } else if ext.eq_ignore_ascii_case("PRS") {
            Some(GameVariant::RighteousFire)
        } else {
            None
        }
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameVariant::Privateer => write!(f, "Privateer"),
            GameVariant::RighteousFire => write!(f, "Righteous Fire"),
        }
    }
}

/// A string chunk: the value plus the fixed slot it lives in. Padding past
/// the terminator is not preserved; the slot is re-padded with zeros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddedString {
    pub value: String,
    pub slot_len: usize,
}

/// Plot position decoded from the PLOT chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotInfo {
    /// Mission id such as `s2mb`, empty before the plot starts, or
    /// `FFFFFFFF` once the plot has been failed.
    pub mission: String,
    pub flags: u8,
}

impl PlotInfo {
    pub fn started(&self) -> bool {
        !self.mission.is_empty() && !self.failed()
    }

    pub fn failed(&self) -> bool {
        self.mission == "FFFFFFFF"
    }

    pub fn completed(&self) -> bool {
        self.flags & 1 != 0
    }

    /// Series number from an `sNmX` mission id.
    pub fn series(&self) -> Option<u8> {
        let bytes = self.mission.as_bytes();
        if bytes.len() == 4 && bytes[0] == b's' && bytes[2] == b'm' {
            (bytes[1] as char).to_digit(10).map(|d| d as u8)
        } else {
            None
        }
    }
}

/// A fully decoded save, keyed by logical chunk index. The offset table is
/// not kept: offsets, lengths and the file size are all recomputed on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Savedata {
    pub forms: BTreeMap<usize, Form>,
    pub strings: BTreeMap<usize, PaddedString>,
    pub blobs: BTreeMap<usize, Vec<u8>>,
}

impl Savedata {
    pub fn new() -> Self {
        Self {
            forms: BTreeMap::new(),
            strings: BTreeMap::new(),
            blobs: BTreeMap::new(),
        }
    }

    /// Decode a whole save image. Any chunk failure is fatal: a save with a
    /// broken top-level chunk is not safe to edit or evaluate.
    pub fn parse(bytes: &[u8]) -> Result<Savedata, DecodeError> {
        let mut cur = SaveCursor::new(bytes);
        let hdr = Header::parse(&mut cur)?;

        let mut out = Savedata::new();
        for index in header::file_order(hdr.missions) {
            out.parse_chunk(&mut cur, &hdr, index)
                .map_err(|e| e.in_chunk(index))?;
        }
        Ok(out)
    }

    fn parse_chunk(
        &mut self,
        cur: &mut SaveCursor,
        hdr: &Header,
        index: usize,
    ) -> Result<(), DecodeError> {
        let start = hdr.offsets[index];
        let end = hdr.offset_end(index);
        cur.seek_to(start)?;
        match header::chunk_type(index) {
            ChunkType::Blob => {
                let data = cur.read_bytes(end.saturating_sub(start))?.to_vec();
                self.blobs.insert(index, data);
            }
            ChunkType::Form => {
                self.forms.insert(index, Form::parse(cur)?);
            }
            ChunkType::String => {
                let value = cur.read_cstring()?;
                self.strings.insert(index, PaddedString {
                    value,
                    slot_len: end.saturating_sub(start),
                });
            }
        }
        Ok(())
    }

    /// Active missions, derived from the chunk keys.
    pub fn missions(&self) -> usize {
        self.strings
            .keys()
            .filter(|&&k| k >= CHUNK_MISSION_BASE)
            .count()
    }

    /// Re-encode the whole file: payloads regenerated from the decoded
    /// chunks, offset table and file size recomputed.
    pub fn write(&self) -> Result<Vec<u8>, EncodeError> {
        let missions = self.missions();
        let mission_forms = self
            .forms
            .keys()
            .filter(|&&k| k >= CHUNK_MISSION_BASE)
            .count();
        if mission_forms != missions {
            return Err(EncodeError::new(format!(
                "{missions} mission name(s) but {mission_forms} mission form(s)"
            )));
        }

        let order = header::file_order(missions);
        let mut payloads = Vec::with_capacity(order.len());
        for &index in &order {
            payloads.push(self.chunk_payload(index)?);
        }

        let header_len = 4 + 4 * order.len();
        let file_size = header_len + payloads.iter().map(Vec::len).sum::<usize>();

        let mut out = Vec::with_capacity(file_size);
        put_u32_le(&mut out, file_size as u32);
        let mut offset = header_len;
        for payload in &payloads {
            put_u16_le(&mut out, offset as u16);
            out.extend_from_slice(&header::OFFSET_PAD);
            offset += payload.len();
        }
        for payload in &payloads {
            out.extend_from_slice(payload);
        }
        Ok(out)
    }

    fn chunk_payload(&self, index: usize) -> Result<Vec<u8>, EncodeError> {
        let missing = || {
            EncodeError::new(format!(
                "missing chunk {index} ({})",
                header::chunk_name(index)
            ))
        };
        match header::chunk_type(index) {
            ChunkType::Blob => self.blobs.get(&index).cloned().ok_or_else(missing),
            ChunkType::Form => Ok(self.forms.get(&index).ok_or_else(missing)?.to_bytes()),
            ChunkType::String => {
                let s = self.strings.get(&index).ok_or_else(missing)?;
                let mut out = Vec::with_capacity(s.slot_len);
                put_padded_string(&mut out, &s.value, s.slot_len)?;
                Ok(out)
            }
        }
    }

    // ---- domain accessors -------------------------------------------------

    pub fn name(&self) -> &str {
        self.strings
            .get(&CHUNK_NAME)
            .map(|s| s.value.as_str())
            .unwrap_or("")
    }

    pub fn callsign(&self) -> &str {
        self.strings
            .get(&CHUNK_CALLSIGN)
            .map(|s| s.value.as_str())
            .unwrap_or("")
    }

    /// Achievement state is tracked per `name:callsign` pair.
    pub fn identity(&self) -> String {
        format!("{}:{}", self.name(), self.callsign())
    }

    pub fn ship(&self) -> Option<u8> {
        self.blobs.get(&CHUNK_SHIP)?.first().copied()
    }

    /// Docked base id, from SHIP blob byte 2. Byte 1 is always zero.
    pub fn location(&self) -> Option<u8> {
        self.blobs.get(&CHUNK_SHIP)?.get(2).copied()
    }

    pub fn plot_info(&self) -> Option<PlotInfo> {
        let blob = self.blobs.get(&CHUNK_PLOT)?;
        Some(PlotInfo {
            mission: reader::cstring_at(blob),
            flags: blob.get(9).copied()?,
        })
    }

    pub fn mission_count(&self) -> Option<i16> {
        reader::i16_le_at(self.blobs.get(&CHUNK_MISSIONS)?, 0)
    }

    /// Kill count for one faction, from the KILL record of the score form.
    pub fn kills(&self, faction: usize) -> Option<i16> {
        let form = self.forms.get(&CHUNK_SCORE)?;
        let record = form.get(&["KILL"])?;
        reader::i16_le_at(&record.data, 2 * faction)
    }

    /// One byte per flag in the FLAGS blob, after an 11-byte preamble.
    pub fn flag(&self, n: usize) -> bool {
        self.blobs
            .get(&CHUNK_FLAGS)
            .and_then(|b| b.get(11 + n))
            .map(|&v| v != 0)
            .unwrap_or(false)
    }

    pub fn flags_all(&self, ns: &[usize]) -> bool {
        ns.iter().all(|&n| self.flag(n))
    }

    pub fn equipment(&self) -> Option<&Form> {
        self.forms.get(&CHUNK_EQUIPMENT)
    }

    pub fn equipment_mut(&mut self) -> Option<&mut Form> {
        self.forms.get_mut(&CHUNK_EQUIPMENT)
    }

    pub fn mission_form(&self, n: usize) -> Option<&Form> {
        self.forms.get(&(CHUNK_MISSION_BASE + 2 * n + 1))
    }

    fn crgi(&self) -> Option<&[u8]> {
        Some(&self.equipment()?.get(&["FITE", "CRGO", "CRGI"])?.data[..])
    }

    pub fn credits(&self) -> Option<u32> {
        reader::u32_le_at(self.crgi()?, 0)
    }

    pub fn cargo_capacity(&self) -> Option<u8> {
        self.crgi()?.get(4).copied()
    }

    pub fn secret_compartment(&self) -> Option<bool> {
        Some(self.crgi()?.get(6)? & 1 != 0)
    }

    pub fn cargo_expanded(&self) -> Option<bool> {
        Some(self.crgi()?.get(7)? & 1 != 0)
    }

    /// Variant deduced from the save content itself, as opposed to the file
    /// extension. The expansion marks its saves in the cargo info record.
    pub fn detected_game(&self) -> GameVariant {
        match self.crgi().and_then(|d| d.get(5).copied()) {
            Some(b) if b & 1 != 0 => GameVariant::RighteousFire,
            _ => GameVariant::Privateer,
        }
    }

    /// Mounted guns as (mount, gun id) pairs.
    pub fn guns(&self) -> Vec<(u8, u8)> {
        match self.equipment().and_then(|f| f.get(&["FITE", "WEAP", "GUNS"])) {
            Some(record) => record.data.chunks_exact(2).map(|p| (p[0], p[1])).collect(),
            None => Vec::new(),
        }
    }
}

impl Default for Savedata {
    fn default() -> Self {
        Self::new()
    }
}
