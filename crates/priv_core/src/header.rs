use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::reader::SaveCursor;

// Logical chunk indices. Mission chunks are renumbered past the fixed set
// even though they physically sit between MISSIONS and SCORE in the file.
pub const CHUNK_SHIP: usize = 0;
pub const CHUNK_PLOT: usize = 1;
pub const CHUNK_MISSIONS: usize = 2;
pub const CHUNK_SCORE: usize = 3;
pub const CHUNK_FLAGS: usize = 4;
pub const CHUNK_JUMPS: usize = 5;
pub const CHUNK_EQUIPMENT: usize = 6;
pub const CHUNK_NAME: usize = 7;
pub const CHUNK_CALLSIGN: usize = 8;
pub const FIXED_CHUNK_COUNT: usize = 9;
pub const CHUNK_MISSION_BASE: usize = FIXED_CHUNK_COUNT;

/// Bytes between the 2-byte offset and the next entry. The value on disk is
/// constant filler; it is discarded on read and re-emitted verbatim.
pub const OFFSET_PAD: [u8; 2] = [0x00, 0xE0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkType {
    Blob,
    Form,
    String,
}

pub fn chunk_type(index: usize) -> ChunkType {
    match index {
        CHUNK_SHIP | CHUNK_PLOT | CHUNK_MISSIONS | CHUNK_FLAGS => ChunkType::Blob,
        CHUNK_SCORE | CHUNK_JUMPS | CHUNK_EQUIPMENT => ChunkType::Form,
        CHUNK_NAME | CHUNK_CALLSIGN => ChunkType::String,
        // Mission chunks alternate name string, mission form.
        i if (i - CHUNK_MISSION_BASE) % 2 == 0 => ChunkType::String,
        _ => ChunkType::Form,
    }
}

pub fn chunk_name(index: usize) -> String {
    match index {
        CHUNK_SHIP => "SHIP".into(),
        CHUNK_PLOT => "PLOT".into(),
        CHUNK_MISSIONS => "MISSIONS".into(),
        CHUNK_SCORE => "SCORE".into(),
        CHUNK_FLAGS => "FLAGS".into(),
        CHUNK_JUMPS => "JUMPS".into(),
        CHUNK_EQUIPMENT => "EQUIPMENT".into(),
        CHUNK_NAME => "NAME".into(),
        CHUNK_CALLSIGN => "CALLSIGN".into(),
        i => {
            let slot = i - CHUNK_MISSION_BASE;
            if slot % 2 == 0 {
                format!("MISSION {} NAME", slot / 2)
            } else {
                format!("MISSION {} DATA", slot / 2)
            }
        }
    }
}

/// The chunks of a save with `missions` active missions, as logical indices
/// in the order their payloads (and offset entries) appear on disk.
pub fn file_order(missions: usize) -> Vec<usize> {
    let mut order = vec![CHUNK_SHIP, CHUNK_PLOT, CHUNK_MISSIONS];
    order.extend(CHUNK_MISSION_BASE..CHUNK_MISSION_BASE + 2 * missions);
    order.extend(CHUNK_SCORE..FIXED_CHUNK_COUNT);
    order
}

/// Offset table: u32 LE file size, then per chunk a u16 LE offset plus two
/// filler bytes. The mission count is not stored; it is derived from where
/// the first chunk starts, since the data begins right after the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub file_size: u32,
    /// Chunk start offsets, indexed logically.
    pub offsets: Vec<usize>,
    pub missions: usize,
}

impl Header {
    pub fn parse(cur: &mut SaveCursor) -> Result<Header, DecodeError> {
        let file_size = cur.read_u32_le()?;

        let first = cur.read_u16_le()? as usize;
        cur.skip(2)?;
        if first % 4 != 0 || first / 4 < FIXED_CHUNK_COUNT + 1 {
            return Err(DecodeError::BadHeader {
                message: format!("first chunk offset {first} cannot follow an offset table"),
            });
        }
        let missions = (first / 4 - FIXED_CHUNK_COUNT - 1) / 2;

        let order = file_order(missions);
        let mut offsets = vec![0usize; order.len()];
        offsets[CHUNK_SHIP] = first;
        for &logical in &order[1..] {
            offsets[logical] = cur.read_u16_le()? as usize;
            cur.skip(2)?;
        }

        Ok(Header {
            file_size,
            offsets,
            missions,
        })
    }

    pub fn chunk_count(&self) -> usize {
        FIXED_CHUNK_COUNT + 2 * self.missions
    }

    /// End of chunk `index`'s byte range: the next chunk's start in file
    /// order, or the end of the file for the final chunk.
    pub fn offset_end(&self, index: usize) -> usize {
        let order = file_order(self.missions);
        let pos = match order.iter().position(|&i| i == index) {
            Some(p) => p,
            None => return self.file_size as usize,
        };
        match order.get(pos + 1) {
            Some(&next) => self.offsets[next],
            None => self.file_size as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_order_interleaves_missions() {
        assert_eq!(file_order(0), vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(file_order(2), vec![0, 1, 2, 9, 10, 11, 12, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn mission_chunks_alternate_types() {
        assert_eq!(chunk_type(CHUNK_MISSION_BASE), ChunkType::String);
        assert_eq!(chunk_type(CHUNK_MISSION_BASE + 1), ChunkType::Form);
        assert_eq!(chunk_type(CHUNK_MISSION_BASE + 2), ChunkType::String);
    }
}
