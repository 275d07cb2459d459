use crate::error::DecodeError;

/// Cursor over an immutable save image. Every read is bounds-checked and
/// reports the offset it failed at; nothing here panics on bad input.
pub struct SaveCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SaveCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn seek_to(&mut self, pos: usize) -> Result<(), DecodeError> {
        if pos > self.buf.len() {
            return Err(DecodeError::Truncated {
                offset: self.buf.len(),
                needed: pos - self.buf.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed: n - self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Take up to `n` bytes, fewer if the buffer runs out first.
    pub fn read_at_most(&mut self, n: usize) -> &'a [u8] {
        let n = n.min(self.remaining());
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        out
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, DecodeError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_i16_le(&mut self) -> Result<i16, DecodeError> {
        let b = self.read_bytes(2)?;
        Ok(i16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, DecodeError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, DecodeError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a 4-byte tag as a string. Non-ASCII bytes are kept via lossy
    /// conversion so hostile names still round-trip through display paths.
    pub fn read_tag(&mut self) -> Result<String, DecodeError> {
        let b = self.read_bytes(4)?;
        Ok(String::from_utf8_lossy(b).into_owned())
    }

    pub fn expect_tag(&mut self, expected: &[u8; 4]) -> Result<(), DecodeError> {
        let offset = self.pos;
        let b = self.read_bytes(4)?;
        if b != expected {
            return Err(DecodeError::BadMagic {
                offset,
                expected: String::from_utf8_lossy(expected).into_owned(),
                found: String::from_utf8_lossy(b).into_owned(),
            });
        }
        Ok(())
    }

    /// Read a null-terminated string. Stops at the first null byte and does
    /// not consume padding after it.
    pub fn read_cstring(&mut self) -> Result<String, DecodeError> {
        let start = self.pos;
        while self.pos < self.buf.len() && self.buf[self.pos] != 0 {
            self.pos += 1;
        }
        if self.pos == self.buf.len() {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed: 1,
            });
        }
        let out = String::from_utf8_lossy(&self.buf[start..self.pos]).into_owned();
        self.pos += 1; // the terminator
        Ok(out)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.read_bytes(n)?;
        Ok(())
    }
}

/// Null-terminated string from the front of a fixed slot, without a cursor.
pub fn cstring_at(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).into_owned()
}

/// Signed 16-bit little-endian value at `off`, or None past the end.
pub fn i16_le_at(data: &[u8], off: usize) -> Option<i16> {
    let b = data.get(off..off + 2)?;
    Some(i16::from_le_bytes([b[0], b[1]]))
}

/// Unsigned 32-bit little-endian value at `off`, or None past the end.
pub fn u32_le_at(data: &[u8], off: usize) -> Option<u32> {
    let b = data.get(off..off + 4)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}
