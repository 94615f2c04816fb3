//! Read cursor over an encoded blob.

use crate::varint::read_varint;

/// Bitstream version as `(major, minor)`, comparable.
pub(crate) type Version = (u8, u8);

/// Little-endian cursor. Every read returns `None` past the end of input.
#[derive(Debug, Clone)]
pub(crate) struct DecoderBuffer<'a> {
    data: &'a [u8],
    pos: usize,
    version: Version,
}

impl<'a> DecoderBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            version: (0, 0),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let out = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(out)
    }

    fn array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.bytes(N)?.try_into().ok()
    }

    pub fn u8(&mut self) -> Option<u8> {
        self.array::<1>().map(|b| b[0])
    }

    pub fn i8(&mut self) -> Option<i8> {
        self.array::<1>().map(i8::from_le_bytes)
    }

    pub fn u16(&mut self) -> Option<u16> {
        self.array().map(u16::from_le_bytes)
    }

    pub fn u32(&mut self) -> Option<u32> {
        self.array().map(u32::from_le_bytes)
    }

    pub fn varint_u32(&mut self) -> Option<u32> {
        let (value, len) = read_varint(&self.data[self.pos..], 5)?;
        let value = u32::try_from(value).ok()?;
        self.pos += len;
        Some(value)
    }

    /// A `u32` count: fixed width before `switch_version`, varint from it on.
    pub fn count(&mut self, switch_version: Version) -> Option<u32> {
        if self.version < switch_version {
            self.u32()
        } else {
            self.varint_u32()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut buf = DecoderBuffer::new(&data);
        assert_eq!(buf.u8(), Some(0x01));
        assert_eq!(buf.u16(), Some(0x0302));
        assert_eq!(buf.u32(), Some(0x0706_0504));
        assert_eq!(buf.remaining(), 0);
        assert_eq!(buf.u8(), None);
    }

    #[test]
    fn short_read_does_not_advance() {
        let data = [0x01, 0x02];
        let mut buf = DecoderBuffer::new(&data);
        assert_eq!(buf.u32(), None);
        assert_eq!(buf.remaining(), 2);
    }

    #[test]
    fn count_switches_on_version() {
        let data = [0x05, 0x00, 0x00, 0x00, 0x05];
        let mut buf = DecoderBuffer::new(&data);
        buf.set_version((1, 3));
        assert_eq!(buf.count((2, 0)), Some(5));
        buf.set_version((2, 0));
        assert_eq!(buf.count((2, 0)), Some(5));
        assert_eq!(buf.remaining(), 0);
    }
}
